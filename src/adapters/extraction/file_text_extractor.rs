//! File Text Extractor - TextExtractor backed by `pdf-extract` and `docx-rs`.
//!
//! Parsing is CPU-bound and may panic on hostile input, so it runs on the
//! blocking pool; a panic surfaces as [`ExtractionError::TaskFailed`].

use async_trait::async_trait;
use docx_rs::{
    read_docx, DocumentChild, Paragraph, ParagraphChild, Run, RunChild, Table, TableCellContent,
    TableChild, TableRowChild,
};

use crate::domain::extraction::{DocumentKind, SPREADSHEET_PLACEHOLDER};
use crate::ports::{ExtractionError, TextExtractor};

/// Extracts plain text from PDF, Word, text and spreadsheet uploads.
#[derive(Debug, Clone, Default)]
pub struct FileTextExtractor;

impl FileTextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous extraction, for callers already off the async runtime.
    pub fn extract_blocking(bytes: &[u8], file_name: &str) -> Result<String, ExtractionError> {
        let kind = DocumentKind::from_file_name(file_name);

        match kind {
            DocumentKind::Pdf if bytes.is_empty() => Ok(String::new()),
            DocumentKind::Word if bytes.is_empty() => Ok(String::new()),
            DocumentKind::Pdf => pdf_extract::extract_text_from_mem(bytes)
                .map_err(|e| ExtractionError::Pdf(e.to_string())),
            DocumentKind::Word => extract_docx(bytes),
            DocumentKind::Spreadsheet => Ok(printable_spreadsheet_text(bytes)),
            DocumentKind::PlainText | DocumentKind::Unknown => {
                Ok(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }
}

#[async_trait]
impl TextExtractor for FileTextExtractor {
    async fn extract(&self, bytes: Vec<u8>, file_name: &str) -> Result<String, ExtractionError> {
        let kind = DocumentKind::from_file_name(file_name);
        if !kind.needs_parser() || bytes.is_empty() {
            return Self::extract_blocking(&bytes, file_name);
        }

        let name = file_name.to_string();
        let text = tokio::task::spawn_blocking(move || Self::extract_blocking(&bytes, &name))
            .await
            .map_err(|e| ExtractionError::TaskFailed(e.to_string()))??;

        tracing::debug!(file_name, kind = %kind, chars = text.chars().count(), "extracted document text");
        Ok(text)
    }
}

/// Keeps printable ASCII plus line breaks and tabs; everything else becomes a space.
fn printable_spreadsheet_text(bytes: &[u8]) -> String {
    let decoded = String::from_utf8_lossy(bytes);
    let cleaned: String = decoded
        .chars()
        .map(|c| match c {
            ' '..='~' | '\n' | '\r' | '\t' => c,
            _ => ' ',
        })
        .collect();

    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        SPREADSHEET_PLACEHOLDER.to_string()
    } else {
        trimmed.to_string()
    }
}

fn extract_docx(bytes: &[u8]) -> Result<String, ExtractionError> {
    let docx = read_docx(bytes).map_err(|e| ExtractionError::Word(e.to_string()))?;

    let mut blocks = Vec::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(paragraph) => push_paragraph(paragraph, &mut blocks),
            DocumentChild::Table(table) => push_table(table, &mut blocks),
            _ => {}
        }
    }
    Ok(blocks.join("\n"))
}

fn push_paragraph(paragraph: &Paragraph, blocks: &mut Vec<String>) {
    let mut line = String::new();
    for child in &paragraph.children {
        append_paragraph_child(child, &mut line);
    }
    let line = line.trim();
    if !line.is_empty() {
        blocks.push(line.to_string());
    }
}

fn push_table(table: &Table, blocks: &mut Vec<String>) {
    for row in &table.rows {
        let TableChild::TableRow(row) = row;
        for cell in &row.cells {
            let TableRowChild::TableCell(cell) = cell;
            for content in &cell.children {
                match content {
                    TableCellContent::Paragraph(paragraph) => push_paragraph(paragraph, blocks),
                    TableCellContent::Table(inner) => push_table(inner, blocks),
                    _ => {}
                }
            }
        }
    }
}

fn append_paragraph_child(child: &ParagraphChild, line: &mut String) {
    match child {
        ParagraphChild::Run(run) => append_run(run, line),
        ParagraphChild::Hyperlink(link) => {
            for inner in &link.children {
                append_paragraph_child(inner, line);
            }
        }
        _ => {}
    }
}

fn append_run(run: &Run, line: &mut String) {
    for child in &run.children {
        match child {
            RunChild::Text(text) => line.push_str(&text.text),
            RunChild::Break(_) => line.push('\n'),
            RunChild::Tab(_) => line.push('\t'),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Table as DocxTable, TableCell, TableRow};

    fn build_docx(docx: Docx) -> Vec<u8> {
        let mut cursor = std::io::Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).unwrap();
        cursor.into_inner()
    }

    #[tokio::test]
    async fn zero_bytes_never_fail() {
        let extractor = FileTextExtractor::new();
        for name in ["a.pdf", "a.docx", "a.doc", "a.txt", "a.csv", "a.md", "a.bin", "noext"] {
            let text = extractor.extract(Vec::new(), name).await.unwrap();
            assert_eq!(text, "", "{name}");
        }
        for name in ["a.xlsx", "a.xls"] {
            let text = extractor.extract(Vec::new(), name).await.unwrap();
            assert_eq!(text, SPREADSHEET_PLACEHOLDER);
        }
    }

    #[tokio::test]
    async fn plain_text_is_decoded_lossily() {
        let extractor = FileTextExtractor::new();
        let text = extractor
            .extract(vec![b'h', b'i', 0xFF, b'!'], "notes.txt")
            .await
            .unwrap();
        assert_eq!(text, "hi\u{FFFD}!");
    }

    #[test]
    fn spreadsheet_keeps_printable_ascii_only() {
        let bytes = b"PK\x03\x04 Name\tScore\r\nAda\t\x0290 \xC3\xA9";
        let text = printable_spreadsheet_text(bytes);
        assert_eq!(text, "PK   Name\tScore\r\nAda\t 90");
    }

    #[test]
    fn spreadsheet_of_binary_noise_yields_placeholder() {
        let text = printable_spreadsheet_text(&[0x00, 0x01, 0xFE, 0x7F]);
        assert_eq!(text, SPREADSHEET_PLACEHOLDER);
    }

    #[tokio::test]
    async fn corrupt_pdf_is_an_error() {
        let extractor = FileTextExtractor::new();
        let result = extractor.extract(b"not a pdf".to_vec(), "broken.pdf").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn corrupt_docx_is_a_word_error() {
        let extractor = FileTextExtractor::new();
        let result = extractor.extract(b"not a zip".to_vec(), "broken.docx").await;
        assert!(matches!(result, Err(ExtractionError::Word(_))));
    }

    #[tokio::test]
    async fn docx_paragraphs_and_tables_are_extracted() {
        let docx = Docx::new()
            .add_paragraph(
                docx_rs::Paragraph::new().add_run(docx_rs::Run::new().add_text("The system shall")),
            )
            .add_table(DocxTable::new(vec![TableRow::new(vec![
                TableCell::new().add_paragraph(
                    docx_rs::Paragraph::new().add_run(docx_rs::Run::new().add_text("REQ-001")),
                ),
            ])]));

        let extractor = FileTextExtractor::new();
        let text = extractor
            .extract(build_docx(docx), "spec.docx")
            .await
            .unwrap();

        assert!(text.contains("The system shall"));
        assert!(text.contains("REQ-001"));
    }
}
