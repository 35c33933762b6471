//! Document kinds recognised by the text extraction adapter.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Text returned for spreadsheets when nothing printable survives.
pub const SPREADSHEET_PLACEHOLDER: &str = "[Excel file detected — text extraction limited. For best results, export as CSV or paste content directly.]";

/// Format of an uploaded file, decided from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    Pdf,
    Word,
    PlainText,
    Spreadsheet,
    Unknown,
}

impl DocumentKind {
    /// Maps the lowercased last extension of `file_name` to a kind.
    pub fn from_file_name(file_name: &str) -> Self {
        let extension = match file_name.rsplit_once('.') {
            Some((_, ext)) => ext.to_ascii_lowercase(),
            None => return DocumentKind::Unknown,
        };

        match extension.as_str() {
            "pdf" => DocumentKind::Pdf,
            "doc" | "docx" => DocumentKind::Word,
            "txt" | "csv" | "md" => DocumentKind::PlainText,
            "xlsx" | "xls" => DocumentKind::Spreadsheet,
            _ => DocumentKind::Unknown,
        }
    }

    /// Display label shown next to a document row.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "PDF",
            DocumentKind::Word => "Word",
            DocumentKind::PlainText => "Text",
            DocumentKind::Spreadsheet => "Excel",
            DocumentKind::Unknown => "File",
        }
    }

    /// Whether extraction needs a binary parser.
    pub fn needs_parser(&self) -> bool {
        matches!(self, DocumentKind::Pdf | DocumentKind::Word)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_extensions() {
        assert_eq!(DocumentKind::from_file_name("spec.pdf"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_file_name("Spec.DOCX"), DocumentKind::Word);
        assert_eq!(DocumentKind::from_file_name("legacy.doc"), DocumentKind::Word);
        assert_eq!(DocumentKind::from_file_name("notes.md"), DocumentKind::PlainText);
        assert_eq!(DocumentKind::from_file_name("cases.csv"), DocumentKind::PlainText);
        assert_eq!(DocumentKind::from_file_name("plan.XLSX"), DocumentKind::Spreadsheet);
    }

    #[test]
    fn uses_last_extension_only() {
        assert_eq!(DocumentKind::from_file_name("report.pdf.txt"), DocumentKind::PlainText);
        assert_eq!(DocumentKind::from_file_name("archive.tar.gz"), DocumentKind::Unknown);
    }

    #[test]
    fn missing_extension_is_unknown() {
        assert_eq!(DocumentKind::from_file_name("README"), DocumentKind::Unknown);
        assert_eq!(DocumentKind::from_file_name(""), DocumentKind::Unknown);
    }

    #[test]
    fn only_binary_formats_need_a_parser() {
        assert!(DocumentKind::Pdf.needs_parser());
        assert!(DocumentKind::Word.needs_parser());
        assert!(!DocumentKind::Spreadsheet.needs_parser());
        assert_eq!(DocumentKind::Spreadsheet.to_string(), "Excel");
    }
}
