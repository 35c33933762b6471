//! In-memory document store with a trash bin.
//!
//! The store is plain data. Persistence goes through
//! [`crate::ports::WorkspaceStorage`], which reads and writes a whole
//! [`DocumentStore`] at once.

use serde::{Deserialize, Serialize};

use super::document::DocumentRow;
use crate::domain::analysis::{ExtractedRequirement, RequirementReview};
use crate::domain::foundation::{DocumentId, Timestamp};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrashedDocument {
    pub row: DocumentRow,
    pub deleted_at: Timestamp,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentStore {
    rows: Vec<DocumentRow>,
    trash: Vec<TrashedDocument>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a row at the front, replacing any row with the same id.
    pub fn insert(&mut self, row: DocumentRow) {
        self.rows.retain(|r| r.id != row.id);
        self.rows.insert(0, row);
    }

    pub fn get(&self, id: DocumentId) -> Option<&DocumentRow> {
        self.rows.iter().find(|r| r.id == id)
    }

    /// Applies `f` to the row with `id`. Returns false when no such row exists.
    pub fn update<F>(&mut self, id: DocumentId, f: F) -> bool
    where
        F: FnOnce(&mut DocumentRow),
    {
        match self.rows.iter_mut().find(|r| r.id == id) {
            Some(row) => {
                f(row);
                true
            }
            None => false,
        }
    }

    pub fn rows(&self) -> &[DocumentRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn parsed(&self) -> impl Iterator<Item = &DocumentRow> {
        self.rows.iter().filter(|r| r.is_parsed())
    }

    /// Every requirement extracted from parsed rows, in row order.
    pub fn parsed_requirements(&self) -> Vec<ExtractedRequirement> {
        self.parsed()
            .flat_map(|r| r.requirements.iter().cloned())
            .collect()
    }

    /// Adopts a review's risk and non-zero testability on every parsed
    /// requirement with the review's id. Returns how many were updated.
    pub fn apply_review(&mut self, review: &RequirementReview) -> usize {
        let mut updated = 0;
        for requirement in self
            .rows
            .iter_mut()
            .filter(|r| r.is_parsed())
            .flat_map(|r| r.requirements.iter_mut())
            .filter(|r| r.id == review.id)
        {
            if let Some(risk) = review.known_risk() {
                requirement.risk = risk;
            }
            if review.testability.value() > 0 {
                requirement.testability = review.testability;
            }
            updated += 1;
        }
        updated
    }

    /// Moves a row to the trash.
    pub fn trash(&mut self, id: DocumentId) -> Option<&TrashedDocument> {
        let index = self.rows.iter().position(|r| r.id == id)?;
        let row = self.rows.remove(index);
        self.trash.insert(
            0,
            TrashedDocument {
                row,
                deleted_at: Timestamp::now(),
            },
        );
        self.trash.first()
    }

    /// Moves a row back from the trash to the front of the list.
    pub fn restore(&mut self, id: DocumentId) -> Option<&DocumentRow> {
        let index = self.trash.iter().position(|t| t.row.id == id)?;
        let trashed = self.trash.remove(index);
        self.rows.insert(0, trashed.row);
        self.rows.first()
    }

    /// Permanently removes a trashed row.
    pub fn purge(&mut self, id: DocumentId) -> bool {
        let before = self.trash.len();
        self.trash.retain(|t| t.row.id != id);
        self.trash.len() != before
    }

    pub fn empty_trash(&mut self) {
        self.trash.clear();
    }

    pub fn trashed(&self) -> &[TrashedDocument] {
        &self.trash
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::workspace::ScoreSource;
    use crate::domain::analysis::{DocumentAnalysis, ExtractedRequirement, Level};
    use crate::domain::foundation::Percentage;

    fn row(name: &str) -> DocumentRow {
        DocumentRow::uploaded(DocumentId::new(), name, 100)
    }

    #[test]
    fn insert_puts_newest_first() {
        let mut store = DocumentStore::new();
        let first = row("a.txt");
        let second = row("b.txt");
        store.insert(first.clone());
        store.insert(second.clone());

        assert_eq!(store.rows()[0].id, second.id);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn update_returns_false_for_missing_row() {
        let mut store = DocumentStore::new();
        assert!(!store.update(DocumentId::new(), |r| r.mark_failed("x")));
    }

    #[test]
    fn trash_and_restore_round_trip() {
        let mut store = DocumentStore::new();
        let doc = row("a.txt");
        let id = doc.id;
        store.insert(doc);

        assert!(store.trash(id).is_some());
        assert!(store.is_empty());
        assert_eq!(store.trashed().len(), 1);

        let restored = store.restore(id).map(|r| r.id);
        assert_eq!(restored, Some(id));
        assert!(store.trashed().is_empty());
        assert!(store.get(id).is_some());
    }

    #[test]
    fn purge_removes_from_trash_only() {
        let mut store = DocumentStore::new();
        let doc = row("a.txt");
        let id = doc.id;
        store.insert(doc);

        assert!(!store.purge(id));
        store.trash(id);
        assert!(store.purge(id));
        assert!(store.restore(id).is_none());
    }

    #[test]
    fn parsed_requirements_skip_unparsed_rows() {
        let mut store = DocumentStore::new();
        let mut parsed = row("a.txt");
        let mut analysis = DocumentAnalysis::default();
        analysis.extracted_requirements = vec![Default::default(), Default::default()];
        parsed.apply_analysis(analysis.clone(), ScoreSource::Ai);

        let mut pending = row("b.txt");
        pending.requirements = analysis.extracted_requirements.clone();

        store.insert(parsed);
        store.insert(pending);

        assert_eq!(store.parsed_requirements().len(), 2);
        assert_eq!(store.parsed().count(), 1);
    }

    #[test]
    fn review_updates_matching_parsed_requirements() {
        let mut store = DocumentStore::new();
        let mut doc = row("a.txt");
        let analysis = DocumentAnalysis {
            extracted_requirements: vec![ExtractedRequirement {
                id: "REQ-001".into(),
                risk: Level::High,
                testability: Percentage::new(40),
                ..ExtractedRequirement::default()
            }],
            ..DocumentAnalysis::default()
        };
        doc.apply_analysis(analysis, ScoreSource::Ai);
        store.insert(doc);

        let unrated = RequirementReview {
            id: "REQ-001".into(),
            ..RequirementReview::default()
        };
        assert_eq!(store.apply_review(&unrated), 1);
        assert_eq!(store.parsed_requirements()[0].risk, Level::High);
        assert_eq!(store.parsed_requirements()[0].testability.value(), 40);

        let rated = RequirementReview {
            id: "REQ-001".into(),
            risk: Some(Level::Low),
            testability: Percentage::new(85),
            ..RequirementReview::default()
        };
        assert_eq!(store.apply_review(&rated), 1);
        assert_eq!(store.parsed_requirements()[0].risk, Level::Low);
        assert_eq!(store.parsed_requirements()[0].testability.value(), 85);

        let other = RequirementReview {
            id: "REQ-404".into(),
            ..RequirementReview::default()
        };
        assert_eq!(store.apply_review(&other), 0);
    }
}
