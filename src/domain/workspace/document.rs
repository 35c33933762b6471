//! A document row in the client workspace.

use serde::{Deserialize, Serialize};

use super::simulation::SimulatedScores;
use crate::domain::analysis::{
    DocumentAnalysis, DocumentIssue, ExtractedRequirement, Level, RequirementDocument,
    RequirementRef,
};
use crate::domain::extraction::DocumentKind;
use crate::domain::foundation::{DocumentId, Percentage, Timestamp};

/// Lifecycle of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Parsing,
    Parsed,
    Error,
}

/// Where a row's scores came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreSource {
    /// Structured model analysis.
    Ai,
    /// The model replied but its JSON could not be recovered.
    AiUnstructured,
    /// Locally generated because the relay was unreachable.
    Simulated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRow {
    pub id: DocumentId,
    pub name: String,
    pub kind: DocumentKind,
    pub size_bytes: u64,
    pub status: DocumentStatus,
    pub uploaded_at: Timestamp,
    pub stories: u32,
    pub specs: u32,
    pub ambiguity: Percentage,
    pub completeness: Percentage,
    pub testability: Percentage,
    #[serde(default)]
    pub issues: Vec<DocumentIssue>,
    #[serde(default)]
    pub requirements: Vec<ExtractedRequirement>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub score_source: Option<ScoreSource>,
    #[serde(default)]
    pub error_reason: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl DocumentRow {
    /// A freshly uploaded row, waiting for analysis.
    pub fn uploaded(id: DocumentId, name: impl Into<String>, size_bytes: u64) -> Self {
        let name = name.into();
        Self {
            id,
            kind: DocumentKind::from_file_name(&name),
            name,
            size_bytes,
            status: DocumentStatus::Parsing,
            uploaded_at: Timestamp::now(),
            stories: 0,
            specs: 0,
            ambiguity: Percentage::ZERO,
            completeness: Percentage::ZERO,
            testability: Percentage::ZERO,
            issues: Vec::new(),
            requirements: Vec::new(),
            summary: String::new(),
            score_source: None,
            error_reason: None,
            tags: Vec::new(),
        }
    }

    /// Resets scores and marks the row as being parsed again.
    pub fn begin_parsing(&mut self) {
        self.status = DocumentStatus::Parsing;
        self.stories = 0;
        self.specs = 0;
        self.ambiguity = Percentage::ZERO;
        self.completeness = Percentage::ZERO;
        self.testability = Percentage::ZERO;
        self.score_source = None;
        self.error_reason = None;
    }

    /// Fills the row from a relay analysis.
    pub fn apply_analysis(&mut self, analysis: DocumentAnalysis, source: ScoreSource) {
        self.status = DocumentStatus::Parsed;
        self.stories = analysis.stories;
        self.specs = analysis.specs;
        self.ambiguity = analysis.ambiguity;
        self.completeness = analysis.completeness;
        self.testability = analysis.testability;
        self.issues = analysis.issues;
        self.requirements = analysis.extracted_requirements;
        self.summary = analysis.summary;
        self.score_source = Some(source);
        self.error_reason = None;
    }

    /// Fills the row from locally generated scores. Keeps earlier AI detail.
    pub fn apply_simulated(&mut self, scores: SimulatedScores) {
        self.status = DocumentStatus::Parsed;
        self.stories = scores.stories;
        self.specs = scores.specs;
        self.ambiguity = scores.ambiguity;
        self.completeness = scores.completeness;
        self.testability = scores.testability;
        self.score_source = Some(ScoreSource::Simulated);
        self.error_reason = None;
    }

    pub fn mark_failed(&mut self, reason: impl Into<String>) {
        self.status = DocumentStatus::Error;
        self.error_reason = Some(reason.into());
    }

    pub fn is_parsed(&self) -> bool {
        self.status == DocumentStatus::Parsed
    }

    /// Risk derived from the row's testability score.
    pub fn risk_from_testability(&self) -> Level {
        match self.testability.value() {
            t if t < 60 => Level::High,
            t if t < 80 => Level::Medium,
            _ => Level::Low,
        }
    }

    /// The row as a coverage baseline for gap analysis.
    pub fn as_requirement_document(&self) -> RequirementDocument {
        RequirementDocument {
            name: self.name.clone(),
            summary: Some(self.summary.clone()).filter(|s| !s.is_empty()),
            requirements: self
                .requirements
                .iter()
                .map(|r| RequirementRef {
                    id: r.id.clone(),
                    title: r.title.clone(),
                    description: r.description.clone(),
                })
                .collect(),
        }
    }
}
