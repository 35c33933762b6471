//! Typed shapes of the JSON documents the model is asked to return.
//!
//! Every field defaults when absent, null or of the wrong type, so any JSON
//! object deserializes. Scores go through [`Percentage`] which clamps to
//! 0..=100 and accepts numeric strings.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    lenient_count, lenient_list, lenient_string, lenient_strings, or_default, Percentage,
};

/// Maximum number of issues kept from a document analysis.
pub const MAX_ISSUES: usize = 10;

/// Maximum number of requirements kept from a document analysis.
pub const MAX_EXTRACTED_REQUIREMENTS: usize = 20;

/// A reply schema the relay can hand back whether or not JSON recovery worked.
pub trait ReplySchema: Sized {
    /// The zeroed value used when the reply held no usable JSON.
    ///
    /// Schemas with a summary carry the raw reply text there.
    fn unparsed(raw_text: &str) -> Self;

    /// Applies size limits after a successful parse.
    fn normalize(self) -> Self {
        self
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Shared enums
// ════════════════════════════════════════════════════════════════════════════════

/// Low/medium/high rating used for risk, severity and priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    #[default]
    Medium,
    High,
    #[serde(other)]
    Unknown,
}

// ════════════════════════════════════════════════════════════════════════════════
// Document analysis
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentAnalysis {
    pub ambiguity: Percentage,
    pub completeness: Percentage,
    pub testability: Percentage,
    #[serde(deserialize_with = "lenient_count")]
    pub stories: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub specs: u32,
    #[serde(deserialize_with = "lenient_list")]
    pub issues: Vec<DocumentIssue>,
    #[serde(deserialize_with = "lenient_list")]
    pub extracted_requirements: Vec<ExtractedRequirement>,
    #[serde(deserialize_with = "lenient_string")]
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentIssue {
    #[serde(deserialize_with = "lenient_string")]
    pub line: String,
    #[serde(deserialize_with = "lenient_string")]
    pub text: String,
    #[serde(deserialize_with = "lenient_string")]
    pub suggestion: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractedRequirement {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(deserialize_with = "or_default")]
    pub risk: Level,
    pub testability: Percentage,
}

impl ReplySchema for DocumentAnalysis {
    fn unparsed(raw_text: &str) -> Self {
        Self {
            summary: raw_text.to_string(),
            ..Self::default()
        }
    }

    fn normalize(mut self) -> Self {
        self.issues.truncate(MAX_ISSUES);
        self.extracted_requirements
            .truncate(MAX_EXTRACTED_REQUIREMENTS);
        self
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Scenarios
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScenarioSet {
    #[serde(deserialize_with = "lenient_list")]
    pub scenarios: Vec<Scenario>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScenarioCategory {
    #[serde(rename = "E2E")]
    E2e,
    #[serde(rename = "UI")]
    Ui,
    Integration,
    Backend,
    #[serde(rename = "API")]
    Api,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScenarioPriority {
    P1,
    #[default]
    P2,
    P3,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioType {
    #[default]
    Positive,
    Negative,
    Chaos,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Scenario {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "or_default")]
    pub category: ScenarioCategory,
    #[serde(deserialize_with = "or_default")]
    pub priority: ScenarioPriority,
    #[serde(rename = "type")]
    #[serde(deserialize_with = "or_default")]
    pub scenario_type: ScenarioType,
    #[serde(deserialize_with = "lenient_string")]
    pub requirement: String,
    #[serde(deserialize_with = "lenient_strings")]
    pub steps: Vec<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub expected_result: String,
    pub edge_coverage: Percentage,
    pub regression_impact: Percentage,
}

impl ReplySchema for ScenarioSet {
    fn unparsed(_raw_text: &str) -> Self {
        Self::default()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Test cases
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestCaseSet {
    #[serde(deserialize_with = "lenient_list")]
    pub test_cases: Vec<TestCase>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestCase {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub given: String,
    #[serde(deserialize_with = "lenient_string")]
    pub when: String,
    #[serde(deserialize_with = "lenient_string")]
    pub then: String,
    #[serde(deserialize_with = "lenient_string")]
    pub test_data: String,
    #[serde(deserialize_with = "lenient_strings")]
    pub assertions: Vec<String>,
    #[serde(deserialize_with = "or_default")]
    pub preconditions: Preconditions,
    #[serde(deserialize_with = "lenient_strings")]
    pub automation_steps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preconditions {
    #[serde(deserialize_with = "lenient_string")]
    pub feature_flag: String,
    #[serde(deserialize_with = "lenient_string")]
    pub account_type: String,
    #[serde(deserialize_with = "lenient_string")]
    pub platform: String,
}

impl ReplySchema for TestCaseSet {
    fn unparsed(_raw_text: &str) -> Self {
        Self::default()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Conflicts
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConflictReport {
    #[serde(deserialize_with = "lenient_list")]
    pub conflicts: Vec<Conflict>,
    #[serde(deserialize_with = "lenient_list")]
    pub gaps: Vec<RequirementGap>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Conflict {
    #[serde(deserialize_with = "lenient_string")]
    pub req_a: String,
    #[serde(deserialize_with = "lenient_string")]
    pub req_b: String,
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(deserialize_with = "or_default")]
    pub severity: Level,
    #[serde(deserialize_with = "lenient_string")]
    pub suggestion: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequirementGap {
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(deserialize_with = "or_default")]
    pub severity: Level,
}

impl ReplySchema for ConflictReport {
    fn unparsed(_raw_text: &str) -> Self {
        Self::default()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Coverage gaps
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GapAnalysis {
    pub coverage_score: Percentage,
    #[serde(deserialize_with = "lenient_count")]
    pub total_requirements: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub covered_requirements: u32,
    #[serde(deserialize_with = "lenient_list")]
    pub gaps: Vec<CoverageGap>,
    #[serde(deserialize_with = "lenient_list")]
    pub additional_tests: Vec<AdditionalTest>,
    #[serde(deserialize_with = "lenient_string")]
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoverageGap {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub requirement: String,
    #[serde(deserialize_with = "or_default")]
    pub severity: Level,
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(deserialize_with = "lenient_strings")]
    pub suggested_tests: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdditionalTest {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(deserialize_with = "or_default")]
    pub priority: Level,
    #[serde(deserialize_with = "lenient_string")]
    pub covers_gap: String,
}

impl ReplySchema for GapAnalysis {
    fn unparsed(raw_text: &str) -> Self {
        Self {
            summary: raw_text.to_string(),
            ..Self::default()
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Duplicates
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DuplicateReport {
    #[serde(deserialize_with = "lenient_count")]
    pub total_test_cases: u32,
    #[serde(deserialize_with = "lenient_list")]
    pub duplicate_groups: Vec<DuplicateGroup>,
    #[serde(deserialize_with = "or_default")]
    pub stats: DuplicateStats,
    #[serde(deserialize_with = "lenient_string")]
    pub summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateKind {
    Exact,
    Near,
    #[default]
    Overlap,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Remove,
    Merge,
    #[default]
    Keep,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DuplicateGroup {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(deserialize_with = "or_default")]
    pub severity: DuplicateKind,
    #[serde(deserialize_with = "lenient_strings")]
    pub tests: Vec<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub reason: String,
    #[serde(deserialize_with = "or_default")]
    pub recommendation: Recommendation,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DuplicateStats {
    #[serde(deserialize_with = "lenient_count")]
    pub exact: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub near: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub overlap: u32,
    pub savings_percent: Percentage,
}

impl ReplySchema for DuplicateReport {
    fn unparsed(raw_text: &str) -> Self {
        Self {
            summary: raw_text.to_string(),
            ..Self::default()
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Chat-driven analyses
// ════════════════════════════════════════════════════════════════════════════════

/// Project-wide overview built from every parsed document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectOverview {
    #[serde(deserialize_with = "lenient_string")]
    pub project_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub executive_summary: String,
    #[serde(deserialize_with = "lenient_string")]
    pub scope: String,
    #[serde(deserialize_with = "lenient_strings")]
    pub key_findings: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub risks: Vec<ProjectRisk>,
    #[serde(deserialize_with = "lenient_strings")]
    pub recommendations: Vec<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub test_strategy: String,
    pub readiness_score: Percentage,
    #[serde(deserialize_with = "lenient_strings")]
    pub coverage_gaps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectRisk {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "or_default")]
    pub severity: Level,
    #[serde(deserialize_with = "lenient_string")]
    pub mitigation: String,
}

impl ReplySchema for ProjectOverview {
    fn unparsed(raw_text: &str) -> Self {
        Self {
            executive_summary: raw_text.to_string(),
            ..Self::default()
        }
    }
}

/// Replacement fields for a single test case.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestCaseEnhancement {
    #[serde(deserialize_with = "lenient_string")]
    pub given: String,
    #[serde(deserialize_with = "lenient_string")]
    pub when: String,
    #[serde(deserialize_with = "lenient_string")]
    pub then: String,
    #[serde(deserialize_with = "lenient_string")]
    pub test_data: String,
    #[serde(deserialize_with = "lenient_strings")]
    pub assertions: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub automation_steps: Vec<String>,
}

impl TestCaseEnhancement {
    /// `case` with every non-empty field of the enhancement swapped in.
    pub fn apply_to(&self, case: &TestCase) -> TestCase {
        fn pick(new: &str, old: &str) -> String {
            if new.is_empty() { old } else { new }.to_string()
        }
        fn pick_list(new: &[String], old: &[String]) -> Vec<String> {
            if new.is_empty() { old } else { new }.to_vec()
        }

        TestCase {
            given: pick(&self.given, &case.given),
            when: pick(&self.when, &case.when),
            then: pick(&self.then, &case.then),
            test_data: pick(&self.test_data, &case.test_data),
            assertions: pick_list(&self.assertions, &case.assertions),
            automation_steps: pick_list(&self.automation_steps, &case.automation_steps),
            ..case.clone()
        }
    }
}

impl ReplySchema for TestCaseEnhancement {
    fn unparsed(_raw_text: &str) -> Self {
        Self::default()
    }
}

/// Fresh model opinion on one extracted requirement.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequirementReview {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    /// Zero when the model left it out.
    pub testability: Percentage,
    #[serde(deserialize_with = "lenient_string")]
    pub ai_summary: String,
    #[serde(deserialize_with = "lenient_strings")]
    pub gap_details: Vec<String>,
    #[serde(deserialize_with = "or_default")]
    pub risk: Option<Level>,
}

impl RequirementReview {
    /// Risk to adopt, ignoring ratings the model made up.
    pub fn known_risk(&self) -> Option<Level> {
        self.risk.filter(|level| *level != Level::Unknown)
    }
}

/// Reviews recovered from a JSON array reply.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequirementReviewSet {
    pub reviews: Vec<RequirementReview>,
}

impl ReplySchema for RequirementReviewSet {
    fn unparsed(_raw_text: &str) -> Self {
        Self::default()
    }

    fn normalize(mut self) -> Self {
        self.reviews.retain(|review| !review.id.is_empty());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn document_analysis_defaults_missing_fields() {
        let analysis: DocumentAnalysis = serde_json::from_value(json!({
            "ambiguity": 12,
            "summary": "Login flow"
        }))
        .unwrap();

        assert_eq!(analysis.ambiguity.value(), 12);
        assert_eq!(analysis.completeness.value(), 0);
        assert!(analysis.issues.is_empty());
        assert_eq!(analysis.summary, "Login flow");
    }

    #[test]
    fn document_analysis_accepts_string_scores_and_clamps() {
        let analysis: DocumentAnalysis = serde_json::from_value(json!({
            "ambiguity": "35%",
            "testability": 140,
            "stories": "7",
            "specs": 3.0
        }))
        .unwrap();

        assert_eq!(analysis.ambiguity.value(), 35);
        assert_eq!(analysis.testability.value(), 100);
        assert_eq!(analysis.stories, 7);
        assert_eq!(analysis.specs, 3);
    }

    #[test]
    fn numeric_issue_line_keeps_the_analysis() {
        let analysis: DocumentAnalysis = serde_json::from_value(json!({
            "ambiguity": 22,
            "stories": 4,
            "issues": [{"line": 12, "text": "vague timing", "suggestion": "state seconds"}],
            "extractedRequirements": [{"id": 7, "title": "Record", "risk": null}]
        }))
        .unwrap();

        assert_eq!(analysis.ambiguity.value(), 22);
        assert_eq!(analysis.issues[0].line, "12");
        assert_eq!(analysis.extracted_requirements[0].id, "7");
        assert_eq!(analysis.extracted_requirements[0].risk, Level::Medium);
    }

    #[test]
    fn null_summary_keeps_the_analysis() {
        let analysis: DocumentAnalysis = serde_json::from_value(json!({
            "ambiguity": 22,
            "summary": null,
            "issues": null
        }))
        .unwrap();

        assert_eq!(analysis.ambiguity.value(), 22);
        assert_eq!(analysis.summary, "");
        assert!(analysis.issues.is_empty());
    }

    #[test]
    fn scenario_steps_tolerate_mixed_items() {
        let set: ScenarioSet = serde_json::from_value(json!({
            "scenarios": [{"id": "SC-001", "steps": ["open app", 2], "category": null}, "junk"]
        }))
        .unwrap();

        assert_eq!(set.scenarios.len(), 1);
        assert_eq!(set.scenarios[0].steps, vec!["open app", "2"]);
        assert_eq!(set.scenarios[0].category, ScenarioCategory::Other);
    }

    #[test]
    fn normalize_caps_issues_and_requirements() {
        let issues: Vec<_> = (0..15)
            .map(|i| json!({"line": format!("L{}", i), "text": "fast", "suggestion": "quantify"}))
            .collect();
        let requirements: Vec<_> = (0..25)
            .map(|i| json!({"id": format!("REQ-{:03}", i), "title": "t", "risk": "high"}))
            .collect();

        let analysis: DocumentAnalysis = serde_json::from_value(json!({
            "issues": issues,
            "extractedRequirements": requirements
        }))
        .unwrap();
        let analysis = analysis.normalize();

        assert_eq!(analysis.issues.len(), MAX_ISSUES);
        assert_eq!(analysis.extracted_requirements.len(), MAX_EXTRACTED_REQUIREMENTS);
        assert_eq!(analysis.extracted_requirements[0].risk, Level::High);
    }

    #[test]
    fn unknown_enum_values_do_not_fail() {
        let scenario: Scenario = serde_json::from_value(json!({
            "category": "Performance",
            "priority": "P0",
            "type": "boundary"
        }))
        .unwrap();

        assert_eq!(scenario.category, ScenarioCategory::Other);
        assert_eq!(scenario.priority, ScenarioPriority::Unknown);
        assert_eq!(scenario.scenario_type, ScenarioType::Unknown);
    }

    #[test]
    fn scenario_uses_wire_names() {
        let scenario: Scenario = serde_json::from_value(json!({
            "id": "SC-001",
            "category": "E2E",
            "priority": "P1",
            "type": "negative",
            "expectedResult": "error shown",
            "edgeCoverage": 80
        }))
        .unwrap();

        assert_eq!(scenario.category, ScenarioCategory::E2e);
        assert_eq!(scenario.scenario_type, ScenarioType::Negative);
        assert_eq!(scenario.expected_result, "error shown");

        let value = serde_json::to_value(&scenario).unwrap();
        assert_eq!(value["type"], "negative");
        assert_eq!(value["category"], "E2E");
        assert_eq!(value["edgeCoverage"], 80);
    }

    #[test]
    fn test_case_preconditions_round_trip_camel_case() {
        let set: TestCaseSet = serde_json::from_value(json!({
            "testCases": [{
                "id": "TC-001",
                "preconditions": {"featureFlag": "new-login", "accountType": "admin"}
            }]
        }))
        .unwrap();

        assert_eq!(set.test_cases[0].preconditions.feature_flag, "new-login");
        assert_eq!(set.test_cases[0].preconditions.platform, "");
    }

    #[test]
    fn unparsed_keeps_raw_text_in_summary() {
        let analysis = DocumentAnalysis::unparsed("plain prose");
        assert_eq!(analysis.summary, "plain prose");
        assert_eq!(analysis.stories, 0);

        let report = DuplicateReport::unparsed("no json");
        assert_eq!(report.summary, "no json");
        assert_eq!(report.stats.exact, 0);

        let gaps = GapAnalysis::unparsed("none");
        assert_eq!(gaps.summary, "none");
        assert!(gaps.gaps.is_empty());

        assert!(ConflictReport::unparsed("x").conflicts.is_empty());
        assert!(ScenarioSet::unparsed("x").scenarios.is_empty());
        assert!(TestCaseSet::unparsed("x").test_cases.is_empty());
    }

    #[test]
    fn duplicate_report_reads_stats() {
        let report: DuplicateReport = serde_json::from_value(json!({
            "totalTestCases": 12,
            "duplicateGroups": [{"id": "DUP-001", "severity": "exact", "tests": ["a", "b"], "recommendation": "merge"}],
            "stats": {"exact": 1, "near": 0, "overlap": 2, "savingsPercent": 15}
        }))
        .unwrap();

        assert_eq!(report.total_test_cases, 12);
        assert_eq!(report.duplicate_groups[0].severity, DuplicateKind::Exact);
        assert_eq!(report.duplicate_groups[0].recommendation, Recommendation::Merge);
        assert_eq!(report.stats.savings_percent.value(), 15);
    }

    #[test]
    fn project_overview_reads_loose_reply() {
        let overview: ProjectOverview = serde_json::from_value(json!({
            "projectName": "Cloud DVR",
            "keyFindings": "Recording limits are vague",
            "risks": [
                {"title": "Quota drift", "severity": "high", "mitigation": 7},
                "not a risk"
            ],
            "readinessScore": "64",
            "coverageGaps": null
        }))
        .unwrap();

        assert_eq!(overview.project_name, "Cloud DVR");
        assert_eq!(overview.key_findings, vec!["Recording limits are vague"]);
        assert_eq!(overview.risks.len(), 1);
        assert_eq!(overview.risks[0].severity, Level::High);
        assert_eq!(overview.risks[0].mitigation, "7");
        assert_eq!(overview.readiness_score.value(), 64);
        assert!(overview.coverage_gaps.is_empty());
    }

    #[test]
    fn enhancement_keeps_fields_it_leaves_empty() {
        let case = TestCase {
            id: "TC-001".into(),
            title: "Record a show".into(),
            given: "a subscriber".into(),
            when: "they record".into(),
            then: "the show is saved".into(),
            assertions: vec!["saved".into()],
            ..TestCase::default()
        };
        let enhancement: TestCaseEnhancement = serde_json::from_value(json!({
            "then": "the show is saved within quota",
            "assertions": ["saved", "quota decremented"],
            "automationSteps": []
        }))
        .unwrap();

        let enhanced = enhancement.apply_to(&case);

        assert_eq!(enhanced.id, "TC-001");
        assert_eq!(enhanced.given, "a subscriber");
        assert_eq!(enhanced.then, "the show is saved within quota");
        assert_eq!(enhanced.assertions, vec!["saved", "quota decremented"]);
        assert!(enhanced.automation_steps.is_empty());
    }

    #[test]
    fn review_risk_ignores_unknown_ratings() {
        let review: RequirementReview =
            serde_json::from_value(json!({"id": "REQ-001", "risk": "extreme"})).unwrap();
        assert_eq!(review.known_risk(), None);

        let review: RequirementReview =
            serde_json::from_value(json!({"id": 4, "risk": "low", "testability": 55})).unwrap();
        assert_eq!(review.id, "4");
        assert_eq!(review.known_risk(), Some(Level::Low));
        assert_eq!(review.testability.value(), 55);
    }

    #[test]
    fn review_set_drops_reviews_without_id() {
        let set = RequirementReviewSet {
            reviews: vec![
                RequirementReview {
                    id: "REQ-001".into(),
                    ..RequirementReview::default()
                },
                RequirementReview::default(),
            ],
        }
        .normalize();
        assert_eq!(set.reviews.len(), 1);
    }
}
