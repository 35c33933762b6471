//! ClientOrchestrator - Drives the relay from the client's document store.
//!
//! Every operation reports its outcome through a [`NoticeSink`]. Relay
//! failures never surface as errors: document analysis falls back to
//! simulated scores, conflict detection keeps its cached results, and the
//! remaining tasks emit a notice and return nothing.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use futures::future::join_all;
use serde_json::{json, Value};

use crate::domain::analysis::{
    recover, recover_list, truncate_chars, Conflict, DuplicateReport, GapAnalysis, NamedText,
    ProjectOverview, RequirementReview, RequirementReviewSet, Scenario, TestCase,
    TestCaseEnhancement,
};
use crate::domain::foundation::DocumentId;
use crate::domain::workspace::{DocumentRow, DocumentStore, ScoreSource, SimulatedScores};
use crate::ports::{
    GapAnalysisRequest, Notice, NoticeSink, RelayApi, WorkspaceStorage, WorkspaceStorageError,
};

pub const ANALYSIS_FALLBACK_NOTICE: &str = "AI unavailable — using simulated analysis";
pub const UNSTRUCTURED_NOTICE: &str =
    "AI returned analysis but could not parse structured results";
pub const CONFLICTS_NEED_REQUIREMENTS: &str =
    "Need at least 2 parsed documents with requirements to detect conflicts";
pub const CONFLICTS_FALLBACK_NOTICE: &str = "AI unavailable — showing cached conflicts";
pub const NO_PARSED_DOCUMENTS_FOR_SCENARIOS: &str =
    "No parsed documents found. Upload requirements in Document Hub first.";
pub const SERVER_UNAVAILABLE_NOTICE: &str = "AI unavailable — check if the server is running";
pub const NO_PARSED_DOCUMENTS_FOR_OVERVIEW: &str =
    "No parsed documents yet. Upload and parse documents in Document Hub first.";
pub const NO_REQUIREMENTS_TO_REVIEW: &str =
    "No extracted requirements yet. Parse documents in Document Hub first.";

/// Failure reason reported when a chat reply held no usable JSON.
pub const UNPARSABLE_REPLY: &str = "reply held no JSON object";

const PROJECT_OVERVIEW_PROMPT: &str = r#"You are a senior QA Test Architect. Analyze this project's documents and provide a comprehensive project overview. Return JSON with these fields:
{
  "projectName": "<inferred project name>",
  "executiveSummary": "<3-4 sentence high-level summary>",
  "scope": "<what the project covers>",
  "keyFindings": ["<finding 1>", "<finding 2>", ...],
  "risks": [{"title": "<risk>", "severity": "high|medium|low", "mitigation": "<suggestion>"}],
  "recommendations": ["<recommendation 1>", "<recommendation 2>", ...],
  "testStrategy": "<recommended test approach in 2-3 sentences>",
  "readinessScore": <0-100 overall readiness>,
  "coverageGaps": ["<gap 1>", "<gap 2>", ...]
}
Only return valid JSON."#;

const ENHANCE_TEST_CASE_PROMPT: &str = "Enhance this test case by adding edge cases, improving assertions, and suggesting better test data. Return JSON with fields: given, when, then, testData, assertions (array), automationSteps (array). Only return JSON.";

const GAP_REVIEW_PROMPT: &str = "Analyze these requirements for coverage gaps, missing edge cases, and risk areas. For each requirement, provide an updated aiSummary and any new gapDetails. Return JSON array with fields: id, aiSummary, gapDetails (array of strings), risk (low/medium/high). Only return the JSON array.";

const REANALYSIS_PROMPT: &str = "Re-analyze these requirements and provide updated scores. Return JSON array with: id, testability (0-100), aiSummary, gapDetails (array), risk (low/medium/high). Only return JSON.";

/// Requirement titles and issue texts a document contributes to the overview.
const OVERVIEW_REQUIREMENTS_PER_DOCUMENT: usize = 5;
const OVERVIEW_ISSUES_PER_DOCUMENT: usize = 3;

/// Client-side coordinator over a [`DocumentStore`].
///
/// The store lock is never held across an await; each relay completion
/// re-acquires it and overwrites only its own row.
pub struct ClientOrchestrator<R: RelayApi, N: NoticeSink> {
    relay: R,
    notices: N,
    store: RwLock<DocumentStore>,
    cached_conflicts: RwLock<Vec<Conflict>>,
    reviews: RwLock<HashMap<String, RequirementReview>>,
}

impl<R: RelayApi, N: NoticeSink> ClientOrchestrator<R, N> {
    pub fn new(relay: R, notices: N) -> Self {
        Self::with_store(relay, notices, DocumentStore::new())
    }

    pub fn with_store(relay: R, notices: N, store: DocumentStore) -> Self {
        Self {
            relay,
            notices,
            store: RwLock::new(store),
            cached_conflicts: RwLock::new(Vec::new()),
            reviews: RwLock::new(HashMap::new()),
        }
    }

    fn read_store(&self) -> RwLockReadGuard<'_, DocumentStore> {
        self.store.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_store(&self) -> RwLockWriteGuard<'_, DocumentStore> {
        self.store.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// A copy of the current store.
    pub fn snapshot(&self) -> DocumentStore {
        self.read_store().clone()
    }

    pub fn document(&self, id: DocumentId) -> Option<DocumentRow> {
        self.read_store().get(id).cloned()
    }

    pub fn cached_conflicts(&self) -> Vec<Conflict> {
        self.cached_conflicts
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// The latest model review of requirement `id`.
    pub fn requirement_review(&self, id: &str) -> Option<RequirementReview> {
        self.reviews
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(id)
            .cloned()
    }

    // ────────────────────────────────────────────────────────────────────────
    // Documents
    // ────────────────────────────────────────────────────────────────────────

    /// Adds a new row for `name` and analyzes it.
    pub async fn upload(&self, name: &str, bytes: Vec<u8>) -> DocumentId {
        let id = DocumentId::new();
        self.analyze_document(id, name, bytes).await;
        id
    }

    /// Uploads several files concurrently. Ids come back in input order.
    pub async fn upload_all(&self, files: Vec<(String, Vec<u8>)>) -> Vec<DocumentId> {
        join_all(
            files
                .into_iter()
                .map(|(name, bytes)| async move { self.upload(&name, bytes).await }),
        )
        .await
    }

    /// Analyzes `bytes` through the relay and fills the row with `id`.
    ///
    /// The row is created when missing and set to parsing before the call.
    /// Returns the row as left by this call, or `None` if it was trashed
    /// while the relay was working.
    pub async fn analyze_document(
        &self,
        id: DocumentId,
        name: &str,
        bytes: Vec<u8>,
    ) -> Option<DocumentRow> {
        {
            let mut store = self.write_store();
            if !store.update(id, DocumentRow::begin_parsing) {
                store.insert(DocumentRow::uploaded(id, name, bytes.len() as u64));
            }
        }

        match self.relay.analyze_document(name, bytes).await {
            Ok(reply) if reply.structured => {
                self.finish_row(id, |row| row.apply_analysis(reply.analysis, ScoreSource::Ai));
                self.notices
                    .notify(Notice::success(format!("AI analysis complete for \"{name}\"")));
            }
            Ok(reply) => {
                self.finish_row(id, |row| {
                    row.apply_analysis(reply.analysis, ScoreSource::AiUnstructured)
                });
                self.notices.notify(Notice::info(UNSTRUCTURED_NOTICE));
            }
            Err(err) => {
                tracing::warn!(document = %name, error = %err, "AI analysis failed, simulating");
                let scores = SimulatedScores::random();
                self.finish_row(id, |row| row.apply_simulated(scores));
                self.notices.notify(Notice::info(ANALYSIS_FALLBACK_NOTICE));
            }
        }

        self.document(id)
    }

    fn finish_row<F>(&self, id: DocumentId, f: F)
    where
        F: FnOnce(&mut DocumentRow),
    {
        if !self.write_store().update(id, f) {
            tracing::debug!(document_id = %id, "row removed before analysis finished");
        }
    }

    /// Re-scores rows locally without calling the relay.
    pub fn reparse(&self, ids: &[DocumentId]) {
        let mut store = self.write_store();
        for id in ids {
            store.update(*id, |row| {
                row.begin_parsing();
                row.apply_simulated(SimulatedScores::random());
            });
        }
    }

    pub fn trash(&self, id: DocumentId) -> bool {
        self.write_store().trash(id).is_some()
    }

    pub fn restore(&self, id: DocumentId) -> bool {
        self.write_store().restore(id).is_some()
    }

    pub fn purge(&self, id: DocumentId) -> bool {
        let removed = self.write_store().purge(id);
        if removed {
            self.notices.notify(Notice::info("Permanently deleted"));
        }
        removed
    }

    pub fn empty_trash(&self) {
        self.write_store().empty_trash();
        self.notices.notify(Notice::info("Trash emptied"));
    }

    // ────────────────────────────────────────────────────────────────────────
    // Persistence
    // ────────────────────────────────────────────────────────────────────────

    pub async fn save(&self, storage: &dyn WorkspaceStorage) -> Result<(), WorkspaceStorageError> {
        let snapshot = self.snapshot();
        storage.save(&snapshot).await
    }

    /// Replaces the store with the saved one. Nothing saved yet loads an
    /// empty store. Returns the number of rows loaded.
    pub async fn load(
        &self,
        storage: &dyn WorkspaceStorage,
    ) -> Result<usize, WorkspaceStorageError> {
        let loaded = match storage.load().await {
            Ok(store) => store,
            Err(WorkspaceStorageError::NotFound) => DocumentStore::new(),
            Err(err) => return Err(err),
        };
        let count = loaded.len();
        *self.write_store() = loaded;
        Ok(count)
    }

    // ────────────────────────────────────────────────────────────────────────
    // Relay tasks
    // ────────────────────────────────────────────────────────────────────────

    /// Checks extracted requirements for contradictions.
    ///
    /// Returns the conflicts now cached; a failed or empty scan leaves the
    /// previous cache in place.
    pub async fn detect_conflicts(&self) -> Vec<Conflict> {
        let requirements: Vec<Value> = self
            .read_store()
            .parsed_requirements()
            .into_iter()
            .map(|r| json!({"id": r.id, "title": r.title, "description": r.description}))
            .collect();

        if requirements.len() < 2 {
            self.notices.notify(Notice::info(CONFLICTS_NEED_REQUIREMENTS));
            return self.cached_conflicts();
        }

        match self.relay.detect_conflicts(requirements).await {
            Ok(reply) => {
                let found = reply.body.conflicts;
                self.notices
                    .notify(Notice::success(format!("AI found {} conflict(s)", found.len())));
                if !found.is_empty() {
                    *self
                        .cached_conflicts
                        .write()
                        .unwrap_or_else(|poisoned| poisoned.into_inner()) = found;
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "AI conflict detection failed");
                self.notices.notify(Notice::info(CONFLICTS_FALLBACK_NOTICE));
            }
        }

        self.cached_conflicts()
    }

    /// Requirements sent for scenario generation.
    ///
    /// Parsed rows contribute their extracted requirements. When none of
    /// them has any, each parsed row stands in as one `REQ-nnn`.
    pub fn scenario_requirements(&self) -> Vec<Value> {
        let store = self.read_store();
        let extracted: Vec<Value> = store
            .parsed_requirements()
            .into_iter()
            .map(|r| {
                json!({
                    "id": r.id,
                    "title": r.title,
                    "description": r.description,
                    "risk": r.risk,
                })
            })
            .collect();
        if !extracted.is_empty() {
            return extracted;
        }

        store
            .parsed()
            .enumerate()
            .map(|(i, row)| {
                json!({
                    "id": format!("REQ-{:03}", i + 1),
                    "title": row.name,
                    "description": format!(
                        "Document with {} stories and {} specs. Testability: {}%",
                        row.stories,
                        row.specs,
                        row.testability.value()
                    ),
                    "risk": row.risk_from_testability(),
                })
            })
            .collect()
    }

    pub async fn generate_scenarios(&self) -> Vec<Scenario> {
        self.notices.notify(Notice::info(
            "AI is generating scenarios from your requirements...",
        ));

        if self.read_store().parsed().next().is_none() {
            self.notices
                .notify(Notice::warning(NO_PARSED_DOCUMENTS_FOR_SCENARIOS));
            return Vec::new();
        }

        match self.relay.generate_scenarios(self.scenario_requirements()).await {
            Ok(reply) => {
                let scenarios: Vec<Scenario> = reply
                    .body
                    .scenarios
                    .into_iter()
                    .enumerate()
                    .map(|(i, mut scenario)| {
                        if scenario.id.is_empty() {
                            scenario.id = format!("SC-{:03}", i + 1);
                        }
                        scenario
                    })
                    .collect();
                self.notices.notify(Notice::success(format!(
                    "AI generated {} new scenarios",
                    scenarios.len()
                )));
                scenarios
            }
            Err(err) => {
                tracing::error!(error = %err, "AI scenario generation failed");
                self.notices
                    .notify(Notice::error(format!("AI generation failed: {err}")));
                Vec::new()
            }
        }
    }

    pub async fn generate_test_cases(&self, scenario: Value) -> Vec<TestCase> {
        self.notices.notify(Notice::info(
            "AI is generating test cases from approved scenarios...",
        ));

        match self.relay.generate_test_cases(scenario).await {
            Ok(reply) => {
                let cases = reply.body.test_cases;
                self.notices.notify(Notice::success(format!(
                    "AI generated {} new test cases",
                    cases.len()
                )));
                cases
            }
            Err(err) => {
                tracing::error!(error = %err, "AI test case generation failed");
                self.notices
                    .notify(Notice::error(format!("AI generation failed: {err}")));
                Vec::new()
            }
        }
    }

    /// Context line describing the store, sent along with chat messages.
    pub fn chat_context(&self) -> String {
        let store = self.read_store();
        if store.is_empty() {
            return "No documents ingested yet.".to_string();
        }
        let parsed: Vec<&str> = store.parsed().map(|row| row.name.as_str()).collect();
        format!(
            "User has {} documents ingested. Parsed docs: {}",
            store.len(),
            parsed.join(", ")
        )
    }

    /// Sends a chat message. A failure becomes an apology reply.
    pub async fn chat(&self, message: &str) -> String {
        let context = self.chat_context();
        match self.relay.chat(message, Some(&context)).await {
            Ok(reply) => reply.reply,
            Err(err) => format!("Sorry, I couldn't process that. {err}"),
        }
    }

    /// Compares uploaded tests against the parsed documents.
    pub async fn analyze_gaps(&self, test_files: Vec<NamedText>) -> Option<GapAnalysis> {
        if test_files.is_empty() {
            self.notices
                .notify(Notice::info("Upload test scenarios/cases to analyze"));
            return None;
        }

        let documents: Vec<_> = self
            .read_store()
            .parsed()
            .map(DocumentRow::as_requirement_document)
            .collect();
        if documents.is_empty() {
            self.notices.notify(Notice::info(
                "No parsed documents in Document Hub to compare against",
            ));
            return None;
        }

        let request = GapAnalysisRequest {
            test_files,
            documents,
        };
        match self.relay.analyze_gaps(request).await {
            Ok(reply) => {
                if reply.structured {
                    self.notices.notify(Notice::success("Gap analysis complete"));
                } else {
                    self.notices.notify(Notice::info(UNSTRUCTURED_NOTICE));
                }
                Some(reply.body)
            }
            Err(err) => {
                tracing::error!(error = %err, "gap analysis failed");
                self.notices.notify(Notice::info(SERVER_UNAVAILABLE_NOTICE));
                None
            }
        }
    }

    pub async fn detect_duplicates(&self, files: Vec<NamedText>) -> Option<DuplicateReport> {
        if files.is_empty() {
            self.notices
                .notify(Notice::info("Upload test case files to check for duplicates"));
            return None;
        }

        match self.relay.detect_duplicates(files).await {
            Ok(reply) => {
                if reply.structured {
                    self.notices
                        .notify(Notice::success("Duplicate detection complete"));
                } else {
                    self.notices.notify(Notice::info(UNSTRUCTURED_NOTICE));
                }
                Some(reply.body)
            }
            Err(err) => {
                tracing::error!(error = %err, "duplicate detection failed");
                self.notices.notify(Notice::info(SERVER_UNAVAILABLE_NOTICE));
                None
            }
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // Chat-driven analyses
    // ────────────────────────────────────────────────────────────────────────

    /// Asks for a project-wide overview of the parsed documents.
    pub async fn project_overview(&self) -> Option<ProjectOverview> {
        let documents: Vec<Value> = self.read_store().parsed().map(overview_entry).collect();
        if documents.is_empty() {
            self.notices
                .notify(Notice::warning(NO_PARSED_DOCUMENTS_FOR_OVERVIEW));
            return None;
        }
        self.notices
            .notify(Notice::info("AI is generating project summary..."));

        let context = Value::Array(documents).to_string();
        let reply = match self.relay.chat(PROJECT_OVERVIEW_PROMPT, Some(&context)).await {
            Ok(reply) => reply.reply,
            Err(err) => {
                tracing::error!(error = %err, "AI project summary failed");
                self.notices
                    .notify(Notice::error(format!("AI summary failed: {err}")));
                return None;
            }
        };

        let overview = recover::<ProjectOverview>(&reply).into_reply();
        if !overview.is_structured() {
            tracing::warn!(reply_len = reply.len(), "project summary reply held no JSON");
            self.notices
                .notify(Notice::error(format!("AI summary failed: {UNPARSABLE_REPLY}")));
            return None;
        }
        self.notices
            .notify(Notice::success("Project overview generated"));
        Some(overview.value)
    }

    /// Asks the model to strengthen `case`.
    ///
    /// Returns `case` with the model's non-empty fields swapped in, or
    /// `None` when the call failed or the reply was prose.
    pub async fn enhance_test_case(&self, case: &TestCase) -> Option<TestCase> {
        self.notices
            .notify(Notice::info(format!("AI enhancing {}...", case.id)));

        let context = format!(
            "Test case: {}\nGiven: {}\nWhen: {}\nThen: {}\nCurrent assertions: {}",
            case.title,
            case.given,
            case.when,
            case.then,
            case.assertions.join(", ")
        );
        let reply = match self.relay.chat(ENHANCE_TEST_CASE_PROMPT, Some(&context)).await {
            Ok(reply) => reply.reply,
            Err(err) => {
                tracing::error!(test_case = %case.id, error = %err, "AI enhance failed");
                self.notices
                    .notify(Notice::error(format!("AI enhance failed: {err}")));
                return None;
            }
        };

        let enhancement = recover::<TestCaseEnhancement>(&reply).into_reply();
        if !enhancement.is_structured() {
            self.notices.notify(Notice::info(format!(
                "AI response: {}...",
                truncate_chars(&reply, 100)
            )));
            return None;
        }
        self.notices
            .notify(Notice::success(format!("{} enhanced by AI", case.id)));
        Some(enhancement.value.apply_to(case))
    }

    /// Asks for fresh summaries, gap details and risk on every parsed
    /// requirement.
    pub async fn review_requirement_gaps(&self) -> Vec<RequirementReview> {
        self.notices
            .notify(Notice::info("AI is analyzing requirements for gaps..."));

        let requirements: Vec<Value> = self
            .read_store()
            .parsed_requirements()
            .into_iter()
            .map(|r| json!({"id": r.id, "title": r.title, "testability": r.testability}))
            .collect();
        if requirements.is_empty() {
            self.notices.notify(Notice::warning(NO_REQUIREMENTS_TO_REVIEW));
            return Vec::new();
        }

        let context = Value::Array(requirements).to_string();
        let reply = match self.relay.chat(GAP_REVIEW_PROMPT, Some(&context)).await {
            Ok(reply) => reply.reply,
            Err(err) => {
                tracing::error!(error = %err, "AI gap review failed");
                self.notices
                    .notify(Notice::error(format!("AI gap analysis failed: {err}")));
                return Vec::new();
            }
        };

        match self.adopt_reviews(&reply) {
            Some(reviews) => {
                self.notices.notify(Notice::success(
                    "AI gap analysis complete — summaries updated",
                ));
                reviews
            }
            None => {
                self.notices.notify(Notice::info(format!(
                    "AI analysis: {}...",
                    truncate_chars(&reply, 150)
                )));
                Vec::new()
            }
        }
    }

    /// Re-scores the parsed requirements named in `ids`.
    pub async fn reanalyze_requirements(&self, ids: &[String]) -> Vec<RequirementReview> {
        let count = ids.len();
        self.notices.notify(Notice::info(format!(
            "Re-generating AI analysis for {count} requirement(s)..."
        )));

        let selected: Vec<Value> = self
            .read_store()
            .parsed_requirements()
            .into_iter()
            .filter(|r| ids.contains(&r.id))
            .map(|r| json!({"id": r.id, "title": r.title}))
            .collect();

        let context = Value::Array(selected).to_string();
        let reply = match self.relay.chat(REANALYSIS_PROMPT, Some(&context)).await {
            Ok(reply) => reply.reply,
            Err(err) => {
                tracing::error!(error = %err, "AI requirement re-analysis failed");
                self.notices
                    .notify(Notice::error(format!("Re-generate failed: {err}")));
                return Vec::new();
            }
        };

        match self.adopt_reviews(&reply) {
            Some(reviews) => {
                self.notices.notify(Notice::success(format!(
                    "AI re-analysis complete for {count} requirement(s)"
                )));
                reviews
            }
            None => {
                self.notices
                    .notify(Notice::info("AI provided analysis in text format"));
                Vec::new()
            }
        }
    }

    /// Applies the reviews in `reply` to the store and the review cache.
    ///
    /// Returns the reviews that matched a parsed requirement, or `None`
    /// when the reply held no JSON array.
    fn adopt_reviews(&self, reply: &str) -> Option<Vec<RequirementReview>> {
        let set = recover_list::<RequirementReview>(reply)
            .map(|reviews| RequirementReviewSet { reviews })
            .into_reply();
        if !set.is_structured() {
            return None;
        }

        let adopted: Vec<RequirementReview> = {
            let mut store = self.write_store();
            set.value
                .reviews
                .into_iter()
                .filter(|review| store.apply_review(review) > 0)
                .collect()
        };

        let mut cache = self
            .reviews
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for review in &adopted {
            let mut merged = review.clone();
            if let Some(earlier) = cache.get(&review.id) {
                if merged.ai_summary.is_empty() {
                    merged.ai_summary = earlier.ai_summary.clone();
                }
                if merged.gap_details.is_empty() {
                    merged.gap_details = earlier.gap_details.clone();
                }
            }
            cache.insert(review.id.clone(), merged);
        }
        Some(adopted)
    }
}

/// One parsed row as sent for the project overview.
fn overview_entry(row: &DocumentRow) -> Value {
    let requirements: Vec<&str> = row
        .requirements
        .iter()
        .take(OVERVIEW_REQUIREMENTS_PER_DOCUMENT)
        .map(|r| r.title.as_str())
        .collect();
    let issues: Vec<&str> = row
        .issues
        .iter()
        .take(OVERVIEW_ISSUES_PER_DOCUMENT)
        .map(|i| i.text.as_str())
        .collect();
    json!({
        "name": row.name,
        "stories": row.stories,
        "specs": row.specs,
        "testability": row.testability,
        "completeness": row.completeness,
        "ambiguity": row.ambiguity,
        "summary": row.summary,
        "requirements": requirements,
        "issues": issues,
    })
}
