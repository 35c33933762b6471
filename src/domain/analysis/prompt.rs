//! Deterministic prompt construction, one builder per task kind.

use serde_json::Value;

use super::inputs::{NamedText, RequirementDocument};
use super::task::TaskKind;

/// Source characters kept for document analysis.
pub const DOCUMENT_CHAR_LIMIT: usize = 15_000;

/// Characters of serialized requirements kept for scenario and conflict tasks.
pub const REQUIREMENTS_CHAR_LIMIT: usize = 12_000;

/// Characters kept per uploaded test file in gap analysis.
pub const GAP_FILE_CHAR_LIMIT: usize = 3_000;

/// Characters kept per uploaded test file in duplicate detection.
pub const DUPLICATE_FILE_CHAR_LIMIT: usize = 4_000;

const DOCUMENT_ANALYSIS_SYSTEM: &str = "You are a senior QA Test Architect analyzing software requirements documents.
Your job is to score the document and extract structured data.
Always respond with valid JSON only — no markdown, no explanation outside the JSON.";

const SCENARIO_SYSTEM: &str = "You are a senior QA Test Architect who generates comprehensive test scenarios from requirements.
You think about positive flows, negative flows, edge cases, and chaos scenarios.
Always respond with valid JSON only.";

const TEST_CASE_SYSTEM: &str = "You are a senior QA engineer who writes detailed test cases in Given-When-Then format.
Include preconditions, test data, and assertions. Always respond with valid JSON only.";

const CONFLICT_SYSTEM: &str = "You are a requirements analyst who identifies conflicts, contradictions, and gaps between requirements.
Always respond with valid JSON only.";

const CHAT_SYSTEM: &str = "You are an AI Co-Pilot for a QA Test Management tool called VPT TestCraft Studio.
You help test architects and QA engineers with:
- Analyzing requirements documents
- Writing test scenarios and test cases
- Identifying gaps and risks
- Suggesting test strategies
Keep responses concise and actionable. Use bullet points when helpful.";

const GAP_SYSTEM: &str = "You are a test analysis expert who compares test suites against requirements to find coverage gaps.
Always respond with valid JSON only.";

const DUPLICATE_SYSTEM: &str = "You are a test case analysis expert who finds duplicate, near-duplicate and overlapping tests.
Always respond with valid JSON only.";

const DOCUMENT_SCHEMA: &str = r#"{
  "ambiguity": <number 0-100, percentage of vague/ambiguous language>,
  "completeness": <number 0-100, how complete the requirements are>,
  "testability": <number 0-100, how testable the requirements are>,
  "stories": <number, count of user stories or functional requirements found>,
  "specs": <number, count of technical specifications found>,
  "issues": [
    {"line": "<approximate location>", "text": "<the vague phrase>", "suggestion": "<how to fix it>"}
  ],
  "extractedRequirements": [
    {"id": "REQ-001", "title": "<short title>", "description": "<full requirement text>", "risk": "low|medium|high", "testability": <0-100>}
  ],
  "summary": "<2-3 sentence summary of the document>"
}"#;

const SCENARIO_SCHEMA: &str = r#"{
  "scenarios": [
    {
      "id": "SC-001",
      "title": "<descriptive scenario title>",
      "category": "E2E|UI|Integration|Backend|API",
      "priority": "P1|P2|P3",
      "type": "positive|negative|chaos",
      "requirement": "<which REQ-xxx this covers>",
      "steps": ["Step 1...", "Step 2...", "Step 3..."],
      "expectedResult": "<what should happen>",
      "edgeCoverage": <0-100>,
      "regressionImpact": <0-100>
    }
  ]
}"#;

const TEST_CASE_SCHEMA: &str = r#"{
  "testCases": [
    {
      "id": "TC-001",
      "title": "<test case title>",
      "given": "<precondition>",
      "when": "<action>",
      "then": "<expected result>",
      "testData": "<specific test data needed>",
      "assertions": ["Assert 1...", "Assert 2..."],
      "preconditions": {"featureFlag": "", "accountType": "", "platform": ""},
      "automationSteps": ["// Step 1: Navigate to...", "// Step 2: Click..."]
    }
  ]
}"#;

const CONFLICT_SCHEMA: &str = r#"{
  "conflicts": [
    {
      "reqA": "<REQ-xxx>",
      "reqB": "<REQ-yyy>",
      "description": "<what the conflict is>",
      "severity": "high|medium|low",
      "suggestion": "<how to resolve it>"
    }
  ],
  "gaps": [
    {"description": "<what's missing>", "severity": "high|medium|low"}
  ]
}"#;

const GAP_SCHEMA: &str = r#"{
  "coverageScore": <number 0-100>,
  "totalRequirements": <number>,
  "coveredRequirements": <number>,
  "gaps": [
    {
      "id": "GAP-001",
      "requirement": "<requirement that is not covered>",
      "severity": "high|medium|low",
      "description": "<why this is a gap>",
      "suggestedTests": ["<test case 1>", "<test case 2>"]
    }
  ],
  "additionalTests": [
    {
      "id": "AT-001",
      "title": "<test case title>",
      "description": "<what to test>",
      "priority": "high|medium|low",
      "coversGap": "GAP-001"
    }
  ],
  "summary": "<2-3 sentence summary of the analysis>"
}"#;

const DUPLICATE_SCHEMA: &str = r#"{
  "totalTestCases": <number>,
  "duplicateGroups": [
    {
      "id": "DUP-001",
      "severity": "exact|near|overlap",
      "tests": ["<test name 1>", "<test name 2>"],
      "reason": "<why these are duplicates>",
      "recommendation": "remove|merge|keep"
    }
  ],
  "stats": {
    "exact": <number of exact duplicate groups>,
    "near": <number of near-duplicate groups>,
    "overlap": <number of overlapping groups>,
    "savingsPercent": <estimated % reduction if duplicates removed>
  },
  "summary": "<2-3 sentence summary>"
}"#;

/// A fully built prompt, ready for the model client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPrompt {
    pub task_kind: TaskKind,
    pub system_instruction: String,
    pub user_content: String,
    pub max_tokens: Option<u32>,
}

impl ModelPrompt {
    fn new(task_kind: TaskKind, system: &str, user_content: String) -> Self {
        Self {
            task_kind,
            system_instruction: system.to_string(),
            user_content,
            max_tokens: task_kind.max_tokens(),
        }
    }
}

/// Returns the longest prefix of `text` holding at most `max_chars` characters.
///
/// Counts Unicode scalar values, so a multi-byte character is never split.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Builds the prompts for every task the relay supports.
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn document_analysis(text: &str, file_name: &str) -> ModelPrompt {
        let user = format!(
            "Analyze this requirements document \"{file_name}\" and return a JSON object with:\n\n\
             {DOCUMENT_SCHEMA}\n\n\
             Limit extractedRequirements to the top 20 most important ones.\n\
             Limit issues to the top 10 most critical ones.\n\n\
             Document text:\n---\n{}\n---",
            truncate_chars(text, DOCUMENT_CHAR_LIMIT)
        );
        ModelPrompt::new(TaskKind::DocumentAnalysis, DOCUMENT_ANALYSIS_SYSTEM, user)
    }

    pub fn scenario_generation(requirements: &Value) -> ModelPrompt {
        let serialized = pretty_json(requirements);
        let user = format!(
            "Given these requirements, generate test scenarios. Return JSON:\n\n\
             {SCENARIO_SCHEMA}\n\n\
             Generate 10-15 scenarios covering positive, negative, and edge cases.\n\n\
             Requirements:\n---\n{}\n---",
            truncate_chars(&serialized, REQUIREMENTS_CHAR_LIMIT)
        );
        ModelPrompt::new(TaskKind::ScenarioGeneration, SCENARIO_SYSTEM, user)
    }

    pub fn test_case_generation(scenario: &Value) -> ModelPrompt {
        let user = format!(
            "Convert this test scenario into detailed test cases. Return JSON:\n\n\
             {TEST_CASE_SCHEMA}\n\n\
             Generate 2-4 test cases per scenario (positive + negative).\n\n\
             Scenario:\n---\n{}\n---",
            pretty_json(scenario)
        );
        ModelPrompt::new(TaskKind::TestCaseGeneration, TEST_CASE_SYSTEM, user)
    }

    pub fn conflict_detection(requirements: &Value) -> ModelPrompt {
        let serialized = pretty_json(requirements);
        let user = format!(
            "Analyze these requirements for conflicts, contradictions, and gaps. Return JSON:\n\n\
             {CONFLICT_SCHEMA}\n\n\
             Requirements:\n---\n{}\n---",
            truncate_chars(&serialized, REQUIREMENTS_CHAR_LIMIT)
        );
        ModelPrompt::new(TaskKind::ConflictDetection, CONFLICT_SYSTEM, user)
    }

    /// Chat prompt; a non-blank `context` is prepended as a project block.
    pub fn chat(message: &str, context: Option<&str>) -> ModelPrompt {
        let user = match context.filter(|c| !c.is_empty()) {
            Some(context) => format!(
                "Context about the current project:\n{context}\n\nUser question: {message}"
            ),
            None => message.to_string(),
        };
        ModelPrompt::new(TaskKind::Chat, CHAT_SYSTEM, user)
    }

    pub fn gap_analysis(test_files: &[NamedText], documents: &[RequirementDocument]) -> ModelPrompt {
        let document_block = documents
            .iter()
            .map(render_requirement_document)
            .collect::<Vec<_>>()
            .join("\n\n");
        let file_block = render_files(test_files, GAP_FILE_CHAR_LIMIT);

        let user = format!(
            "Compare the uploaded test scenarios/cases against the project requirements documents.\n\n\
             PROJECT REQUIREMENTS DOCUMENTS:\n{document_block}\n\n\
             UPLOADED TEST SCENARIOS/CASES:\n{file_block}\n\n\
             Analyze and respond in this exact JSON format:\n{GAP_SCHEMA}"
        );
        ModelPrompt::new(TaskKind::GapAnalysis, GAP_SYSTEM, user)
    }

    pub fn duplicate_detection(files: &[NamedText]) -> ModelPrompt {
        let file_block = render_files(files, DUPLICATE_FILE_CHAR_LIMIT);
        let user = format!(
            "Analyze the following test cases/scenarios to find duplicates, near-duplicates, \
             and overlapping test coverage.\n\n\
             TEST CASES:\n{file_block}\n\n\
             Respond in this exact JSON format:\n{DUPLICATE_SCHEMA}"
        );
        ModelPrompt::new(TaskKind::DuplicateDetection, DUPLICATE_SYSTEM, user)
    }
}

fn render_files(files: &[NamedText], limit: usize) -> String {
    files
        .iter()
        .map(|file| format!("--- File: {} ---\n{}", file.name, truncate_chars(&file.text, limit)))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_requirement_document(document: &RequirementDocument) -> String {
    let requirements = document
        .requirements
        .iter()
        .map(|r| format!("{}: {} - {}", r.id, r.title, r.description))
        .collect::<Vec<_>>()
        .join("\n");
    let summary = document
        .summary
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or("N/A");
    let requirements = if requirements.is_empty() {
        "None extracted".to_string()
    } else {
        requirements
    };

    format!(
        "Document: {}\nSummary: {}\nRequirements:\n{}",
        document.name, summary, requirements
    )
}
