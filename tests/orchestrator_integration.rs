//! Integration tests for the client orchestrator against a live relay.
//!
//! A relay backed by a mock model provider is served on an ephemeral port
//! and reached through `HttpRelayClient`, so the whole client path runs:
//! multipart upload, JSON replies, error bodies and network failures.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use testcraft_relay::adapters::ai::MockAIProvider;
use testcraft_relay::adapters::extraction::FileTextExtractor;
use testcraft_relay::adapters::http::{relay_router, RelayAppState};
use testcraft_relay::adapters::notice::RecordingNoticeSink;
use testcraft_relay::adapters::rate_limiter::InMemoryRateLimiter;
use testcraft_relay::adapters::relay_client::{HttpRelayClient, RelayClientConfig};
use testcraft_relay::adapters::storage::FileWorkspaceStorage;
use testcraft_relay::application::orchestrator::{
    ClientOrchestrator, ANALYSIS_FALLBACK_NOTICE, CONFLICTS_NEED_REQUIREMENTS,
    SERVER_UNAVAILABLE_NOTICE,
};
use testcraft_relay::config::ServerConfig;
use testcraft_relay::domain::analysis::NamedText;
use testcraft_relay::domain::workspace::{
    DocumentStatus, ScoreSource, AMBIGUITY_RANGE, COMPLETENESS_RANGE, SPECS_RANGE, STORIES_RANGE,
    TESTABILITY_RANGE,
};
use testcraft_relay::ports::{Notice, NoticeLevel};

// =============================================================================
// Test Infrastructure
// =============================================================================

const REQUIREMENTS: &str = "REQ-001 The recorder shall keep every episode for 30 days.\n\
                            REQ-002 Recordings shall be deleted after 14 days.\n";

const ANALYSIS_REPLY: &str = r#"{"ambiguity": 30, "completeness": 70, "testability": 64,
  "stories": 2, "specs": 2,
  "issues": [{"line": "REQ-002", "text": "Conflicts with REQ-001", "suggestion": "Pick one"}],
  "extractedRequirements": [
    {"id": "REQ-001", "title": "Retention 30 days", "description": "Keep 30 days", "risk": "high"},
    {"id": "REQ-002", "title": "Retention 14 days", "description": "Delete at 14", "risk": "high"}
  ],
  "summary": "Two retention rules"}"#;

type Orchestrator = ClientOrchestrator<HttpRelayClient, RecordingNoticeSink>;

async fn serve_relay(provider: MockAIProvider) -> String {
    let state = RelayAppState::new(
        Arc::new(provider),
        Arc::new(FileTextExtractor::new()),
        10 * 1024 * 1024,
    );
    let app = relay_router(
        state,
        Arc::new(InMemoryRateLimiter::with_defaults()),
        &ServerConfig::default(),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .await
            .unwrap();
    });
    format!("http://{}", addr)
}

/// An address nothing listens on.
async fn dead_relay() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn orchestrator(base_url: &str) -> (Orchestrator, RecordingNoticeSink) {
    let client = HttpRelayClient::new(
        RelayClientConfig::new(base_url).with_timeout(Duration::from_secs(5)),
    )
    .unwrap();
    let sink = RecordingNoticeSink::new();
    (ClientOrchestrator::new(client, sink.clone()), sink)
}

// =============================================================================
// Against a live relay
// =============================================================================

#[tokio::test]
async fn upload_fills_row_from_relay() {
    let provider = MockAIProvider::new().with_response(ANALYSIS_REPLY);
    let base = serve_relay(provider.clone()).await;
    let (orch, sink) = orchestrator(&base);

    let id = orch
        .upload("retention.txt", REQUIREMENTS.as_bytes().to_vec())
        .await;

    let row = orch.document(id).unwrap();
    assert_eq!(row.status, DocumentStatus::Parsed);
    assert_eq!(row.score_source, Some(ScoreSource::Ai));
    assert_eq!(row.testability.value(), 64);
    assert_eq!(row.requirements.len(), 2);
    assert_eq!(row.issues[0].suggestion, "Pick one");
    assert_eq!(
        sink.notices(),
        vec![Notice::success("AI analysis complete for \"retention.txt\"")]
    );
    assert!(provider
        .last_call()
        .unwrap()
        .user_message
        .contains("REQ-002 Recordings shall be deleted"));
}

#[tokio::test]
async fn too_short_upload_falls_back_to_simulation() {
    let base = serve_relay(MockAIProvider::new()).await;
    let (orch, sink) = orchestrator(&base);

    let id = orch.upload("tiny.txt", b"too short".to_vec()).await;

    let row = orch.document(id).unwrap();
    assert_eq!(row.score_source, Some(ScoreSource::Simulated));
    assert_eq!(sink.notices(), vec![Notice::info(ANALYSIS_FALLBACK_NOTICE)]);
}

#[tokio::test]
async fn conflicts_and_chat_round_trip() {
    let provider = MockAIProvider::new()
        .with_response(ANALYSIS_REPLY)
        .with_response(
            r#"{"conflicts": [{"reqA": "REQ-001", "reqB": "REQ-002",
                "description": "Retention differs", "severity": "high",
                "suggestion": "Use 30 days"}], "gaps": []}"#,
        )
        .with_response("Both rules cover retention.");
    let base = serve_relay(provider.clone()).await;
    let (orch, sink) = orchestrator(&base);
    orch.upload("retention.txt", REQUIREMENTS.as_bytes().to_vec())
        .await;

    let conflicts = orch.detect_conflicts().await;
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].suggestion, "Use 30 days");
    assert_eq!(sink.notices().last().unwrap(), &Notice::success("AI found 1 conflict(s)"));

    let reply = orch.chat("What do my documents cover?").await;
    assert_eq!(reply, "Both rules cover retention.");
    assert!(provider.last_call().unwrap().user_message.contains(
        "User has 1 documents ingested. Parsed docs: retention.txt"
    ));
}

#[tokio::test]
async fn gap_analysis_sends_parsed_documents() {
    let provider = MockAIProvider::new()
        .with_response(ANALYSIS_REPLY)
        .with_response(
            r#"{"coverageScore": 50, "totalRequirements": 2, "coveredRequirements": 1,
                "gaps": [{"id": "GAP-001", "requirement": "REQ-002", "severity": "high"}],
                "summary": "Deletion is untested"}"#,
        );
    let base = serve_relay(provider.clone()).await;
    let (orch, sink) = orchestrator(&base);
    orch.upload("retention.txt", REQUIREMENTS.as_bytes().to_vec())
        .await;

    let result = orch
        .analyze_gaps(vec![NamedText::new(
            "playback.feature",
            "Given a recording older than 30 days",
        )])
        .await
        .unwrap();

    assert_eq!(result.coverage_score.value(), 50);
    assert_eq!(result.gaps[0].requirement, "REQ-002");
    assert_eq!(sink.count(NoticeLevel::Success), 2);
    let prompt = provider.last_call().unwrap().user_message;
    assert!(prompt.contains("retention.txt"));
    assert!(prompt.contains("playback.feature"));
}

// =============================================================================
// Relay unreachable
// =============================================================================

#[tokio::test]
async fn unreachable_relay_simulates_each_attempt_once() {
    let base = dead_relay().await;
    let (orch, sink) = orchestrator(&base);

    for attempt in 0..3 {
        let id = orch.upload("spec.pdf", vec![0x25, 0x50, 0x44, 0x46]).await;
        let row = orch.document(id).unwrap();

        assert_eq!(row.score_source, Some(ScoreSource::Simulated));
        assert!(STORIES_RANGE.contains(&row.stories));
        assert!(SPECS_RANGE.contains(&row.specs));
        assert!(AMBIGUITY_RANGE.contains(&row.ambiguity.value()));
        assert!(COMPLETENESS_RANGE.contains(&row.completeness.value()));
        assert!(TESTABILITY_RANGE.contains(&row.testability.value()));
        assert_eq!(
            sink.matching("AI unavailable").len(),
            attempt + 1,
            "exactly one notice per attempt"
        );
    }
}

#[tokio::test]
async fn unreachable_relay_degrades_every_task() {
    let base = dead_relay().await;
    let (orch, sink) = orchestrator(&base);
    orch.upload("a.txt", b"x".to_vec()).await;
    sink.drain();

    let reply = orch.chat("hello").await;
    assert!(reply.starts_with("Sorry, I couldn't process that. network error"));

    let scenarios = orch.generate_scenarios().await;
    assert!(scenarios.is_empty());
    assert_eq!(sink.count(NoticeLevel::Error), 1);

    assert!(orch.detect_conflicts().await.is_empty());
    assert_eq!(sink.matching(CONFLICTS_NEED_REQUIREMENTS).len(), 1);

    let gaps = orch
        .analyze_gaps(vec![NamedText::new("cases.txt", "Given a recording")])
        .await;
    assert!(gaps.is_none());
    assert_eq!(sink.matching(SERVER_UNAVAILABLE_NOTICE).len(), 1);
}

// =============================================================================
// Persistence
// =============================================================================

#[tokio::test]
async fn store_survives_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileWorkspaceStorage::new(dir.path().join("workspace.json"));
    let base = dead_relay().await;

    let (orch, _sink) = orchestrator(&base);
    let kept = orch.upload("kept.docx", vec![1]).await;
    let trashed = orch.upload("trashed.docx", vec![2]).await;
    orch.trash(trashed);
    orch.save(&storage).await.unwrap();

    let (fresh, _sink) = orchestrator(&base);
    assert_eq!(fresh.load(&storage).await.unwrap(), 1);
    assert_eq!(fresh.document(kept), orch.document(kept));
    assert!(fresh.restore(trashed));
    assert_eq!(fresh.snapshot().len(), 2);
}
