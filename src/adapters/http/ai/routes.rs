//! Axum router configuration for the relay endpoints.

use axum::{
    extract::DefaultBodyLimit,
    handler::Handler,
    routing::{get, post, MethodRouter},
    Router,
};

use super::handlers::{
    analyze_document, analyze_gaps, analyze_text, chat, detect_conflicts, detect_duplicates,
    generate_scenarios, generate_test_cases, health, not_found, RelayAppState,
};

/// Room for multipart boundaries and text fields around the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Create the model endpoint router, mounted at `/api/ai`.
///
/// # Routes
/// - `POST /analyze-document` - Multipart file or JSON text
/// - `POST /analyze-text` - JSON text
/// - `POST /generate-scenarios` - Requirements to scenarios
/// - `POST /generate-testcases` - Scenario to test cases
/// - `POST /detect-conflicts` - Requirement conflicts and gaps
/// - `POST /chat` - Co-pilot conversation
/// - `POST /analyze-gaps` - Test coverage against requirements
/// - `POST /detect-duplicates` - Duplicate test detection
///
/// `upload_limit_bytes` caps the uploaded file; the document route's body
/// limit is raised to fit it. Other paths and methods under the mount answer
/// the JSON 404.
pub fn ai_routes(upload_limit_bytes: usize) -> Router<RelayAppState> {
    Router::new()
        .route(
            "/analyze-document",
            post_only(analyze_document).layer(DefaultBodyLimit::max(
                upload_limit_bytes + MULTIPART_OVERHEAD_BYTES,
            )),
        )
        .route("/analyze-text", post_only(analyze_text))
        .route("/generate-scenarios", post_only(generate_scenarios))
        .route("/generate-testcases", post_only(generate_test_cases))
        .route("/detect-conflicts", post_only(detect_conflicts))
        .route("/chat", post_only(chat))
        .route("/analyze-gaps", post_only(analyze_gaps))
        .route("/detect-duplicates", post_only(detect_duplicates))
        .fallback(not_found)
}

/// Create the health router.
///
/// # Routes
/// - `GET /api/health` - Liveness plus the configured model
pub fn health_routes() -> Router<RelayAppState> {
    Router::new().route("/api/health", get(health).fallback(not_found))
}

/// A POST route whose other methods answer 404 instead of 405.
fn post_only<H, T>(handler: H) -> MethodRouter<RelayAppState>
where
    H: Handler<T, RelayAppState>,
    T: 'static,
{
    post(handler).fallback(not_found)
}
