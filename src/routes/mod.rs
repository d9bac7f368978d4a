//! Router assembly: HTTP endpoints under /api, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;

/// Build the application router with:
/// - REST API under `/api/...`
/// - CORS from the configured origin list (`*` allows any origin)
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let cors = if cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = cors_origins
            .iter()
            .filter_map(|o| o.parse::<HeaderValue>().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .route("/api/", get(http::http_root))
        .route("/api/user/sync", post(http::http_user_sync))
        .route("/api/progress", get(http::http_get_progress))
        .route("/api/progress/update", post(http::http_update_progress))
        .route("/api/code/evaluate", post(http::http_evaluate_code))
        .route("/api/code/execute", post(http::http_execute_code))
        .route("/api/quiz/:topic", get(http::http_get_quiz))
        .route("/api/quiz/submit", post(http::http_submit_quiz))
        .route("/api/interview/evaluate", post(http::http_evaluate_interview))
        .route("/api/interview/questions", get(http::http_interview_questions))
        .route("/api/history/quizzes", get(http::http_quiz_history))
        .route("/api/history/interviews", get(http::http_interview_history))
        .route("/api/history/code", get(http::http_code_history))
        .route("/api/communication/tips", post(http::http_communication_tips))
        .route("/api/recommendations", get(http::http_recommendations))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}
