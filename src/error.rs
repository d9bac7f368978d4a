//! Application error type for HTTP handlers.
//!
//! Upstream collaborator failures (model, judge) map to 502; storage failures
//! map to 500 with a sanitized message. Bodies follow the wire contract's
//! `{"detail": "..."}` envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
  /// The generative-model call failed, or no API key is configured.
  #[error("AI service error: {0}")]
  AiService(String),

  /// The judge-service call failed.
  #[error("Judge service error: {0}")]
  JudgeService(String),

  /// A database error from sqlx.
  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),
}

/// Convenience type alias for handler return values.
pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, detail) = match &self {
      ApiError::AiService(msg) => {
        tracing::error!(target: "elevate_backend", error = %msg, "AI gateway failure");
        (StatusCode::BAD_GATEWAY, format!("AI service error: {msg}"))
      }
      ApiError::JudgeService(msg) => {
        tracing::error!(target: "elevate_backend", error = %msg, "Judge proxy failure");
        (StatusCode::BAD_GATEWAY, format!("Judge service error: {msg}"))
      }
      ApiError::Database(err) => {
        tracing::error!(target: "elevate_backend", error = %err, "Database error");
        (StatusCode::INTERNAL_SERVER_ERROR, "An internal error occurred".to_string())
      }
    };

    (status, axum::Json(json!({ "detail": detail }))).into_response()
  }
}
