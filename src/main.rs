//! Elevate AI · Placement-Readiness Backend
//!
//! - Axum HTTP API under /api
//! - External generative model for code review, quizzes, and interview coaching
//! - Optional Judge0 forwarding for real code execution (simulated otherwise)
//! - SQLite activity store (users, progress, quiz/interview/code history)
//!
//! Important env variables:
//!   PORT               : u16 (default 3000)
//!   DATABASE_URL       : default "sqlite://elevate.db?mode=rwc"
//!   GEMINI_API_KEY     : enables the AI gateway if present
//!   AI_BASE_URL        : OpenAI-compatible endpoint (default: Google's)
//!   AI_MODEL           : default "gemini-2.5-flash"
//!   JUDGE0_API_KEY     : enables real code execution if present
//!   JUDGE0_URL         : default Judge0 CE via RapidAPI
//!   CORS_ORIGINS       : comma-separated origins, default "*"
//!   PROMPT_CONFIG_PATH : path to TOML prompt overrides
//!   LOG_LEVEL          : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT         : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod config;
mod error;
mod store;
mod ai;
mod judge;
mod progress;
mod recommend;
mod protocol;
mod state;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // All configuration is read here, once, and passed down explicitly.
  let cfg = Config::from_env();

  // Build shared application state (store, AI gateway, judge proxy, prompts).
  let state = Arc::new(AppState::from_config(&cfg).await?);

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state, &cfg.cors_origins);

  let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
  let listener = TcpListener::bind(addr).await?;
  info!(target: "elevate_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
