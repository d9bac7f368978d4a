//! Judge0 proxy: forwards source + stdin to the external judge when a key is
//! configured. The fallback path (AI-simulated execution) lives in the handler,
//! which owns the choice between the two collaborators.
//!
//! External-collaborator boundary only: no sandboxing or resource limits here
//! beyond the fixed network timeout.

use std::time::Duration;

use serde::Serialize;
use tracing::{info, instrument};

use crate::config::Config;

const JUDGE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct JudgeClient {
  client: reqwest::Client,
  api_key: Option<String>,
  url: String,
}

#[derive(Serialize)]
struct JudgeSubmission<'a> {
  source_code: &'a str,
  language_id: i64,
  stdin: &'a str,
}

impl JudgeClient {
  pub fn from_config(cfg: &Config) -> Self {
    // Fixed 30s timeout on the judge round trip; `wait=true` makes Judge0
    // block until the run finishes, so the call can legitimately take a while.
    let client = reqwest::Client::builder()
      .timeout(JUDGE_TIMEOUT)
      .build()
      .expect("judge HTTP client");
    Self {
      client,
      api_key: cfg.judge_api_key.clone(),
      url: cfg.judge_url.clone(),
    }
  }

  /// Whether real execution is available. When false, callers must simulate.
  pub fn is_configured(&self) -> bool {
    self.api_key.is_some()
  }

  /// Forward one submission and return the judge's JSON verbatim.
  #[instrument(level = "info", skip(self, source_code, stdin), fields(%language_id, code_len = source_code.len()))]
  pub async fn forward(
    &self,
    source_code: &str,
    language_id: i64,
    stdin: &str,
  ) -> Result<serde_json::Value, String> {
    let api_key = self
      .api_key
      .as_deref()
      .ok_or_else(|| "no judge API key configured".to_string())?;
    let payload = JudgeSubmission { source_code, language_id, stdin };

    let res = self.client
      .post(format!("{}?base64_encoded=false&wait=true", self.url))
      .header("Content-Type", "application/json")
      .header("X-RapidAPI-Key", api_key)
      .header("X-RapidAPI-Host", "judge0-ce.p.rapidapi.com")
      .json(&payload)
      .send()
      .await
      .map_err(|e| e.to_string())?;

    let status = res.status();
    let body: serde_json::Value = res.json().await.map_err(|e| e.to_string())?;
    info!(target: "elevate_backend", %status, "Judge response received");
    Ok(body)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::Prompts;

  fn config_without_key() -> Config {
    Config {
      port: 0,
      database_url: "sqlite::memory:".into(),
      ai_api_key: None,
      ai_base_url: String::new(),
      ai_model: String::new(),
      judge_api_key: None,
      judge_url: "https://judge0-ce.p.rapidapi.com/submissions".into(),
      cors_origins: vec!["*".into()],
      prompts: Prompts::default(),
    }
  }

  #[test]
  fn missing_key_means_simulation() {
    let judge = JudgeClient::from_config(&config_without_key());
    assert!(!judge.is_configured());
  }

  #[test]
  fn configured_key_enables_forwarding() {
    let mut cfg = config_without_key();
    cfg.judge_api_key = Some("rapidapi-key".into());
    let judge = JudgeClient::from_config(&cfg);
    assert!(judge.is_configured());
  }
}
