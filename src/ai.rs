//! Minimal chat-completions client for our use-cases.
//!
//! Every "intelligent" behavior in the service is one round trip here: build a
//! fixed system instruction plus a per-request user message, post it, hand the
//! raw first-choice text back. No retry, no caching, and deliberately no
//! response parsing: the model frequently answers with JSON-shaped text, and
//! the wire contract passes it through verbatim, malformed or not.
//!
//! NOTE: We never log the API key and we keep payload truncations short.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::config::{Config, Prompts};
use crate::util::fill_template;

#[derive(Clone)]
pub struct AiClient {
  client: reqwest::Client,
  api_key: String,
  pub base_url: String,
  pub model: String,
}

impl AiClient {
  /// Construct the client when an API key is configured; otherwise None and
  /// every AI-backed endpoint reports an upstream failure.
  pub fn from_config(cfg: &Config) -> Option<Self> {
    let api_key = cfg.ai_api_key.clone()?;
    // No request timeout here. The judge proxy carries one; the model call
    // intentionally does not (inherited gap, tracked with product).
    let client = reqwest::Client::builder().build().ok()?;
    Some(Self {
      client,
      api_key,
      base_url: cfg.ai_base_url.clone(),
      model: cfg.ai_model.clone(),
    })
  }

  /// One plain-text chat completion round trip.
  #[instrument(level = "info", skip(self, system, user), fields(model = %self.model, user_len = user.len()))]
  pub async fn chat(&self, system: &str, user: &str) -> Result<String, String> {
    let url = format!("{}/chat/completions", self.base_url);
    let req = ChatCompletionRequest {
      model: self.model.clone(),
      messages: vec![
        ChatMessageReq { role: "system".into(), content: system.into() },
        ChatMessageReq { role: "user".into(), content: user.into() },
      ],
      temperature: 0.7,
    };

    let start = std::time::Instant::now();
    let res = self.client.post(&url)
      .header(USER_AGENT, "elevate-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req).send().await.map_err(|e| e.to_string())?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let msg = extract_api_error(&body).unwrap_or(body);
      return Err(format!("model HTTP {}: {}", status, msg));
    }

    let body: ChatCompletionResponse = res.json().await.map_err(|e| e.to_string())?;
    if let Some(usage) = &body.usage {
      info!(prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "Model usage");
    }
    let text = body.choices.first()
      .and_then(|c| c.message.content.clone())
      .unwrap_or_default().trim().to_string();
    info!(elapsed = ?start.elapsed(), response_len = text.len(), "Model response received");

    Ok(text)
  }

  // --- High-level helpers (one per product use-case) ---

  #[instrument(level = "info", skip_all, fields(%language, code_len = code.len()))]
  pub async fn evaluate_code(
    &self,
    prompts: &Prompts,
    code: &str,
    language: &str,
    problem: &str,
    expected: &str,
  ) -> Result<String, String> {
    let user = fill_template(
      &prompts.code_eval_user_template,
      &[("problem", problem), ("expected", expected), ("language", language), ("code", code)],
    );
    self.chat(&prompts.code_eval_system, &user).await
  }

  #[instrument(level = "info", skip_all, fields(%language_id, code_len = code.len()))]
  pub async fn simulate_execution(
    &self,
    prompts: &Prompts,
    code: &str,
    language_id: i64,
    stdin: &str,
  ) -> Result<String, String> {
    let user = fill_template(
      &prompts.exec_simulate_user_template,
      &[("language_id", &language_id.to_string()), ("stdin", stdin), ("code", code)],
    );
    self.chat(&prompts.exec_simulate_system, &user).await
  }

  #[instrument(level = "info", skip(self, prompts), fields(%topic))]
  pub async fn generate_quiz(&self, prompts: &Prompts, topic: &str) -> Result<String, String> {
    let user = fill_template(&prompts.quiz_generate_user_template, &[("topic", topic)]);
    self.chat(&prompts.quiz_generate_system, &user).await
  }

  #[instrument(level = "info", skip(self, prompts), fields(%topic, %score, %total))]
  pub async fn analyze_quiz(
    &self,
    prompts: &Prompts,
    topic: &str,
    score: i64,
    total: i64,
  ) -> Result<String, String> {
    let wrong = total - score;
    let user = fill_template(
      &prompts.quiz_analysis_user_template,
      &[
        ("topic", topic),
        ("score", &score.to_string()),
        ("total", &total.to_string()),
        ("wrong", &wrong.to_string()),
      ],
    );
    self.chat(&prompts.quiz_analysis_system, &user).await
  }

  #[instrument(level = "info", skip_all, fields(question_len = question.len(), transcript_len = transcript.len()))]
  pub async fn evaluate_interview(
    &self,
    prompts: &Prompts,
    question: &str,
    transcript: &str,
    filler_words: i64,
    speech_speed: &str,
  ) -> Result<String, String> {
    let user = fill_template(
      &prompts.interview_eval_user_template,
      &[
        ("question", question),
        ("transcript", transcript),
        ("filler_words", &filler_words.to_string()),
        ("speech_speed", speech_speed),
      ],
    );
    self.chat(&prompts.interview_eval_system, &user).await
  }

  #[instrument(level = "info", skip_all)]
  pub async fn interview_questions(&self, prompts: &Prompts) -> Result<String, String> {
    self
      .chat(&prompts.interview_questions_system, &prompts.interview_questions_user)
      .await
  }

  #[instrument(level = "info", skip_all)]
  pub async fn communication_tips(&self, prompts: &Prompts) -> Result<String, String> {
    self
      .chat(&prompts.communication_tips_system, &prompts.communication_tips_user)
      .await
  }
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  temperature: f32,
}
#[derive(Serialize)]
struct ChatMessageReq { role: String, content: String }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
  #[serde(default)] total_tokens: Option<u32>,
}

/// Try to extract a clean error message from an API error body.
fn extract_api_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  match serde_json::from_str::<EWrap>(body) {
    Ok(w) => Some(w.error.message),
    Err(_) => None,
  }
}
