//! HTTP endpoint handlers. These are thin wrappers that read/write the store
//! and forward to the AI gateway or judge proxy, then return a JSON envelope.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;

use axum::{
  extract::{Path, State},
  Json,
};
use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::{CodeSubmission, InterviewRecord, Progress, QuizAttempt, User};
use crate::error::{ApiError, ApiResult};
use crate::progress::apply_update;
use crate::protocol::*;
use crate::recommend::build_recommendations;
use crate::state::AppState;
use crate::store::HISTORY_LIMIT;

/// Quiz attempts considered by the recommendation heuristic.
const RECOMMEND_QUIZ_WINDOW: i64 = 10;

#[instrument(level = "info")]
pub async fn http_root() -> Json<RootOut> {
  Json(RootOut { message: "Elevate AI API".into() })
}

/// Idempotent per email: a second sync returns the stored user untouched.
#[instrument(level = "info", skip(state, body), fields(email = %body.email))]
pub async fn http_user_sync(
  State(state): State<Arc<AppState>>,
  Json(body): Json<UserSyncIn>,
) -> ApiResult<Json<UserSyncOut>> {
  if let Some(existing) = state.store.find_user_by_email(&body.email).await? {
    info!(target: "elevate_backend", user_id = %existing.user_id, "User already synced");
    return Ok(Json(UserSyncOut {
      user_id: existing.user_id,
      name: existing.name,
      email: existing.email,
    }));
  }

  let user = User {
    user_id: Uuid::new_v4().to_string(),
    name: body.name,
    email: body.email,
    created_at: Utc::now(),
  };
  state.store.insert_user(&user).await?;
  info!(target: "elevate_backend", user_id = %user.user_id, "User created");
  Ok(Json(UserSyncOut { user_id: user.user_id, name: user.name, email: user.email }))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_progress(
  State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Progress>> {
  let progress = state.store.get_or_create_progress(Utc::now()).await?;
  Ok(Json(progress))
}

#[instrument(level = "info", skip(state, body), fields(action = %body.action, xp_earned = body.xp_earned))]
pub async fn http_update_progress(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ProgressUpdateIn>,
) -> ApiResult<Json<Progress>> {
  let now = Utc::now();
  let current = state.store.get_or_create_progress(now).await?;
  let patch = apply_update(&current, &body.action, body.xp_earned, now);
  let updated = state.store.update_progress(&patch).await?;
  info!(target: "progress", xp = updated.xp, level = updated.level, streak = updated.streak, "Progress updated");
  Ok(Json(updated))
}

#[instrument(level = "info", skip(state, body), fields(language = %body.language, code_len = body.code.len()))]
pub async fn http_evaluate_code(
  State(state): State<Arc<AppState>>,
  Json(body): Json<CodeEvalIn>,
) -> ApiResult<Json<EvaluationOut>> {
  let evaluation = state
    .ai()?
    .evaluate_code(
      &state.prompts,
      &body.code,
      &body.language,
      &body.problem_statement,
      &body.expected_behavior,
    )
    .await
    .map_err(ApiError::AiService)?;

  let record = CodeSubmission {
    id: Uuid::new_v4().to_string(),
    code: body.code,
    language: body.language,
    problem: body.problem_statement,
    evaluation: evaluation.clone(),
    timestamp: Utc::now(),
  };
  state.store.insert_code_submission(&record).await?;

  Ok(Json(EvaluationOut { evaluation }))
}

/// Real execution when a judge key is configured, AI simulation otherwise.
/// The simulated flag always tells the caller which path answered.
#[instrument(level = "info", skip(state, body), fields(language_id = body.language_id, code_len = body.source_code.len()))]
pub async fn http_execute_code(
  State(state): State<Arc<AppState>>,
  Json(body): Json<CodeExecIn>,
) -> ApiResult<Json<CodeExecOut>> {
  if state.judge.is_configured() {
    let result = state
      .judge
      .forward(&body.source_code, body.language_id, &body.stdin)
      .await
      .map_err(ApiError::JudgeService)?;
    return Ok(Json(CodeExecOut { result, simulated: false }));
  }

  let text = state
    .ai()?
    .simulate_execution(&state.prompts, &body.source_code, body.language_id, &body.stdin)
    .await
    .map_err(ApiError::AiService)?;
  Ok(Json(CodeExecOut { result: serde_json::Value::String(text), simulated: true }))
}

#[instrument(level = "info", skip(state), fields(%topic))]
pub async fn http_get_quiz(
  State(state): State<Arc<AppState>>,
  Path(topic): Path<String>,
) -> ApiResult<Json<QuizOut>> {
  let questions = state
    .ai()?
    .generate_quiz(&state.prompts, &topic)
    .await
    .map_err(ApiError::AiService)?;
  Ok(Json(QuizOut { topic, questions }))
}

#[instrument(level = "info", skip(state, body), fields(topic = %body.topic, total = body.total_questions))]
pub async fn http_submit_quiz(
  State(state): State<Arc<AppState>>,
  Json(body): Json<QuizSubmitIn>,
) -> ApiResult<Json<QuizSubmitOut>> {
  let score = body.answers.get("score").and_then(|v| v.as_i64()).unwrap_or(0);
  let total = body.total_questions;

  let analysis = state
    .ai()?
    .analyze_quiz(&state.prompts, &body.topic, score, total)
    .await
    .map_err(ApiError::AiService)?;

  let record = QuizAttempt {
    id: Uuid::new_v4().to_string(),
    topic: body.topic,
    score,
    total,
    analysis: analysis.clone(),
    timestamp: Utc::now(),
  };
  state.store.insert_quiz_attempt(&record).await?;
  info!(target: "progress", topic = %record.topic, score, total, "Quiz attempt recorded");

  Ok(Json(QuizSubmitOut { score, total, analysis }))
}

#[instrument(level = "info", skip(state, body), fields(question_len = body.question.len(), transcript_len = body.transcript.len()))]
pub async fn http_evaluate_interview(
  State(state): State<Arc<AppState>>,
  Json(body): Json<InterviewEvalIn>,
) -> ApiResult<Json<EvaluationOut>> {
  let evaluation = state
    .ai()?
    .evaluate_interview(
      &state.prompts,
      &body.question,
      &body.transcript,
      body.filler_words,
      &body.speech_speed,
    )
    .await
    .map_err(ApiError::AiService)?;

  let record = InterviewRecord {
    id: Uuid::new_v4().to_string(),
    question: body.question,
    transcript: body.transcript,
    evaluation: evaluation.clone(),
    timestamp: Utc::now(),
  };
  state.store.insert_interview(&record).await?;

  Ok(Json(EvaluationOut { evaluation }))
}

#[instrument(level = "info", skip(state))]
pub async fn http_interview_questions(
  State(state): State<Arc<AppState>>,
) -> ApiResult<Json<QuestionsOut>> {
  let questions = state
    .ai()?
    .interview_questions(&state.prompts)
    .await
    .map_err(ApiError::AiService)?;
  Ok(Json(QuestionsOut { questions }))
}

#[instrument(level = "info", skip(state))]
pub async fn http_quiz_history(
  State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<QuizAttempt>>> {
  Ok(Json(state.store.recent_quiz_attempts(HISTORY_LIMIT).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_interview_history(
  State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<InterviewRecord>>> {
  Ok(Json(state.store.recent_interviews(HISTORY_LIMIT).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_code_history(
  State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<CodeSubmission>>> {
  Ok(Json(state.store.recent_code_submissions(HISTORY_LIMIT).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_communication_tips(
  State(state): State<Arc<AppState>>,
) -> ApiResult<Json<TipsOut>> {
  let tips = state
    .ai()?
    .communication_tips(&state.prompts)
    .await
    .map_err(ApiError::AiService)?;
  Ok(Json(TipsOut { tips }))
}

#[instrument(level = "info", skip(state))]
pub async fn http_recommendations(
  State(state): State<Arc<AppState>>,
) -> ApiResult<Json<RecommendationsOut>> {
  let now = Utc::now();
  let progress = state.store.get_or_create_progress(now).await?;
  let quizzes = state.store.recent_quiz_attempts(RECOMMEND_QUIZ_WINDOW).await?;
  let (recommendations, scores) = build_recommendations(&progress, &quizzes, now);
  info!(target: "progress", count = recommendations.len(), "Recommendations built");
  Ok(Json(RecommendationsOut { recommendations, scores }))
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::body::Body;
  use axum::http::{header, Request, StatusCode};
  use axum::routing::post;
  use axum::Router;
  use http_body_util::BodyExt;
  use serde_json::{json, Value};
  use tower::util::ServiceExt;

  use crate::config::{Config, Prompts};
  use crate::routes::build_router;
  use crate::state::AppState;

  const MOCK_MODEL_REPLY: &str = "mock model output";

  /// Tiny OpenAI-compatible endpoint the gateway can talk to in-process.
  async fn spawn_mock_model() -> String {
    let app = Router::new().route(
      "/chat/completions",
      post(|| async {
        axum::Json(json!({
          "choices": [{"message": {"content": MOCK_MODEL_REPLY}}],
          "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        }))
      }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
      axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
  }

  /// Fresh in-memory backend; `ai_base_url = None` leaves the gateway off.
  async fn test_app(ai_base_url: Option<String>) -> Router {
    let cfg = Config {
      port: 0,
      database_url: "sqlite::memory:".into(),
      ai_api_key: ai_base_url.as_ref().map(|_| "test-key".into()),
      ai_base_url: ai_base_url.unwrap_or_default(),
      ai_model: "test-model".into(),
      judge_api_key: None,
      judge_url: "https://judge0-ce.p.rapidapi.com/submissions".into(),
      cors_origins: vec!["*".into()],
      prompts: Prompts::default(),
    };
    let state = Arc::new(AppState::from_config(&cfg).await.unwrap());
    build_router(state, &cfg.cors_origins)
  }

  fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
  }

  fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
      .method("POST")
      .uri(uri)
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_string()))
      .unwrap()
  }

  async fn body_json(res: axum::response::Response) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
  }

  #[tokio::test]
  async fn root_reports_service_name() {
    let app = test_app(None).await;
    let res = app.oneshot(get("/api/")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["message"], "Elevate AI API");
  }

  #[tokio::test]
  async fn user_sync_is_idempotent_per_email() {
    let app = test_app(None).await;

    let body = json!({"name": "Asha", "email": "asha@example.com"});
    let first = body_json(
      app.clone().oneshot(post_json("/api/user/sync", body.clone())).await.unwrap(),
    )
    .await;
    let second =
      body_json(app.oneshot(post_json("/api/user/sync", body)).await.unwrap()).await;

    assert_eq!(first["userId"], second["userId"]);
    assert_eq!(second["name"], "Asha");
  }

  #[tokio::test]
  async fn progress_updates_accumulate_and_streak_counts_same_day() {
    let app = test_app(None).await;

    let fresh = body_json(app.clone().oneshot(get("/api/progress")).await.unwrap()).await;
    assert_eq!(fresh["xp"], 0);
    assert_eq!(fresh["level"], 1);
    assert_eq!(fresh["streak"], 0);

    let update = json!({"action": "quiz_complete", "xp_earned": 50, "details": {}});
    let once = body_json(
      app.clone().oneshot(post_json("/api/progress/update", update.clone())).await.unwrap(),
    )
    .await;
    assert_eq!(once["xp"], 50);
    assert_eq!(once["streak"], 1);

    let twice = body_json(
      app.oneshot(post_json("/api/progress/update", update)).await.unwrap(),
    )
    .await;
    assert_eq!(twice["xp"], 100);
    assert_eq!(twice["level"], 1);
    assert_eq!(twice["quizzes_taken"], 2);
    // Same-day quirk: the second update still bumps the streak.
    assert_eq!(twice["streak"], 2);
  }

  #[tokio::test]
  async fn unknown_action_earns_xp_but_no_counter() {
    let app = test_app(None).await;
    let updated = body_json(
      app
        .oneshot(post_json(
          "/api/progress/update",
          json!({"action": "stretched", "xp_earned": 10}),
        ))
        .await
        .unwrap(),
    )
    .await;
    assert_eq!(updated["xp"], 10);
    assert_eq!(updated["quizzes_taken"], 0);
    assert_eq!(updated["interviews_given"], 0);
    assert_eq!(updated["codes_submitted"], 0);
  }

  #[tokio::test]
  async fn quiz_submit_stores_raw_analysis_and_shows_in_history() {
    let base = spawn_mock_model().await;
    let app = test_app(Some(base)).await;

    let res = app
      .clone()
      .oneshot(post_json(
        "/api/quiz/submit",
        json!({"topic": "Percentages", "answers": {"score": 7}, "total_questions": 10}),
      ))
      .await
      .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let submitted = body_json(res).await;
    assert_eq!(submitted["score"], 7);
    assert_eq!(submitted["total"], 10);
    assert_eq!(submitted["analysis"], MOCK_MODEL_REPLY);

    let history = body_json(app.oneshot(get("/api/history/quizzes")).await.unwrap()).await;
    let records = history.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["topic"], "Percentages");
    assert_eq!(records[0]["analysis"], MOCK_MODEL_REPLY);
  }

  #[tokio::test]
  async fn code_execute_without_judge_key_is_simulated() {
    let base = spawn_mock_model().await;
    let app = test_app(Some(base)).await;

    let res = app
      .oneshot(post_json(
        "/api/code/execute",
        json!({"source_code": "print(2 + 2)", "language_id": 71, "stdin": ""}),
      ))
      .await
      .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let out = body_json(res).await;
    assert_eq!(out["simulated"], true);
    assert_eq!(out["result"], MOCK_MODEL_REPLY);
  }

  #[tokio::test]
  async fn ai_endpoints_answer_502_when_gateway_is_off() {
    let app = test_app(None).await;
    let res = app.oneshot(get("/api/quiz/arrays")).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(res).await;
    assert!(body["detail"].as_str().unwrap().contains("AI service error"));
  }

  #[tokio::test]
  async fn history_endpoints_return_arrays_when_empty() {
    let app = test_app(None).await;
    for uri in ["/api/history/quizzes", "/api/history/interviews", "/api/history/code"] {
      let res = app.clone().oneshot(get(uri)).await.unwrap();
      assert_eq!(res.status(), StatusCode::OK);
      assert!(body_json(res).await.as_array().unwrap().is_empty());
    }
  }

  #[tokio::test]
  async fn fresh_backend_recommends_coding_first() {
    let app = test_app(None).await;
    let res = app.oneshot(get("/api/recommendations")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["scores"]["Coding"], 0);
    assert_eq!(body["recommendations"][0]["module"], "coding");
    assert_eq!(body["recommendations"][0]["priority"], "High");
  }

  #[tokio::test]
  async fn interview_evaluation_persists_record() {
    let base = spawn_mock_model().await;
    let app = test_app(Some(base)).await;

    let res = app
      .clone()
      .oneshot(post_json(
        "/api/interview/evaluate",
        json!({"question": "Tell me about yourself", "transcript": "I am ..."}),
      ))
      .await
      .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["evaluation"], MOCK_MODEL_REPLY);

    let history =
      body_json(app.oneshot(get("/api/history/interviews")).await.unwrap()).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
  }
}
