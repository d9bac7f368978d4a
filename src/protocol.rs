//! Public request/response DTOs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.
//!
//! Response fields named `evaluation`, `analysis`, `questions`, and `tips`
//! carry raw model text, often JSON-shaped but never parsed server-side.

use serde::{Deserialize, Serialize};

use crate::domain::{Recommendation, SkillScores};

#[derive(Serialize)]
pub struct RootOut {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct UserSyncIn {
    pub name: String,
    pub email: String,
}
#[derive(Serialize)]
pub struct UserSyncOut {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ProgressUpdateIn {
    pub action: String,
    #[serde(default)]
    pub xp_earned: i64,
    /// Free-form client context; accepted and ignored.
    #[serde(default)]
    #[allow(dead_code)]
    pub details: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct CodeEvalIn {
    pub code: String,
    pub language: String,
    #[serde(default)]
    pub problem_statement: String,
    #[serde(default)]
    pub expected_behavior: String,
}
#[derive(Serialize)]
pub struct EvaluationOut {
    pub evaluation: String,
}

#[derive(Debug, Deserialize)]
pub struct CodeExecIn {
    pub source_code: String,
    pub language_id: i64,
    #[serde(default)]
    pub stdin: String,
}
#[derive(Serialize)]
pub struct CodeExecOut {
    /// Judge0 JSON when forwarded, raw model text when simulated.
    pub result: serde_json::Value,
    pub simulated: bool,
}

#[derive(Serialize)]
pub struct QuizOut {
    pub topic: String,
    pub questions: String,
}

#[derive(Debug, Deserialize)]
pub struct QuizSubmitIn {
    pub topic: String,
    /// Free-form object; only its integer `score` member is read.
    #[serde(default)]
    pub answers: serde_json::Map<String, serde_json::Value>,
    pub total_questions: i64,
}
#[derive(Serialize)]
pub struct QuizSubmitOut {
    pub score: i64,
    pub total: i64,
    pub analysis: String,
}

#[derive(Debug, Deserialize)]
pub struct InterviewEvalIn {
    pub question: String,
    pub transcript: String,
    #[serde(default)]
    pub filler_words: i64,
    #[serde(default = "default_speech_speed")]
    pub speech_speed: String,
}

fn default_speech_speed() -> String {
    "normal".into()
}

#[derive(Serialize)]
pub struct QuestionsOut {
    pub questions: String,
}

#[derive(Serialize)]
pub struct TipsOut {
    pub tips: String,
}

#[derive(Serialize)]
pub struct RecommendationsOut {
    pub recommendations: Vec<Recommendation>,
    pub scores: SkillScores,
}
