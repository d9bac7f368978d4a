//! Domain models persisted by the activity store, plus recommendation types.
//!
//! The `analysis` / `evaluation` fields hold raw model output. The service
//! never parses them; they travel through storage and the wire verbatim.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registered user, created on first sync by email and immutable thereafter.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
  #[serde(rename = "userId")]
  pub user_id: String,
  pub name: String,
  pub email: String,
  #[serde(rename = "createdAt")]
  pub created_at: DateTime<Utc>,
}

/// The single mutable progress row (one logical user for now).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Progress {
  pub user: String,
  pub xp: i64,
  pub level: i64,
  pub streak: i64,
  pub last_active: DateTime<Utc>,
  pub quizzes_taken: i64,
  pub interviews_given: i64,
  pub codes_submitted: i64,
  pub total_score: i64,
  pub badges: Vec<String>,
}

/// One quiz submission. Append-only; `analysis` is opaque model text.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuizAttempt {
  pub id: String,
  pub topic: String,
  pub score: i64,
  pub total: i64,
  pub analysis: String,
  pub timestamp: DateTime<Utc>,
}

/// One mock-interview submission. Append-only; `evaluation` is opaque model text.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InterviewRecord {
  pub id: String,
  pub question: String,
  pub transcript: String,
  pub evaluation: String,
  pub timestamp: DateTime<Utc>,
}

/// One code submission sent for AI review. Append-only.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CodeSubmission {
  pub id: String,
  pub code: String,
  pub language: String,
  pub problem: String,
  pub evaluation: String,
  pub timestamp: DateTime<Utc>,
}

/// Priority label on a recommendation. Presentation only, never used to sort.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub enum Priority {
  High,
  Medium,
  Low,
}

/// One entry in the `/recommendations` list.
#[derive(Clone, Debug, Serialize)]
pub struct Recommendation {
  pub title: String,
  pub description: String,
  pub priority: Priority,
  pub module: String,
}

/// Per-skill readiness scores derived from activity counters (0..=100 each).
/// Field order matters: ties in the weakest-skill scan resolve to the first
/// declared field.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct SkillScores {
  #[serde(rename = "Coding")]
  pub coding: i64,
  #[serde(rename = "Aptitude")]
  pub aptitude: i64,
  #[serde(rename = "Communication")]
  pub communication: i64,
}
