//! Activity store backed by sqlx/SQLite.
//!
//! Collections:
//!   - users: one row per email, immutable after insert
//!   - progress: a single mutable row keyed `user = 'default'`
//!   - quiz_attempts / interviews / code_submissions: append-only history
//!
//! The model-produced `analysis` / `evaluation` columns are opaque TEXT; the
//! store never inspects them. There is no concurrency control on the progress
//! row: last write wins, acceptable while there is one logical user.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};
use tracing::{info, instrument};

use crate::domain::{CodeSubmission, InterviewRecord, Progress, QuizAttempt, User};
use crate::progress::ProgressPatch;

const DEFAULT_USER: &str = "default";

/// Most records a history endpoint will ever return.
pub const HISTORY_LIMIT: i64 = 50;

#[derive(Clone)]
pub struct Store {
  pool: SqlitePool,
}

impl Store {
  /// Connect and create the schema if it is not there yet.
  #[instrument(level = "info", skip(database_url))]
  pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
    // A pooled ":memory:" database would give every connection its own empty DB.
    let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
    let pool = SqlitePoolOptions::new()
      .max_connections(max_connections)
      .connect(database_url)
      .await?;

    let store = Self { pool };
    store.migrate().await?;
    info!(target: "elevate_backend", "Activity store ready");
    Ok(store)
  }

  async fn migrate(&self) -> Result<(), sqlx::Error> {
    const SCHEMA: &[&str] = &[
      "CREATE TABLE IF NOT EXISTS users (
        user_id    TEXT PRIMARY KEY,
        name       TEXT NOT NULL,
        email      TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL
      )",
      "CREATE TABLE IF NOT EXISTS progress (
        user             TEXT PRIMARY KEY,
        xp               INTEGER NOT NULL,
        level            INTEGER NOT NULL,
        streak           INTEGER NOT NULL,
        last_active      TEXT NOT NULL,
        quizzes_taken    INTEGER NOT NULL,
        interviews_given INTEGER NOT NULL,
        codes_submitted  INTEGER NOT NULL,
        total_score      INTEGER NOT NULL,
        badges           TEXT NOT NULL
      )",
      "CREATE TABLE IF NOT EXISTS quiz_attempts (
        id        TEXT PRIMARY KEY,
        topic     TEXT NOT NULL,
        score     INTEGER NOT NULL,
        total     INTEGER NOT NULL,
        analysis  TEXT NOT NULL,
        timestamp TEXT NOT NULL
      )",
      "CREATE TABLE IF NOT EXISTS interviews (
        id         TEXT PRIMARY KEY,
        question   TEXT NOT NULL,
        transcript TEXT NOT NULL,
        evaluation TEXT NOT NULL,
        timestamp  TEXT NOT NULL
      )",
      "CREATE TABLE IF NOT EXISTS code_submissions (
        id         TEXT PRIMARY KEY,
        code       TEXT NOT NULL,
        language   TEXT NOT NULL,
        problem    TEXT NOT NULL,
        evaluation TEXT NOT NULL,
        timestamp  TEXT NOT NULL
      )",
    ];

    for stmt in SCHEMA {
      sqlx::query(stmt).execute(&self.pool).await?;
    }
    Ok(())
  }

  // --- Users ---

  #[instrument(level = "debug", skip(self))]
  pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query("SELECT user_id, name, email, created_at FROM users WHERE email = ?")
      .bind(email)
      .fetch_optional(&self.pool)
      .await?;
    Ok(row.map(|r| User {
      user_id: r.get("user_id"),
      name: r.get("name"),
      email: r.get("email"),
      created_at: r.get("created_at"),
    }))
  }

  #[instrument(level = "debug", skip(self, user), fields(user_id = %user.user_id))]
  pub async fn insert_user(&self, user: &User) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO users (user_id, name, email, created_at) VALUES (?, ?, ?, ?)")
      .bind(&user.user_id)
      .bind(&user.name)
      .bind(&user.email)
      .bind(user.created_at)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  // --- Progress ---

  /// Return the single progress row, inserting a zeroed one on first access.
  #[instrument(level = "debug", skip(self))]
  pub async fn get_or_create_progress(&self, now: DateTime<Utc>) -> Result<Progress, sqlx::Error> {
    if let Some(p) = self.fetch_progress().await? {
      return Ok(p);
    }

    let fresh = Progress {
      user: DEFAULT_USER.into(),
      xp: 0,
      level: 1,
      streak: 0,
      last_active: now,
      quizzes_taken: 0,
      interviews_given: 0,
      codes_submitted: 0,
      total_score: 0,
      badges: vec![],
    };
    sqlx::query(
      "INSERT INTO progress (user, xp, level, streak, last_active, quizzes_taken, \
       interviews_given, codes_submitted, total_score, badges) \
       VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&fresh.user)
    .bind(fresh.xp)
    .bind(fresh.level)
    .bind(fresh.streak)
    .bind(fresh.last_active)
    .bind(fresh.quizzes_taken)
    .bind(fresh.interviews_given)
    .bind(fresh.codes_submitted)
    .bind(fresh.total_score)
    .bind("[]")
    .execute(&self.pool)
    .await?;
    info!(target: "progress", "Created default progress row");
    Ok(fresh)
  }

  async fn fetch_progress(&self) -> Result<Option<Progress>, sqlx::Error> {
    let row = sqlx::query("SELECT * FROM progress WHERE user = ?")
      .bind(DEFAULT_USER)
      .fetch_optional(&self.pool)
      .await?;
    Ok(row.map(|r| {
      let badges: String = r.get("badges");
      Progress {
        user: r.get("user"),
        xp: r.get("xp"),
        level: r.get("level"),
        streak: r.get("streak"),
        last_active: r.get("last_active"),
        quizzes_taken: r.get("quizzes_taken"),
        interviews_given: r.get("interviews_given"),
        codes_submitted: r.get("codes_submitted"),
        total_score: r.get("total_score"),
        badges: serde_json::from_str(&badges).unwrap_or_default(),
      }
    }))
  }

  /// Apply a field-level patch in one UPDATE, then return the row as stored.
  /// `None` counters stay untouched (COALESCE keeps the current value).
  #[instrument(level = "debug", skip(self, patch), fields(xp = patch.xp, level = patch.level))]
  pub async fn update_progress(&self, patch: &ProgressPatch) -> Result<Progress, sqlx::Error> {
    sqlx::query(
      "UPDATE progress SET xp = ?, level = ?, streak = ?, last_active = ?, \
       quizzes_taken = COALESCE(?, quizzes_taken), \
       interviews_given = COALESCE(?, interviews_given), \
       codes_submitted = COALESCE(?, codes_submitted) \
       WHERE user = ?",
    )
    .bind(patch.xp)
    .bind(patch.level)
    .bind(patch.streak)
    .bind(patch.last_active)
    .bind(patch.quizzes_taken)
    .bind(patch.interviews_given)
    .bind(patch.codes_submitted)
    .bind(DEFAULT_USER)
    .execute(&self.pool)
    .await?;

    self.fetch_progress().await?.ok_or(sqlx::Error::RowNotFound)
  }

  // --- History (append-only) ---

  #[instrument(level = "debug", skip(self, rec), fields(id = %rec.id, topic = %rec.topic))]
  pub async fn insert_quiz_attempt(&self, rec: &QuizAttempt) -> Result<(), sqlx::Error> {
    sqlx::query(
      "INSERT INTO quiz_attempts (id, topic, score, total, analysis, timestamp) \
       VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&rec.id)
    .bind(&rec.topic)
    .bind(rec.score)
    .bind(rec.total)
    .bind(&rec.analysis)
    .bind(rec.timestamp)
    .execute(&self.pool)
    .await?;
    Ok(())
  }

  #[instrument(level = "debug", skip(self, rec), fields(id = %rec.id))]
  pub async fn insert_interview(&self, rec: &InterviewRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
      "INSERT INTO interviews (id, question, transcript, evaluation, timestamp) \
       VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&rec.id)
    .bind(&rec.question)
    .bind(&rec.transcript)
    .bind(&rec.evaluation)
    .bind(rec.timestamp)
    .execute(&self.pool)
    .await?;
    Ok(())
  }

  #[instrument(level = "debug", skip(self, rec), fields(id = %rec.id, language = %rec.language))]
  pub async fn insert_code_submission(&self, rec: &CodeSubmission) -> Result<(), sqlx::Error> {
    sqlx::query(
      "INSERT INTO code_submissions (id, code, language, problem, evaluation, timestamp) \
       VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&rec.id)
    .bind(&rec.code)
    .bind(&rec.language)
    .bind(&rec.problem)
    .bind(&rec.evaluation)
    .bind(rec.timestamp)
    .execute(&self.pool)
    .await?;
    Ok(())
  }

  #[instrument(level = "debug", skip(self))]
  pub async fn recent_quiz_attempts(&self, limit: i64) -> Result<Vec<QuizAttempt>, sqlx::Error> {
    let rows = sqlx::query(
      "SELECT id, topic, score, total, analysis, timestamp FROM quiz_attempts \
       ORDER BY timestamp DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(&self.pool)
    .await?;
    Ok(
      rows
        .into_iter()
        .map(|r| QuizAttempt {
          id: r.get("id"),
          topic: r.get("topic"),
          score: r.get("score"),
          total: r.get("total"),
          analysis: r.get("analysis"),
          timestamp: r.get("timestamp"),
        })
        .collect(),
    )
  }

  #[instrument(level = "debug", skip(self))]
  pub async fn recent_interviews(&self, limit: i64) -> Result<Vec<InterviewRecord>, sqlx::Error> {
    let rows = sqlx::query(
      "SELECT id, question, transcript, evaluation, timestamp FROM interviews \
       ORDER BY timestamp DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(&self.pool)
    .await?;
    Ok(
      rows
        .into_iter()
        .map(|r| InterviewRecord {
          id: r.get("id"),
          question: r.get("question"),
          transcript: r.get("transcript"),
          evaluation: r.get("evaluation"),
          timestamp: r.get("timestamp"),
        })
        .collect(),
    )
  }

  #[instrument(level = "debug", skip(self))]
  pub async fn recent_code_submissions(
    &self,
    limit: i64,
  ) -> Result<Vec<CodeSubmission>, sqlx::Error> {
    let rows = sqlx::query(
      "SELECT id, code, language, problem, evaluation, timestamp FROM code_submissions \
       ORDER BY timestamp DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(&self.pool)
    .await?;
    Ok(
      rows
        .into_iter()
        .map(|r| CodeSubmission {
          id: r.get("id"),
          code: r.get("code"),
          language: r.get("language"),
          problem: r.get("problem"),
          evaluation: r.get("evaluation"),
          timestamp: r.get("timestamp"),
        })
        .collect(),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::progress::apply_update;
  use chrono::Duration;
  use uuid::Uuid;

  async fn memory_store() -> Store {
    Store::connect("sqlite::memory:").await.expect("in-memory store")
  }

  #[tokio::test]
  async fn progress_row_is_created_once() {
    let store = memory_store().await;
    let now = Utc::now();
    let first = store.get_or_create_progress(now).await.unwrap();
    assert_eq!(first.xp, 0);
    assert_eq!(first.level, 1);
    assert_eq!(first.streak, 0);

    let later = now + Duration::hours(5);
    let second = store.get_or_create_progress(later).await.unwrap();
    // Second read must not re-seed last_active.
    assert!((second.last_active - first.last_active).num_seconds().abs() < 1);
  }

  #[tokio::test]
  async fn update_persists_patch_and_counter() {
    let store = memory_store().await;
    let now = Utc::now();
    let mut p = store.get_or_create_progress(now).await.unwrap();

    for _ in 0..2 {
      let patch = apply_update(&p, "quiz_complete", 50, now);
      p = store.update_progress(&patch).await.unwrap();
    }

    assert_eq!(p.xp, 100);
    assert_eq!(p.level, 1);
    assert_eq!(p.quizzes_taken, 2);
    assert_eq!(p.interviews_given, 0);
  }

  #[tokio::test]
  async fn quiz_history_caps_at_limit_newest_first() {
    let store = memory_store().await;
    let base = Utc::now();

    for i in 0..55 {
      let rec = QuizAttempt {
        id: Uuid::new_v4().to_string(),
        topic: format!("topic-{i}"),
        score: 5,
        total: 10,
        analysis: "{}".into(),
        timestamp: base + Duration::seconds(i),
      };
      store.insert_quiz_attempt(&rec).await.unwrap();
    }

    let recent = store.recent_quiz_attempts(HISTORY_LIMIT).await.unwrap();
    assert_eq!(recent.len(), 50);
    assert_eq!(recent[0].topic, "topic-54");
    assert_eq!(recent[49].topic, "topic-5");
  }

  #[tokio::test]
  async fn users_are_unique_by_email() {
    let store = memory_store().await;
    let user = User {
      user_id: Uuid::new_v4().to_string(),
      name: "Asha".into(),
      email: "asha@example.com".into(),
      created_at: Utc::now(),
    };
    store.insert_user(&user).await.unwrap();

    let found = store.find_user_by_email("asha@example.com").await.unwrap();
    assert_eq!(found.map(|u| u.user_id), Some(user.user_id.clone()));

    let dup = User { user_id: Uuid::new_v4().to_string(), ..user };
    assert!(store.insert_user(&dup).await.is_err());
  }
}
