//! Startup configuration: environment-driven settings plus prompt templates.
//!
//! Everything is read once in `Config::from_env()` and handed to the
//! components explicitly; nothing reads ambient env vars after startup.
//! Prompts ship with built-in defaults and can be overridden from a TOML
//! file pointed at by PROMPT_CONFIG_PATH.

use serde::Deserialize;
use tracing::{error, info};

/// Process-wide configuration, constructed once in `main` and passed down.
#[derive(Clone, Debug)]
pub struct Config {
  pub port: u16,
  pub database_url: String,
  /// Generative-model credentials. `None` disables the AI gateway entirely.
  pub ai_api_key: Option<String>,
  pub ai_base_url: String,
  pub ai_model: String,
  /// Judge0 credentials. `None` switches `/code/execute` to AI simulation.
  pub judge_api_key: Option<String>,
  pub judge_url: String,
  /// Comma-separated origin list, or "*" for any origin.
  pub cors_origins: Vec<String>,
  pub prompts: Prompts,
}

impl Config {
  /// Load configuration from environment variables with defaults.
  ///
  /// | Env var            | Default                                                   |
  /// |--------------------|-----------------------------------------------------------|
  /// | PORT               | 3000                                                      |
  /// | DATABASE_URL       | sqlite://elevate.db?mode=rwc                              |
  /// | GEMINI_API_KEY     | unset (AI endpoints answer 502)                           |
  /// | AI_BASE_URL        | https://generativelanguage.googleapis.com/v1beta/openai   |
  /// | AI_MODEL           | gemini-2.5-flash                                          |
  /// | JUDGE0_API_KEY     | unset (execution is simulated)                            |
  /// | JUDGE0_URL         | https://judge0-ce.p.rapidapi.com/submissions              |
  /// | CORS_ORIGINS       | *                                                         |
  /// | PROMPT_CONFIG_PATH | unset (built-in prompts)                                  |
  pub fn from_env() -> Self {
    let port = std::env::var("PORT")
      .ok()
      .and_then(|p| p.parse::<u16>().ok())
      .unwrap_or(3000);

    let database_url = std::env::var("DATABASE_URL")
      .unwrap_or_else(|_| "sqlite://elevate.db?mode=rwc".into());

    let ai_api_key = std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty());
    let ai_base_url = std::env::var("AI_BASE_URL")
      .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta/openai".into());
    let ai_model = std::env::var("AI_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".into());

    let judge_api_key = std::env::var("JUDGE0_API_KEY").ok().filter(|k| !k.is_empty());
    let judge_url = std::env::var("JUDGE0_URL")
      .unwrap_or_else(|_| "https://judge0-ce.p.rapidapi.com/submissions".into());

    let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
      .unwrap_or_else(|_| "*".into())
      .split(',')
      .map(|s| s.trim().to_string())
      .filter(|s| !s.is_empty())
      .collect();

    let prompts = load_prompts_from_env().unwrap_or_default();

    Self {
      port,
      database_url,
      ai_api_key,
      ai_base_url,
      ai_model,
      judge_api_key,
      judge_url,
      cors_origins,
      prompts,
    }
  }
}

/// System instructions + user templates used by the AI gateway.
/// Defaults match the product voice; override any of them in TOML when tuning.
/// User templates use `{placeholder}` substitution (see `util::fill_template`).
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  pub code_eval_system: String,
  pub code_eval_user_template: String,
  pub exec_simulate_system: String,
  pub exec_simulate_user_template: String,
  pub quiz_generate_system: String,
  pub quiz_generate_user_template: String,
  pub quiz_analysis_system: String,
  pub quiz_analysis_user_template: String,
  pub interview_eval_system: String,
  pub interview_eval_user_template: String,
  pub interview_questions_system: String,
  pub interview_questions_user: String,
  pub communication_tips_system: String,
  pub communication_tips_user: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      code_eval_system: r#"You are Elevate AI — a coding evaluator for placement readiness.
Be direct, analytical. Avoid motivational fluff.
When given code, you must:
1. Analyze correctness
2. Evaluate time & space complexity
3. Identify edge cases
4. Suggest improvements
5. Give scores out of 10: Logic, Optimization, Code Quality
6. Provide a short improvement roadmap
Respond in structured JSON format:
{
  "correctness": "...",
  "time_complexity": "...",
  "space_complexity": "...",
  "edge_cases": ["..."],
  "improvements": ["..."],
  "scores": {"logic": X, "optimization": X, "code_quality": X},
  "roadmap": "..."
}"#.into(),
      code_eval_user_template:
        "Problem: {problem}\nExpected: {expected}\nLanguage: {language}\nCode:\n```\n{code}\n```".into(),
      exec_simulate_system: r#"You are a code execution simulator. Execute the given code mentally and return the output.
Respond ONLY in JSON: {"stdout": "...", "stderr": "", "status": {"description": "Accepted"}, "time": "0.01", "memory": 256}
If there's an error, put it in stderr and set status description to "Runtime Error" or "Compilation Error"."#.into(),
      exec_simulate_user_template:
        "Language ID: {language_id}\nStdin: {stdin}\nCode:\n```\n{code}\n```".into(),
      quiz_generate_system: r#"You are an aptitude quiz generator for placement readiness.
Generate exactly 10 multiple choice questions on the given topic.
Respond in JSON array format:
[{"question": "...", "options": ["A", "B", "C", "D"], "correct": 0, "explanation": "..."}]
where correct is the 0-based index of the correct option.
Questions should be placement-level difficulty."#.into(),
      quiz_generate_user_template: "Generate 10 MCQ questions on: {topic}".into(),
      quiz_analysis_system: r#"You are Elevate AI — an aptitude performance analyzer.
When given quiz results, you must:
1. Identify weak concepts
2. Suggest specific topics to revise
3. Recommend practice intensity (Low/Medium/High)
4. Provide a readiness score out of 100
5. Suggest next logical topic
Respond in JSON:
{"weak_concepts": [...], "topics_to_revise": [...], "practice_intensity": "...", "readiness_score": X, "next_topic": "..."}"#.into(),
      quiz_analysis_user_template:
        "Topic: {topic}\nScore: {score}/{total}\nWeak areas: User got {wrong} wrong".into(),
      interview_eval_system: r#"You are Elevate AI — a communication & interview coach.
When given an interview response, you must:
1. Evaluate clarity, confidence, structure
2. Detect overused filler words
3. Suggest improvements
4. Give scores: Clarity (/10), Confidence (/10), Professionalism (/10)
5. Provide a refined improved sample answer
Respond in JSON:
{"clarity_score": X, "confidence_score": X, "professionalism_score": X, "feedback": "...", "filler_analysis": "...", "improvements": [...], "sample_answer": "..."}"#.into(),
      interview_eval_user_template:
        "Question: {question}\nTranscript: {transcript}\nFiller words detected: {filler_words}\nSpeech speed: {speech_speed}".into(),
      interview_questions_system:
        "You are an interview question generator. Generate 5 common placement interview questions. Respond as JSON array of strings.".into(),
      interview_questions_user:
        "Generate 5 common placement interview questions covering HR, technical, and behavioral topics".into(),
      communication_tips_system: r#"You are a professional communication coach. Provide structured communication tips for interview success.
Respond in JSON:
{"tips": [{"title": "...", "description": "...", "practice": "..."}], "filler_words_to_avoid": [...], "body_language_tips": [...]}"#.into(),
      communication_tips_user: "Give me 5 key communication tips for placement interviews".into(),
    }
  }
}

/// Attempt to load `Prompts` from PROMPT_CONFIG_PATH. On any parsing/IO error, returns None.
fn load_prompts_from_env() -> Option<Prompts> {
  let path = std::env::var("PROMPT_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<Prompts>(&s) {
      Ok(p) => {
        info!(target: "elevate_backend", %path, "Loaded prompt config (TOML)");
        Some(p)
      }
      Err(e) => {
        error!(target: "elevate_backend", %path, error = %e, "Failed to parse TOML prompt config");
        None
      }
    },
    Err(e) => {
      error!(target: "elevate_backend", %path, error = %e, "Failed to read TOML prompt config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn prompt_override_keeps_defaults_for_missing_keys() {
    let p: Prompts = toml::from_str(r#"quiz_generate_user_template = "Quiz me on: {topic}""#)
      .expect("partial TOML should deserialize");
    assert_eq!(p.quiz_generate_user_template, "Quiz me on: {topic}");
    assert!(p.code_eval_system.contains("coding evaluator"));
  }
}
