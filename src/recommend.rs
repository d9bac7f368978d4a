//! Recommendation heuristic: six independent checks over current progress and
//! the most recent quiz attempts, evaluated in fixed order.
//!
//! Order is presentation only. Each entry carries its own priority field; the
//! list is never re-sorted by it.

use chrono::{DateTime, Utc};

use crate::domain::{Priority, Progress, QuizAttempt, Recommendation, SkillScores};

const ACCURACY_FLOOR: f64 = 0.6;
const INACTIVITY_DAYS: i64 = 3;
const NEAR_LEVEL_XP: i64 = 100;

/// Derive per-skill readiness scores from the activity counters.
pub fn skill_scores(progress: &Progress) -> SkillScores {
  SkillScores {
    coding: (progress.codes_submitted * 15).min(100),
    aptitude: (progress.quizzes_taken * 12).min(100),
    communication: (progress.interviews_given * 20).min(100),
  }
}

/// Weakest skill as `(label, module, score)`. Ties resolve to the first
/// declared skill (Coding, then Aptitude, then Communication) via strict `<`.
fn weakest_skill(scores: &SkillScores) -> (&'static str, &'static str, i64) {
  let ordered = [
    ("Coding", "coding", scores.coding),
    ("Aptitude", "aptitude", scores.aptitude),
    ("Communication", "communication", scores.communication),
  ];
  let mut weakest = ordered[0];
  for candidate in &ordered[1..] {
    if candidate.2 < weakest.2 {
      weakest = *candidate;
    }
  }
  weakest
}

/// Build the recommendation list. `recent_quizzes` is newest-first and capped
/// at 10 by the caller; if no rule fires, a single default entry is returned.
pub fn build_recommendations(
  progress: &Progress,
  recent_quizzes: &[QuizAttempt],
  now: DateTime<Utc>,
) -> (Vec<Recommendation>, SkillScores) {
  let scores = skill_scores(progress);
  let mut recommendations = Vec::new();

  // 1. Weakest skill below readiness threshold.
  let (label, module, score) = weakest_skill(&scores);
  if score < 50 {
    let description = match module {
      "coding" => "Solve 2 DSA problems in the Coding Arena today",
      "aptitude" => "Complete a Quantitative Aptitude quiz in Aptitude Gym",
      _ => "Take an AI Mock Interview in Comm Studio",
    };
    recommendations.push(Recommendation {
      title: format!("{label} Needs Attention"),
      description: description.into(),
      priority: Priority::High,
      module: module.into(),
    });
  }

  // 2. Accuracy drop on a recent quiz topic (newest low-scoring attempt wins).
  let low = recent_quizzes
    .iter()
    .find(|q| q.total > 0 && (q.score as f64) / (q.total as f64) < ACCURACY_FLOOR);
  if let Some(q) = low {
    recommendations.push(Recommendation {
      title: "Aptitude Accuracy Dropped".into(),
      description: format!("Attempt {} (Medium) Quiz Today", q.topic),
      priority: Priority::High,
      module: "aptitude".into(),
    });
  }

  // 3. Inactivity.
  let days_inactive = (now - progress.last_active).num_days();
  if days_inactive >= INACTIVITY_DAYS {
    recommendations.push(Recommendation {
      title: "You've Been Away".into(),
      description: format!(
        "You haven't practiced in {days_inactive} days. Start with a quick quiz to get back on track."
      ),
      priority: Priority::High,
      module: "aptitude".into(),
    });
  }

  // 4. Quizzing without interviewing.
  if progress.interviews_given == 0 && progress.quizzes_taken >= 2 {
    recommendations.push(Recommendation {
      title: "Try a Mock Interview".into(),
      description: "You've been doing quizzes. Time to test your communication skills with an AI interview."
        .into(),
      priority: Priority::Medium,
      module: "communication".into(),
    });
  }

  // 5. Started coding but not yet consistent.
  if progress.codes_submitted > 0 && progress.codes_submitted < 5 {
    recommendations.push(Recommendation {
      title: "Build Coding Consistency".into(),
      description: "Solve at least 1 DSA problem daily to maintain your streak and improve pattern recognition."
        .into(),
      priority: Priority::Medium,
      module: "coding".into(),
    });
  }

  // 6. Close to the next level boundary.
  let xp_to_next = crate::progress::xp_to_next_level(progress.xp);
  if xp_to_next <= NEAR_LEVEL_XP {
    recommendations.push(Recommendation {
      title: format!("Almost Level {}!", progress.level + 1),
      description: format!("Only {xp_to_next} XP away. Complete one more activity to level up."),
      priority: Priority::Low,
      module: "dashboard".into(),
    });
  }

  if recommendations.is_empty() {
    recommendations.push(Recommendation {
      title: "Keep Going!".into(),
      description: "Try a coding challenge or take a quiz to earn XP and level up.".into(),
      priority: Priority::Low,
      module: "dashboard".into(),
    });
  }

  (recommendations, scores)
}
