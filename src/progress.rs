//! XP / level / streak arithmetic for the progress tracker.
//!
//! The store persists whatever patch this module computes; all the arithmetic
//! lives here so it stays trivially testable without a database.
//!
//! Known quirk, kept on purpose: the streak increments on a 0-day gap as well
//! as a 1-day gap, so several updates on the same day each bump the streak.
//! Product owners have been flagged; do not "fix" silently.

use chrono::{DateTime, Utc};

use crate::domain::Progress;

/// Actions that move a per-activity counter. Anything else earns XP only.
pub const ACTION_QUIZ_COMPLETE: &str = "quiz_complete";
pub const ACTION_INTERVIEW_COMPLETE: &str = "interview_complete";
pub const ACTION_CODE_SUBMIT: &str = "code_submit";

const XP_PER_LEVEL: i64 = 500;

/// Field-level patch applied to the progress row in a single UPDATE.
/// `None` counters are left untouched by the store.
#[derive(Clone, Debug)]
pub struct ProgressPatch {
  pub xp: i64,
  pub level: i64,
  pub streak: i64,
  pub last_active: DateTime<Utc>,
  pub quizzes_taken: Option<i64>,
  pub interviews_given: Option<i64>,
  pub codes_submitted: Option<i64>,
}

/// Level is purely derived from cumulative XP.
pub fn level_for_xp(xp: i64) -> i64 {
  1 + xp / XP_PER_LEVEL
}

/// XP still missing until the next level boundary.
pub fn xp_to_next_level(xp: i64) -> i64 {
  XP_PER_LEVEL - xp % XP_PER_LEVEL
}

/// Streak rule: gap of at most one whole day extends the streak, anything
/// longer resets it to 1.
pub fn next_streak(prev_streak: i64, last_active: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
  if (now - last_active).num_days() <= 1 {
    prev_streak + 1
  } else {
    1
  }
}

/// Compute the patch for one `progress/update` call. Unknown actions update
/// no counter (accepted silently, per the wire contract's loose validation).
pub fn apply_update(current: &Progress, action: &str, xp_earned: i64, now: DateTime<Utc>) -> ProgressPatch {
  let xp = current.xp + xp_earned;
  let mut patch = ProgressPatch {
    xp,
    level: level_for_xp(xp),
    streak: next_streak(current.streak, current.last_active, now),
    last_active: now,
    quizzes_taken: None,
    interviews_given: None,
    codes_submitted: None,
  };

  match action {
    ACTION_QUIZ_COMPLETE => patch.quizzes_taken = Some(current.quizzes_taken + 1),
    ACTION_INTERVIEW_COMPLETE => patch.interviews_given = Some(current.interviews_given + 1),
    ACTION_CODE_SUBMIT => patch.codes_submitted = Some(current.codes_submitted + 1),
    _ => {}
  }

  patch
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Duration;

  fn fresh_progress(now: DateTime<Utc>) -> Progress {
    Progress {
      user: "default".into(),
      xp: 0,
      level: 1,
      streak: 0,
      last_active: now,
      quizzes_taken: 0,
      interviews_given: 0,
      codes_submitted: 0,
      total_score: 0,
      badges: vec![],
    }
  }

  #[test]
  fn level_tracks_xp_in_steps_of_500() {
    assert_eq!(level_for_xp(0), 1);
    assert_eq!(level_for_xp(499), 1);
    assert_eq!(level_for_xp(500), 2);
    assert_eq!(level_for_xp(999), 2);
    assert_eq!(level_for_xp(1000), 3);
    assert_eq!(level_for_xp(4999), 10);
  }

  #[test]
  fn two_quiz_updates_accumulate_xp_and_counter() {
    let now = Utc::now();
    let mut p = fresh_progress(now);

    for _ in 0..2 {
      let patch = apply_update(&p, ACTION_QUIZ_COMPLETE, 50, now);
      p.xp = patch.xp;
      p.level = patch.level;
      p.streak = patch.streak;
      p.last_active = patch.last_active;
      if let Some(q) = patch.quizzes_taken {
        p.quizzes_taken = q;
      }
    }

    assert_eq!(p.xp, 100);
    assert_eq!(p.level, 1);
    assert_eq!(p.quizzes_taken, 2);
  }

  #[test]
  fn same_day_updates_keep_incrementing() {
    // Documented quirk: a 0-day gap still counts as streak progress.
    let now = Utc::now();
    assert_eq!(next_streak(3, now, now), 4);
    assert_eq!(next_streak(4, now, now + Duration::hours(2)), 5);
  }

  #[test]
  fn next_day_extends_and_longer_gap_resets() {
    let now = Utc::now();
    assert_eq!(next_streak(5, now - Duration::days(1), now), 6);
    assert_eq!(next_streak(5, now - Duration::days(2), now), 1);
    assert_eq!(next_streak(5, now - Duration::days(30), now), 1);
  }

  #[test]
  fn unknown_action_moves_no_counter() {
    let now = Utc::now();
    let p = fresh_progress(now);
    let patch = apply_update(&p, "meditated", 25, now);
    assert_eq!(patch.xp, 25);
    assert!(patch.quizzes_taken.is_none());
    assert!(patch.interviews_given.is_none());
    assert!(patch.codes_submitted.is_none());
  }

  #[test]
  fn xp_to_next_level_wraps_at_boundaries() {
    assert_eq!(xp_to_next_level(0), 500);
    assert_eq!(xp_to_next_level(450), 50);
    assert_eq!(xp_to_next_level(500), 500);
  }
}
