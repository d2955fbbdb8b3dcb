//! Achievement progress bookkeeping and the claim-for-points transition.
//!
//! # Invariants
//! - `progress` stays within `[0, total]`.
//! - `completed` is exactly `progress >= total`.
//! - `claimed` implies `completed`; a claimed achievement is frozen at `total`.
//! - Claiming awards points at most once per achievement.

use crate::domain::{Achievement, AchievementId, Task};
use chrono::NaiveDate;

/// Result of a claim attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// Newly claimed; carries the points awarded
    Claimed { points: u32 },
    AlreadyClaimed,
    NotCompleted,
    Unknown,
}

impl ClaimOutcome {
    /// Points awarded by this attempt
    pub fn awarded(&self) -> u32 {
        match self {
            Self::Claimed { points } => *points,
            _ => 0,
        }
    }
}

/// Raw progress for one achievement before clamping
fn raw_progress(id: AchievementId, tasks: &[Task], pomodoro_completions: u32, today: NaiveDate) -> u32 {
    let count = |n: usize| u32::try_from(n).unwrap_or(u32::MAX);
    match id {
        AchievementId::FirstTask => u32::from(!tasks.is_empty()),
        AchievementId::TaskMaster => count(tasks.iter().filter(|t| t.completed).count()),
        AchievementId::ProductiveDay => count(tasks.iter().filter(|t| t.completed_on(today)).count()),
        AchievementId::PomodoroMaster => pomodoro_completions,
    }
}

/// Recompute progress for every achievement in place
pub fn recompute_in_place(achievements: &mut [Achievement], tasks: &[Task], pomodoro_completions: u32, today: NaiveDate) {
    for achievement in achievements.iter_mut() {
        if achievement.claimed {
            achievement.set_progress(achievement.total);
            continue;
        }
        achievement.set_progress(raw_progress(achievement.id, tasks, pomodoro_completions, today));
    }
}

/// Recompute progress from the current task list and pomodoro work completions.
///
/// `today` is the local calendar day used for `productive_day`.
pub fn recompute(achievements: &[Achievement], tasks: &[Task], pomodoro_completions: u32, today: NaiveDate) -> Vec<Achievement> {
    let mut updated = achievements.to_vec();
    recompute_in_place(&mut updated, tasks, pomodoro_completions, today);
    updated
}

/// Claim an achievement in place, returning what happened
pub fn claim_in_place(achievements: &mut [Achievement], id: AchievementId) -> ClaimOutcome {
    let Some(achievement) = achievements.iter_mut().find(|a| a.id == id) else {
        return ClaimOutcome::Unknown;
    };
    if achievement.claimed {
        return ClaimOutcome::AlreadyClaimed;
    }
    if !achievement.completed {
        return ClaimOutcome::NotCompleted;
    }
    achievement.claimed = true;
    ClaimOutcome::Claimed {
        points: achievement.points,
    }
}

/// Claim an achievement for points.
///
/// Only a completed, unclaimed achievement changes state; every other call
/// returns the input unchanged, so repeated claims never double-award.
pub fn claim(achievements: &[Achievement], id: AchievementId, current_points: u32) -> (Vec<Achievement>, u32) {
    let mut updated = achievements.to_vec();
    let outcome = claim_in_place(&mut updated, id);
    (updated, current_points.saturating_add(outcome.awarded()))
}

/// Achievements whose completion flipped from false to true between two snapshots
pub fn newly_completed<'a>(before: &[Achievement], after: &'a [Achievement]) -> Vec<&'a Achievement> {
    after
        .iter()
        .filter(|a| a.completed)
        .filter(|a| {
            before
                .iter()
                .find(|b| b.id == a.id)
                .map(|b| !b.completed)
                .unwrap_or(true)
        })
        .collect()
}
