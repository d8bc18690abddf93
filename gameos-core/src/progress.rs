//! Experience, levels and activity counters.
//!
//! `total_xp` is the single source of truth for the player's level:
//! `level = floor(sqrt(total_xp / 100)) + 1`. XP is only ever added.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};

/// XP per "square" of the level curve.
pub const XP_PER_LEVEL_UNIT: u64 = 100;

/// Window used by the speed rule.
pub const ACTION_WINDOW_SECS: i64 = 60;

/// Compute the level for a total XP amount.
pub fn level_for_total_xp(total_xp: u64) -> u32 {
    (isqrt(total_xp / XP_PER_LEVEL_UNIT) + 1) as u32
}

/// Total XP at which `level` begins.
pub fn level_floor(level: u32) -> u64 {
    let base = u64::from(level.saturating_sub(1));
    base.saturating_mul(base).saturating_mul(XP_PER_LEVEL_UNIT)
}

fn isqrt(n: u64) -> u64 {
    if n < 2 {
        return n;
    }
    // Float estimate, then correct for rounding at the edges.
    let mut root = (n as f64).sqrt() as u64;
    while root.saturating_mul(root) > n {
        root -= 1;
    }
    while (root + 1).saturating_mul(root + 1) <= n {
        root += 1;
    }
    root
}

/// Position of the player inside their current level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelProgress {
    pub current_xp_in_level: u64,
    pub needed_xp_for_level: u64,
    pub percentage: f64,
}

/// Player progress: XP, level and per-category counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressModel {
    level: u32,
    xp: u64,
    total_xp: u64,

    pub files_created: u32,
    pub files_deleted: u32,
    pub directories_created: u32,
    pub directories_explored: BTreeSet<String>,
    pub processes_created: u32,
    pub processes_killed: u32,
    pub commands_executed: u32,
    pub achievements_unlocked: u32,
    pub missions_completed: u32,
    pub games_played: u32,
    pub login_streak: u32,
    pub challenge_streak: u32,
    /// Days on which every active mission was completed.
    pub perfect_days: u32,

    recent_actions: VecDeque<DateTime<Utc>>,
}

impl ProgressModel {
    pub fn new() -> Self {
        Self {
            level: 1,
            xp: 0,
            total_xp: 0,
            files_created: 0,
            files_deleted: 0,
            directories_created: 0,
            directories_explored: BTreeSet::new(),
            processes_created: 0,
            processes_killed: 0,
            commands_executed: 0,
            achievements_unlocked: 0,
            missions_completed: 0,
            games_played: 0,
            login_streak: 1,
            challenge_streak: 0,
            perfect_days: 0,
            recent_actions: VecDeque::new(),
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn xp(&self) -> u64 {
        self.xp
    }

    pub fn total_xp(&self) -> u64 {
        self.total_xp
    }

    /// Add XP and recompute the level.
    ///
    /// Returns true if the level increased.
    pub fn add_xp(&mut self, amount: u64) -> bool {
        self.xp = self.xp.saturating_add(amount);
        self.total_xp = self.total_xp.saturating_add(amount);

        let old_level = self.level;
        self.level = level_for_total_xp(self.total_xp).max(old_level);
        self.level > old_level
    }

    pub fn level_progress(&self) -> LevelProgress {
        let current_floor = level_floor(self.level);
        let next_floor = level_floor(self.level.saturating_add(1));

        let current_xp_in_level = self.total_xp.saturating_sub(current_floor);
        let needed_xp_for_level = next_floor.saturating_sub(current_floor);

        // (2*level - 1) * 100 is never zero for level >= 1.
        let percentage = if needed_xp_for_level == 0 {
            0.0
        } else {
            current_xp_in_level as f64 / needed_xp_for_level as f64 * 100.0
        };

        LevelProgress {
            current_xp_in_level,
            needed_xp_for_level,
            percentage,
        }
    }

    /// XP still missing before the next level.
    pub fn xp_to_next_level(&self) -> u64 {
        level_floor(self.level.saturating_add(1)).saturating_sub(self.total_xp)
    }

    pub fn directories_explored_count(&self) -> usize {
        self.directories_explored.len()
    }

    /// Record a game-tracked action at `now`, dropping entries older than the window.
    pub fn record_action(&mut self, now: DateTime<Utc>) {
        self.recent_actions.push_back(now);
        self.prune_actions(now);
    }

    /// Number of recorded actions inside the window ending at the latest action.
    pub fn actions_in_last_minute(&self) -> usize {
        self.recent_actions.len()
    }

    fn prune_actions(&mut self, now: DateTime<Utc>) {
        let cutoff = now - Duration::seconds(ACTION_WINDOW_SECS);
        while let Some(front) = self.recent_actions.front() {
            if *front < cutoff {
                self.recent_actions.pop_front();
            } else {
                break;
            }
        }
    }
}

impl Default for ProgressModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_formula() {
        assert_eq!(level_for_total_xp(0), 1);
        assert_eq!(level_for_total_xp(99), 1);
        assert_eq!(level_for_total_xp(100), 2);
        assert_eq!(level_for_total_xp(399), 2);
        assert_eq!(level_for_total_xp(400), 3);
        assert_eq!(level_for_total_xp(1600), 5);
        assert_eq!(level_for_total_xp(8100), 10);
        assert_eq!(level_for_total_xp(8099), 9);
    }

    #[test]
    fn test_add_xp_levels_up() {
        let mut progress = ProgressModel::new();
        assert!(!progress.add_xp(50));
        assert_eq!(progress.level(), 1);

        assert!(progress.add_xp(50));
        assert_eq!(progress.level(), 2);
        assert_eq!(progress.total_xp(), 100);
        assert_eq!(progress.xp(), 100);
    }

    #[test]
    fn test_add_zero_xp_is_noop() {
        let mut progress = ProgressModel::new();
        assert!(!progress.add_xp(0));
        assert_eq!(progress.total_xp(), 0);
        assert_eq!(progress.level(), 1);
    }

    #[test]
    fn test_level_invariant_over_sequence() {
        let mut progress = ProgressModel::new();
        let mut last_total = 0;
        for amount in [5, 10, 25, 2, 30, 20, 50, 300, 1000, 0, 7, 2000, 150] {
            progress.add_xp(amount);
            assert!(progress.total_xp() >= last_total);
            last_total = progress.total_xp();
            let expected = ((progress.total_xp() as f64 / 100.0).sqrt().floor() as u32) + 1;
            assert_eq!(progress.level(), expected);
        }
    }

    #[test]
    fn test_level_progress() {
        let mut progress = ProgressModel::new();
        progress.add_xp(150);
        let lp = progress.level_progress();
        // Level 2 spans 100..400
        assert_eq!(lp.current_xp_in_level, 50);
        assert_eq!(lp.needed_xp_for_level, 300);
        assert!((lp.percentage - 16.666).abs() < 0.01);
        assert_eq!(progress.xp_to_next_level(), 250);
    }

    #[test]
    fn test_max_xp_saturates() {
        let mut progress = ProgressModel::new();
        assert!(progress.add_xp(u64::MAX));
        progress.add_xp(1);
        assert_eq!(progress.total_xp(), u64::MAX);

        let lp = progress.level_progress();
        assert!(lp.needed_xp_for_level > 0);
        assert!(lp.percentage >= 0.0);
        assert_eq!(progress.xp_to_next_level(), 0);
    }

    #[test]
    fn test_level_progress_denominator_never_zero() {
        for level in 1..200u32 {
            assert!(level_floor(level + 1) > level_floor(level));
        }
    }

    #[test]
    fn test_action_window() {
        let mut progress = ProgressModel::new();
        let start = Utc::now();
        for i in 0..4 {
            progress.record_action(start + Duration::seconds(i * 10));
        }
        assert_eq!(progress.actions_in_last_minute(), 4);

        // Two minutes later only the new action remains.
        progress.record_action(start + Duration::seconds(150));
        assert_eq!(progress.actions_in_last_minute(), 1);
    }
}
