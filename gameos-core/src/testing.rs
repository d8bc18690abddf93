//! Testing utilities for GameOS.
//!
//! This module provides tools for integration testing:
//! - `TestHarness` for deterministic, scripted sessions
//! - Assertion helpers for verifying progress state

use crate::missions::{template, Mission};
use crate::session::{FixedClock, GameSession, SessionConfig};
use crate::terminal::CommandOutput;

/// Seed used by every harness session.
pub const HARNESS_SEED: u64 = 0x6a3e;

/// Hour the harness clock is frozen at unless overridden. Outside both
/// time-of-day windows.
pub const HARNESS_HOUR: u32 = 12;

/// Test harness for running game scenarios.
pub struct TestHarness {
    pub session: GameSession,
}

impl TestHarness {
    /// A seeded session at noon with no active missions.
    pub fn new() -> Self {
        Self::build(SessionConfig::new("Test Player"), HARNESS_HOUR, &[])
    }

    /// A session whose active missions are exactly `ids`.
    pub fn with_missions(ids: &[&str]) -> Self {
        Self::build(SessionConfig::new("Test Player"), HARNESS_HOUR, ids)
    }

    /// A session with the clock frozen at `hour`.
    pub fn at_hour(hour: u32) -> Self {
        Self::build(SessionConfig::new("Test Player"), hour, &[])
    }

    /// A session from a custom config. Seed and clock are still pinned.
    pub fn with_config(config: SessionConfig) -> Self {
        Self::build(config, HARNESS_HOUR, &[])
    }

    fn build(config: SessionConfig, hour: u32, missions: &[&str]) -> Self {
        let config = config
            .with_seed(HARNESS_SEED)
            .with_clock(FixedClock::at_hour(hour));
        let missions = missions
            .iter()
            .filter_map(|id| template(id))
            .map(Mission::from_template)
            .collect();
        let session = match GameSession::new(config) {
            Ok(session) => session.with_missions(missions),
            Err(e) => panic!("harness session failed to start: {e}"),
        };
        Self { session }
    }

    /// Run one terminal line.
    pub fn input(&mut self, line: &str) -> CommandOutput {
        self.session.execute_command(line)
    }

    /// Run several terminal lines in order.
    pub fn script(&mut self, lines: &[&str]) -> &mut Self {
        for line in lines {
            self.session.execute_command(line);
        }
        self
    }

    /// Create `count` files named `{prefix}{i}.txt` under `dir`.
    pub fn create_files(&mut self, dir: &str, prefix: &str, count: usize) -> &mut Self {
        for i in 0..count {
            let path = format!("{dir}/{prefix}{i}.txt");
            if let Err(e) = self.session.create_file(&path, "") {
                panic!("create_file {path} failed: {e}");
            }
        }
        self
    }

    pub fn total_xp(&self) -> u64 {
        self.session.progress().total_xp()
    }

    pub fn level(&self) -> u32 {
        self.session.progress().level()
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.session.achievements().is_unlocked(id)
    }

    pub fn mission_progress(&self, id: &str) -> Option<(u32, bool)> {
        self.session
            .missions()
            .get(id)
            .map(|m| (m.progress, m.completed))
    }

    pub fn last_notification(&self) -> Option<&str> {
        self.session
            .latest_notification()
            .map(|n| n.message.as_str())
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

#[track_caller]
pub fn assert_unlocked(harness: &TestHarness, id: &str) {
    assert!(
        harness.is_unlocked(id),
        "Expected achievement '{id}' to be unlocked"
    );
}

#[track_caller]
pub fn assert_locked(harness: &TestHarness, id: &str) {
    assert!(
        !harness.is_unlocked(id),
        "Expected achievement '{id}' to still be locked"
    );
}

#[track_caller]
pub fn assert_total_xp(harness: &TestHarness, expected: u64) {
    assert_eq!(
        harness.total_xp(),
        expected,
        "Expected {expected} total XP, got {}",
        harness.total_xp()
    );
}

#[track_caller]
pub fn assert_level(harness: &TestHarness, expected: u32) {
    assert_eq!(
        harness.level(),
        expected,
        "Expected level {expected}, got {}",
        harness.level()
    );
}

/// Assert a mission's progress; `completed` is checked too.
#[track_caller]
pub fn assert_mission(harness: &TestHarness, id: &str, progress: u32, completed: bool) {
    assert_eq!(
        harness.mission_progress(id),
        Some((progress, completed)),
        "Unexpected state for mission '{id}'"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harness_starts_clean() {
        let harness = TestHarness::new();
        assert_total_xp(&harness, 0);
        assert_level(&harness, 1);
        assert_eq!(harness.session.missions().iter().count(), 0);
        assert!(harness.last_notification().is_none());
    }

    #[test]
    fn test_with_missions_ignores_unknown_ids() {
        let harness = TestHarness::with_missions(&["create_files", "nope"]);
        assert_eq!(harness.session.missions().iter().count(), 1);
        assert_mission(&harness, "create_files", 0, false);
    }

    #[test]
    fn test_script_and_input() {
        let mut harness = TestHarness::new();
        harness.script(&["pwd", "ls"]);
        assert_eq!(harness.session.progress().commands_executed, 2);
        assert_total_xp(&harness, 10);

        let out = harness.input("pwd");
        assert!(out.success);
    }

    #[test]
    fn test_create_files_helper() {
        let mut harness = TestHarness::with_missions(&["create_files"]);
        harness.create_files("/tmp", "f", 5);
        assert_eq!(harness.session.progress().files_created, 5);
        assert_mission(&harness, "create_files", 5, true);
        assert_unlocked(&harness, "first_steps");
        assert_locked(&harness, "productive");
    }
}
