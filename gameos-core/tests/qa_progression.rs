//! QA tests for XP, achievements and missions.
//!
//! These tests drive whole sessions and check the reward chain end to end:
//! - The level curve and XP monotonicity
//! - Achievement idempotency and the meta achievement
//! - Mission progress, completion bonuses and daily rotation

use gameos_core::missions::{template, ACTIVE_MISSIONS};
use gameos_core::testing::{
    assert_level, assert_locked, assert_mission, assert_total_xp, assert_unlocked, TestHarness,
};
use gameos_core::{FixedClock, GameSession, Mission, NotificationKind, SessionConfig};
use std::collections::HashSet;

fn expected_level(total_xp: u64) -> u32 {
    ((total_xp as f64 / 100.0).sqrt().floor() as u32) + 1
}

// =============================================================================
// EXAMPLE SCENARIO
// =============================================================================

#[test]
fn test_first_file_scenario() {
    let mut harness = TestHarness::with_missions(&["create_files", "organize_files"]);

    harness
        .session
        .create_file("/home/player/a.txt", "")
        .unwrap();

    assert_eq!(harness.session.progress().files_created, 1);
    assert!(harness.total_xp() >= 10);
    assert_unlocked(&harness, "first_steps");
    assert_mission(&harness, "create_files", 1, false);
    assert_mission(&harness, "organize_files", 0, false);
}

#[test]
fn test_first_file_scenario_with_random_missions() {
    let mut session = GameSession::new(
        SessionConfig::new("random")
            .with_seed(2024)
            .with_clock(FixedClock::at_hour(12)),
    )
    .unwrap();
    let before = session.missions().get("create_files").map(|m| m.progress);

    session.create_file("/home/player/a.txt", "").unwrap();

    assert_eq!(session.progress().files_created, 1);
    assert!(session.progress().total_xp() >= 10);
    assert!(session.achievements().is_unlocked("first_steps"));
    let after = session.missions().get("create_files").map(|m| m.progress);
    assert_eq!(after, before.map(|p| p + 1));
}

// =============================================================================
// XP AND LEVELS
// =============================================================================

#[test]
fn test_add_xp_keeps_level_invariant() {
    let mut harness = TestHarness::new();
    let mut last = 0;

    for amount in [0, 5, 95, 250, 1, 1249, 3000, 40, 10_000] {
        harness.session.add_xp(amount);
        let total = harness.total_xp();
        assert!(total >= last, "total XP went down: {last} -> {total}");
        assert_eq!(harness.level(), expected_level(total));
        last = total;
    }
}

#[test]
fn test_level_up_notification() {
    let mut harness = TestHarness::new();
    let outcome = harness.session.add_xp(100);

    assert!(outcome.leveled_up);
    assert_level(&harness, 2);
    let note = harness.session.latest_notification().unwrap();
    assert_eq!(note.message, "🎉 LEVEL UP! Now Level 2!");
    assert_eq!(note.kind, NotificationKind::LevelUp);
}

#[test]
fn test_level_achievements_unlock_on_level_up() {
    let mut harness = TestHarness::new();
    // 1600 XP is level 5; system_admin adds 1000 more.
    let outcome = harness.session.add_xp(1600);

    assert_eq!(outcome.unlocked, vec!["system_admin"]);
    assert_unlocked(&harness, "system_admin");
    assert_locked(&harness, "master_admin");
    assert_total_xp(&harness, 2600);
    assert_level(&harness, 6);
}

// =============================================================================
// ACHIEVEMENTS
// =============================================================================

#[test]
fn test_check_achievement_is_idempotent() {
    let mut harness = TestHarness::new();
    harness.session.create_file("/tmp/a", "").unwrap();
    assert_unlocked(&harness, "first_steps");
    let xp = harness.total_xp();
    let unlocked = harness.session.progress().achievements_unlocked;

    let outcome = harness.session.check_achievement("first_steps");

    assert!(outcome.is_empty());
    assert_total_xp(&harness, xp);
    assert_eq!(harness.session.progress().achievements_unlocked, unlocked);
}

#[test]
fn test_achievement_notification_text() {
    let mut harness = TestHarness::new();
    harness.session.make_directory("/tmp/d").unwrap();

    let note = harness.last_notification().unwrap();
    assert_eq!(note, "🏆 Achievement Unlocked: Builder (+50 XP)");
}

#[test]
fn test_achievement_with_level_up_suffix() {
    let mut harness = TestHarness::new();
    // 20 + 30 for the process, then taskmaster crosses 100.
    harness.session.add_xp(20);
    harness.session.create_process("worker", "/bin/worker");

    let messages: Vec<_> = harness
        .session
        .notifications()
        .iter()
        .map(|n| n.message.clone())
        .collect();
    assert!(messages
        .iter()
        .any(|m| m == "🏆 Achievement Unlocked: Taskmaster (+75 XP) 🎉 LEVEL UP! Now Level 2!"));
}

#[test]
fn test_legendary_unlocks_with_fifteenth_achievement() {
    let mut harness = TestHarness::with_config(SessionConfig::new("legend").with_login_streak(5));

    let check = |harness: &TestHarness| {
        let others = harness
            .session
            .achievements()
            .iter()
            .filter(|a| a.unlocked && a.id != "legendary")
            .count();
        if others >= 15 {
            assert_unlocked(harness, "legendary");
        } else {
            assert_locked(harness, "legendary");
        }
    };

    harness.session.tick(); // dedication
    check(&harness);
    harness.session.add_xp(8100); // system_admin, master_admin
    check(&harness);

    harness.create_files("/tmp", "f", 10); // first_steps, speed_demon, productive
    check(&harness);

    for i in 0..5 {
        harness.session.make_directory(&format!("/tmp/d{i}")).unwrap();
    } // builder, architect
    check(&harness);

    for i in 0..4 {
        harness.session.create_process(&format!("p{i}"), "x");
    } // taskmaster, multitasker
    check(&harness);

    for game in ["snake", "puzzle", "speed", "memory", "snake"] {
        harness.session.play_game(game).unwrap();
    } // gamer
    check(&harness);

    for i in 0..10 {
        harness.session.remove(&format!("/tmp/f{i}.txt")).unwrap();
    } // cleaner
    check(&harness);

    for dir in gameos_core::fs::DEFAULT_DIRECTORIES.iter().chain(["/"].iter()) {
        harness.session.change_directory(dir).unwrap();
    } // explorer
    check(&harness);
    assert_eq!(harness.session.achievements().unlocked_count(), 13);

    for _ in 0..100 {
        harness.input("pwd");
        check(&harness);
    } // terminal_rookie, terminal_expert, legendary

    assert_unlocked(&harness, "legendary");
    assert_eq!(harness.session.progress().achievements_unlocked, 16);
}

#[test]
fn test_time_of_day_uses_injected_clock() {
    let mut early = TestHarness::at_hour(6);
    early.session.tick();
    assert_unlocked(&early, "early_bird");
    assert_locked(&early, "night_owl");

    let mut noon = TestHarness::new();
    assert!(noon.session.tick().is_empty());
}

// =============================================================================
// MISSIONS
// =============================================================================

#[test]
fn test_mission_progress_clamps_at_target() {
    let mut harness = TestHarness::with_missions(&["organize_files"]);
    let outcome = harness.session.advance_mission("organize_files", 50);

    assert_eq!(outcome.completed, vec!["organize_files"]);
    assert_mission(&harness, "organize_files", 3, true);

    let again = harness.session.advance_mission("organize_files", 1);
    assert!(again.completed.is_empty());
    assert_mission(&harness, "organize_files", 3, true);
    assert_eq!(harness.session.progress().missions_completed, 1);
}

#[test]
fn test_mission_completion_chain() {
    let mut harness = TestHarness::with_missions(&["memory_manager"]);
    let out = harness.input("top");
    assert!(out.success);

    // 5 command + 10 monitor + 200 mission + 400 efficiency
    assert_total_xp(&harness, 615);
    assert_level(&harness, 3);
    assert_mission(&harness, "memory_manager", 1, true);
    assert_eq!(harness.session.progress().perfect_days, 1);
    assert_unlocked(&harness, "efficiency");
    assert_eq!(out.outcome.completed, vec!["memory_manager"]);

    let messages: Vec<_> = harness
        .session
        .notifications()
        .iter()
        .map(|n| n.message.clone())
        .collect();
    assert!(messages
        .iter()
        .any(|m| m.starts_with("✅ Mission Complete: Memory Manager (+200 XP)")));
}

#[test]
fn test_tasks_advance_efficiency_test() {
    let mut harness = TestHarness::with_missions(&["efficiency_test"]);
    harness.session.create_file("/tmp/a", "").unwrap();
    harness.session.make_directory("/tmp/b").unwrap();
    let (pid, _) = harness.session.create_process("p", "p");
    harness.session.kill_process(pid).unwrap();
    harness.session.remove("/tmp/a").unwrap();
    // Not tasks: directory removal and navigation.
    harness.session.remove("/tmp/b").unwrap();
    harness.session.change_directory("/tmp").unwrap();

    assert_mission(&harness, "efficiency_test", 5, false);
}

#[test]
fn test_shared_trigger_advances_both_missions() {
    let missions = ["create_files", "backup_task"]
        .iter()
        .map(|id| Mission::from_template(template(id).unwrap()))
        .collect();
    let mut session = GameSession::new(
        SessionConfig::new("backup")
            .with_seed(3)
            .with_clock(FixedClock::at_hour(12)),
    )
    .unwrap()
    .with_missions(missions);

    session.create_file("/tmp/x", "").unwrap();
    assert_eq!(session.missions().get("create_files").unwrap().progress, 1);
    assert_eq!(session.missions().get("backup_task").unwrap().progress, 1);
}

#[test]
fn test_regenerated_missions_are_distinct() {
    let mut harness = TestHarness::new();
    for _ in 0..25 {
        harness.session.regenerate_missions();
        let ids: HashSet<_> = harness
            .session
            .missions()
            .iter()
            .map(|m| m.id.clone())
            .collect();
        assert_eq!(ids.len(), ACTIVE_MISSIONS);
        assert_eq!(harness.session.missions().open_count(), ACTIVE_MISSIONS);
    }
    assert_eq!(
        harness.last_notification(),
        Some("🎯 New daily missions generated!")
    );
}
