//! QA tests for the terminal and the headless driver.
//!
//! Every test here goes through text commands, the way a front-end would.

use gameos_core::headless::HeadlessGame;
use gameos_core::notifications::MAX_NOTIFICATIONS;
use gameos_core::testing::{assert_total_xp, assert_unlocked, TestHarness};
use gameos_core::{FixedClock, GameSession, SessionConfig};

fn headless() -> HeadlessGame {
    let session = GameSession::new(
        SessionConfig::new("Runner")
            .with_seed(77)
            .with_clock(FixedClock::at_hour(12)),
    )
    .unwrap()
    .with_missions(Vec::new());
    HeadlessGame::from_session(session)
}

// =============================================================================
// COMMAND REWARDS
// =============================================================================

#[test]
fn test_every_line_earns_command_bonus() {
    let mut harness = TestHarness::new();
    harness.script(&["help", "pwd", "nonsense", "cat /missing"]);
    assert_eq!(harness.session.progress().commands_executed, 4);
    assert_total_xp(&harness, 20);
}

#[test]
fn test_unknown_command_message() {
    let mut game = headless();
    let response = game.send("dance");
    assert!(!response.success);
    assert_eq!(
        response.output,
        "❌ dance: command not found (but you still got +5 XP!)"
    );
    assert_eq!(response.xp_gained, 5);
}

#[test]
fn test_mkdir_touch_rm_via_terminal() {
    let mut game = headless();
    assert!(game.send("mkdir /tmp/proj").success);
    assert!(game.send("cd /tmp/proj").success);
    assert!(game.send("touch notes.txt").success);
    assert!(game.session().resolve("/tmp/proj/notes.txt").is_some());

    let response = game.send("rm notes.txt");
    assert!(response.success);
    assert!(response.output.contains("+5 XP"));

    let progress = game.session().progress();
    assert_eq!(progress.directories_created, 1);
    assert_eq!(progress.files_created, 1);
    assert_eq!(progress.files_deleted, 1);
}

#[test]
fn test_ls_marks_directories() {
    let mut game = headless();
    game.send("cd /home/player");
    let response = game.send("ls");
    assert!(response.output.contains("📁 Documents"));
    assert!(response.output.contains("📄 welcome.txt"));
}

#[test]
fn test_kill_via_terminal() {
    let mut game = headless();
    let (pid, _) = game.session_mut().create_process("daemon", "/usr/bin/daemon");

    let response = game.send(&format!("kill {pid}"));
    assert!(response.success);
    assert!(game.send(&format!("kill {pid}")).output.contains("already terminated"));
}

#[test]
fn test_stats_and_level_output() {
    let mut game = headless();
    let stats = game.send("stats");
    assert!(stats.output.contains("Commands Executed: 1"));
    let level = game.send("level");
    assert!(level.output.contains("Current Level: 1"));
    assert!(level.output.contains('░'));
}

#[test]
fn test_achievements_and_missions_listings() {
    let mut harness = TestHarness::with_missions(&["terminal_warrior"]);
    let out = harness.input("achievements");
    assert!(out.output.starts_with("🏆 Achievements (0/20)"));
    assert_eq!(out.output.lines().count(), 21);

    let out = harness.input("missions");
    assert!(out.output.contains("Terminal Warrior [Medium]"));
    assert!(out.output.contains("2/20"));
}

#[test]
fn test_terminal_warrior_completes_after_twenty_commands() {
    let mut harness = TestHarness::with_missions(&["terminal_warrior"]);
    for _ in 0..20 {
        harness.input("pwd");
    }
    assert!(harness
        .session
        .missions()
        .get("terminal_warrior")
        .unwrap()
        .completed);
    assert_unlocked(&harness, "efficiency");
}

// =============================================================================
// HEADLESS DRIVER
// =============================================================================

#[test]
fn test_headless_reports_new_notifications() {
    let mut game = headless();
    let response = game.send("mkdir /tmp/a");
    assert_eq!(response.notifications.len(), 1);
    assert!(response.notifications[0].contains("Builder"));

    let response = game.play("speed").unwrap();
    assert!(response
        .notifications
        .iter()
        .any(|n| n.contains("Speed Challenge")));
}

#[test]
fn test_notification_queue_stays_bounded() {
    let mut game = headless();
    for i in 0..30 {
        game.send(&format!("mkdir /tmp/d{i}"));
        game.play("snake").unwrap();
    }
    assert!(game.session().notifications().len() <= MAX_NOTIFICATIONS);
}

#[test]
fn test_snapshot_json_round_trips_key_fields() {
    let mut game = headless();
    game.send("touch /tmp/a");
    let json = game.snapshot_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["player"], "Runner");
    assert_eq!(value["progress"]["files_created"], 1);
    assert_eq!(value["cwd"], "/");
}

#[test]
fn test_leaderboard_includes_player() {
    let mut game = headless();
    game.session_mut().add_xp(7_000);
    let board = game.session().leaderboard();
    let you = board.iter().find(|row| row.is_you).unwrap();
    assert!(you.player.starts_with("Runner"));
    assert_eq!(you.rank, 4);
    assert!(board.windows(2).all(|w| w[0].total_xp >= w[1].total_xp));
}
