//! Event/Reward rules.
//!
//! This module implements the gamification pipeline:
//! 1. A filesystem, process or terminal action succeeds and yields a [`GameEvent`]
//! 2. [`reward`] looks up the event's fixed XP, the achievements to re-check
//!    and the mission triggers to advance
//! 3. [`apply_counters`] bumps the progress counters the event feeds
//! 4. The session applies the reward and reports what changed
//!
//! Keeping the table here makes every reward testable without a session.

use crate::process::Pid;
use crate::progress::ProgressModel;
use serde::{Deserialize, Serialize};

/// A semantic event produced by a successful game-tracked action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    FileCreated { path: String },
    DirectoryCreated { path: String },
    FileRemoved { path: String },
    /// Removing a directory grants nothing; files only.
    DirectoryRemoved { path: String },
    DirectoryEntered { path: String },
    ProcessCreated { pid: Pid, name: String },
    ProcessKilled { pid: Pid },
    CommandExecuted { command: String },
    GamePlayed { game: String },
    SystemMonitored,
    MemoryInspected,
}

impl GameEvent {
    /// Whether the event is a hands-on filesystem or process task.
    pub fn is_task(&self) -> bool {
        matches!(
            self,
            GameEvent::FileCreated { .. }
                | GameEvent::DirectoryCreated { .. }
                | GameEvent::FileRemoved { .. }
                | GameEvent::ProcessCreated { .. }
                | GameEvent::ProcessKilled { .. }
        )
    }
}

/// The built-in mini-games. Each play is worth the same flat reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MiniGame {
    Snake,
    Puzzle,
    Speed,
    Memory,
}

impl MiniGame {
    pub const ALL: [MiniGame; 4] = [
        MiniGame::Snake,
        MiniGame::Puzzle,
        MiniGame::Speed,
        MiniGame::Memory,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            MiniGame::Snake => "snake",
            MiniGame::Puzzle => "puzzle",
            MiniGame::Speed => "speed",
            MiniGame::Memory => "memory",
        }
    }

    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|game| game.id().eq_ignore_ascii_case(id.trim()))
    }
}

/// Everything an event is worth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reward {
    pub xp: u64,
    pub achievements: &'static [&'static str],
    pub missions: &'static [&'static str],
}

impl Reward {
    const NONE: Reward = Reward {
        xp: 0,
        achievements: &[],
        missions: &[],
    };
}

pub const FILE_CREATED_XP: u64 = 10;
pub const DIRECTORY_CREATED_XP: u64 = 25;
pub const FILE_REMOVED_XP: u64 = 5;
pub const DIRECTORY_ENTERED_XP: u64 = 2;
pub const PROCESS_CREATED_XP: u64 = 30;
pub const PROCESS_KILLED_XP: u64 = 20;
pub const COMMAND_XP: u64 = 5;
pub const GAME_XP: u64 = 50;
pub const SYSTEM_MONITOR_XP: u64 = 10;

/// Mission trigger advanced by every hands-on task.
pub const TASK_TRIGGER: &str = "efficiency_test";

/// Look up the fixed reward for an event.
pub fn reward(event: &GameEvent) -> Reward {
    match event {
        GameEvent::FileCreated { .. } => Reward {
            xp: FILE_CREATED_XP,
            achievements: &["first_steps", "productive"],
            missions: &["create_files", "backup_task"],
        },
        GameEvent::DirectoryCreated { .. } => Reward {
            xp: DIRECTORY_CREATED_XP,
            achievements: &["builder", "architect"],
            missions: &["organize_files"],
        },
        GameEvent::FileRemoved { .. } => Reward {
            xp: FILE_REMOVED_XP,
            achievements: &["cleaner"],
            missions: &["cleanup_mission"],
        },
        GameEvent::DirectoryRemoved { .. } => Reward::NONE,
        GameEvent::DirectoryEntered { .. } => Reward {
            xp: DIRECTORY_ENTERED_XP,
            achievements: &["explorer"],
            missions: &["explorer_mission"],
        },
        GameEvent::ProcessCreated { .. } => Reward {
            xp: PROCESS_CREATED_XP,
            achievements: &["taskmaster", "multitasker"],
            missions: &["process_master"],
        },
        GameEvent::ProcessKilled { .. } => Reward {
            xp: PROCESS_KILLED_XP,
            achievements: &[],
            missions: &["process_master"],
        },
        GameEvent::CommandExecuted { .. } => Reward {
            xp: COMMAND_XP,
            achievements: &["terminal_rookie", "terminal_expert"],
            missions: &["terminal_warrior"],
        },
        GameEvent::GamePlayed { .. } => Reward {
            xp: GAME_XP,
            achievements: &["gamer"],
            missions: &[],
        },
        GameEvent::SystemMonitored => Reward {
            xp: SYSTEM_MONITOR_XP,
            achievements: &[],
            missions: &["system_monitor"],
        },
        GameEvent::MemoryInspected => Reward {
            xp: 0,
            achievements: &[],
            missions: &["memory_manager"],
        },
    }
}

/// Bump the progress counters an event feeds.
pub fn apply_counters(progress: &mut ProgressModel, event: &GameEvent) {
    match event {
        GameEvent::FileCreated { .. } => progress.files_created += 1,
        GameEvent::DirectoryCreated { .. } => progress.directories_created += 1,
        GameEvent::FileRemoved { .. } => progress.files_deleted += 1,
        GameEvent::DirectoryEntered { path } => {
            progress.directories_explored.insert(path.clone());
        }
        GameEvent::ProcessCreated { .. } => progress.processes_created += 1,
        GameEvent::ProcessKilled { .. } => progress.processes_killed += 1,
        GameEvent::CommandExecuted { .. } => progress.commands_executed += 1,
        GameEvent::GamePlayed { .. } => progress.games_played += 1,
        GameEvent::DirectoryRemoved { .. }
        | GameEvent::SystemMonitored
        | GameEvent::MemoryInspected => {}
    }
}
