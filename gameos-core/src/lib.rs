//! GameOS simulation engine.
//!
//! This crate provides:
//! - An XP and leveling model with per-activity counters
//! - A fixed achievement catalog and rotating daily missions
//! - An in-memory virtual filesystem and simulated process table
//! - An event/reward rules table routing every action to its rewards
//! - A terminal interpreter and a headless, transcript-recording driver
//!
//! # Quick Start
//!
//! ```ignore
//! use gameos_core::{GameSession, SessionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = GameSession::new(SessionConfig::new("neo"))?;
//!
//!     session.make_directory("/home/player/projects")?;
//!     let output = session.execute_command("touch /home/player/projects/notes.txt");
//!     println!("{}", output.output);
//!
//!     println!("Level {} with {} XP", session.progress().level(), session.progress().total_xp());
//!     Ok(())
//! }
//! ```

pub mod achievements;
pub mod fs;
pub mod headless;
pub mod leaderboard;
pub mod missions;
pub mod notifications;
pub mod process;
pub mod progress;
pub mod rules;
pub mod session;
pub mod shared;
pub mod system;
pub mod terminal;
pub mod testing;

// Primary public API
pub use achievements::{Achievement, AchievementRegistry, RuleContext};
pub use fs::{DirChange, DirEntry, FailureKind, FsError, Node, NodeKind, VirtualFileTree};
pub use headless::{GameResponse, HeadlessGame};
pub use missions::{Difficulty, Mission, MissionRegistry};
pub use notifications::{Notification, NotificationKind, NotificationQueue};
pub use process::{Pid, ProcessEntry, ProcessError, ProcessState, ProcessTable};
pub use progress::{LevelProgress, ProgressModel};
pub use rules::{GameEvent, MiniGame};
pub use session::{
    Clock, FixedClock, GameSession, Outcome, SessionConfig, SessionError, SessionSnapshot,
    SystemClock,
};
pub use shared::SharedSession;
pub use terminal::{Command, CommandOutput};
pub use testing::TestHarness;
