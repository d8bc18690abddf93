//! Headless game interface for programmatic use.
//!
//! This module wraps a [`GameSession`] in a line-oriented interface for
//! driving the game without a UI. It's designed for:
//! - Scripted sessions and integration tests
//! - Front-ends that only need text in, text out
//!
//! # Example
//!
//! ```ignore
//! use gameos_core::headless::HeadlessGame;
//! use gameos_core::SessionConfig;
//!
//! let mut game = HeadlessGame::new(SessionConfig::new("neo"))?;
//! let response = game.send("mkdir /home/player/projects");
//! println!("{}", response.output);
//! println!("Level {} ({} XP)", game.level(), game.total_xp());
//! ```

use crate::notifications::NotificationKind;
use crate::session::{GameSession, SessionConfig, SessionError};

/// A simplified response from the game.
#[derive(Debug, Clone)]
pub struct GameResponse {
    /// Terminal output.
    pub output: String,
    /// Whether the command succeeded.
    pub success: bool,
    /// XP earned by this input, bonuses included.
    pub xp_gained: u64,
    pub level: u32,
    pub total_xp: u64,
    /// Notifications posted while handling this input, oldest first.
    pub notifications: Vec<String>,
}

/// An entry in the game transcript.
#[derive(Debug, Clone)]
pub struct TranscriptEntry {
    pub input: String,
    pub output: String,
    pub turn: usize,
}

/// A headless GameOS session that records a transcript.
pub struct HeadlessGame {
    session: GameSession,
    transcript: Vec<TranscriptEntry>,
    /// Highest notification id already reported.
    seen_notification: Option<u64>,
}

impl HeadlessGame {
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        Ok(Self::from_session(GameSession::new(config)?))
    }

    /// Wrap an existing session.
    pub fn from_session(session: GameSession) -> Self {
        let seen_notification = session.latest_notification().map(|n| n.id);
        Self {
            session,
            transcript: Vec::new(),
            seen_notification,
        }
    }

    /// Run one terminal line.
    pub fn send(&mut self, input: &str) -> GameResponse {
        let result = self.session.execute_command(input);
        self.record(input, &result.output);
        self.respond(result.output, result.success, result.outcome.xp_gained)
    }

    /// Play a mini-game by id.
    pub fn play(&mut self, game: &str) -> Result<GameResponse, SessionError> {
        let outcome = self.session.play_game(game)?;
        let output = format!("🎮 Played {game}! (+{} XP)", outcome.xp_gained);
        self.record(&format!("#play {game}"), &output);
        Ok(self.respond(output, true, outcome.xp_gained))
    }

    /// Replace the daily missions.
    pub fn new_missions(&mut self) -> GameResponse {
        self.session.regenerate_missions();
        let output = self
            .session
            .missions()
            .iter()
            .map(|m| format!("🎯 {} - {}", m.name, m.description))
            .collect::<Vec<_>>()
            .join("\n");
        self.record("#missions new", &output);
        self.respond(output, true, 0)
    }

    /// Periodic update hook.
    pub fn tick(&mut self) -> GameResponse {
        let outcome = self.session.tick();
        self.respond(String::new(), true, outcome.xp_gained)
    }

    fn record(&mut self, input: &str, output: &str) {
        self.transcript.push(TranscriptEntry {
            input: input.to_string(),
            output: output.to_string(),
            turn: self.transcript.len() + 1,
        });
    }

    fn respond(&mut self, output: String, success: bool, xp_gained: u64) -> GameResponse {
        GameResponse {
            output,
            success,
            xp_gained,
            level: self.session.progress().level(),
            total_xp: self.session.progress().total_xp(),
            notifications: self.drain_notifications(),
        }
    }

    /// Messages posted since the last call.
    fn drain_notifications(&mut self) -> Vec<String> {
        let seen = self.seen_notification;
        let fresh: Vec<_> = self
            .session
            .notifications()
            .iter()
            .filter(|n| seen.map_or(true, |id| n.id > id))
            .collect();
        if let Some(last) = fresh.last() {
            self.seen_notification = Some(last.id);
        }
        fresh
            .into_iter()
            .map(|n| match n.kind {
                NotificationKind::LevelUp | NotificationKind::Achievement => {
                    format!("★ {}", n.message)
                }
                _ => n.message.clone(),
            })
            .collect()
    }

    // ========================================================================
    // Game State Queries
    // ========================================================================

    pub fn player_name(&self) -> &str {
        self.session.player_name()
    }

    pub fn level(&self) -> u32 {
        self.session.progress().level()
    }

    pub fn total_xp(&self) -> u64 {
        self.session.progress().total_xp()
    }

    pub fn cwd(&self) -> String {
        self.session.cwd()
    }

    /// One-line summary for status displays.
    pub fn status_line(&self) -> String {
        let progress = self.session.level_progress();
        format!(
            "{} | Level {} | {} XP | {:.0}% to next | {}/{} achievements | {} open missions",
            self.player_name(),
            self.level(),
            self.total_xp(),
            progress.percentage,
            self.session.achievements().unlocked_count(),
            self.session.achievements().len(),
            self.session.missions().open_count()
        )
    }

    /// Full session state as pretty JSON.
    pub fn snapshot_json(&self) -> Result<String, SessionError> {
        self.session.snapshot().to_json()
    }

    /// Transcript of all exchanges.
    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn turn_count(&self) -> usize {
        self.transcript.len()
    }

    pub fn last_output(&self) -> Option<&str> {
        self.transcript.last().map(|e| e.output.as_str())
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }
}
