//! GameSession - the primary public API for GameOS.
//!
//! A session owns the player's progress, the achievement and mission
//! registries, the notification queue, the virtual filesystem and the
//! process table. Every successful action is turned into a [`GameEvent`]
//! and routed through the reward rules; failed actions award nothing.

use crate::achievements::{
    Achievement, AchievementRegistry, RuleContext, LEVEL_ACHIEVEMENTS, META_ACHIEVEMENT,
    TIME_ACHIEVEMENTS,
};
use crate::fs::{DirChange, DirEntry, FsError, Node, NodeKind, VirtualFileTree};
use crate::leaderboard::{self, LeaderboardEntry};
use crate::missions::{Mission, MissionRegistry};
use crate::notifications::{Notification, NotificationKind, NotificationQueue};
use crate::process::{Pid, ProcessEntry, ProcessError, ProcessTable};
use crate::progress::{LevelProgress, ProgressModel};
use crate::rules::{self, GameEvent, MiniGame, TASK_TRIGGER};
use crate::system::{MemoryManager, MemoryStatus, SystemInfo, OS_NAME, OS_VERSION};
use crate::terminal::{self, CommandOutput};
use chrono::{DateTime, Local, NaiveDate, Timelike, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

/// Achievement re-checked on every periodic tick besides the time-of-day ones.
const STREAK_ACHIEVEMENT: &str = "dedication";

/// Errors from GameSession operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown game: {0}")]
    UnknownGame(String),

    #[error("Filesystem error: {0}")]
    Fs(#[from] FsError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Source of wall-clock time for timestamps and time-of-day rules.
pub trait Clock: fmt::Debug + Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Local hour used by the time-of-day achievements, 0..=23.
    fn hour(&self) -> u32;
}

/// The real clock; hours are taken in local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn hour(&self) -> u32 {
        Local::now().hour()
    }
}

/// A clock frozen at one instant. Its hour is the UTC hour of that instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// A fixed date at the given hour (clamped to 23).
    pub fn at_hour(hour: u32) -> Self {
        let now = NaiveDate::from_ymd_opt(2024, 1, 15)
            .and_then(|d| d.and_hms_opt(hour.min(23), 0, 0))
            .map(|n| n.and_utc())
            .unwrap_or_default();
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn hour(&self) -> u32 {
        self.now.hour()
    }
}

/// Configuration for creating a new game session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Display name on the leaderboard.
    pub player_name: String,

    /// Seed for mission sampling and simulated memory. Random when `None`.
    pub seed: Option<u64>,

    /// Consecutive login days carried into the session.
    pub login_streak: u32,

    /// Reward a kill of an already-terminated process like a fresh kill.
    pub reward_repeat_kills: bool,

    pub clock: Arc<dyn Clock>,
}

impl SessionConfig {
    pub fn new(player_name: impl Into<String>) -> Self {
        Self {
            player_name: player_name.into(),
            seed: None,
            login_streak: 1,
            reward_repeat_kills: false,
            clock: Arc::new(SystemClock),
        }
    }

    /// Build a config from `GAMEOS_*` environment variables.
    pub fn from_env() -> Result<Self, SessionError> {
        let player = std::env::var("GAMEOS_PLAYER").unwrap_or_else(|_| "player".to_string());
        let mut config = Self::new(player);

        if let Ok(seed) = std::env::var("GAMEOS_SEED") {
            let seed = seed
                .trim()
                .parse()
                .map_err(|_| SessionError::InvalidConfig(format!("GAMEOS_SEED={seed}")))?;
            config = config.with_seed(seed);
        }
        if let Ok(streak) = std::env::var("GAMEOS_LOGIN_STREAK") {
            let streak = streak.trim().parse().map_err(|_| {
                SessionError::InvalidConfig(format!("GAMEOS_LOGIN_STREAK={streak}"))
            })?;
            config = config.with_login_streak(streak);
        }
        if let Ok(flag) = std::env::var("GAMEOS_REWARD_REPEAT_KILLS") {
            let flag = matches!(flag.trim(), "1" | "true" | "yes");
            config = config.with_repeat_kill_rewards(flag);
        }

        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_login_streak(mut self, days: u32) -> Self {
        self.login_streak = days;
        self
    }

    pub fn with_repeat_kill_rewards(mut self, enabled: bool) -> Self {
        self.reward_repeat_kills = enabled;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new("player")
    }
}

/// Everything one operation changed in the player's progress.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Events routed through the reward rules.
    pub events: Vec<GameEvent>,
    pub xp_gained: u64,
    pub leveled_up: bool,
    /// Ids of achievements unlocked, in unlock order.
    pub unlocked: Vec<String>,
    /// Ids of missions completed, in completion order.
    pub completed: Vec<String>,
}

impl Outcome {
    /// True when nothing was rewarded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
            && self.xp_gained == 0
            && self.unlocked.is_empty()
            && self.completed.is_empty()
    }

    /// Fold a later outcome into this one.
    pub fn merge(&mut self, other: Outcome) {
        self.events.extend(other.events);
        self.xp_gained = self.xp_gained.saturating_add(other.xp_gained);
        self.leveled_up |= other.leveled_up;
        self.unlocked.extend(other.unlocked);
        self.completed.extend(other.completed);
    }
}

/// Serializable view of the whole session for front-ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub player: String,
    pub progress: ProgressModel,
    pub level_progress: LevelProgress,
    pub achievements: Vec<Achievement>,
    pub missions: Vec<Mission>,
    pub notifications: Vec<Notification>,
    pub cwd: String,
    pub processes: Vec<ProcessEntry>,
    pub system: SystemInfo,
}

impl SessionSnapshot {
    pub fn to_json(&self) -> Result<String, SessionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A GameOS session.
///
/// This is the main entry point. It manages:
/// - Player progress, achievements and daily missions
/// - The virtual filesystem and process table the rules observe
/// - The notification log
pub struct GameSession {
    session_id: Uuid,
    config: SessionConfig,
    progress: ProgressModel,
    achievements: AchievementRegistry,
    missions: MissionRegistry,
    notifications: NotificationQueue,
    fs: VirtualFileTree,
    processes: ProcessTable,
    memory: MemoryManager,
    rng: StdRng,
    boot_time: DateTime<Utc>,
}

impl GameSession {
    /// Boot a new session. The default tree and system processes are
    /// installed silently.
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        if config.login_streak == 0 {
            return Err(SessionError::InvalidConfig(
                "login streak must be at least 1".to_string(),
            ));
        }

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let boot_time = config.clock.now();

        let mut progress = ProgressModel::new();
        progress.login_streak = config.login_streak;

        let session = Self {
            session_id: Uuid::new_v4(),
            progress,
            achievements: AchievementRegistry::new(),
            missions: MissionRegistry::new(&mut rng),
            notifications: NotificationQueue::new(),
            fs: VirtualFileTree::seeded(boot_time)?,
            processes: ProcessTable::with_system_processes(&mut rng, boot_time),
            memory: MemoryManager::new(&mut rng),
            rng,
            boot_time,
            config,
        };

        info!(
            session_id = %session.session_id,
            player = %session.config.player_name,
            "Session started"
        );
        Ok(session)
    }

    /// Replace the active missions with an explicit set.
    pub fn with_missions(mut self, missions: Vec<Mission>) -> Self {
        self.missions = MissionRegistry::with_missions(missions);
        self
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn player_name(&self) -> &str {
        &self.config.player_name
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn progress(&self) -> &ProgressModel {
        &self.progress
    }

    // ========================================================================
    // Filesystem
    // ========================================================================

    pub fn create_file(&mut self, path: &str, content: &str) -> Result<Outcome, FsError> {
        let path = self.fs.create_file(path, content, self.config.clock.now())?;
        Ok(self.apply_event(GameEvent::FileCreated { path }))
    }

    pub fn make_directory(&mut self, path: &str) -> Result<Outcome, FsError> {
        let path = self.fs.make_directory(path, self.config.clock.now())?;
        Ok(self.apply_event(GameEvent::DirectoryCreated { path }))
    }

    /// Remove a file or directory. Only file removals are rewarded.
    pub fn remove(&mut self, path: &str) -> Result<Outcome, FsError> {
        let path = self.fs.absolute(path);
        let event = match self.fs.remove(&path, self.config.clock.now())? {
            NodeKind::File => GameEvent::FileRemoved { path },
            NodeKind::Directory => GameEvent::DirectoryRemoved { path },
        };
        Ok(self.apply_event(event))
    }

    /// Move the cursor. Staying in place is not rewarded.
    pub fn change_directory(&mut self, path: &str) -> Result<Outcome, FsError> {
        match self.fs.change_directory(path)? {
            DirChange::Moved { to, .. } => {
                Ok(self.apply_event(GameEvent::DirectoryEntered { path: to }))
            }
            DirChange::Unchanged => Ok(Outcome::default()),
        }
    }

    pub fn list(&self, path: &str) -> Result<Vec<DirEntry>, FsError> {
        self.fs.list(path)
    }

    pub fn list_cwd(&self) -> Result<Vec<DirEntry>, FsError> {
        self.fs.list_cwd()
    }

    pub fn read_file(&self, path: &str) -> Result<&str, FsError> {
        self.fs.read_file(path)
    }

    pub fn resolve(&self, path: &str) -> Option<&Node> {
        self.fs.resolve(path)
    }

    pub fn cwd(&self) -> String {
        self.fs.cwd()
    }

    // ========================================================================
    // Processes
    // ========================================================================

    pub fn create_process(&mut self, name: &str, command: &str) -> (Pid, Outcome) {
        let now = self.config.clock.now();
        let pid = self.processes.create(name, command, &mut self.rng, now);
        debug!(pid, name, "Process created");
        let outcome = self.apply_event(GameEvent::ProcessCreated {
            pid,
            name: name.to_string(),
        });
        (pid, outcome)
    }

    pub fn kill_process(&mut self, pid: Pid) -> Result<Outcome, ProcessError> {
        match self.processes.kill(pid) {
            Ok(()) => {}
            Err(ProcessError::AlreadyTerminated(_)) if self.config.reward_repeat_kills => {
                debug!(pid, "Rewarding repeat kill");
            }
            Err(e) => {
                debug!(pid, error = %e, "Kill rejected");
                return Err(e);
            }
        }
        Ok(self.apply_event(GameEvent::ProcessKilled { pid }))
    }

    /// Snapshot of every process in pid order.
    pub fn processes(&self) -> Vec<ProcessEntry> {
        self.processes.list()
    }

    pub fn process_table(&self) -> &ProcessTable {
        &self.processes
    }

    // ========================================================================
    // Terminal and games
    // ========================================================================

    /// Run one terminal line. Every non-empty line earns the command bonus.
    pub fn execute_command(&mut self, line: &str) -> CommandOutput {
        terminal::execute(self, line)
    }

    /// Award the per-command bonus for `command`.
    pub fn record_command(&mut self, command: &str) -> Outcome {
        self.apply_event(GameEvent::CommandExecuted {
            command: command.to_string(),
        })
    }

    /// Record a `stats`/`top` style system check.
    pub fn monitor_system(&mut self) -> Outcome {
        self.apply_event(GameEvent::SystemMonitored)
    }

    /// Record a memory inspection (`top`).
    pub fn inspect_memory(&mut self) -> Outcome {
        self.apply_event(GameEvent::MemoryInspected)
    }

    pub fn play_game(&mut self, game: &str) -> Result<Outcome, SessionError> {
        let game =
            MiniGame::parse(game).ok_or_else(|| SessionError::UnknownGame(game.to_string()))?;
        if game == MiniGame::Speed {
            self.notify("⚡ Speed Challenge started! Go fast!", NotificationKind::Info);
        }
        Ok(self.apply_event(GameEvent::GamePlayed {
            game: game.id().to_string(),
        }))
    }

    // ========================================================================
    // Progress
    // ========================================================================

    /// Award raw XP outside the event table.
    pub fn add_xp(&mut self, amount: u64) -> Outcome {
        let mut outcome = Outcome::default();
        self.grant_xp(amount, &mut outcome);
        outcome
    }

    pub fn level_progress(&self) -> LevelProgress {
        self.progress.level_progress()
    }

    /// Re-evaluate one achievement. Unknown or unlocked ids are a no-op.
    pub fn check_achievement(&mut self, id: &str) -> Outcome {
        let mut outcome = Outcome::default();
        self.try_unlock(id, &mut outcome);
        outcome
    }

    pub fn achievements(&self) -> &AchievementRegistry {
        &self.achievements
    }

    pub fn regenerate_missions(&mut self) {
        self.missions.generate_daily(&mut self.rng);
        info!("Daily missions regenerated");
        self.notify("🎯 New daily missions generated!", NotificationKind::Info);
    }

    /// Advance every active mission listening on `trigger`.
    pub fn advance_mission(&mut self, trigger: &str, amount: u32) -> Outcome {
        let mut outcome = Outcome::default();
        self.advance_trigger(trigger, amount, &mut outcome);
        outcome
    }

    pub fn missions(&self) -> &MissionRegistry {
        &self.missions
    }

    // ========================================================================
    // Notifications
    // ========================================================================

    pub fn notify(&mut self, message: impl Into<String>, kind: NotificationKind) -> u64 {
        let now = self.config.clock.now();
        self.notifications.push(message, kind, now)
    }

    pub fn latest_notification(&self) -> Option<&Notification> {
        self.notifications.latest()
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    // ========================================================================
    // System
    // ========================================================================

    /// Periodic update: advance process counters and re-check the
    /// time-of-day and streak achievements.
    pub fn tick(&mut self) -> Outcome {
        self.processes.tick();
        let mut outcome = Outcome::default();
        for id in TIME_ACHIEVEMENTS {
            self.try_unlock(id, &mut outcome);
        }
        self.try_unlock(STREAK_ACHIEVEMENT, &mut outcome);
        outcome
    }

    pub fn memory_status(&self) -> MemoryStatus {
        self.memory.status(self.processes.resident_memory_kb())
    }

    pub fn system_info(&self) -> SystemInfo {
        let now = self.config.clock.now();
        SystemInfo {
            os_name: OS_NAME.to_string(),
            version: OS_VERSION.to_string(),
            uptime_secs: (now - self.boot_time).num_seconds(),
            boot_time: self.boot_time,
            memory: self.memory_status(),
            active_processes: self.processes.active_count(),
            level: self.progress.level(),
            total_xp: self.progress.total_xp(),
        }
    }

    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        leaderboard::build(&self.config.player_name, &self.progress, &self.achievements)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id,
            player: self.config.player_name.clone(),
            progress: self.progress.clone(),
            level_progress: self.progress.level_progress(),
            achievements: self.achievements.iter().cloned().collect(),
            missions: self.missions.iter().cloned().collect(),
            notifications: self.notifications.iter().cloned().collect(),
            cwd: self.fs.cwd(),
            processes: self.processes.list(),
            system: self.system_info(),
        }
    }

    // ========================================================================
    // Reward pipeline
    // ========================================================================

    /// Route one event through the reward rules.
    fn apply_event(&mut self, event: GameEvent) -> Outcome {
        let mut outcome = Outcome::default();
        let reward = rules::reward(&event);
        debug!(?event, xp = reward.xp, "Applying event");

        rules::apply_counters(&mut self.progress, &event);
        if event.is_task() {
            self.progress.record_action(self.config.clock.now());
        }
        let is_task = event.is_task();
        outcome.events.push(event);

        self.grant_xp(reward.xp, &mut outcome);

        for id in reward.achievements {
            self.try_unlock(id, &mut outcome);
        }
        if is_task {
            self.try_unlock("speed_demon", &mut outcome);
        }

        for trigger in reward.missions {
            self.advance_trigger(trigger, 1, &mut outcome);
        }
        if is_task {
            self.advance_trigger(TASK_TRIGGER, 1, &mut outcome);
        }

        outcome
    }

    /// Plain XP grant with a standalone level-up notification.
    fn grant_xp(&mut self, amount: u64, outcome: &mut Outcome) {
        if amount == 0 {
            return;
        }
        outcome.xp_gained = outcome.xp_gained.saturating_add(amount);
        if self.progress.add_xp(amount) {
            let message = format!("🎉 LEVEL UP! Now Level {}!", self.progress.level());
            self.notify(message, NotificationKind::LevelUp);
            self.on_level_up(outcome);
        }
    }

    fn on_level_up(&mut self, outcome: &mut Outcome) {
        outcome.leveled_up = true;
        info!(level = self.progress.level(), "Level up");
        for id in LEVEL_ACHIEVEMENTS {
            self.try_unlock(id, outcome);
        }
    }

    /// Award XP for an unlock or completion, returning the level-up suffix.
    fn grant_bonus(&mut self, amount: u64, outcome: &mut Outcome) -> Option<String> {
        outcome.xp_gained = outcome.xp_gained.saturating_add(amount);
        self.progress
            .add_xp(amount)
            .then(|| format!(" 🎉 LEVEL UP! Now Level {}!", self.progress.level()))
    }

    fn try_unlock(&mut self, id: &str, outcome: &mut Outcome) -> bool {
        let now = self.config.clock.now();
        let ctx = RuleContext {
            progress: &self.progress,
            hour: self.config.clock.hour(),
            active_processes: self.processes.active_count(),
        };
        let Some(achievement) = self.achievements.check_and_unlock(id, &ctx, now) else {
            return false;
        };
        let (name, xp) = (achievement.name.clone(), achievement.xp_reward);

        self.progress.achievements_unlocked += 1;
        let level_up = self.grant_bonus(xp, outcome);
        let mut message = format!("🏆 Achievement Unlocked: {name} (+{xp} XP)");
        if let Some(suffix) = &level_up {
            message.push_str(suffix);
        }
        self.notify(message, NotificationKind::Achievement);
        outcome.unlocked.push(id.to_string());
        info!(achievement = id, xp, "Achievement unlocked");

        if level_up.is_some() {
            self.on_level_up(outcome);
        }
        if id != META_ACHIEVEMENT {
            self.try_unlock(META_ACHIEVEMENT, outcome);
        }
        true
    }

    fn advance_trigger(&mut self, trigger: &str, amount: u32, outcome: &mut Outcome) {
        let completed = self.missions.advance(trigger, amount);
        if completed.is_empty() {
            return;
        }

        for mission in completed {
            self.progress.missions_completed += 1;
            let level_up = self.grant_bonus(mission.xp_reward, outcome);
            let mut message = format!(
                "✅ Mission Complete: {} (+{} XP)",
                mission.name, mission.xp_reward
            );
            if let Some(suffix) = &level_up {
                message.push_str(suffix);
            }
            self.notify(message, NotificationKind::Mission);
            info!(mission = %mission.id, xp = mission.xp_reward, "Mission completed");
            outcome.completed.push(mission.id);

            if level_up.is_some() {
                self.on_level_up(outcome);
            }
            self.try_unlock("completionist", outcome);
        }

        if self.missions.all_completed() {
            self.progress.perfect_days += 1;
            info!(perfect_days = self.progress.perfect_days, "Daily missions cleared");
            self.try_unlock("efficiency", outcome);
        }
    }
}

impl fmt::Debug for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("session_id", &self.session_id)
            .field("player", &self.config.player_name)
            .field("level", &self.progress.level())
            .field("total_xp", &self.progress.total_xp())
            .finish()
    }
}
