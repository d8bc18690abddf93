//! Achievement catalog and unlock rules.
//!
//! The catalog is fixed; each achievement id maps to a pure predicate over a
//! read-only [`RuleContext`]. Unlock state only moves from locked to unlocked.

use crate::progress::ProgressModel;
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Id of the achievement that counts other unlocks.
pub const META_ACHIEVEMENT: &str = "legendary";

/// Achievements gated on the player's level.
pub const LEVEL_ACHIEVEMENTS: [&str; 2] = ["system_admin", "master_admin"];

/// Achievements gated on wall-clock hour.
pub const TIME_ACHIEVEMENTS: [&str; 2] = ["night_owl", "early_bird"];

/// (id, name, description, icon, xp reward)
const CATALOG: [(&str, &str, &str, &str, u64); 20] = [
    ("first_steps", "First Steps", "Create your first file", "📄", 50),
    ("builder", "Builder", "Create your first directory", "📁", 50),
    ("taskmaster", "Taskmaster", "Create your first process", "⚙️", 75),
    ("productive", "Productive", "Create 10 files", "📚", 200),
    ("architect", "Architect", "Create 5 directories", "🏗️", 150),
    ("terminal_rookie", "Terminal Rookie", "Execute 25 commands", "💻", 200),
    ("terminal_expert", "Terminal Expert", "Execute 100 commands", "🖥️", 500),
    ("cleaner", "Cleaner", "Delete 10 files", "🧹", 150),
    ("explorer", "Explorer", "Visit 10 different directories", "🗺️", 200),
    ("speed_demon", "Speed Demon", "Complete 5 actions in 1 minute", "⚡", 300),
    ("night_owl", "Night Owl", "Use system after 11 PM", "🦉", 100),
    ("early_bird", "Early Bird", "Use system before 7 AM", "🐦", 100),
    ("dedication", "Dedication", "Login for 5 consecutive days", "🔥", 500),
    ("multitasker", "Multitasker", "Have 8 processes running", "🔀", 400),
    ("system_admin", "System Admin", "Reach level 5", "👑", 1000),
    ("master_admin", "Master Admin", "Reach level 10", "💎", 2000),
    ("completionist", "Completionist", "Complete 20 missions", "✅", 800),
    ("gamer", "Gamer", "Play 5 mini-games", "🎮", 300),
    ("efficiency", "Efficiency Expert", "Complete every daily mission", "🎯", 400),
    ("legendary", "Legendary User", "Unlock 15 achievements", "🌟", 1500),
];

/// Everything an unlock rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub progress: &'a ProgressModel,
    /// Local wall-clock hour, 0..=23.
    pub hour: u32,
    /// Processes not yet terminated.
    pub active_processes: usize,
}

type Rule = fn(&RuleContext) -> bool;

lazy_static! {
    static ref RULES: HashMap<&'static str, Rule> = {
        let mut rules: HashMap<&'static str, Rule> = HashMap::new();
        rules.insert("first_steps", |c| c.progress.files_created >= 1);
        rules.insert("builder", |c| c.progress.directories_created >= 1);
        rules.insert("taskmaster", |c| c.progress.processes_created >= 1);
        rules.insert("productive", |c| c.progress.files_created >= 10);
        rules.insert("architect", |c| c.progress.directories_created >= 5);
        rules.insert("terminal_rookie", |c| c.progress.commands_executed >= 25);
        rules.insert("terminal_expert", |c| c.progress.commands_executed >= 100);
        rules.insert("cleaner", |c| c.progress.files_deleted >= 10);
        rules.insert("explorer", |c| c.progress.directories_explored_count() >= 10);
        rules.insert("speed_demon", |c| c.progress.actions_in_last_minute() >= 5);
        // The two time windows are evaluated independently.
        rules.insert("night_owl", |c| c.hour >= 23);
        rules.insert("early_bird", |c| c.hour <= 7);
        rules.insert("dedication", |c| c.progress.login_streak >= 5);
        rules.insert("multitasker", |c| c.active_processes >= 8);
        rules.insert("system_admin", |c| c.progress.level() >= 5);
        rules.insert("master_admin", |c| c.progress.level() >= 10);
        rules.insert("completionist", |c| c.progress.missions_completed >= 20);
        rules.insert("gamer", |c| c.progress.games_played >= 5);
        rules.insert("efficiency", |c| c.progress.perfect_days >= 1);
        rules.insert("legendary", |c| c.progress.achievements_unlocked >= 15);
        rules
    };
}

/// Evaluate the unlock condition for `id`. Unknown ids never unlock.
pub fn evaluate_condition(id: &str, ctx: &RuleContext) -> bool {
    RULES.get(id).is_some_and(|rule| rule(ctx))
}

/// An unlockable badge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub xp_reward: u64,
    pub unlocked: bool,
    pub unlock_time: Option<DateTime<Utc>>,
}

impl Achievement {
    fn new(id: &str, name: &str, description: &str, icon: &str, xp_reward: u64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            xp_reward,
            unlocked: false,
            unlock_time: None,
        }
    }
}

/// The fixed achievement catalog with per-session unlock state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementRegistry {
    achievements: Vec<Achievement>,
}

impl AchievementRegistry {
    pub fn new() -> Self {
        let achievements = CATALOG
            .iter()
            .map(|(id, name, description, icon, xp)| {
                Achievement::new(id, name, description, icon, *xp)
            })
            .collect();
        Self { achievements }
    }

    pub fn get(&self, id: &str) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.id == id)
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.get(id).is_some_and(|a| a.unlocked)
    }

    /// Unlock `id` if it is locked and its condition holds.
    ///
    /// Returns the freshly unlocked achievement; `None` for unknown ids,
    /// already-unlocked ids and unmet conditions.
    pub fn check_and_unlock(
        &mut self,
        id: &str,
        ctx: &RuleContext,
        now: DateTime<Utc>,
    ) -> Option<&Achievement> {
        let achievement = self.achievements.iter_mut().find(|a| a.id == id)?;
        if achievement.unlocked || !evaluate_condition(id, ctx) {
            return None;
        }

        achievement.unlocked = true;
        achievement.unlock_time = Some(now);
        Some(achievement)
    }

    /// Catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Achievement> {
        self.achievements.iter()
    }

    pub fn len(&self) -> usize {
        self.achievements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.achievements.is_empty()
    }

    pub fn unlocked_count(&self) -> usize {
        self.achievements.iter().filter(|a| a.unlocked).count()
    }
}

impl Default for AchievementRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(progress: &ProgressModel) -> RuleContext<'_> {
        RuleContext {
            progress,
            hour: 12,
            active_processes: 4,
        }
    }

    #[test]
    fn test_catalog_has_twenty_unique_entries() {
        let registry = AchievementRegistry::new();
        assert_eq!(registry.len(), 20);

        let mut ids: Vec<_> = registry.iter().map(|a| a.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 20);
        assert!(registry.iter().all(|a| !a.unlocked && a.unlock_time.is_none()));
    }

    #[test]
    fn test_every_catalog_entry_has_a_rule() {
        let registry = AchievementRegistry::new();
        for achievement in registry.iter() {
            assert!(RULES.contains_key(achievement.id.as_str()), "{}", achievement.id);
        }
    }

    #[test]
    fn test_counter_rules() {
        let mut progress = ProgressModel::new();
        assert!(!evaluate_condition("first_steps", &ctx(&progress)));
        progress.files_created = 1;
        assert!(evaluate_condition("first_steps", &ctx(&progress)));
        assert!(!evaluate_condition("productive", &ctx(&progress)));
        progress.files_created = 10;
        assert!(evaluate_condition("productive", &ctx(&progress)));
    }

    #[test]
    fn test_time_of_day_rules() {
        let progress = ProgressModel::new();
        let at = |hour| RuleContext {
            progress: &progress,
            hour,
            active_processes: 0,
        };

        assert!(evaluate_condition("night_owl", &at(23)));
        assert!(!evaluate_condition("night_owl", &at(22)));
        assert!(!evaluate_condition("night_owl", &at(0)));

        assert!(evaluate_condition("early_bird", &at(0)));
        assert!(evaluate_condition("early_bird", &at(7)));
        assert!(!evaluate_condition("early_bird", &at(8)));
        assert!(!evaluate_condition("early_bird", &at(23)));
    }

    #[test]
    fn test_multitasker_counts_live_processes() {
        let progress = ProgressModel::new();
        let with = |active_processes| RuleContext {
            progress: &progress,
            hour: 12,
            active_processes,
        };
        assert!(!evaluate_condition("multitasker", &with(7)));
        assert!(evaluate_condition("multitasker", &with(8)));
    }

    #[test]
    fn test_unknown_id_never_unlocks() {
        let progress = ProgressModel::new();
        let mut registry = AchievementRegistry::new();
        assert!(!evaluate_condition("nope", &ctx(&progress)));
        assert!(registry.check_and_unlock("nope", &ctx(&progress), Utc::now()).is_none());
    }

    #[test]
    fn test_check_and_unlock_is_idempotent() {
        let mut progress = ProgressModel::new();
        progress.directories_created = 1;
        let mut registry = AchievementRegistry::new();
        let now = Utc::now();

        let unlocked = registry.check_and_unlock("builder", &ctx(&progress), now);
        assert_eq!(unlocked.map(|a| a.xp_reward), Some(50));
        assert!(registry.is_unlocked("builder"));
        assert_eq!(registry.get("builder").and_then(|a| a.unlock_time), Some(now));

        assert!(registry.check_and_unlock("builder", &ctx(&progress), now).is_none());
        assert_eq!(registry.unlocked_count(), 1);
    }
}
