//! Daily missions.
//!
//! Three missions are active at a time, drawn without replacement from a
//! fixed pool of templates. Progress only grows and clamps at the target.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of missions active at once.
pub const ACTIVE_MISSIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A mission blueprint from the fixed pool.
#[derive(Debug, Clone, Copy)]
pub struct MissionTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub xp_reward: u64,
    pub difficulty: Difficulty,
    pub target: u32,
}

pub const MISSION_TEMPLATES: [MissionTemplate; 10] = [
    MissionTemplate {
        id: "create_files",
        name: "File Creator",
        description: "Create 5 new files",
        xp_reward: 150,
        difficulty: Difficulty::Easy,
        target: 5,
    },
    MissionTemplate {
        id: "organize_files",
        name: "Organizer",
        description: "Create 3 directories and organize files",
        xp_reward: 200,
        difficulty: Difficulty::Medium,
        target: 3,
    },
    MissionTemplate {
        id: "process_master",
        name: "Process Master",
        description: "Create and manage 4 processes",
        xp_reward: 250,
        difficulty: Difficulty::Medium,
        target: 4,
    },
    MissionTemplate {
        id: "explorer_mission",
        name: "Explorer",
        description: "Navigate to 8 different directories",
        xp_reward: 180,
        difficulty: Difficulty::Easy,
        target: 8,
    },
    MissionTemplate {
        id: "terminal_warrior",
        name: "Terminal Warrior",
        description: "Execute 20 terminal commands",
        xp_reward: 300,
        difficulty: Difficulty::Medium,
        target: 20,
    },
    MissionTemplate {
        id: "cleanup_mission",
        name: "Cleanup Crew",
        description: "Delete 8 old files",
        xp_reward: 120,
        difficulty: Difficulty::Easy,
        target: 8,
    },
    MissionTemplate {
        id: "system_monitor",
        name: "System Monitor",
        description: "Check system stats 5 times",
        xp_reward: 100,
        difficulty: Difficulty::Easy,
        target: 5,
    },
    MissionTemplate {
        id: "efficiency_test",
        name: "Efficiency Test",
        description: "Complete 10 filesystem or process tasks",
        xp_reward: 400,
        difficulty: Difficulty::Hard,
        target: 10,
    },
    MissionTemplate {
        id: "memory_manager",
        name: "Memory Manager",
        description: "Inspect memory usage with top",
        xp_reward: 200,
        difficulty: Difficulty::Medium,
        target: 1,
    },
    MissionTemplate {
        id: "backup_task",
        name: "Backup Task",
        description: "Copy 6 files to backup folder",
        xp_reward: 250,
        difficulty: Difficulty::Medium,
        target: 6,
    },
];

/// Look up a template by id.
pub fn template(id: &str) -> Option<&'static MissionTemplate> {
    MISSION_TEMPLATES.iter().find(|t| t.id == id)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mission {
    /// Template key, also the trigger id that advances it.
    pub id: String,
    pub name: String,
    pub description: String,
    pub xp_reward: u64,
    pub difficulty: Difficulty,
    pub target: u32,
    pub progress: u32,
    pub completed: bool,
}

impl Mission {
    pub fn from_template(template: &MissionTemplate) -> Self {
        Self {
            id: template.id.to_string(),
            name: template.name.to_string(),
            description: template.description.to_string(),
            xp_reward: template.xp_reward,
            difficulty: template.difficulty,
            target: template.target.max(1),
            progress: 0,
            completed: false,
        }
    }

    /// Fraction complete, 0.0..=1.0.
    pub fn ratio(&self) -> f32 {
        self.progress as f32 / self.target as f32
    }
}

/// The set of currently active missions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MissionRegistry {
    active: Vec<Mission>,
}

impl MissionRegistry {
    /// A registry with a freshly sampled daily set.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut registry = Self::default();
        registry.generate_daily(rng);
        registry
    }

    /// A registry with an explicit mission set.
    pub fn with_missions(active: Vec<Mission>) -> Self {
        Self { active }
    }

    /// Replace the active set with missions sampled without replacement.
    pub fn generate_daily<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.active = MISSION_TEMPLATES
            .choose_multiple(rng, ACTIVE_MISSIONS)
            .map(Mission::from_template)
            .collect();
    }

    /// Advance every open mission whose id matches `trigger`.
    ///
    /// Returns the missions completed by this call.
    pub fn advance(&mut self, trigger: &str, amount: u32) -> Vec<Mission> {
        let mut completed = Vec::new();
        for mission in self
            .active
            .iter_mut()
            .filter(|m| !m.completed && m.id == trigger)
        {
            mission.progress = mission.progress.saturating_add(amount).min(mission.target);
            if mission.progress == mission.target {
                mission.completed = true;
                completed.push(mission.clone());
            }
        }
        completed
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mission> {
        self.active.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Mission> {
        self.active.iter().find(|m| m.id == id)
    }

    pub fn all_completed(&self) -> bool {
        !self.active.is_empty() && self.active.iter().all(|m| m.completed)
    }

    pub fn open_count(&self) -> usize {
        self.active.iter().filter(|m| !m.completed).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn mission(id: &str) -> Mission {
        Mission::from_template(template(id).unwrap())
    }

    #[test]
    fn test_generate_daily_picks_three_distinct() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let registry = MissionRegistry::new(&mut rng);
            let ids: HashSet<_> = registry.iter().map(|m| m.id.clone()).collect();
            assert_eq!(ids.len(), ACTIVE_MISSIONS);
            assert!(registry.iter().all(|m| m.progress == 0 && !m.completed));
        }
    }

    #[test]
    fn test_advance_clamps_and_completes_once() {
        let mut registry = MissionRegistry::with_missions(vec![mission("organize_files")]);

        assert!(registry.advance("organize_files", 1).is_empty());
        assert_eq!(registry.get("organize_files").unwrap().progress, 1);

        let done = registry.advance("organize_files", 10);
        assert_eq!(done.len(), 1);
        let m = registry.get("organize_files").unwrap();
        assert_eq!(m.progress, m.target);
        assert!(m.completed);

        // Completed missions ignore further triggers.
        assert!(registry.advance("organize_files", 1).is_empty());
        assert_eq!(registry.get("organize_files").unwrap().progress, 3);
    }

    #[test]
    fn test_advance_ignores_other_triggers() {
        let mut registry = MissionRegistry::with_missions(vec![mission("create_files")]);
        registry.advance("cleanup_mission", 1);
        assert_eq!(registry.get("create_files").unwrap().progress, 0);
    }

    #[test]
    fn test_shared_trigger_advances_all_matches() {
        let mut registry = MissionRegistry::with_missions(vec![
            mission("memory_manager"),
            mission("memory_manager"),
        ]);
        let done = registry.advance("memory_manager", 1);
        assert_eq!(done.len(), 2);
        assert!(registry.all_completed());
        assert_eq!(registry.open_count(), 0);
    }

    #[test]
    fn test_zero_target_is_raised_to_one() {
        let t = MissionTemplate {
            id: "x",
            name: "X",
            description: "",
            xp_reward: 1,
            difficulty: Difficulty::Easy,
            target: 0,
        };
        assert_eq!(Mission::from_template(&t).target, 1);
    }
}
