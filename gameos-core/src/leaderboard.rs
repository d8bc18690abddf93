//! Static leaderboard with the local player ranked in.

use crate::achievements::AchievementRegistry;
use crate::progress::ProgressModel;
use serde::{Deserialize, Serialize};

/// (name, level, total xp, achievements unlocked)
const SAMPLE_PLAYERS: [(&str, u32, u64, usize); 4] = [
    ("SystemMaster", 15, 22_500, 18),
    ("AdminPro", 12, 14_400, 15),
    ("CodeNinja", 10, 10_000, 12),
    ("TechWizard", 8, 6_400, 10),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub player: String,
    pub level: u32,
    pub total_xp: u64,
    pub achievements: usize,
    pub achievements_total: usize,
    pub is_you: bool,
}

/// Build the board, highest total XP first. Ties rank the sample player higher.
pub fn build(
    player: &str,
    progress: &ProgressModel,
    achievements: &AchievementRegistry,
) -> Vec<LeaderboardEntry> {
    let total = achievements.len();
    let mut rows: Vec<LeaderboardEntry> = SAMPLE_PLAYERS
        .iter()
        .map(|(name, level, xp, unlocked)| LeaderboardEntry {
            rank: 0,
            player: name.to_string(),
            level: *level,
            total_xp: *xp,
            achievements: *unlocked,
            achievements_total: total,
            is_you: false,
        })
        .collect();

    rows.push(LeaderboardEntry {
        rank: 0,
        player: format!("{player} (YOU)"),
        level: progress.level(),
        total_xp: progress.total_xp(),
        achievements: achievements.unlocked_count(),
        achievements_total: total,
        is_you: true,
    });

    // Stable sort keeps sample rows ahead of the player on equal XP.
    rows.sort_by(|a, b| b.total_xp.cmp(&a.total_xp));
    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = i + 1;
    }
    rows
}
