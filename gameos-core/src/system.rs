//! Simulated memory accounting and the system report.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const OS_NAME: &str = "GameOS";
pub const OS_VERSION: &str = "1.0 Gaming Edition";

/// Physical memory of the simulated machine, in KB.
pub const TOTAL_MEMORY_KB: u64 = 8192;

/// Memory reserved by the kernel at boot, in KB.
pub const BASE_MEMORY_RANGE_KB: std::ops::RangeInclusive<u64> = 1000..=2000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemoryStatus {
    pub total_kb: u64,
    pub used_kb: u64,
    pub free_kb: u64,
    pub utilization: f64,
}

/// Tracks the fixed kernel footprint; process memory is added on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryManager {
    base_kb: u64,
}

impl MemoryManager {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            base_kb: rng.gen_range(BASE_MEMORY_RANGE_KB),
        }
    }

    pub fn base_kb(&self) -> u64 {
        self.base_kb
    }

    /// Usage with `process_kb` of resident process memory, capped at the total.
    pub fn status(&self, process_kb: u64) -> MemoryStatus {
        let used_kb = self.base_kb.saturating_add(process_kb).min(TOTAL_MEMORY_KB);
        MemoryStatus {
            total_kb: TOTAL_MEMORY_KB,
            used_kb,
            free_kb: TOTAL_MEMORY_KB - used_kb,
            utilization: used_kb as f64 / TOTAL_MEMORY_KB as f64 * 100.0,
        }
    }
}

/// Snapshot for the `top` command and dashboards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    pub os_name: String,
    pub version: String,
    pub uptime_secs: i64,
    pub boot_time: DateTime<Utc>,
    pub memory: MemoryStatus,
    pub active_processes: usize,
    pub level: u32,
    pub total_xp: u64,
}

/// Format seconds as `H:MM:SS`.
pub fn format_uptime(secs: i64) -> String {
    let secs = secs.max(0);
    format!("{}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}
