//! Simulated process table.
//!
//! Pids are handed out monotonically and never reused. The first
//! [`RESERVED_PIDS`] pids belong to the bootstrap processes and can't be killed.

use crate::fs::FailureKind;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

pub type Pid = u32;

/// Pids 1..=RESERVED_PIDS are system processes.
pub const RESERVED_PIDS: Pid = 4;

/// Simulated memory footprint range, in KB.
pub const MEMORY_RANGE_KB: std::ops::RangeInclusive<u32> = 100..=500;

/// Processes started at boot, in pid order.
pub const BOOTSTRAP_PROCESSES: [(&str, &str); 4] = [
    ("init", "/sbin/init"),
    ("kernel", "/kernel/main"),
    ("gamemaster", "/usr/bin/gamemaster"),
    ("desktop", "/usr/bin/desktop"),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessError {
    #[error("kill: ({0}) - No such process")]
    NotFound(Pid),

    #[error("kill: ({0}) - Operation not permitted on system process")]
    Protected(Pid),

    #[error("kill: ({0}) - Process already terminated")]
    AlreadyTerminated(Pid),
}

impl ProcessError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ProcessError::NotFound(_) => FailureKind::NotFound,
            ProcessError::Protected(_) | ProcessError::AlreadyTerminated(_) => {
                FailureKind::InvalidOperation
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessState {
    Ready,
    Running,
    Terminated,
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessState::Ready => write!(f, "ready"),
            ProcessState::Running => write!(f, "running"),
            ProcessState::Terminated => write!(f, "terminated"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessEntry {
    pub pid: Pid,
    pub name: String,
    pub command: String,
    pub state: ProcessState,
    pub memory_kb: u32,
    /// Scheduler ticks spent alive.
    pub cpu_time: u64,
    pub created_at: DateTime<Utc>,
}

impl ProcessEntry {
    pub fn is_alive(&self) -> bool {
        self.state != ProcessState::Terminated
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessTable {
    processes: BTreeMap<Pid, ProcessEntry>,
    next_pid: Pid,
}

impl ProcessTable {
    /// An empty table; the first pid handed out is 1.
    pub fn new() -> Self {
        Self {
            processes: BTreeMap::new(),
            next_pid: 1,
        }
    }

    /// A table holding the bootstrap system processes.
    pub fn with_system_processes<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> Self {
        let mut table = Self::new();
        for (name, command) in BOOTSTRAP_PROCESSES {
            table.create(name, command, rng, now);
        }
        table
    }

    pub fn create<R: Rng + ?Sized>(
        &mut self,
        name: impl Into<String>,
        command: impl Into<String>,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Pid {
        let pid = self.next_pid;
        self.next_pid += 1;

        self.processes.insert(
            pid,
            ProcessEntry {
                pid,
                name: name.into(),
                command: command.into(),
                state: ProcessState::Ready,
                memory_kb: rng.gen_range(MEMORY_RANGE_KB),
                cpu_time: 0,
                created_at: now,
            },
        );
        pid
    }

    pub fn kill(&mut self, pid: Pid) -> Result<(), ProcessError> {
        let entry = self
            .processes
            .get_mut(&pid)
            .ok_or(ProcessError::NotFound(pid))?;
        if pid <= RESERVED_PIDS {
            return Err(ProcessError::Protected(pid));
        }
        if entry.state == ProcessState::Terminated {
            return Err(ProcessError::AlreadyTerminated(pid));
        }
        entry.state = ProcessState::Terminated;
        Ok(())
    }

    pub fn get(&self, pid: Pid) -> Option<&ProcessEntry> {
        self.processes.get(&pid)
    }

    /// Pid order.
    pub fn list(&self) -> Vec<ProcessEntry> {
        self.processes.values().cloned().collect()
    }

    pub fn active_count(&self) -> usize {
        self.processes.values().filter(|p| p.is_alive()).count()
    }

    /// Memory held by live processes, in KB.
    pub fn resident_memory_kb(&self) -> u64 {
        self.processes
            .values()
            .filter(|p| p.is_alive())
            .map(|p| u64::from(p.memory_kb))
            .sum()
    }

    /// Advance the simulated scheduler by one tick.
    pub fn tick(&mut self) {
        for entry in self.processes.values_mut().filter(|p| p.is_alive()) {
            entry.state = ProcessState::Running;
            entry.cpu_time += 1;
        }
    }
}

impl Default for ProcessTable {
    fn default() -> Self {
        Self::new()
    }
}
