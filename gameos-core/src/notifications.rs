//! Bounded log of user-facing event messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximum number of notifications retained.
pub const MAX_NOTIFICATIONS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NotificationKind {
    #[default]
    Success,
    Info,
    LevelUp,
    Achievement,
    Mission,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub kind: NotificationKind,
    pub time: DateTime<Utc>,
}

/// FIFO queue keeping the most recent notifications.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationQueue {
    entries: VecDeque<Notification>,
    next_id: u64,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a notification and evict the oldest beyond the bound.
    pub fn push(
        &mut self,
        message: impl Into<String>,
        kind: NotificationKind,
        time: DateTime<Utc>,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        self.entries.push_back(Notification {
            id,
            message: message.into(),
            kind,
            time,
        });

        while self.entries.len() > MAX_NOTIFICATIONS {
            self.entries.pop_front();
        }

        id
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.entries.back()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
