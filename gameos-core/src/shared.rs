//! Shared handle for front-ends with several callers.
//!
//! Every operation takes the one session lock for its full duration, so a
//! reader never observes a half-applied reward chain.

use crate::session::{GameSession, SessionConfig, SessionError, SessionSnapshot};
use crate::terminal::CommandOutput;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

#[derive(Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<GameSession>>,
}

impl SharedSession {
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        Ok(Self::from_session(GameSession::new(config)?))
    }

    pub fn from_session(session: GameSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Lock the session for a sequence of calls.
    pub async fn lock(&self) -> MutexGuard<'_, GameSession> {
        self.inner.lock().await
    }

    pub async fn execute_command(&self, line: &str) -> CommandOutput {
        self.inner.lock().await.execute_command(line)
    }

    pub async fn tick(&self) {
        self.inner.lock().await.tick();
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.inner.lock().await.snapshot()
    }
}
