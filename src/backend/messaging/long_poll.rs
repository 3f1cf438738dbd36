//! Long-Poll Coordinator
//!
//! Answers "messages in this conversation newer than `since`" either
//! immediately or after waiting up to the configured ceiling.
//!
//! # Wake-up
//!
//! Waiters do not spin on a fixed sleep. Every successful persist bumps a
//! `watch` counter (`PersistSignal`) and each waiter re-queries as soon as it
//! changes. The interval re-query stays as a fallback so writes from another
//! process sharing the database are still seen within one interval.
//!
//! The waiter marks the signal as seen *before* each query, so a persist that
//! lands between the query and the wait still wakes it.
//!
//! # Outcomes
//!
//! A timeout and an interrupted wait (server shutdown) both resolve to an
//! empty list at the HTTP layer. A client disconnect simply drops the future.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{sleep_until, Instant};
use uuid::Uuid;

use crate::backend::server::shutdown::Shutdown;
use crate::backend::store::{MessageStore, StoreResult};
use crate::shared::messaging::Message;

/// Bumped after every message persisted by this process
#[derive(Clone, Debug)]
pub struct PersistSignal {
    tx: Arc<watch::Sender<u64>>,
}

impl Default for PersistSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl PersistSignal {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }

    pub fn notify(&self) {
        self.tx.send_modify(|generation| *generation = generation.wrapping_add(1));
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Longest a single poll may wait
    pub ceiling: Duration,
    /// Fallback re-query period
    pub interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            ceiling: Duration::from_secs(30),
            interval: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Delivered(Vec<Message>),
    TimedOut,
    Interrupted,
}

impl PollOutcome {
    pub fn into_messages(self) -> Vec<Message> {
        match self {
            PollOutcome::Delivered(messages) => messages,
            PollOutcome::TimedOut | PollOutcome::Interrupted => Vec::new(),
        }
    }
}

#[derive(Clone)]
pub struct LongPollCoordinator {
    store: Arc<dyn MessageStore>,
    signal: PersistSignal,
    shutdown: Shutdown,
    settings: PollSettings,
}

impl LongPollCoordinator {
    pub fn new(
        store: Arc<dyn MessageStore>,
        signal: PersistSignal,
        shutdown: Shutdown,
        settings: PollSettings,
    ) -> Self {
        Self {
            store,
            signal,
            shutdown,
            settings,
        }
    }

    pub fn settings(&self) -> PollSettings {
        self.settings
    }

    /// Wait for non-deleted messages between `user1` and `user2` with
    /// `created_at > since`.
    ///
    /// Holds no lock while waiting. Only store failures are errors.
    pub async fn wait_for_messages(
        &self,
        user1: Uuid,
        user2: Uuid,
        since: i64,
    ) -> StoreResult<PollOutcome> {
        let deadline = Instant::now() + self.settings.ceiling;
        let mut persisted = self.signal.subscribe();
        let mut shutdown = self.shutdown.subscribe();
        let mut persisted_open = true;
        let mut shutdown_open = true;

        loop {
            if *shutdown.borrow_and_update() {
                tracing::debug!("[LongPoll] Interrupted by shutdown");
                return Ok(PollOutcome::Interrupted);
            }

            persisted.borrow_and_update();
            let found = self.store.messages_since(user1, user2, since).await?;
            if !found.is_empty() {
                tracing::debug!(
                    "[LongPoll] Delivering {} messages for {} <-> {}",
                    found.len(),
                    user1,
                    user2
                );
                return Ok(PollOutcome::Delivered(found));
            }

            let now = Instant::now();
            if now >= deadline {
                return Ok(PollOutcome::TimedOut);
            }
            let next_check = (now + self.settings.interval).min(deadline);

            tokio::select! {
                changed = persisted.changed(), if persisted_open => {
                    if changed.is_err() {
                        persisted_open = false;
                    }
                }
                changed = shutdown.changed(), if shutdown_open => {
                    if changed.is_err() {
                        shutdown_open = false;
                    }
                }
                _ = sleep_until(next_check) => {}
            }
        }
    }
}
