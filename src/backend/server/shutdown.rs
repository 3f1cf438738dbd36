//! Process-wide shutdown signal
//!
//! Triggered once by the binary when it receives Ctrl-C. Long polls watch it
//! so they return early, and the cleanup task uses it to stop.

use std::sync::Arc;

use tokio::sync::watch;

#[derive(Clone, Debug)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn trigger(&self) {
        // send_replace never fails, even with no receivers
        self.tx.send_replace(true);
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    /// Resolves once `trigger` has been called
    pub async fn wait(&self) {
        let mut rx = self.subscribe();
        // an Err means the sender is gone, which only happens at teardown
        let _ = rx.wait_for(|triggered| *triggered).await;
    }
}
