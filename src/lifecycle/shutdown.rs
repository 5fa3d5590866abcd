//! Shutdown coordination: the shared cancellation token.

use std::sync::Arc;
use tokio::sync::watch;

/// One-shot, broadcast cancellation signal.
///
/// Every clone observes the same state. The token moves from live to
/// cancelled exactly once and never back. Waiters that subscribe after the
/// transition return immediately, so no wakeup can be missed.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    /// Latest-value broadcast; `true` once cancelled.
    state: Arc<watch::Sender<bool>>,
}

impl CancellationToken {
    /// Create a new live token.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { state: Arc::new(tx) }
    }

    /// Cancel the token, waking every current and future waiter.
    ///
    /// Returns `true` only for the call that performed the transition.
    pub fn trigger(&self) -> bool {
        self.state.send_if_modified(|cancelled| {
            if *cancelled {
                false
            } else {
                *cancelled = true;
                true
            }
        })
    }

    /// Non-blocking check of the current state.
    pub fn is_cancelled(&self) -> bool {
        *self.state.borrow()
    }

    /// Wait until the token is cancelled.
    pub async fn cancelled(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}
