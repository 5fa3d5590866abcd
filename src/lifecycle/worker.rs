//! The worker contract.
//!
//! A worker is any long-running unit of work that receives the shared
//! [`CancellationToken`] and runs until it fails, finishes on its own, or
//! observes cancellation. Returning `Ok(())` means a clean stop; every other
//! terminal condition is a [`WorkerError`], including intentional ones such
//! as a termination signal.

use futures_util::future::{BoxFuture, FutureExt};
use std::future::Future;
use thiserror::Error;

use crate::lifecycle::shutdown::CancellationToken;
use crate::lifecycle::signals::SignalName;

/// Boxed error for workers that fail with arbitrary error types.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Terminal failure of a single worker.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// The HTTP listener could not be bound.
    #[error("failed to start listener on {address}: {source}")]
    ListenerStart {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP server failed for a reason other than intentional shutdown.
    #[error("HTTP server failed: {0}")]
    Serve(#[source] std::io::Error),

    /// A termination-class signal was received.
    #[error("exit requested by signal {signal}")]
    ShutdownRequested { signal: SignalName },

    /// A signal handler could not be installed.
    #[error("failed to watch signal {signal}: {source}")]
    SignalSetup {
        signal: SignalName,
        #[source]
        source: std::io::Error,
    },

    /// A signal subscription ended while the worker was still watching it.
    #[error("signal stream for {signal} closed unexpectedly")]
    SignalStream { signal: SignalName },

    /// The worker panicked.
    #[error("worker panicked: {0}")]
    Panicked(String),

    /// Any other failure.
    #[error(transparent)]
    Other(BoxError),
}

impl WorkerError {
    /// Wrap an arbitrary error or message.
    pub fn other(err: impl Into<BoxError>) -> Self {
        Self::Other(err.into())
    }
}

/// A cancelable, long-running unit of work.
pub trait Worker: Send + 'static {
    /// Name used in logs, metrics and errors.
    fn name(&self) -> &str;

    /// Run until failure, natural completion, or cancellation of `token`.
    fn run(self: Box<Self>, token: CancellationToken) -> BoxFuture<'static, Result<(), WorkerError>>;
}

/// Adapter turning an async closure into a [`Worker`].
pub struct FnWorker<F> {
    name: String,
    f: F,
}

impl<F> FnWorker<F> {
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F, Fut> Worker for FnWorker<F>
where
    F: FnOnce(CancellationToken) -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), WorkerError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn run(self: Box<Self>, token: CancellationToken) -> BoxFuture<'static, Result<(), WorkerError>> {
        (self.f)(token).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_error_displays_message() {
        let err = WorkerError::other("boom");
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_shutdown_requested_names_signal() {
        let err = WorkerError::ShutdownRequested {
            signal: SignalName::Terminate,
        };
        assert_eq!(err.to_string(), "exit requested by signal SIGTERM");
    }

    #[tokio::test]
    async fn test_fn_worker_runs_closure() {
        let worker: Box<dyn Worker> = Box::new(FnWorker::new("noop", |token: CancellationToken| async move {
            token.trigger();
            Ok::<(), WorkerError>(())
        }));
        assert_eq!(worker.name(), "noop");

        let token = CancellationToken::new();
        worker.run(token.clone()).await.unwrap();
        assert!(token.is_cancelled());
    }
}
