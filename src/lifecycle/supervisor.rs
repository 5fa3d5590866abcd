//! Fan-out / fan-in supervision of workers.
//!
//! # Responsibilities
//! - Run every registered worker as an independent task
//! - Cancel the shared token as soon as any worker returns
//! - Wait for all workers and report the first failure
//!
//! # Design Decisions
//! - `JoinSet` is the completion tracker; the join loop is the only writer
//!   of the aggregate result, so first-write-wins needs no atomics
//! - "First" means first observed completion, not registration order. When
//!   several workers fail the reported one may differ between runs
//! - Panics are caught per worker and reported like any other failure

use futures_util::future::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use thiserror::Error;
use tokio::task::{JoinError, JoinSet};

use crate::lifecycle::shutdown::CancellationToken;
use crate::lifecycle::worker::{FnWorker, Worker, WorkerError};
use crate::observability::metrics;

/// Aggregate failure of a supervised run.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// A worker returned an error.
    #[error("worker `{worker}` exited: {source}")]
    Worker {
        worker: String,
        #[source]
        source: WorkerError,
    },

    /// A worker task was aborted before it could report.
    #[error("worker task aborted: {0}")]
    Join(#[from] JoinError),
}

impl SupervisorError {
    /// The underlying worker error, if the failure came from a worker.
    pub fn worker_error(&self) -> Option<&WorkerError> {
        match self {
            SupervisorError::Worker { source, .. } => Some(source),
            SupervisorError::Join(_) => None,
        }
    }
}

/// Runs workers concurrently and enforces "one exits, all exit".
pub struct Supervisor {
    token: CancellationToken,
    workers: Vec<Box<dyn Worker>>,
}

impl Supervisor {
    /// Create a supervisor around the given root token.
    pub fn new(token: CancellationToken) -> Self {
        Self {
            token,
            workers: Vec::new(),
        }
    }

    /// The shared token, for collaborators that need to trigger cancellation.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Number of registered workers.
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Add a worker to the run set.
    pub fn register<W: Worker>(&mut self, worker: W) -> &mut Self {
        tracing::debug!(worker = worker.name(), "Worker registered");
        self.workers.push(Box::new(worker));
        self
    }

    /// Add an async closure as a worker.
    pub fn register_fn<F, Fut>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), WorkerError>> + Send + 'static,
    {
        self.register(FnWorker::new(name, f))
    }

    /// Run all workers to completion.
    ///
    /// The token is cancelled as soon as any worker returns, whatever its
    /// outcome. Returns once every worker has returned, with the first error
    /// observed (if any).
    pub async fn run(self) -> Result<(), SupervisorError> {
        let Self { token, workers } = self;

        if workers.is_empty() {
            tracing::warn!("Supervisor started with no workers");
            return Ok(());
        }

        let mut tasks = JoinSet::new();
        let count = workers.len();

        for worker in workers {
            let name = worker.name().to_string();
            let token = token.clone();

            tasks.spawn(async move {
                let result = AssertUnwindSafe(worker.run(token.clone()))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|payload| Err(WorkerError::Panicked(panic_message(payload))));

                if token.trigger() {
                    tracing::info!(worker = %name, "Worker exited first, cancelling siblings");
                }
                (name, result)
            });
        }

        tracing::info!(workers = count, "Supervisor running");

        let mut first_error: Option<SupervisorError> = None;

        while let Some(joined) = tasks.join_next().await {
            let (name, result) = match joined {
                Ok(exit) => exit,
                Err(err) => {
                    token.trigger();
                    tracing::error!(error = %err, "Worker task aborted");
                    first_error.get_or_insert(SupervisorError::Join(err));
                    continue;
                }
            };

            match result {
                Ok(()) => {
                    metrics::record_worker_exit(&name, "clean");
                    tracing::info!(worker = %name, "Worker stopped cleanly");
                }
                Err(err) => {
                    let outcome = match err {
                        WorkerError::Panicked(_) => "panic",
                        _ => "error",
                    };
                    metrics::record_worker_exit(&name, outcome);
                    tracing::warn!(worker = %name, error = %err, "Worker exited with error");

                    if first_error.is_none() {
                        first_error = Some(SupervisorError::Worker {
                            worker: name,
                            source: err,
                        });
                    }
                }
            }
        }

        tracing::info!("All workers stopped");

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
