//! HTTP worker.
//!
//! # Responsibilities
//! - Bind the listener (a bind failure is the worker's terminal error)
//! - Serve the router until the shared token is cancelled
//! - Drain in-flight requests, bounded by the grace period
//!
//! # Design Decisions
//! - axum's graceful shutdown stops accepting as soon as the token fires
//! - A serve error seen after cancellation is a clean stop, not a failure
//! - When the grace period elapses the worker returns anyway; connections
//!   still open are dropped with the runtime

use axum::Router;
use futures_util::future::{BoxFuture, FutureExt};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::http::routes::build_router;
use crate::lifecycle::shutdown::CancellationToken;
use crate::lifecycle::worker::{Worker, WorkerError};

/// Where the worker gets its listener from.
enum Bind {
    Address(String),
    Listener(TcpListener),
}

/// Worker serving an axum router until cancellation.
pub struct HttpWorker {
    bind: Bind,
    router: Router,
    grace_period: Duration,
}

impl HttpWorker {
    /// Serve `router` on `address`, binding when the worker starts.
    pub fn new(address: impl Into<String>, router: Router) -> Self {
        Self {
            bind: Bind::Address(address.into()),
            router,
            grace_period: Duration::from_secs(30),
        }
    }

    /// Serve `router` on an already bound listener.
    pub fn with_listener(listener: TcpListener, router: Router) -> Self {
        Self {
            bind: Bind::Listener(listener),
            router,
            grace_period: Duration::from_secs(30),
        }
    }

    /// Build the worker and its routes from configuration.
    pub fn from_config(config: &AppConfig, token: CancellationToken) -> Self {
        let router = build_router(token, &config.http);
        Self::new(config.http.bind_address.clone(), router).grace_period(config.shutdown.grace_period())
    }

    /// Upper bound on draining in-flight requests after cancellation.
    pub fn grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    async fn serve(self, token: CancellationToken) -> Result<(), WorkerError> {
        let listener = match self.bind {
            Bind::Listener(listener) => listener,
            Bind::Address(address) => {
                let bound = TcpListener::bind(address.as_str()).await;
                bound.map_err(|source| WorkerError::ListenerStart { address, source })?
            }
        };

        let local_addr: SocketAddr = listener.local_addr().map_err(WorkerError::Serve)?;
        tracing::info!(address = %local_addr, "HTTP server starting");

        let shutdown = token.clone();
        let server = axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!(address = %local_addr, "HTTP server shutting down");
            })
            .into_future();

        let grace_period = self.grace_period;
        let deadline = async {
            token.cancelled().await;
            tokio::time::sleep(grace_period).await;
        };

        tokio::select! {
            result = server => match result {
                Ok(()) => {
                    tracing::info!(address = %local_addr, "HTTP server stopped");
                    Ok(())
                }
                Err(err) if token.is_cancelled() => {
                    tracing::debug!(error = %err, "Listener closed during shutdown");
                    Ok(())
                }
                Err(err) => Err(WorkerError::Serve(err)),
            },
            _ = deadline => {
                tracing::warn!(
                    address = %local_addr,
                    grace_period_secs = grace_period.as_secs(),
                    "Grace period elapsed, abandoning open connections"
                );
                Ok(())
            }
        }
    }
}

impl Worker for HttpWorker {
    fn name(&self) -> &str {
        "http"
    }

    fn run(self: Box<Self>, token: CancellationToken) -> BoxFuture<'static, Result<(), WorkerError>> {
        self.serve(token).boxed()
    }
}
