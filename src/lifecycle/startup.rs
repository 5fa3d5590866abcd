//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the fixed worker set from validated configuration
//! - Hand the root token to every collaborator that may trigger it
//!
//! # Design Decisions
//! - Fail fast: configuration errors surface before any worker starts
//! - Workers bind their own resources when they start, so a bind failure
//!   is a worker exit and cancels the rest

use crate::config::AppConfig;
use crate::http::HttpWorker;
use crate::lifecycle::shutdown::CancellationToken;
use crate::lifecycle::signals::SignalWorker;
use crate::lifecycle::supervisor::{Supervisor, SupervisorError};

/// Register the HTTP worker and the signal worker on a new supervisor.
pub fn build_supervisor(config: &AppConfig, token: CancellationToken) -> Supervisor {
    let mut supervisor = Supervisor::new(token.clone());
    supervisor
        .register(HttpWorker::from_config(config, token))
        .register(SignalWorker::from_config(&config.signals));
    supervisor
}

/// Run the service until any worker exits.
pub async fn run(config: &AppConfig) -> Result<(), SupervisorError> {
    tracing::info!(
        bind_address = %config.http.bind_address,
        shutdown_path = %config.http.shutdown_path,
        grace_period_secs = config.shutdown.grace_period_secs,
        "Starting workers"
    );

    build_supervisor(config, CancellationToken::new()).run().await
}
