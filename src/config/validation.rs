//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (grace period > 0, timeouts > 0)
//! - Detect conflicting signal sets
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::lifecycle::signals::SignalName;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("http.bind_address must not be empty")]
    EmptyBindAddress,

    #[error("http.shutdown_path must start with '/': {0:?}")]
    InvalidShutdownPath(String),

    #[error("http.shutdown_path must be a literal path without captures or wildcards: {0:?}")]
    PatternShutdownPath(String),

    #[error("http.request_timeout_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("shutdown.grace_period_secs must be greater than zero")]
    ZeroGracePeriod,

    #[error("signals.terminate must contain at least one signal")]
    NoTerminateSignals,

    #[error("signal {0} is listed in both signals.terminate and signals.observe")]
    OverlappingSignal(SignalName),

    #[error("observability.metrics_address is not a socket address: {0:?}")]
    InvalidMetricsAddress(String),
}

/// Validate the configuration, collecting every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.http.bind_address.trim().is_empty() {
        errors.push(ValidationError::EmptyBindAddress);
    }

    if !config.http.shutdown_path.starts_with('/') {
        errors.push(ValidationError::InvalidShutdownPath(config.http.shutdown_path.clone()));
    } else if !is_literal_path(&config.http.shutdown_path) {
        errors.push(ValidationError::PatternShutdownPath(config.http.shutdown_path.clone()));
    }

    if config.http.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.shutdown.grace_period_secs == 0 {
        errors.push(ValidationError::ZeroGracePeriod);
    }

    if config.signals.terminate.is_empty() {
        errors.push(ValidationError::NoTerminateSignals);
    }

    for signal in &config.signals.terminate {
        if config.signals.observe.contains(signal) {
            errors.push(ValidationError::OverlappingSignal(*signal));
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Route paths the router accepts verbatim: no `{capture}`, `*wildcard`
/// or legacy `:param` segments.
fn is_literal_path(path: &str) -> bool {
    !path.contains(['{', '}', '*']) && !path.split('/').any(|segment| segment.starts_with(':'))
}
