//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Supervisor, workers, HTTP layer produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (worker exits, signals, shutdown requests)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every lifecycle event (worker, signal, error)
//! - Metrics are cheap; recording without an installed exporter is a no-op

pub mod logging;
pub mod metrics;
