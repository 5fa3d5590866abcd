//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Create root token → Register workers → Supervisor::run
//!
//! Supervision (supervisor.rs):
//!     Spawn every worker → first worker returns → trigger token
//!     → siblings observe cancellation → join all → first error wins
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGHUP/SIGQUIT/SIGINT → ShutdownRequested (worker exits)
//!     Other watched signals         → logged, ignored
//! ```
//!
//! # Design Decisions
//! - One exits, all exit: any worker return cancels the shared token
//! - Cancellation is cooperative; workers await the token themselves
//! - `Supervisor::run` consumes the supervisor, so it runs at most once

pub mod shutdown;
pub mod signals;
pub mod startup;
pub mod supervisor;
pub mod worker;

pub use shutdown::CancellationToken;
pub use signals::{SignalName, SignalWorker};
pub use supervisor::{Supervisor, SupervisorError};
pub use worker::{Worker, WorkerError};
