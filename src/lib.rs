//! Coordinated lifecycle for a small set of long-running workers.
//!
//! A [`Supervisor`] runs every registered [`Worker`] concurrently and shares
//! one [`CancellationToken`] with all of them. The first worker to return,
//! for whatever reason, cancels the token; the supervisor then waits for the
//! rest and reports the first error.
//!
//! # Architecture Overview
//!
//! ```text
//!   main.rs ── config ── startup::build_supervisor
//!                              │
//!                              ▼
//!                       ┌─────────────┐   trigger on first exit
//!                       │ Supervisor  │─────────────────────────┐
//!                       └──────┬──────┘                         │
//!                  spawn       │        spawn                   ▼
//!             ┌────────────────┴──────────────┐       ┌───────────────────┐
//!             ▼                               ▼       │ CancellationToken │
//!      ┌─────────────┐                 ┌─────────────┐└───────────────────┘
//!      │ HttpWorker  │  /shutdown ───▶ │SignalWorker │   observed by all
//!      └─────────────┘   (trigger)     └─────────────┘
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::AppConfig;
pub use http::HttpWorker;
pub use lifecycle::{
    CancellationToken, SignalName, SignalWorker, Supervisor, SupervisorError, Worker, WorkerError,
};
