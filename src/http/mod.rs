//! HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (HttpWorker: bind, serve, graceful shutdown)
//!     → request.rs (request ID generation and propagation)
//!     → routes.rs (shutdown endpoint → triggers the shared token)
//! ```

pub mod request;
pub mod routes;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use routes::build_router;
pub use server::HttpWorker;
