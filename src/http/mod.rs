//! HTTP server bootstrap.
//!
//! # Data Flow
//! ```text
//! AppConfig + RouteRegistry
//!     → server.rs (attach_routes, bind, serve until shutdown)
//!     → request.rs (x-request-id on every request)
//! ```

pub mod request;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{AppServer, Shutdown};
