//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     RouteRegistry
//!     → assembler.rs (validate, freeze descriptors, build method routers)
//!     → axum::Router with one route per (HTTP method, path)
//!
//! Per request:
//!     before-middleware (declaration order)
//!     → dispatch.rs (resolve parameters, invoke controller)
//!     → error.rs (400 for parameter errors, propagate everything else)
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Path matching is delegated to axum
//! - Exactly one controller invocation per request, no retry

pub mod assembler;
pub mod dispatch;
pub mod error;

pub use assembler::attach_routes;
pub use error::{AssemblyError, DispatchError};
