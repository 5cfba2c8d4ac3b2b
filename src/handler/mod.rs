//! Handler-side seams: controllers, injected arguments, before-middleware.
//!
//! # Data Flow
//! ```text
//! RouteRegistry::register_handler(Arc<dyn Controller>)
//!     → one shared instance per controller for the process lifetime
//!
//! Per request:
//!     MiddlewareRef::instantiate() → fresh BeforeMiddleware → handle(req, next)
//!     → Arguments (resolved by params::resolver)
//!     → Controller::call(method, args) → Response
//! ```
//!
//! # Design Decisions
//! - Dispatch to a controller method is by name, mirroring how routes are declared
//! - Arguments are positional, aligned with the declared parameter indices
//! - Middleware references are factories so each request gets its own instance

pub mod args;
pub mod controller;
pub mod middleware;

pub use args::{Argument, Arguments};
pub use controller::{BoxError, Controller, UnknownMethod};
pub use middleware::{BeforeMiddleware, MiddlewareRef};
