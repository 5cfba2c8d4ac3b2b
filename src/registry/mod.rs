//! Route metadata registry.
//!
//! # Data Flow
//! ```text
//! Declarations (any order, load time):
//!     register_handler / register_route / register_middleware / register_param
//!     → registry.rs (merge into MethodDescriptor per controller + method)
//!
//! Startup:
//!     RouteRegistry (consumed by routing::attach_routes)
//!     → frozen Arc<MethodDescriptor> per route
//! ```
//!
//! # Design Decisions
//! - One registry per application, passed explicitly; no process globals
//! - Registration never fails; consistency is checked once at assembly
//! - Write-then-freeze is enforced by ownership: assembly consumes the registry

pub mod descriptor;
#[allow(clippy::module_inception)]
pub mod registry;

pub use descriptor::{MethodDescriptor, ParamBinding, ParamOptions, RequestParam, RouteSpec};
pub use registry::{MethodBuilder, RouteRegistry};
