//! Annotation-driven HTTP routing on Axum.
//!
//! Controllers declare routes, parameter bindings, and before-middleware into a
//! [`RouteRegistry`]; [`attach_routes`] turns the registry into live routes that
//! resolve, coerce, and validate each declared parameter per request.

pub mod config;
pub mod handler;
pub mod http;
pub mod observability;
pub mod params;
pub mod registry;
pub mod routing;
pub mod upload;

pub use config::{AppConfig, RouterOptions, UploadOptions};
pub use handler::{Argument, Arguments, BeforeMiddleware, BoxError, Controller, MiddlewareRef};
pub use http::AppServer;
pub use params::{Constraint, ParamError, ParamKind, ParamValue, RequestContext};
pub use registry::{ParamBinding, RequestParam, RouteRegistry};
pub use routing::{attach_routes, AssemblyError};
pub use upload::UploadedFile;
