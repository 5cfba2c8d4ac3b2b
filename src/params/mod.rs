//! Request parameter resolution.
//!
//! # Data Flow
//! ```text
//! Request + MethodDescriptor
//!     → resolver.rs (build RequestContext; upload gate first for multipart)
//!     → source.rs (raw value by method and content type)
//!     → coerce.rs (enum lookup or declared-type coercion)
//!     → validate.rs (declared constraints)
//!     → Arguments in declared index order
//! ```
//!
//! # Design Decisions
//! - Absence is decided after coercion: an empty number or an enum miss
//!   falls through to the required/default rule
//! - Optional parameters never receive their default
//! - Resolution reads only the current request and the frozen descriptor

pub mod coerce;
pub mod error;
pub mod resolver;
pub mod source;
pub mod validate;
pub mod value;

pub use error::ParamError;
pub use resolver::{resolve, resolve_bindings, ResolveError};
pub use source::{ContentKind, RequestBody, RequestContext};
pub use validate::Constraint;
pub use value::{ParamKind, ParamValue};
