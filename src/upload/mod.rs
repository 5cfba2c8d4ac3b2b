//! Upload gate for multipart requests.
//!
//! # Data Flow
//! ```text
//! multipart/form-data request
//!     → file.rs (accepted fields derived from the route's file bindings)
//!     → gate.rs (stream parts, enforce field set, counts, and size)
//!     → RequestContext.files + RequestBody::Multipart
//!     → parameter resolution
//! ```
//!
//! # Design Decisions
//! - Runs before any parameter is resolved; file bindings depend on it
//! - Only fields declared as file parameters may carry files
//! - File contents are buffered in memory, bounded per file

pub mod file;
pub mod gate;

pub use file::{upload_fields, UploadField, UploadedFile};
pub use gate::{accept_uploads, MultipartData, UploadError};
