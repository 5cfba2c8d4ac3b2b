//! Assembly and dispatch errors.

use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::handler::BoxError;
use crate::params::{ParamError, ResolveError};
use crate::upload::UploadError;

/// Startup-fatal problems found while assembling routes.
#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("route {handler}.{method} references unregistered handler '{handler}'")]
    MissingHandler { handler: String, method: String },

    #[error("{handler}.{method}: no binding for parameter {index}")]
    ParamGap {
        handler: String,
        method: String,
        index: usize,
    },

    #[error("duplicate route {http_method} {path}")]
    DuplicateRoute { http_method: Method, path: String },

    #[error("{handler}.{method}: invalid route path '{path}': {reason}")]
    InvalidPath {
        handler: String,
        method: String,
        path: String,
        reason: String,
    },

    /// Two paths with the same shape but different capture names.
    #[error("route '{path}' conflicts with '{existing}'")]
    ConflictingRoute { path: String, existing: String },

    #[error("{handler}.{method}: unsupported HTTP method {http_method}")]
    UnsupportedMethod {
        handler: String,
        method: String,
        http_method: Method,
    },

    #[error("{handler}.{method}: middleware '{middleware}' failed to instantiate: {source}")]
    Middleware {
        handler: String,
        method: String,
        middleware: &'static str,
        #[source]
        source: BoxError,
    },
}

/// Failure while serving one request through an assembled route.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Answered with 400 and the error message.
    #[error(transparent)]
    Param(#[from] ParamError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("{message}")]
    Body { status: StatusCode, message: String },

    #[error("middleware '{name}' failed to instantiate: {source}")]
    Middleware {
        name: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("handler {handler}.{method} failed: {source}")]
    Handler {
        handler: String,
        method: String,
        #[source]
        source: BoxError,
    },
}

impl From<ResolveError> for DispatchError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::Param(e) => DispatchError::Param(e),
            ResolveError::Upload(e) => DispatchError::Upload(e),
            ResolveError::Body { status, message } => DispatchError::Body { status, message },
        }
    }
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        match self {
            DispatchError::Param(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
            DispatchError::Upload(e) => {
                tracing::warn!(error = %e, "Upload rejected");
                (e.status(), e.to_string()).into_response()
            }
            DispatchError::Body { status, message } => (status, message).into_response(),
            e @ (DispatchError::Middleware { .. } | DispatchError::Handler { .. }) => {
                tracing::error!(error = %e, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}
