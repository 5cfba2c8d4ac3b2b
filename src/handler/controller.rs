//! Controller trait implemented by handler types.

use async_trait::async_trait;
use axum::response::Response;
use thiserror::Error;

use crate::handler::args::Arguments;

/// Error type returned by controllers and middleware factories.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A handler type whose methods are bound to routes.
///
/// One instance is registered per controller and shared by every request.
/// Returning a [`ParamError`](crate::params::ParamError) from `call` is
/// answered with `400 Bad Request`, exactly like a resolution failure.
#[async_trait]
pub trait Controller: Send + Sync + 'static {
    /// Name routes and bindings refer to this controller by.
    fn name(&self) -> &str;

    /// Invoke `method` with the resolved arguments.
    async fn call(&self, method: &str, args: Arguments) -> Result<Response, BoxError>;
}

/// Returned by a controller asked to run a method it does not have.
#[derive(Debug, Error)]
#[error("controller '{controller}' has no method '{method}'")]
pub struct UnknownMethod {
    pub controller: String,
    pub method: String,
}

impl UnknownMethod {
    pub fn new(controller: &str, method: &str) -> Self {
        Self {
            controller: controller.to_string(),
            method: method.to_string(),
        }
    }
}
