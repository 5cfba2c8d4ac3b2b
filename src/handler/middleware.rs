//! Before-middleware run ahead of a controller method.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{body::Body, http::Request, middleware::Next, response::Response};

use crate::handler::controller::BoxError;

/// Logic that runs before a bound controller method.
///
/// Call `next.run(req)` to continue the chain, or return a response to stop it.
#[async_trait]
pub trait BeforeMiddleware: Send + Sync + 'static {
    async fn handle(&self, req: Request<Body>, next: Next) -> Response;
}

type Factory = dyn Fn() -> Result<Arc<dyn BeforeMiddleware>, BoxError> + Send + Sync;

/// Reference to a middleware type, instantiated afresh for every request.
#[derive(Clone)]
pub struct MiddlewareRef {
    name: &'static str,
    factory: Arc<Factory>,
}

impl MiddlewareRef {
    /// Reference a middleware type constructed through `Default`.
    pub fn of<M>() -> Self
    where
        M: BeforeMiddleware + Default,
    {
        Self {
            name: std::any::type_name::<M>(),
            factory: Arc::new(|| -> Result<Arc<dyn BeforeMiddleware>, BoxError> { Ok(Arc::new(M::default())) }),
        }
    }

    /// Reference a middleware built by a fallible factory.
    pub fn from_factory<F, M>(name: &'static str, factory: F) -> Self
    where
        F: Fn() -> Result<M, BoxError> + Send + Sync + 'static,
        M: BeforeMiddleware,
    {
        Self {
            name,
            factory: Arc::new(move || factory().map(|m| Arc::new(m) as Arc<dyn BeforeMiddleware>)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn instantiate(&self) -> Result<Arc<dyn BeforeMiddleware>, BoxError> {
        (self.factory)()
    }
}

impl fmt::Debug for MiddlewareRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareRef").field("name", &self.name).finish()
    }
}
