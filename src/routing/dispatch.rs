//! Per-request invocation of a bound controller method.
//!
//! # Responsibilities
//! - Resolve arguments for the frozen descriptor
//! - Invoke the controller method once, awaiting completion
//! - Answer parameter errors with 400 and stop the chain
//! - Hand every other failure to `DispatchError`'s response mapping

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::UploadOptions;
use crate::handler::{Controller, MiddlewareRef};
use crate::observability::metrics;
use crate::params::{self, ParamError};
use crate::registry::MethodDescriptor;
use crate::routing::error::DispatchError;

/// Everything one assembled route needs at request time.
#[derive(Clone)]
pub struct BoundMethod {
    pub controller: Arc<dyn Controller>,
    pub descriptor: Arc<MethodDescriptor>,
    pub upload: Arc<UploadOptions>,
}

/// Terminal handler of an assembled route.
pub async fn dispatch(bound: BoundMethod, req: Request<Body>) -> Response {
    let start = Instant::now();
    let handler = bound.descriptor.handler();
    let method = bound.descriptor.method();

    let response = match invoke(&bound, req).await {
        Ok(response) => response,
        Err(DispatchError::Param(e)) => {
            tracing::debug!(handler = %handler, method = %method, error = %e, "Parameter rejected");
            metrics::record_param_error(handler, &e);
            DispatchError::Param(e).into_response()
        }
        Err(e) => e.into_response(),
    };

    metrics::record_dispatch(handler, method, response.status().as_u16(), start);
    response
}

async fn invoke(bound: &BoundMethod, req: Request<Body>) -> Result<Response, DispatchError> {
    let descriptor = &bound.descriptor;
    let args = params::resolve(req, descriptor, &bound.upload).await?;

    tracing::debug!(
        handler = %descriptor.handler(),
        method = %descriptor.method(),
        args = args.len(),
        "Invoking handler"
    );

    bound
        .controller
        .call(descriptor.method(), args)
        .await
        .map_err(|source| match source.downcast::<ParamError>() {
            Ok(param) => DispatchError::Param(*param),
            Err(source) => DispatchError::Handler {
                handler: descriptor.handler().to_string(),
                method: descriptor.method().to_string(),
                source,
            },
        })
}

/// Run one before-middleware on a fresh instance.
pub async fn run_before(middleware: MiddlewareRef, req: Request<Body>, next: Next) -> Response {
    match middleware.instantiate() {
        Ok(instance) => instance.handle(req, next).await,
        Err(source) => DispatchError::Middleware {
            name: middleware.name(),
            source,
        }
        .into_response(),
    }
}
