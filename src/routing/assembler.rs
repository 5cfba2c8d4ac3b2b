//! Route assembly.
//!
//! # Responsibilities
//! - Drain a completed `RouteRegistry` exactly once
//! - Reject inconsistent metadata before any request is served
//! - Build one method router per descriptor: before-middleware + dispatch
//! - Install body limit, request ID, and trace layers on the app
//!
//! # Design Decisions
//! - Consuming the registry makes late registration impossible
//! - Middleware factories are probed once here; failure is startup-fatal
//! - Paths are validated before insertion; axum panics on paths it rejects
//! - Layers are applied innermost-first so the first declared middleware runs first

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{HeaderName, Method, Request},
    middleware::{self, Next},
    routing::{on, MethodFilter, MethodRouter},
    Router,
};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::RouterOptions;
use crate::http::request::{UuidRequestId, X_REQUEST_ID};
use crate::registry::{MethodDescriptor, RouteRegistry};
use crate::routing::dispatch::{dispatch, run_before, BoundMethod};
use crate::routing::error::AssemblyError;

/// Attach every routed descriptor in `registry` to `app`.
pub fn attach_routes(app: Router, registry: RouteRegistry, options: &RouterOptions) -> Result<Router, AssemblyError> {
    let (handlers, descriptors) = registry.into_parts();
    let upload = Arc::new(options.upload.clone());

    let mut routes = Router::new();
    let mut seen: HashSet<(Method, String)> = HashSet::new();
    let mut shapes: HashMap<String, String> = HashMap::new();
    let mut attached = 0usize;

    for descriptor in descriptors {
        let Some(route) = descriptor.route().cloned() else {
            tracing::warn!(
                handler = %descriptor.handler(),
                method = %descriptor.method(),
                "Skipping metadata without a route"
            );
            continue;
        };

        let controller = handlers
            .get(descriptor.handler())
            .cloned()
            .ok_or_else(|| AssemblyError::MissingHandler {
                handler: descriptor.handler().to_string(),
                method: descriptor.method().to_string(),
            })?;

        check_descriptor(&descriptor)?;

        let shape = path_shape(&route.path).map_err(|reason| AssemblyError::InvalidPath {
            handler: descriptor.handler().to_string(),
            method: descriptor.method().to_string(),
            path: route.path.clone(),
            reason: reason.to_string(),
        })?;
        if let Some(existing) = shapes.get(&shape).filter(|existing| **existing != route.path) {
            return Err(AssemblyError::ConflictingRoute {
                path: route.path,
                existing: existing.clone(),
            });
        }
        shapes.insert(shape, route.path.clone());

        if !seen.insert((route.http_method.clone(), route.path.clone())) {
            return Err(AssemblyError::DuplicateRoute {
                http_method: route.http_method,
                path: route.path,
            });
        }

        let filter = MethodFilter::try_from(route.http_method.clone()).map_err(|_| AssemblyError::UnsupportedMethod {
            handler: descriptor.handler().to_string(),
            method: descriptor.method().to_string(),
            http_method: route.http_method.clone(),
        })?;

        let handler = descriptor.handler().to_string();
        let method = descriptor.method().to_string();
        tracing::info!(
            http_method = %route.http_method,
            path = %route.path,
            handler = %descriptor.handler(),
            method = %descriptor.method(),
            befores = descriptor.befores().len(),
            "Attached route"
        );

        let bound = BoundMethod {
            controller,
            descriptor: Arc::new(descriptor),
            upload: Arc::clone(&upload),
        };
        let path = route.path.clone();
        routes = panic::catch_unwind(AssertUnwindSafe(move || routes.route(&path, method_router(filter, bound))))
            .map_err(|payload| AssemblyError::InvalidPath {
                handler,
                method,
                path: route.path,
                reason: panic_reason(payload),
            })?;
        attached += 1;
    }

    tracing::info!(routes = attached, "Route assembly complete");

    Ok(app
        .merge(routes)
        .layer(DefaultBodyLimit::max(options.body_limit_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID)))
        .layer(SetRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID), UuidRequestId)))
}

/// Erase capture names from `path`, rejecting syntax axum would refuse.
///
/// Captures are `{name}` or a trailing `{*name}` and must fill a whole segment.
fn path_shape(path: &str) -> Result<String, &'static str> {
    let Some(rest) = path.strip_prefix('/') else {
        return Err("path must start with '/'");
    };

    let segments: Vec<&str> = rest.split('/').collect();
    let mut names = HashSet::new();
    let mut shape = String::with_capacity(path.len());

    for (position, segment) in segments.iter().enumerate() {
        shape.push('/');
        if segment.starts_with(':') || segment.starts_with('*') {
            return Err("captures are written `{name}`, not `:name` or `*name`");
        }

        let Some(inner) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) else {
            if segment.contains(['{', '}']) {
                return Err("a capture must fill a whole segment");
            }
            shape.push_str(segment);
            continue;
        };

        let (wildcard, name) = match inner.strip_prefix('*') {
            Some(name) => (true, name),
            None => (false, inner),
        };
        if name.is_empty() || name.contains(['{', '}', '*']) {
            return Err("malformed capture name");
        }
        if wildcard && position + 1 != segments.len() {
            return Err("a wildcard capture must be the last segment");
        }
        if !names.insert(name) {
            return Err("capture name used twice");
        }
        shape.push_str(if wildcard { "{*}" } else { "{}" });
    }

    Ok(shape)
}

fn panic_reason(payload: Box<dyn Any + Send>) -> String {
    payload
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| payload.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "rejected by router".to_string())
}

fn check_descriptor(descriptor: &MethodDescriptor) -> Result<(), AssemblyError> {
    let handler = descriptor.handler().to_string();
    let method = descriptor.method().to_string();

    if let Some(index) = descriptor.first_gap() {
        return Err(AssemblyError::ParamGap { handler, method, index });
    }

    for middleware in descriptor.befores() {
        middleware.instantiate().map_err(|source| AssemblyError::Middleware {
            handler: handler.clone(),
            method: method.clone(),
            middleware: middleware.name(),
            source,
        })?;
    }

    Ok(())
}

fn method_router(filter: MethodFilter, bound: BoundMethod) -> MethodRouter {
    let befores = bound.descriptor.befores().to_vec();
    let mut router = on(filter, move |req: Request<Body>| dispatch(bound.clone(), req));

    for before in befores.into_iter().rev() {
        router = router.layer(middleware::from_fn(move |req: Request<Body>, next: Next| {
            run_before(before.clone(), req, next)
        }));
    }

    router
}
