//! Route metadata registry.
//!
//! Registration calls may arrive in any order. Each call merges into the
//! descriptor for its (controller, method) pair without disturbing fields set
//! by other calls: route and parameter types are last-writer-wins, bindings are
//! last-writer-wins per index, middleware is appended in call order.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use axum::http::Method;

use crate::handler::{Controller, MiddlewareRef};
use crate::params::ParamKind;
use crate::registry::descriptor::{MethodDescriptor, ParamBinding, RequestParam};

type DescriptorKey = (String, String);

/// Collects controllers and method descriptors before assembly.
#[derive(Default)]
pub struct RouteRegistry {
    handlers: HashMap<String, Arc<dyn Controller>>,
    descriptors: BTreeMap<DescriptorKey, MethodDescriptor>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the shared controller instance under its own name.
    pub fn register_handler(&mut self, controller: Arc<dyn Controller>) -> &mut Self {
        let name = controller.name().to_string();
        tracing::debug!(handler = %name, "Registered handler");
        self.handlers.insert(name, controller);
        self
    }

    pub fn register_route(
        &mut self,
        handler: &str,
        method: &str,
        path: &str,
        http_method: Method,
        param_types: &[ParamKind],
    ) -> &mut Self {
        self.entry(handler, method).set_route(path, http_method, param_types);
        self
    }

    pub fn register_middleware(&mut self, handler: &str, method: &str, middleware: MiddlewareRef) -> &mut Self {
        self.entry(handler, method).push_middleware(middleware);
        self
    }

    pub fn register_param(&mut self, handler: &str, method: &str, index: usize, binding: ParamBinding) -> &mut Self {
        self.entry(handler, method).set_param(index, binding);
        self
    }

    /// Builder scoped to one controller method.
    pub fn method(&mut self, handler: &str, method: &str) -> MethodBuilder<'_> {
        MethodBuilder {
            descriptor: self.entry(handler, method),
        }
    }

    pub fn descriptor(&self, handler: &str, method: &str) -> Option<&MethodDescriptor> {
        self.descriptors.get(&(handler.to_string(), method.to_string()))
    }

    pub fn handler(&self, name: &str) -> Option<&Arc<dyn Controller>> {
        self.handlers.get(name)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Hand the registered controllers and descriptors over for assembly.
    pub(crate) fn into_parts(self) -> (HashMap<String, Arc<dyn Controller>>, Vec<MethodDescriptor>) {
        (self.handlers, self.descriptors.into_values().collect())
    }

    fn entry(&mut self, handler: &str, method: &str) -> &mut MethodDescriptor {
        self.descriptors
            .entry((handler.to_string(), method.to_string()))
            .or_insert_with(|| MethodDescriptor::new(handler, method))
    }
}

impl fmt::Debug for RouteRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut handlers: Vec<&String> = self.handlers.keys().collect();
        handlers.sort();
        f.debug_struct("RouteRegistry")
            .field("handlers", &handlers)
            .field("descriptors", &self.descriptors.values().collect::<Vec<_>>())
            .finish()
    }
}

/// Chained registration for a single controller method.
pub struct MethodBuilder<'a> {
    descriptor: &'a mut MethodDescriptor,
}

impl MethodBuilder<'_> {
    pub fn route(self, http_method: Method, path: &str, param_types: &[ParamKind]) -> Self {
        self.descriptor.set_route(path, http_method, param_types);
        self
    }

    pub fn get(self, path: &str, param_types: &[ParamKind]) -> Self {
        self.route(Method::GET, path, param_types)
    }

    pub fn post(self, path: &str, param_types: &[ParamKind]) -> Self {
        self.route(Method::POST, path, param_types)
    }

    pub fn put(self, path: &str, param_types: &[ParamKind]) -> Self {
        self.route(Method::PUT, path, param_types)
    }

    pub fn delete(self, path: &str, param_types: &[ParamKind]) -> Self {
        self.route(Method::DELETE, path, param_types)
    }

    pub fn before(self, middleware: MiddlewareRef) -> Self {
        self.descriptor.push_middleware(middleware);
        self
    }

    pub fn context(self, index: usize) -> Self {
        self.descriptor.set_param(index, ParamBinding::Context);
        self
    }

    pub fn param(self, index: usize, param: RequestParam) -> Self {
        self.descriptor.set_param(index, ParamBinding::Request(param));
        self
    }
}
