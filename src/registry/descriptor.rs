//! Per-method descriptors and parameter bindings.

use std::collections::{BTreeMap, HashMap};

use axum::http::Method;

use crate::handler::MiddlewareRef;
use crate::params::{Constraint, ParamKind, ParamValue};

/// Route half of a descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSpec {
    pub path: String,
    pub http_method: Method,
}

/// Options attached to a request-derived parameter.
#[derive(Debug, Clone)]
pub struct ParamOptions {
    /// Defaults to `true`.
    pub required: bool,
    pub default: Option<ParamValue>,
    /// Inject every uploaded file for the field instead of the first one.
    pub multiple: bool,
    /// Read from the upload gate instead of the request body.
    pub file: bool,
    /// Upper bound on files for a `multiple` field.
    pub max_count: Option<usize>,
    /// Raw value to mapped value lookup; bypasses type coercion.
    pub enum_map: Option<HashMap<String, ParamValue>>,
    pub constraints: Vec<Constraint>,
}

impl Default for ParamOptions {
    fn default() -> Self {
        Self {
            required: true,
            default: None,
            multiple: false,
            file: false,
            max_count: None,
            enum_map: None,
            constraints: Vec::new(),
        }
    }
}

/// A parameter resolved from the query string, body, or uploaded files.
#[derive(Debug, Clone)]
pub struct RequestParam {
    /// Source field name in the request.
    pub name: String,
    pub options: ParamOptions,
}

impl RequestParam {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: ParamOptions::default(),
        }
    }

    pub fn optional(mut self) -> Self {
        self.options.required = false;
        self
    }

    pub fn with_default(mut self, value: impl Into<ParamValue>) -> Self {
        self.options.default = Some(value.into());
        self
    }

    pub fn file(mut self) -> Self {
        self.options.file = true;
        self
    }

    pub fn multiple(mut self) -> Self {
        self.options.multiple = true;
        self
    }

    pub fn max_count(mut self, max: usize) -> Self {
        self.options.max_count = Some(max);
        self
    }

    /// Map the raw value `key` to `value`.
    pub fn enum_value(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.options
            .enum_map
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.options.constraints.push(constraint);
        self
    }
}

/// How a single handler argument is produced.
#[derive(Debug, Clone)]
pub enum ParamBinding {
    /// Inject the request context itself.
    Context,
    /// Resolve a named value from the request.
    Request(RequestParam),
}

/// Merged metadata for one handler method.
#[derive(Debug, Clone)]
pub struct MethodDescriptor {
    handler: String,
    method: String,
    route: Option<RouteSpec>,
    param_types: Vec<ParamKind>,
    befores: Vec<MiddlewareRef>,
    params: BTreeMap<usize, ParamBinding>,
}

impl MethodDescriptor {
    pub fn new(handler: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            handler: handler.into(),
            method: method.into(),
            route: None,
            param_types: Vec::new(),
            befores: Vec::new(),
            params: BTreeMap::new(),
        }
    }

    pub fn handler(&self) -> &str {
        &self.handler
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn route(&self) -> Option<&RouteSpec> {
        self.route.as_ref()
    }

    pub fn befores(&self) -> &[MiddlewareRef] {
        &self.befores
    }

    pub fn set_route(&mut self, path: impl Into<String>, http_method: Method, param_types: &[ParamKind]) {
        self.route = Some(RouteSpec {
            path: path.into(),
            http_method,
        });
        self.param_types = param_types.to_vec();
    }

    pub fn push_middleware(&mut self, middleware: MiddlewareRef) {
        self.befores.push(middleware);
    }

    pub fn set_param(&mut self, index: usize, binding: ParamBinding) {
        self.params.insert(index, binding);
    }

    /// Declared type of the parameter at `index`; undeclared positions are strings.
    pub fn param_kind(&self, index: usize) -> ParamKind {
        self.param_types.get(index).cloned().unwrap_or_default()
    }

    pub fn has_params(&self) -> bool {
        !self.params.is_empty()
    }

    /// Bindings in ascending index order.
    pub fn bindings(&self) -> impl Iterator<Item = (usize, &ParamBinding)> {
        self.params.iter().map(|(index, binding)| (*index, binding))
    }

    pub fn request_params(&self) -> impl Iterator<Item = &RequestParam> {
        self.params.values().filter_map(|binding| match binding {
            ParamBinding::Request(param) => Some(param),
            ParamBinding::Context => None,
        })
    }

    pub fn has_file_params(&self) -> bool {
        self.request_params().any(|param| param.options.file)
    }

    /// First argument position with no binding below the highest bound index.
    pub fn first_gap(&self) -> Option<usize> {
        self.params
            .keys()
            .enumerate()
            .find(|(position, index)| position != *index)
            .map(|(position, _)| position)
    }
}
