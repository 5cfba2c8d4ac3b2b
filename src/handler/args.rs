//! Positional arguments handed to a controller method.

use std::sync::Arc;

use crate::params::{ParamValue, RequestContext};
use crate::upload::UploadedFile;

/// One argument position.
#[derive(Debug, Clone)]
pub enum Argument {
    /// The request context itself.
    Context(Arc<RequestContext>),
    Value(ParamValue),
    /// An optional parameter the request did not supply.
    Absent,
}

/// Arguments in declared parameter order.
#[derive(Debug, Clone, Default)]
pub struct Arguments(Vec<Argument>);

impl Arguments {
    pub fn new(args: Vec<Argument>) -> Self {
        Self(args)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Argument> {
        self.0.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Argument> {
        self.0.iter()
    }

    pub fn value(&self, index: usize) -> Option<&ParamValue> {
        match self.0.get(index) {
            Some(Argument::Value(value)) => Some(value),
            _ => None,
        }
    }

    pub fn context(&self, index: usize) -> Option<&RequestContext> {
        match self.0.get(index) {
            Some(Argument::Context(ctx)) => Some(ctx.as_ref()),
            _ => None,
        }
    }

    pub fn number(&self, index: usize) -> Option<f64> {
        self.value(index).and_then(ParamValue::as_f64)
    }

    pub fn string(&self, index: usize) -> Option<&str> {
        self.value(index).and_then(ParamValue::as_str)
    }

    pub fn boolean(&self, index: usize) -> Option<bool> {
        self.value(index).and_then(ParamValue::as_bool)
    }

    pub fn file(&self, index: usize) -> Option<&UploadedFile> {
        match self.value(index) {
            Some(ParamValue::File(file)) => Some(file),
            _ => None,
        }
    }

    pub fn files(&self, index: usize) -> Option<&[UploadedFile]> {
        match self.value(index) {
            Some(ParamValue::Files(files)) => Some(files.as_slice()),
            _ => None,
        }
    }

    pub fn is_absent(&self, index: usize) -> bool {
        matches!(self.0.get(index), Some(Argument::Absent) | None)
    }
}
