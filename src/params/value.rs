//! Declared parameter types and resolved parameter values.

use std::fmt;

use serde_json::Value;

use crate::upload::UploadedFile;

/// Declared type of a handler parameter, supplied at route registration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ParamKind {
    Number,
    #[default]
    String,
    Boolean,
    /// Any other type. Raw values pass through uncoerced.
    Custom(String),
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKind::Number => write!(f, "number"),
            ParamKind::String => write!(f, "string"),
            ParamKind::Boolean => write!(f, "boolean"),
            ParamKind::Custom(name) => write!(f, "{}", name),
        }
    }
}

/// A value injected into a handler argument position.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Number(f64),
    String(String),
    Bool(bool),
    Json(Value),
    File(UploadedFile),
    Files(Vec<UploadedFile>),
}

impl ParamValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Number(n) => Some(*n),
            ParamValue::Json(v) => v.as_f64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::String(s) => Some(s.as_str()),
            ParamValue::Json(v) => v.as_str(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            ParamValue::Json(v) => v.as_bool(),
            _ => None,
        }
    }
}

impl From<f64> for ParamValue {
    fn from(n: f64) -> Self {
        ParamValue::Number(n)
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Number(n as f64)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::String(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::String(s)
    }
}

impl From<Value> for ParamValue {
    fn from(v: Value) -> Self {
        ParamValue::Json(v)
    }
}
