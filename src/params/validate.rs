//! Declared constraints on coerced parameter values.
//!
//! Constraints only apply to values of the shape they describe: a numeric
//! bound never rejects a string, a pattern never rejects a number.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::params::error::ParamError;
use crate::params::value::ParamValue;

type CheckFn = dyn Fn(&ParamValue) -> Result<(), String> + Send + Sync;

/// A single validation rule attached to a request parameter.
#[derive(Clone)]
pub enum Constraint {
    Min(f64),
    Max(f64),
    MinLength(usize),
    MaxLength(usize),
    Pattern(Regex),
    OneOf(Vec<String>),
    Custom(&'static str, Arc<CheckFn>),
}

impl Constraint {
    /// Build a pattern constraint, failing on an invalid expression.
    pub fn pattern(expr: &str) -> Result<Self, regex::Error> {
        Ok(Constraint::Pattern(Regex::new(expr)?))
    }

    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Constraint::OneOf(values.into_iter().map(Into::into).collect())
    }

    pub fn custom<F>(name: &'static str, check: F) -> Self
    where
        F: Fn(&ParamValue) -> Result<(), String> + Send + Sync + 'static,
    {
        Constraint::Custom(name, Arc::new(check))
    }

    fn check(&self, value: &ParamValue) -> Result<(), String> {
        match self {
            Constraint::Min(min) => match value.as_f64() {
                Some(n) if n < *min => Err(format!("must be at least {}", min)),
                _ => Ok(()),
            },
            Constraint::Max(max) => match value.as_f64() {
                Some(n) if n > *max => Err(format!("must be at most {}", max)),
                _ => Ok(()),
            },
            Constraint::MinLength(min) => match length_of(value) {
                Some(len) if len < *min => Err(format!("length must be at least {}", min)),
                _ => Ok(()),
            },
            Constraint::MaxLength(max) => match length_of(value) {
                Some(len) if len > *max => Err(format!("length must be at most {}", max)),
                _ => Ok(()),
            },
            Constraint::Pattern(re) => match value.as_str() {
                Some(s) if !re.is_match(s) => Err(format!("must match pattern {}", re.as_str())),
                _ => Ok(()),
            },
            Constraint::OneOf(allowed) => match value.as_str() {
                Some(s) if !allowed.iter().any(|a| a == s) => {
                    Err(format!("must be one of [{}]", allowed.join(", ")))
                }
                _ => Ok(()),
            },
            Constraint::Custom(_, check) => check(value),
        }
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Min(n) => f.debug_tuple("Min").field(n).finish(),
            Constraint::Max(n) => f.debug_tuple("Max").field(n).finish(),
            Constraint::MinLength(n) => f.debug_tuple("MinLength").field(n).finish(),
            Constraint::MaxLength(n) => f.debug_tuple("MaxLength").field(n).finish(),
            Constraint::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            Constraint::OneOf(values) => f.debug_tuple("OneOf").field(values).finish(),
            Constraint::Custom(name, _) => f.debug_tuple("Custom").field(name).finish(),
        }
    }
}

fn length_of(value: &ParamValue) -> Option<usize> {
    match value {
        ParamValue::String(s) => Some(s.chars().count()),
        ParamValue::Json(serde_json::Value::String(s)) => Some(s.chars().count()),
        ParamValue::Json(serde_json::Value::Array(items)) => Some(items.len()),
        ParamValue::Files(files) => Some(files.len()),
        _ => None,
    }
}

/// Run every constraint against `value`, stopping at the first violation.
pub fn validate(name: &str, value: &ParamValue, constraints: &[Constraint]) -> Result<(), ParamError> {
    for constraint in constraints {
        constraint.check(value).map_err(|message| ParamError::Validation {
            name: name.to_string(),
            message,
        })?;
    }
    Ok(())
}
