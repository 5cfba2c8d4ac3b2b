//! Raw value coercion to declared parameter types.
//!
//! Raw values arrive as JSON: query, form, and multipart fields are strings,
//! JSON bodies may carry any shape. `Ok(None)` means "absent" and hands the
//! decision to the required/default rule.

use serde_json::Value;

use crate::params::error::ParamError;
use crate::params::value::{ParamKind, ParamValue};
use crate::registry::ParamOptions;

/// Coerce `raw` for parameter `name` according to its enum map or declared kind.
pub fn coerce(
    name: &str,
    raw: &Value,
    kind: &ParamKind,
    options: &ParamOptions,
) -> Result<Option<ParamValue>, ParamError> {
    if let Some(enum_map) = &options.enum_map {
        // A miss is absent, not an error.
        return Ok(enum_key(raw).and_then(|key| enum_map.get(&key).cloned()));
    }

    match kind {
        ParamKind::Number => to_number(name, raw),
        ParamKind::Boolean => Ok(to_boolean(raw)),
        ParamKind::String => Ok(to_string(raw)),
        ParamKind::Custom(_) => Ok(match raw {
            Value::Null => None,
            other => Some(ParamValue::Json(other.clone())),
        }),
    }
}

fn enum_key(raw: &Value) -> Option<String> {
    match raw {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn to_number(name: &str, raw: &Value) -> Result<Option<ParamValue>, ParamError> {
    let parse_error = || ParamError::ValueParse {
        name: name.to_string(),
        raw: match raw {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        },
        expected: ParamKind::Number.to_string(),
    };

    match raw {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(|n| Some(ParamValue::Number(n)))
            .ok_or_else(parse_error),
        Value::Number(n) => n
            .as_f64()
            .map(|n| Some(ParamValue::Number(n)))
            .ok_or_else(parse_error),
        _ => Err(parse_error()),
    }
}

fn to_boolean(raw: &Value) -> Option<ParamValue> {
    let flag = match raw {
        Value::Null => return None,
        Value::Bool(b) => *b,
        Value::String(s) if s == "true" => true,
        Value::String(s) if s == "false" => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    };
    Some(ParamValue::Bool(flag))
}

fn to_string(raw: &Value) -> Option<ParamValue> {
    match raw {
        Value::Null => None,
        Value::String(s) => Some(ParamValue::String(s.clone())),
        Value::Number(n) => Some(ParamValue::String(n.to_string())),
        Value::Bool(b) => Some(ParamValue::String(b.to_string())),
        other => Some(ParamValue::Json(other.clone())),
    }
}
