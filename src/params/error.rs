//! Parameter resolution errors.

use thiserror::Error;

/// A request could not supply a handler parameter.
///
/// Every variant is a client error: the dispatch wrapper answers it with
/// `400 Bad Request` and the error message as body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    /// A required parameter is absent and has no default.
    #[error("parameter '{name}' is required")]
    RequiredMissing { name: String },

    /// The raw value cannot be coerced to the declared type.
    #[error("parameter '{name}': cannot parse '{raw}' as {expected}")]
    ValueParse {
        name: String,
        raw: String,
        expected: String,
    },

    /// The coerced value violates a declared constraint.
    #[error("parameter '{name}': {message}")]
    Validation { name: String, message: String },
}

impl ParamError {
    /// Name of the offending parameter.
    pub fn param_name(&self) -> &str {
        match self {
            ParamError::RequiredMissing { name }
            | ParamError::ValueParse { name, .. }
            | ParamError::Validation { name, .. } => name,
        }
    }
}
