//! Configuration validation.
//!
//! Serde handles syntax; this checks values serde cannot. Every problem is
//! reported, not just the first.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::AppConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("router.upload.max_file_size_bytes ({file}) exceeds router.body_limit_bytes ({body})")]
    FileExceedsBody { file: usize, body: usize },

    #[error("observability.log_level: unknown level '{0}'")]
    LogLevel(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    let router = &config.router;
    if router.body_limit_bytes == 0 {
        errors.push(ValidationError::Zero("router.body_limit_bytes"));
    }
    if router.upload.max_file_size_bytes == 0 {
        errors.push(ValidationError::Zero("router.upload.max_file_size_bytes"));
    }
    if router.upload.max_files_per_field == 0 {
        errors.push(ValidationError::Zero("router.upload.max_files_per_field"));
    }
    if router.body_limit_bytes > 0 && router.upload.max_file_size_bytes > router.body_limit_bytes {
        errors.push(ValidationError::FileExceedsBody {
            file: router.upload.max_file_size_bytes,
            body: router.body_limit_bytes,
        });
    }

    let observability = &config.observability;
    if !LOG_LEVELS.contains(&observability.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::LogLevel(observability.log_level.clone()));
    }
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
