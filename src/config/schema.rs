//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files.

use serde::{Deserialize, Serialize};

/// Root configuration for an application serving assembled routes.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Options applied when routes are attached.
    pub router: RouterOptions,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Options for `attach_routes`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterOptions {
    /// Maximum request body size in bytes.
    pub body_limit_bytes: usize,

    /// Multipart upload limits.
    pub upload: UploadOptions,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            body_limit_bytes: 10 * 1024 * 1024, // 10MB
            upload: UploadOptions::default(),
        }
    }
}

/// Limits enforced by the upload gate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct UploadOptions {
    /// Maximum size of a single uploaded file in bytes.
    pub max_file_size_bytes: usize,

    /// File count limit for `multiple` fields without their own limit.
    pub max_files_per_field: usize,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            max_file_size_bytes: 5 * 1024 * 1024, // 5MB
            max_files_per_field: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
