//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the upload service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upload size limits.
    pub limits: UploadLimitsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

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

/// Size limits applied while decoding a multipart upload.
///
/// A part or total at exactly its limit is accepted; the limits are strict
/// upper bounds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UploadLimitsConfig {
    /// Maximum size of a single uploaded part, in bytes.
    pub max_part_size_bytes: u64,

    /// Maximum total size of all uploaded parts in one request, in bytes.
    pub max_request_size_bytes: u64,
}

impl Default for UploadLimitsConfig {
    fn default() -> Self {
        Self {
            max_part_size_bytes: 1024 * 1024,
            max_request_size_bytes: 2 * 1024 * 1024,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Overall request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable the Prometheus metrics exporter.
    pub metrics_enabled: bool,

    /// Address the metrics exporter listens on.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_allow_an_empty_config() {
        let config: ServiceConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.limits.max_part_size_bytes, 1_048_576);
        assert_eq!(config.limits.max_request_size_bytes, 2_097_152);
        assert!(config.observability.metrics_enabled);
    }

    #[test]
    fn partial_config_overrides_only_named_fields() {
        let config: ServiceConfig = toml::from_str(
            r#"
            [limits]
            max_part_size_bytes = 512
            "#,
        )
        .unwrap();
        assert_eq!(config.limits.max_part_size_bytes, 512);
        assert_eq!(config.limits.max_request_size_bytes, 2_097_152);
    }
}
