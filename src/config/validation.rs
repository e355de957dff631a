//! Configuration validation.
//!
//! Semantic checks on top of what serde already guarantees syntactically.
//! Validation is a pure function over the config and returns all problems,
//! not just the first.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServiceConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("limits.max_part_size_bytes must be greater than zero")]
    ZeroPartLimit,

    #[error("limits.max_request_size_bytes must be greater than zero")]
    ZeroRequestLimit,

    #[error("limits.max_part_size_bytes ({part}) exceeds limits.max_request_size_bytes ({request})")]
    PartLimitAboveRequestLimit { part: u64, request: u64 },

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("observability.metrics_address `{0}` is not a valid socket address")]
    InvalidMetricsAddress(String),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.limits.max_part_size_bytes == 0 {
        errors.push(ValidationError::ZeroPartLimit);
    }
    if config.limits.max_request_size_bytes == 0 {
        errors.push(ValidationError::ZeroRequestLimit);
    }
    if config.limits.max_part_size_bytes > 0
        && config.limits.max_request_size_bytes > 0
        && config.limits.max_part_size_bytes > config.limits.max_request_size_bytes
    {
        errors.push(ValidationError::PartLimitAboveRequestLimit {
            part: config.limits.max_part_size_bytes,
            request: config.limits.max_request_size_bytes,
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&ServiceConfig::default()).is_ok());
    }

    #[test]
    fn part_limit_above_request_limit_is_rejected() {
        let mut config = ServiceConfig::default();
        config.limits.max_part_size_bytes = 4096;
        config.limits.max_request_size_bytes = 1024;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::PartLimitAboveRequestLimit {
                part: 4096,
                request: 1024
            }]
        );
    }

    #[test]
    fn all_problems_are_reported_together() {
        let mut config = ServiceConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.limits.max_part_size_bytes = 0;
        config.timeouts.request_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::ZeroPartLimit));
        assert!(errors.contains(&ValidationError::ZeroRequestTimeout));
    }

    #[test]
    fn metrics_address_is_ignored_when_exporter_is_disabled() {
        let mut config = ServiceConfig::default();
        config.observability.metrics_enabled = false;
        config.observability.metrics_address = "nonsense".into();

        assert!(validate_config(&config).is_ok());
    }
}
