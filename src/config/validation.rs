//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate the room endpoint URL
//! - Validate value ranges (timeouts > 0, rates within 0..=100)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::{CircuitBreakerConfig, ServiceConfig};

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration, collecting every error found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.rooms.endpoint) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::new(
            "rooms.endpoint",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new("rooms.endpoint", e.to_string())),
    }

    if config.rooms.timeout_ms == 0 {
        errors.push(ValidationError::new("rooms.timeout_ms", "must be greater than 0"));
    }

    if config.rooms.circuit_breaker.trim().is_empty() {
        errors.push(ValidationError::new("rooms.circuit_breaker", "must not be empty"));
    }

    validate_breaker("circuit_breaker_defaults", &config.circuit_breaker_defaults, &mut errors);
    for (name, breaker) in &config.circuit_breakers {
        validate_breaker(&format!("circuit_breakers.\"{}\"", name), breaker, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_breaker(
    prefix: &str,
    config: &CircuitBreakerConfig,
    errors: &mut Vec<ValidationError>,
) {
    let rates = [
        ("failure_rate_threshold", config.failure_rate_threshold),
        ("slow_call_rate_threshold", config.slow_call_rate_threshold),
    ];
    for (field, rate) in rates {
        if !(rate > 0.0 && rate <= 100.0) {
            errors.push(ValidationError::new(
                format!("{}.{}", prefix, field),
                format!("must be within (0, 100], got {}", rate),
            ));
        }
    }

    let counts = [
        ("sliding_window_size", config.sliding_window_size as u64),
        ("minimum_number_of_calls", config.minimum_number_of_calls as u64),
        ("permitted_calls_in_half_open_state", config.permitted_calls_in_half_open_state as u64),
        ("wait_duration_in_open_state_ms", config.wait_duration_in_open_state_ms),
    ];
    for (field, value) in counts {
        if value == 0 {
            errors.push(ValidationError::new(
                format!("{}.{}", prefix, field),
                "must be greater than 0",
            ));
        }
    }
}
