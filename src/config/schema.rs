//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the reservation service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Downstream room service settings.
    pub rooms: RoomsConfig,

    /// Reservation record settings.
    pub reservation: ReservationConfig,

    /// Breaker settings used for any dependency without its own entry.
    pub circuit_breaker_defaults: CircuitBreakerConfig,

    /// Per-dependency breaker settings, keyed by dependency name.
    pub circuit_breakers: HashMap<String, CircuitBreakerConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ServiceConfig {
    /// Breaker settings for the given dependency name.
    pub fn breaker_config(&self, name: &str) -> &CircuitBreakerConfig {
        self.circuit_breakers
            .get(name)
            .unwrap_or(&self.circuit_breaker_defaults)
    }
}

/// Room service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoomsConfig {
    /// Endpoint returning a JSON array of rooms.
    pub endpoint: String,

    /// Combined connect + full response deadline in milliseconds.
    pub timeout_ms: u64,

    /// Dependency name used to look up the circuit breaker.
    pub circuit_breaker: String,
}

impl RoomsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for RoomsConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:9081/api/go/slow".to_string(),
            timeout_ms: 1000,
            circuit_breaker: "go/slow".to_string(),
        }
    }
}

/// Reservation record configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReservationConfig {
    /// Display title stamped on every reservation.
    pub title: String,
}

impl Default for ReservationConfig {
    fn default() -> Self {
        Self {
            title: "テスト".to_string(),
        }
    }
}

/// How the breaker's rolling window is bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SlidingWindowType {
    /// The last `sliding_window_size` calls.
    #[default]
    CountBased,
    /// Calls recorded within the last `sliding_window_size` seconds.
    TimeBased,
}

/// Circuit breaker configuration for one dependency.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CircuitBreakerConfig {
    /// Window bounding strategy.
    pub sliding_window_type: SlidingWindowType,

    /// Window size: a call count, or seconds for a time-based window.
    pub sliding_window_size: u32,

    /// Outcomes that must be buffered before rates are evaluated.
    pub minimum_number_of_calls: u32,

    /// Failure rate (percent) at which the breaker opens.
    pub failure_rate_threshold: f32,

    /// Slow-call rate (percent) at which the breaker opens.
    pub slow_call_rate_threshold: f32,

    /// Calls taking longer than this are counted as slow.
    pub slow_call_duration_ms: u64,

    /// How long the breaker stays open before admitting trial calls.
    pub wait_duration_in_open_state_ms: u64,

    /// Number of trial calls admitted while half-open.
    pub permitted_calls_in_half_open_state: u32,
}

impl CircuitBreakerConfig {
    pub fn slow_call_duration(&self) -> Duration {
        Duration::from_millis(self.slow_call_duration_ms)
    }

    pub fn wait_duration_in_open_state(&self) -> Duration {
        Duration::from_millis(self.wait_duration_in_open_state_ms)
    }
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            sliding_window_type: SlidingWindowType::CountBased,
            sliding_window_size: 100,
            minimum_number_of_calls: 100,
            failure_rate_threshold: 50.0,
            slow_call_rate_threshold: 100.0,
            slow_call_duration_ms: 60_000,
            wait_duration_in_open_state_ms: 60_000,
            permitted_calls_in_half_open_state: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
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
