//! Registry of circuit breakers keyed by dependency name.
//!
//! # Responsibilities
//! - Hand out the single shared breaker for a dependency name
//! - Create breakers lazily from per-name or default configuration
//! - Enumerate and reset breakers for operational tooling

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;

use crate::config::{CircuitBreakerConfig, ServiceConfig};
use crate::resilience::circuit_breaker::CircuitBreaker;

/// Owns every circuit breaker of the application.
#[derive(Debug, Default)]
pub struct CircuitBreakerRegistry {
    defaults: CircuitBreakerConfig,
    overrides: HashMap<String, CircuitBreakerConfig>,
    breakers: DashMap<String, Arc<CircuitBreaker>>,
}

impl CircuitBreakerRegistry {
    pub fn new(
        defaults: CircuitBreakerConfig,
        overrides: HashMap<String, CircuitBreakerConfig>,
    ) -> Self {
        Self {
            defaults,
            overrides,
            breakers: DashMap::new(),
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(
            config.circuit_breaker_defaults.clone(),
            config.circuit_breakers.clone(),
        )
    }

    /// The breaker for `name`, created on first use.
    ///
    /// Concurrent first calls for the same name observe the same instance.
    pub fn circuit_breaker(&self, name: &str) -> Arc<CircuitBreaker> {
        if let Some(existing) = self.breakers.get(name) {
            return existing.clone();
        }

        self.breakers
            .entry(name.to_string())
            .or_insert_with(|| {
                let config = self.overrides.get(name).unwrap_or(&self.defaults).clone();
                tracing::debug!(name = %name, "Creating circuit breaker");
                Arc::new(CircuitBreaker::new(name, config))
            })
            .clone()
    }

    /// Breakers created so far, sorted by name.
    pub fn all(&self) -> Vec<Arc<CircuitBreaker>> {
        let mut breakers: Vec<_> = self.breakers.iter().map(|e| e.value().clone()).collect();
        breakers.sort_by(|a, b| a.name().cmp(b.name()));
        breakers
    }

    /// Reset every breaker to closed. Returns how many were reset.
    pub fn reset_all(&self) -> usize {
        let breakers = self.all();
        for breaker in &breakers {
            breaker.reset();
        }
        breakers.len()
    }
}
