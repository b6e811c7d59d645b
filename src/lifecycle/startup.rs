//! Startup orchestration.
//!
//! # Responsibilities
//! - Take the validated configuration
//! - Initialize subsystems in dependency order: registry, client, fetcher, builder
//! - Own the breaker registry for the application's lifetime
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Breakers are looked up once here and injected, never fetched ambiently

use std::sync::Arc;

use thiserror::Error;

use crate::config::ServiceConfig;
use crate::reservation::{Reservation, ReservationBuilder};
use crate::resilience::CircuitBreakerRegistry;
use crate::rooms::{ClientError, HttpRoomClient, ResilientRoomFetcher};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Room client: {0}")]
    RoomClient(#[from] ClientError),
}

/// Long-lived application context.
#[derive(Debug)]
pub struct Application {
    config: ServiceConfig,
    registry: Arc<CircuitBreakerRegistry>,
    reservations: ReservationBuilder<HttpRoomClient>,
}

impl Application {
    /// Build with a registry of its own.
    pub fn build(config: ServiceConfig) -> Result<Self, StartupError> {
        let registry = Arc::new(CircuitBreakerRegistry::from_config(&config));
        Self::with_registry(config, registry)
    }

    /// Build around an existing registry, sharing its breakers.
    pub fn with_registry(
        config: ServiceConfig,
        registry: Arc<CircuitBreakerRegistry>,
    ) -> Result<Self, StartupError> {
        let client = HttpRoomClient::new(&config.rooms)?;
        let breaker = registry.circuit_breaker(&config.rooms.circuit_breaker);
        let fetcher = ResilientRoomFetcher::new(client, breaker);
        let reservations = ReservationBuilder::new(config.reservation.title.clone(), fetcher);

        tracing::info!(
            endpoint = %config.rooms.endpoint,
            timeout_ms = config.rooms.timeout_ms,
            breaker = %config.rooms.circuit_breaker,
            "Application initialized"
        );

        Ok(Self {
            config,
            registry,
            reservations,
        })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<CircuitBreakerRegistry> {
        &self.registry
    }

    pub fn reservations(&self) -> &ReservationBuilder<HttpRoomClient> {
        &self.reservations
    }

    pub async fn new_reservation(&self) -> Reservation {
        self.reservations.new_reservation().await
    }
}
