//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML), optional
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → read once by lifecycle::startup when wiring the application
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded and read once at construction
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    CircuitBreakerConfig, ObservabilityConfig, ReservationConfig, RoomsConfig, ServiceConfig,
    SlidingWindowType,
};
pub use validation::ValidationError;
