//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Room lookup:
//!     → registry.rs (one shared breaker per dependency name)
//!     → circuit_breaker.rs (admit, reject, or admit a trial call)
//!     → timeouts.rs (enforce the combined connect + read deadline)
//!     → outcome recorded into window.rs, possibly tripping the breaker
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every outbound call has a deadline
//! - No retries: a failed call goes straight to the caller's fallback
//! - Circuit breaker prevents piling load onto an unhealthy dependency

pub mod circuit_breaker;
pub mod registry;
pub mod timeouts;
pub mod window;

pub use circuit_breaker::{BreakerError, BreakerMetrics, CircuitBreaker, CircuitState};
pub use registry::CircuitBreakerRegistry;
