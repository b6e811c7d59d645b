//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! resilience, rooms, reservation produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape), when enabled
//! ```
//!
//! # Design Decisions
//! - Structured fields (breaker name, state, reason) instead of formatted text
//! - Metrics are cheap and no-ops without an installed recorder

pub mod logging;
pub mod metrics;
