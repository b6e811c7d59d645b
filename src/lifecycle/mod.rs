//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Build registry, client, fetcher, builder
//!
//! Shutdown (shutdown.rs):
//!     Trigger → in-flight room lookups abort → fallback room
//!
//! Signals (signals.rs):
//!     Ctrl+C → Trigger shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then the breaker registry, then clients
//! - Cancellation never surfaces as an error to reservation callers

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{Application, StartupError};
