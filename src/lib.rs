//! Reservation service library.
//!
//! Creates reservations embedding a room chosen by a slow, possibly
//! unavailable room service, protected by a timeout and a circuit breaker,
//! with a fixed fallback room whenever the room service cannot be used.

pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod reservation;
pub mod resilience;
pub mod rooms;

pub use config::ServiceConfig;
pub use lifecycle::{Application, Shutdown};
pub use reservation::{Reservation, ReservationBuilder};
pub use rooms::{ResilientRoomFetcher, Room};
