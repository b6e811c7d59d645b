//! Reservation creation.
//!
//! `builder.rs` stamps an id and begin date, asks the room fetcher for a room
//! and returns a `types.rs` Reservation. Nothing here can fail.

pub mod builder;
pub mod types;

pub use builder::{format_begin_date, ReservationBuilder};
pub use types::Reservation;
