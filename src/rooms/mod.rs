//! Room lookup subsystem.
//!
//! # Data Flow
//! ```text
//! fetcher.rs (ResilientRoomFetcher)
//!     → resilience::CircuitBreaker (admit or reject)
//!     → client.rs (HttpRoomClient: GET endpoint under one deadline)
//!     → JSON array of types.rs Room
//!     ← first room | None on empty list | fallback room on any error
//! ```

pub mod client;
pub mod error;
pub mod fetcher;
pub mod types;

pub use client::{decode_rooms, HttpRoomClient, RoomSource};
pub use error::{ClientError, TransportError};
pub use fetcher::ResilientRoomFetcher;
pub use types::Room;
