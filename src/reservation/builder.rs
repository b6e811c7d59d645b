//! Reservation assembly.
//!
//! # Responsibilities
//! - Generate a unique identifier and the begin timestamp
//! - Embed the room chosen by the resilient fetcher
//!
//! # Design Decisions
//! - Infallible: every failure below is absorbed by the fetcher
//! - Identifier and timestamp are taken before the room lookup starts

use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::observability::metrics;
use crate::reservation::types::Reservation;
use crate::rooms::{HttpRoomClient, ResilientRoomFetcher, Room, RoomSource};

/// Format an instant as ISO-8601 with offset at second precision,
/// e.g. `2024-05-01T10:00:00+09:00`.
pub fn format_begin_date<Tz>(instant: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    instant.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

/// Creates reservations with a room from the room service.
#[derive(Debug)]
pub struct ReservationBuilder<S = HttpRoomClient> {
    title: String,
    fetcher: ResilientRoomFetcher<S>,
}

impl<S: RoomSource> ReservationBuilder<S> {
    pub fn new(title: impl Into<String>, fetcher: ResilientRoomFetcher<S>) -> Self {
        Self {
            title: title.into(),
            fetcher,
        }
    }

    pub fn fetcher(&self) -> &ResilientRoomFetcher<S> {
        &self.fetcher
    }

    pub async fn new_reservation(&self) -> Reservation {
        let (id, begin_date) = self.stamp();
        let room = self.fetcher.get_available_room().await;
        self.assemble(id, begin_date, room)
    }

    /// Like [`new_reservation`](Self::new_reservation), aborting the room
    /// lookup (and using the fallback room) when `cancel` fires.
    pub async fn new_reservation_until_cancelled(
        &self,
        cancel: &mut broadcast::Receiver<()>,
    ) -> Reservation {
        let (id, begin_date) = self.stamp();
        let room = self.fetcher.get_available_room_until_cancelled(cancel).await;
        self.assemble(id, begin_date, room)
    }

    fn stamp(&self) -> (String, String) {
        (Uuid::new_v4().to_string(), format_begin_date(&Local::now()))
    }

    fn assemble(&self, id: String, begin_date: String, room: Option<Room>) -> Reservation {
        tracing::info!(
            reservation_id = %id,
            room_id = room.as_ref().map(|r| r.id),
            "Reservation created"
        );
        metrics::record_reservation_created();

        Reservation {
            id,
            title: self.title.clone(),
            begin_date,
            room,
        }
    }
}
