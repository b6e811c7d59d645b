//! Fail-safe room lookup.
//!
//! # Responsibilities
//! - Run the room source under the dependency's circuit breaker
//! - Pick the first room of a successful response
//! - Substitute the fallback room for every error, including breaker rejection
//!
//! # Design Decisions
//! - An empty successful response yields no room and is not replaced by the
//!   fallback; only errors are
//! - Errors never leave this module, they end in a log line and a metric

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::observability::metrics;
use crate::resilience::{BreakerError, CircuitBreaker};
use crate::rooms::client::{HttpRoomClient, RoomSource};
use crate::rooms::error::TransportError;
use crate::rooms::types::Room;

/// Looks up an available room, never failing.
#[derive(Debug)]
pub struct ResilientRoomFetcher<S = HttpRoomClient> {
    source: S,
    breaker: Arc<CircuitBreaker>,
}

impl<S: RoomSource> ResilientRoomFetcher<S> {
    pub fn new(source: S, breaker: Arc<CircuitBreaker>) -> Self {
        Self { source, breaker }
    }

    pub fn breaker(&self) -> &Arc<CircuitBreaker> {
        &self.breaker
    }

    /// First room offered by the source, the fallback room on any error,
    /// or `None` when the source answered with an empty list.
    pub async fn get_available_room(&self) -> Option<Room> {
        let result = self.breaker.call(|| self.source.fetch_rooms()).await;
        self.resolve(result)
    }

    /// Like [`get_available_room`](Self::get_available_room), but a signal on
    /// `cancel` aborts the outbound call and is treated as a transport failure.
    pub async fn get_available_room_until_cancelled(
        &self,
        cancel: &mut broadcast::Receiver<()>,
    ) -> Option<Room> {
        let result = self
            .breaker
            .call(move || async move {
                tokio::select! {
                    rooms = self.source.fetch_rooms() => rooms,
                    _ = cancel.recv() => {
                        Err(TransportError::IoFailure("request cancelled".to_string()))
                    }
                }
            })
            .await;
        self.resolve(result)
    }

    fn resolve(&self, result: Result<Vec<Room>, BreakerError<TransportError>>) -> Option<Room> {
        match result {
            Ok(rooms) => {
                let room = rooms.into_iter().next();
                if room.is_none() {
                    tracing::debug!(
                        breaker = %self.breaker.name(),
                        "Room service returned no rooms"
                    );
                }
                room
            }
            Err(err) => {
                let reason = match &err {
                    BreakerError::Open { .. } => "breaker_open",
                    BreakerError::Inner(e) => e.kind(),
                };
                tracing::warn!(
                    breaker = %self.breaker.name(),
                    reason,
                    error = %err,
                    "Using fallback room"
                );
                metrics::record_fallback(reason);
                Some(Room::fallback())
            }
        }
    }
}
