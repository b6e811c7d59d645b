//! Outbound room service client.
//!
//! # Responsibilities
//! - Issue one GET per lookup to the configured endpoint
//! - Enforce one deadline over connect, send and full body read
//! - Decode the body as a JSON array of rooms
//!
//! # Design Decisions
//! - No retries here; failure handling belongs to the fetcher
//! - The HTTP status is not interpreted, the body decides the outcome
//! - Environment proxies are ignored

use std::future::Future;
use std::time::{Duration, Instant};

use url::Url;

use crate::config::RoomsConfig;
use crate::observability::metrics;
use crate::resilience::timeouts::with_deadline;
use crate::rooms::error::{ClientError, TransportError};
use crate::rooms::types::Room;

/// A source of available rooms.
pub trait RoomSource: Send + Sync {
    fn fetch_rooms(&self) -> impl Future<Output = Result<Vec<Room>, TransportError>> + Send;
}

/// HTTP implementation of [`RoomSource`].
#[derive(Debug, Clone)]
pub struct HttpRoomClient {
    client: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
}

impl HttpRoomClient {
    pub fn new(config: &RoomsConfig) -> Result<Self, ClientError> {
        let endpoint = Url::parse(&config.endpoint)?;
        let timeout = config.timeout();
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .no_proxy()
            .build()?;

        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn request(&self) -> Result<Vec<Room>, TransportError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                endpoint = %self.endpoint,
                status = %status,
                "Room service returned non-success status"
            );
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        decode_rooms(&body)
    }

    fn classify(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.timeout)
        } else {
            TransportError::IoFailure(err.to_string())
        }
    }
}

/// Decode a room list body.
///
/// A `null` body or a `null` first entry means no room is offered and yields
/// an empty list. Later `null` entries are skipped.
pub fn decode_rooms(body: &[u8]) -> Result<Vec<Room>, TransportError> {
    let rooms: Option<Vec<Option<Room>>> = serde_json::from_slice(body)?;
    match rooms {
        Some(rooms) if matches!(rooms.first(), Some(Some(_))) => {
            Ok(rooms.into_iter().flatten().collect())
        }
        _ => Ok(Vec::new()),
    }
}

impl RoomSource for HttpRoomClient {
    async fn fetch_rooms(&self) -> Result<Vec<Room>, TransportError> {
        let start = Instant::now();
        let result = with_deadline(self.timeout, self.request()).await;
        let elapsed = start.elapsed();

        metrics::record_rooms_fetch(elapsed);
        match &result {
            Ok(rooms) => tracing::debug!(
                endpoint = %self.endpoint,
                elapsed_ms = elapsed.as_millis() as u64,
                rooms = rooms.len(),
                "Room request succeeded"
            ),
            Err(e) => tracing::debug!(
                endpoint = %self.endpoint,
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "Room request failed"
            ),
        }

        result
    }
}
