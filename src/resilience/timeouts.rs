//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap outbound calls with one combined deadline
//! - Cancel the wrapped operation cleanly on expiry
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other transport errors

use std::future::Future;
use std::time::Duration;

use crate::rooms::error::TransportError;

/// Run `operation` under `deadline`, mapping expiry to [`TransportError::Timeout`].
pub async fn with_deadline<T, F>(deadline: Duration, operation: F) -> Result<T, TransportError>
where
    F: Future<Output = Result<T, TransportError>>,
{
    match tokio::time::timeout(deadline, operation).await {
        Ok(result) => result,
        Err(_) => Err(TransportError::Timeout(deadline)),
    }
}
