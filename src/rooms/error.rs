use std::time::Duration;

use thiserror::Error;

/// Failure of one outbound room request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    #[error("Request timeout after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("Network error: {0}")]
    IoFailure(String),

    #[error("Decode error: {0}")]
    DecodeFailure(String),
}

impl TransportError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            TransportError::Timeout(_) => "timeout",
            TransportError::IoFailure(_) => "io_failure",
            TransportError::DecodeFailure(_) => "decode_failure",
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        TransportError::DecodeFailure(err.to_string())
    }
}

/// Failure to construct the room client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("HTTP client initialization failed: {0}")]
    Init(#[from] reqwest::Error),
}
