use std::time::Duration;

use thiserror::Error;

use crate::error::{ClientError, NetworkError};

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Failed to connect: {0}")]
    Connect(String),
    #[error("Request cancelled")]
    Cancelled,
    #[error("Transport error: {0}")]
    Other(String),
}

impl From<TransportError> for ClientError {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::Timeout(after) => ClientError::Network(NetworkError::Timeout(after)),
            TransportError::Connect(msg) => ClientError::Network(NetworkError::Connect(msg)),
            TransportError::Cancelled => ClientError::Cancelled,
            TransportError::Other(msg) => ClientError::Network(NetworkError::Other(msg)),
        }
    }
}
