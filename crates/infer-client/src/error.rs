use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

use crate::schemas::{JobResult, JobStatus};

/// Transport level failures, raised before the remote service produced a response.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Failed to connect: {0}")]
    Connect(String),
    #[error("Transport error: {0}")]
    Other(String),
}

#[derive(Error, Debug)]
pub enum ClientError {
    /// Missing or invalid local configuration. Detected before any network call.
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error("Authentication rejected ({status}): {message}")]
    Authentication { status: StatusCode, message: String },
    /// The remote service ran the job and reported a non-successful terminal status.
    #[error("Remote job {status}: {message}")]
    RemoteJob {
        status: JobStatus,
        message: String,
        body: JobResult,
    },
    #[error("Service error ({status}): {message}")]
    Service { status: StatusCode, message: String },
    #[error("Request cancelled")]
    Cancelled,
    #[error("Payload length is {len} bytes, exceeding the maximum of {max} bytes")]
    PayloadTooLarge { len: usize, max: usize },
}

impl ClientError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Network(NetworkError::Timeout(_)))
    }

    pub fn is_login_error(&self) -> bool {
        matches!(self, ClientError::Authentication { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClientError::Cancelled)
    }
}
