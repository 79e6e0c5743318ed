use std::fmt::Debug;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use url::Url;

use crate::cancellable::CancellationToken;

use super::TransportError;

/// A single outbound request, fully resolved by the endpoint handle.
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub bearer_token: String,
    /// JSON encoded body, if any.
    pub body: Option<Vec<u8>>,
    pub timeout: Duration,
    pub user_agent: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// Executes one request/response exchange.
///
/// Implementations must give up on the exchange, and release the underlying connection,
/// as soon as `cancellation` is triggered, returning [TransportError::Cancelled].
pub trait Transport: Debug + Send + Sync {
    fn execute(
        &self,
        request: HttpRequest,
        cancellation: &CancellationToken,
    ) -> Result<HttpResponse, TransportError>;
}
