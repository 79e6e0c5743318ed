use std::time::Duration;

use reqwest::header::CONTENT_TYPE;

use super::{HttpRequest, HttpResponse, Transport, TransportError};
use crate::cancellable::CancellationToken;

/// [Transport] backed by reqwest.
///
/// Each exchange runs on its own single threaded runtime that is torn down once the
/// call returns. When the exchange is cancelled the request future is dropped first,
/// then the runtime, which closes the connection instead of leaving it to a pool.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport;

impl ReqwestTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Transport for ReqwestTransport {
    fn execute(
        &self,
        request: HttpRequest,
        cancellation: &CancellationToken,
    ) -> Result<HttpResponse, TransportError> {
        if cancellation.is_cancelled() {
            return Err(TransportError::Cancelled);
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| TransportError::Other(format!("Failed to start runtime: {e}")))?;

        let http_client = reqwest::Client::builder()
            .timeout(request.timeout)
            .user_agent(request.user_agent.as_str())
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        let result = runtime.block_on(async {
            tokio::select! {
                response = exchange(&http_client, request) => response,
                _ = cancellation.cancelled() => {
                    log::debug!("Request cancelled, aborting the exchange");
                    Err(TransportError::Cancelled)
                }
            }
        });

        drop(http_client);
        drop(runtime);

        result
    }
}

async fn exchange(
    http_client: &reqwest::Client,
    request: HttpRequest,
) -> Result<HttpResponse, TransportError> {
    let timeout = request.timeout;

    let mut request_builder = http_client
        .request(request.method, request.url)
        .bearer_auth(&request.bearer_token);

    if let Some(body) = request.body {
        request_builder = request_builder
            .header(CONTENT_TYPE, "application/json")
            .body(body);
    }

    let response = request_builder
        .send()
        .await
        .map_err(|e| map_reqwest_error(e, timeout))?;

    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| map_reqwest_error(e, timeout))?;

    Ok(HttpResponse {
        status,
        body: body.to_vec(),
    })
}

fn map_reqwest_error(error: reqwest::Error, timeout: Duration) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout(timeout)
    } else if error.is_connect() {
        TransportError::Connect(error.to_string())
    } else {
        TransportError::Other(error.to_string())
    }
}
