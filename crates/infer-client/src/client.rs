use std::sync::Arc;

use log::{debug, warn};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use url::Url;

use crate::cancellable::CancellationToken;
use crate::config::ClientConfig;
use crate::credentials::Credentials;
use crate::error::ClientError;
use crate::http::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
use crate::schemas::{JobResult, JobStatus, RunRequest};

trait ResponseExt {
    fn map_to_client_err(self) -> Result<HttpResponse, ClientError>;
}

impl ResponseExt for HttpResponse {
    fn map_to_client_err(self) -> Result<HttpResponse, ClientError> {
        if self.status.is_success() {
            return Ok(self);
        }

        let message = String::from_utf8_lossy(&self.body).trim().to_string();
        let message = if message.is_empty() {
            self.status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        } else {
            message
        };

        match self.status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ClientError::Authentication {
                status: self.status,
                message,
            }),
            status => Err(ClientError::Service { status, message }),
        }
    }
}

/// A client for submitting jobs to hosted inference endpoints.
///
/// The client holds the credentials and configuration only; it does not open any
/// connection until a request is issued through an [EndpointHandle].
#[derive(Debug, Clone)]
pub struct Client {
    credentials: Credentials,
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Create a new client with the given API key and the default configuration.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_config(api_key, ClientConfig::default())
    }

    pub fn with_config(
        api_key: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self, ClientError> {
        let credentials = Credentials::new(api_key)?;
        Ok(Self::with_transport(
            credentials,
            config,
            Arc::new(ReqwestTransport::new()),
        ))
    }

    /// Create a client issuing its requests through a custom [Transport].
    pub fn with_transport(
        credentials: Credentials,
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Client {
            credentials,
            config,
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get a handle on the endpoint with the given identifier.
    pub fn endpoint(&self, id: impl Into<String>) -> Result<EndpointHandle, ClientError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ClientError::Configuration(
                "Endpoint id cannot be empty".to_string(),
            ));
        }
        // Dot segments are dropped by url normalization and would address the base url.
        if id == "." || id == ".." {
            return Err(ClientError::Configuration(format!(
                "Endpoint id `{id}` is not a valid path segment"
            )));
        }

        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ClientError::Configuration(format!(
                    "Base url {} cannot hold an endpoint path",
                    self.config.base_url
                ))
            })?
            .pop_if_empty()
            .push(&id)
            .push("");

        Ok(EndpointHandle {
            client: self.clone(),
            id,
            url,
        })
    }
}

/// A handle scoped to one remote endpoint.
#[derive(Debug, Clone)]
pub struct EndpointHandle {
    client: Client,
    id: String,
    url: Url,
}

impl EndpointHandle {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Root URL of the endpoint. Operation routes are joined onto it.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Submit a job and block until the endpoint answers with a terminal result.
    ///
    /// The result body is returned exactly as received. A body whose `status` reports a
    /// failed, cancelled or timed out job is turned into [ClientError::RemoteJob].
    ///
    /// Each call drives its own single-threaded runtime, so it must not be called from
    /// inside an async runtime: doing so panics. From async code, move the call onto a
    /// blocking thread (`tokio::task::spawn_blocking`).
    pub fn run_sync(&self, request: &RunRequest) -> Result<JobResult, ClientError> {
        self.run_sync_with_cancel(request, &CancellationToken::new())
    }

    /// Same as [run_sync](Self::run_sync), aborting the request once `cancellation` fires.
    pub fn run_sync_with_cancel(
        &self,
        request: &RunRequest,
        cancellation: &CancellationToken,
    ) -> Result<JobResult, ClientError> {
        let body = serde_json::to_vec(request).map_err(|e| {
            ClientError::Configuration(format!("Failed to serialize payload: {e}"))
        })?;

        let max = self.client.config.max_payload_len;
        if body.len() > max {
            return Err(ClientError::PayloadTooLarge {
                len: body.len(),
                max,
            });
        }

        debug!(
            "Submitting synchronous job to endpoint {} ({} bytes)",
            self.id,
            body.len()
        );
        let response = self.send(Method::POST, "runsync", Some(body), cancellation)?;
        let result = parse_body(&response)?;

        check_job_status(result)
    }

    /// Query the health of the endpoint: worker and job counters as reported remotely.
    pub fn health(&self) -> Result<Value, ClientError> {
        let response = self.send(Method::GET, "health", None, &CancellationToken::new())?;
        parse_body(&response)
    }

    fn send(
        &self,
        method: Method,
        route: &str,
        body: Option<Vec<u8>>,
        cancellation: &CancellationToken,
    ) -> Result<HttpResponse, ClientError> {
        if cancellation.is_cancelled() {
            return Err(ClientError::Cancelled);
        }

        let url = self.url.join(route).map_err(|e| {
            ClientError::Configuration(format!("Invalid route {route}: {e}"))
        })?;

        let request = HttpRequest {
            method,
            url,
            bearer_token: self.client.credentials.api_key().to_string(),
            body,
            timeout: self.client.config.timeout,
            user_agent: self.client.config.user_agent.clone(),
        };

        let response = self.client.transport.execute(request, cancellation)?;
        debug!("Endpoint {} responded with {}", self.id, response.status);

        response.map_to_client_err()
    }
}

fn parse_body(response: &HttpResponse) -> Result<Value, ClientError> {
    serde_json::from_slice(&response.body).map_err(|e| ClientError::Service {
        status: response.status,
        message: format!("Invalid response body: {e}"),
    })
}

fn check_job_status(result: JobResult) -> Result<JobResult, ClientError> {
    let Some(status) = result.get("status").and_then(Value::as_str) else {
        return Ok(result);
    };
    let status = JobStatus::from(status);

    if status.is_failure() {
        let message = match result.get("error") {
            Some(Value::String(error)) => error.clone(),
            Some(error) => error.to_string(),
            None => format!("Job ended with status {status}"),
        };
        warn!("Remote job {status}: {message}");
        return Err(ClientError::RemoteJob {
            status,
            message,
            body: result,
        });
    }

    if status.is_pending() {
        let id = result.get("id").and_then(Value::as_str).unwrap_or("unknown");
        return Err(ClientError::Service {
            status: StatusCode::OK,
            message: format!("Job {id} did not reach a terminal state (status {status})"),
        });
    }

    Ok(result)
}
