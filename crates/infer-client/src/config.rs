use std::time::Duration;

use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.runpod.ai/v2/";

/// Upper bound on a whole synchronous run, connection included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Largest request body the endpoint accepts.
pub const MAX_PAYLOAD_LEN: usize = 10 * 1024 * 1024;

/// Configuration for the [Client](crate::Client). Can be created using [ClientConfigBuilder], which is created using the [ClientConfig::builder] method.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL the endpoint identifier is appended to. Always ends with a `/`.
    pub base_url: Url,
    /// Maximum time to wait for a synchronous run to complete.
    pub timeout: Duration,
    /// Requests whose serialized body is larger than this are rejected locally.
    pub max_payload_len: usize,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("Default base url should be valid"),
            timeout: DEFAULT_TIMEOUT,
            max_payload_len: MAX_PAYLOAD_LEN,
            user_agent: concat!("infer-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Builder for the ClientConfig
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub(crate) fn new() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: ClientConfig::default(),
        }
    }

    /// Set the base URL of the inference API
    pub fn with_base_url(mut self, base_url: Url) -> ClientConfigBuilder {
        self.config.base_url = with_trailing_slash(base_url);
        self
    }

    /// Set the maximum time to wait for a run to complete
    pub fn with_timeout(mut self, timeout: Duration) -> ClientConfigBuilder {
        self.config.timeout = timeout;
        self
    }

    /// Set the maximum serialized payload length in bytes
    pub fn with_max_payload_len(mut self, max_payload_len: usize) -> ClientConfigBuilder {
        self.config.max_payload_len = max_payload_len;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> ClientConfigBuilder {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Build the ClientConfig
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

// `Url::join` replaces the last path segment unless the base ends with a slash.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
