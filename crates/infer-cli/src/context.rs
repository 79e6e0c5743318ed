use std::time::Duration;

use infer_client::config::ClientConfig;
use infer_client::error::ClientError;
use infer_client::{Client, EndpointHandle};

use crate::app_config::{AppConfig, ConfigError};
use crate::cli::EndpointArgs;

#[derive(thiserror::Error, Debug)]
pub enum ClientCreationError {
    #[error("No API key found. Pass --api-key, set RUNPOD_API_KEY or run `infer login`")]
    NoCredentials,
    #[error("No endpoint id given. Pass --endpoint-id or set RUNPOD_ENDPOINT_ID")]
    NoEndpoint,
    #[error("Failed to read saved credentials: {0}")]
    SavedCredentials(#[from] ConfigError),
    #[error(transparent)]
    Client(#[from] ClientError),
}

pub struct CliContext {
    args: EndpointArgs,
    app_config: Option<AppConfig>,
}

impl CliContext {
    pub fn new(args: EndpointArgs, app_config: Option<AppConfig>) -> Self {
        Self { args, app_config }
    }

    pub fn app_config(&self) -> Option<&AppConfig> {
        self.app_config.as_ref()
    }

    /// API key given on the command line or through the environment.
    pub fn explicit_api_key(&self) -> Option<&str> {
        self.args
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }

    fn resolve_api_key(&self) -> Result<String, ClientCreationError> {
        if let Some(api_key) = self.explicit_api_key() {
            return Ok(api_key.to_string());
        }

        if let Some(app_config) = &self.app_config {
            if let Some(saved) = app_config.load_credentials()? {
                log::debug!("Using credentials from {}", app_config.credentials_path().display());
                return Ok(saved.api_key);
            }
        }

        Err(ClientCreationError::NoCredentials)
    }

    pub fn client_config(&self) -> ClientConfig {
        let mut builder =
            ClientConfig::builder().with_timeout(Duration::from_secs(self.args.timeout));
        if let Some(base_url) = &self.args.base_url {
            builder = builder.with_base_url(base_url.clone());
        }
        builder.build()
    }

    pub fn create_client(&self) -> Result<Client, ClientCreationError> {
        let api_key = self.resolve_api_key()?;
        Ok(Client::with_config(api_key, self.client_config())?)
    }

    pub fn endpoint(&self) -> Result<EndpointHandle, ClientCreationError> {
        let endpoint_id = self
            .args
            .endpoint_id
            .clone()
            .ok_or(ClientCreationError::NoEndpoint)?;

        Ok(self.create_client()?.endpoint(endpoint_id)?)
    }
}
