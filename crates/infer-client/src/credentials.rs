use std::fmt::{Debug, Formatter};
use std::str::FromStr;

use crate::error::ClientError;

/// API key used to authenticate requests against the inference endpoint.
///
/// The key is sent as a bearer token and is otherwise opaque. `Debug` never prints it.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ClientError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ClientError::Configuration(
                "API key cannot be empty".to_string(),
            ));
        }
        Ok(Self { api_key })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl FromStr for Credentials {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<Option<String>> for Credentials {
    type Error = ClientError;

    fn try_from(api_key: Option<String>) -> Result<Self, Self::Error> {
        match api_key {
            Some(api_key) => Self::new(api_key),
            None => Err(ClientError::Configuration("API key is missing".to_string())),
        }
    }
}
