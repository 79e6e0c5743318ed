use directories::ProjectDirs;
use infer_client::credentials::Credentials;
use serde::{Deserialize, Serialize};
use std::{fs, io, path::PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error("Missing configuration directory")]
    MissingDirectory,
}

#[derive(Serialize, Deserialize)]
pub struct SavedCredentials {
    pub api_key: String,
}

impl From<&Credentials> for SavedCredentials {
    fn from(credentials: &Credentials) -> Self {
        Self {
            api_key: credentials.api_key().to_string(),
        }
    }
}

/// Per-user configuration directory of the CLI.
pub struct AppConfig {
    base_dir: PathBuf,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let proj_dirs =
            ProjectDirs::from("dev", "infer", "infer").ok_or(ConfigError::MissingDirectory)?;

        let config_dir = proj_dirs.config_dir().to_path_buf();
        fs::create_dir_all(&config_dir)?;

        Ok(Self::at(config_dir))
    }

    pub fn at(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn credentials_path(&self) -> PathBuf {
        self.base_dir.join("credentials.json")
    }

    pub fn save_credentials(&self, creds: &SavedCredentials) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(creds)?;
        let path = self.credentials_path();
        fs::write(&path, json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    pub fn load_credentials(&self) -> Result<Option<SavedCredentials>, ConfigError> {
        let path = self.credentials_path();
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let creds = serde_json::from_str(&contents)?;
            Ok(Some(creds))
        } else {
            Ok(None)
        }
    }
}
