use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{ClientError, ClientResult};

/// Service root used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1/";
/// Environment variable overriding the configured service root.
pub const API_URL_ENV: &str = "SECURE_WEATHER_API_URL";
/// Directory name under the platform config directory.
pub const CONFIG_DIR_NAME: &str = "secure-weather";

const CONFIG_FILE_NAME: &str = "config.yaml";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the record service.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Root of the service API, such as `http://localhost:8000/api/v1/`.
    pub api_url: String,
    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Config with the given service root and the default timeout.
    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Self::default()
        }
    }

    /// Parse the service root, ensuring it ends with `/` so endpoints join beneath it.
    pub fn base_url(&self) -> ClientResult<Url> {
        let trimmed = self.api_url.trim();
        let normalized = if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{trimmed}/")
        };
        let url = Url::parse(&normalized)?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::Config(format!(
                "{} is not an http(s) base url",
                self.api_url
            )));
        }
        Ok(url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Resolve the config file location (`<config dir>/secure-weather/config.yaml`).
    pub fn default_path() -> ClientResult<PathBuf> {
        if let Some(dir) = dirs::config_dir() {
            return Ok(dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME));
        }
        Err(ClientError::Config(
            "unable to determine config directory".into(),
        ))
    }

    /// Load a config file, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> ClientResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents =
            fs::read_to_string(path).map_err(|err| ClientError::Config(err.to_string()))?;
        serde_yaml::from_str(&contents).map_err(|err| ClientError::Config(err.to_string()))
    }

    /// Write the config file, creating its directory when needed.
    pub fn save(&self, path: &Path) -> ClientResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| ClientError::Config(err.to_string()))?;
        }
        let contents =
            serde_yaml::to_string(self).map_err(|err| ClientError::Config(err.to_string()))?;
        fs::write(path, contents).map_err(|err| ClientError::Config(err.to_string()))
    }

    /// Combine the config file, environment and command line, later sources winning.
    pub fn resolve(
        path: &Path,
        env_url: Option<String>,
        flag_url: Option<String>,
    ) -> ClientResult<Self> {
        let mut config = Self::load(path)?;
        let overrides = [env_url, flag_url];
        for url in overrides.into_iter().flatten() {
            if !url.trim().is_empty() {
                config.api_url = url;
            }
        }
        config.base_url()?;
        Ok(config)
    }
}
