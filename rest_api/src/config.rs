// rest_api/src/config.rs

use std::env;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, File as ConfigFile};
use log::debug;
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_ALERT_POLL_SECS: u64 = 5;
pub const DEFAULT_DETAIL_POLL_SECS: u64 = 10;
pub const DEFAULT_ALERT_REQUEST_TIMEOUT_SECS: u64 = 5;

/// Environment variables consulted for the base URL, highest priority first.
pub const API_URL_ENV_VARS: &[&str] = &["HOSPITAL_API_URL", "NEXT_PUBLIC_API_URL"];

/// Base name of the optional config file looked up in the working directory
/// (`hospital.toml`, `hospital.yaml`, ...).
pub const CONFIG_FILE_STEM: &str = "hospital";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub alert_poll_secs: u64,
    pub detail_poll_secs: u64,
    pub alert_request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            alert_poll_secs: DEFAULT_ALERT_POLL_SECS,
            detail_poll_secs: DEFAULT_DETAIL_POLL_SECS,
            alert_request_timeout_secs: DEFAULT_ALERT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn alert_poll_interval(&self) -> Duration {
        Duration::from_secs(self.alert_poll_secs.max(1))
    }

    pub fn detail_poll_interval(&self) -> Duration {
        Duration::from_secs(self.detail_poll_secs.max(1))
    }

    pub fn alert_request_timeout(&self) -> Duration {
        Duration::from_secs(self.alert_request_timeout_secs.max(1))
    }

    /// Base URL without a trailing slash or `/api` suffix; endpoint paths
    /// already start with `/api`.
    pub fn normalized_base_url(&self) -> String {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        trimmed.strip_suffix("/api").unwrap_or(trimmed).to_string()
    }
}

/// Loads the API configuration: defaults, then the config file, then `.env`
/// and the environment.
pub fn load_api_config(config_file: Option<&Path>) -> Result<ApiConfig> {
    dotenv::dotenv().ok();

    let defaults = ApiConfig::default();
    let mut builder = Config::builder()
        .set_default("base_url", defaults.base_url.clone())?
        .set_default("request_timeout_secs", defaults.request_timeout_secs as i64)?
        .set_default("alert_poll_secs", defaults.alert_poll_secs as i64)?
        .set_default("detail_poll_secs", defaults.detail_poll_secs as i64)?
        .set_default("alert_request_timeout_secs", defaults.alert_request_timeout_secs as i64)?;

    builder = match config_file {
        Some(path) => builder.add_source(ConfigFile::from(path).required(true)),
        None => builder.add_source(ConfigFile::with_name(CONFIG_FILE_STEM).required(false)),
    };

    if let Some(url) = api_url_from_env() {
        debug!("Using API base URL from environment: {}", url);
        builder = builder.set_override("base_url", url)?;
    }

    let config = builder.build().context("Failed to build API configuration")?;
    config
        .try_deserialize::<ApiConfig>()
        .context("Failed to parse API configuration")
}

fn api_url_from_env() -> Option<String> {
    API_URL_ENV_VARS
        .iter()
        .filter_map(|name| env::var(name).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn base_url_is_normalised() {
        let mut config = ApiConfig::default();
        config.base_url = "https://portal.example.vn/api/".into();
        assert_eq!(config.normalized_base_url(), "https://portal.example.vn");
        config.base_url = "http://10.0.0.5:8080".into();
        assert_eq!(config.normalized_base_url(), "http://10.0.0.5:8080");
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portal.toml");
        fs::write(&path, "alert_poll_secs = 3\ndetail_poll_secs = 20\n").unwrap();
        let config = load_api_config(Some(&path)).unwrap();
        assert_eq!(config.alert_poll_secs, 3);
        assert_eq!(config.detail_poll_interval(), Duration::from_secs(20));
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_api_config(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
