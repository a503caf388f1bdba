//! Client configuration loading and validation

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::auth::Credentials;
use crate::error::Error;
use crate::DEFAULT_BASE_URL;

/// Tracking client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Customer.io site id
    pub site_id: Option<String>,

    /// Tracking API key
    pub api_key: Option<String>,

    /// API base (default: https://track.customer.io/api/v1/)
    pub base_url: String,

    /// Per-request timeout in seconds (default: 10)
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            site_id: None,
            api_key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl ClientConfig {
    /// Validated credentials from the configured site id and API key
    pub fn credentials(&self) -> Result<Credentials, Error> {
        let site_id = self
            .site_id
            .as_deref()
            .ok_or(Error::InvalidCredentials("site id is not configured"))?;
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(Error::InvalidCredentials("API key is not configured"))?;
        Credentials::new(site_id, api_key)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check the transport settings
    pub fn validate(&self) -> Result<(), Error> {
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(Error::Config(format!(
                "base_url must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Load client configuration with precedence:
/// 1. Environment variables (highest priority)
/// 2. Local config (.cio-track/config.local.toml)
/// 3. Project config (.cio-track/config.toml)
/// 4. User config (~/.cio-track/config.toml)
/// 5. Defaults
pub fn load_client_config() -> Result<ClientConfig> {
    let mut config = ClientConfig::default();

    if let Some(home_dir) = dirs::home_dir() {
        let user_config = home_dir.join(".cio-track/config.toml");
        if user_config.exists() {
            merge_config(&mut config, load_config_from_file(&user_config)?);
        }
    }

    for local in [".cio-track/config.toml", ".cio-track/config.local.toml"] {
        let path = PathBuf::from(local);
        if path.exists() {
            merge_config(&mut config, load_config_from_file(&path)?);
        }
    }

    apply_env_overrides(&mut config)?;

    Ok(config)
}

/// Partial config as written in a file; unset keys keep lower-priority values
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    site_id: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

/// Load the `[customerio]` section of a TOML file
fn load_config_from_file(path: &Path) -> Result<FileConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;

    #[derive(Deserialize)]
    struct FullConfig {
        #[serde(default)]
        customerio: Option<FileConfig>,
    }

    let full_config: FullConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.display()))?;

    Ok(full_config.customerio.unwrap_or_default())
}

fn merge_config(base: &mut ClientConfig, new: FileConfig) {
    if new.site_id.is_some() {
        base.site_id = new.site_id;
    }
    if new.api_key.is_some() {
        base.api_key = new.api_key;
    }
    if let Some(base_url) = new.base_url {
        base.base_url = base_url;
    }
    if let Some(timeout_secs) = new.timeout_secs {
        base.timeout_secs = timeout_secs;
    }
}

fn apply_env_overrides(config: &mut ClientConfig) -> Result<()> {
    if let Ok(site_id) = env::var("CUSTOMERIO_SITE_ID") {
        config.site_id = Some(site_id);
    }
    if let Ok(api_key) = env::var("CUSTOMERIO_API_KEY") {
        config.api_key = Some(api_key);
    }
    if let Ok(base_url) = env::var("CUSTOMERIO_BASE_URL") {
        config.base_url = base_url;
    }
    if let Ok(timeout) = env::var("CUSTOMERIO_TIMEOUT_SECS") {
        config.timeout_secs = timeout
            .trim()
            .parse()
            .with_context(|| format!("CUSTOMERIO_TIMEOUT_SECS is not a number: {}", timeout))?;
    }

    Ok(())
}
