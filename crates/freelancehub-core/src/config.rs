//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the API base URL, where the credential is kept, and the
//! last email used to log in.
//!
//! Configuration is stored at `~/.config/freelancehub/config.json`.
//! `FREELANCEHUB_API_URL` and `FREELANCEHUB_EMAIL` override the file.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::{ApiClient, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::auth::{FileTokenStore, KeyringTokenStore, SessionStore, TokenStore};

/// Application name used for config/data directory paths
const APP_NAME: &str = "freelancehub";

/// Config file name
const CONFIG_FILE: &str = "config.json";

pub const ENV_API_URL: &str = "FREELANCEHUB_API_URL";
pub const ENV_EMAIL: &str = "FREELANCEHUB_EMAIL";

/// Where the bearer credential is persisted between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TokenStorage {
    #[default]
    File,
    Keyring,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub token_storage: TokenStorage,
    #[serde(default)]
    pub last_email: Option<String>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path).context("Failed to read config file")?;
            Ok(serde_json::from_str(&contents).context("Failed to parse config file")?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir =
            dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Base URL to use, honoring the environment override
    pub fn base_url(&self) -> String {
        Self::resolve_base_url(std::env::var(ENV_API_URL).ok(), self.api_base_url.as_deref())
    }

    fn resolve_base_url(env: Option<String>, configured: Option<&str>) -> String {
        env.filter(|s| !s.trim().is_empty())
            .or_else(|| configured.map(str::to_string))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Email to prefill on the login form
    pub fn default_email(&self) -> String {
        std::env::var(ENV_EMAIL)
            .ok()
            .or_else(|| self.last_email.clone())
            .unwrap_or_default()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    pub fn token_store(&self) -> Result<Box<dyn TokenStore>> {
        Ok(match self.token_storage {
            TokenStorage::File => Box::new(FileTokenStore::new(self.data_dir()?)),
            TokenStorage::Keyring => Box::new(KeyringTokenStore),
        })
    }

    /// Build the API client and session described by this configuration
    pub fn build_session(&self) -> Result<SessionStore> {
        let api = ApiClient::new(&self.base_url(), self.request_timeout())
            .context("Failed to create HTTP client")?;
        Ok(SessionStore::new(api, self.token_store()?))
    }
}
