//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.talkbridge/config.json`) and environment.
//! Only the account used to build trusted download URLs lives here.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Nextcloud account the bot's files are reachable under.
    #[serde(default)]
    pub account: AccountConfig,
}

/// Nextcloud server and account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountConfig {
    /// Server base URL, e.g. "https://cloud.example.com". Overridden by TALKBRIDGE_BASE_URL env.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Account (API user) whose WebDAV files root holds shared files.
    /// Overridden by TALKBRIDGE_API_USER env.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_user: Option<String>,
}

/// Trimmed, non-empty env value wins over the trimmed, non-empty config value.
fn env_or_config(env_value: Option<String>, configured: Option<&String>) -> Option<String> {
    env_value
        .and_then(|s| {
            let t = s.trim();
            if t.is_empty() {
                None
            } else {
                Some(t.to_string())
            }
        })
        .or_else(|| {
            configured
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}

/// Resolve the server base URL: env TALKBRIDGE_BASE_URL overrides config.
/// Trailing slashes are removed.
pub fn resolve_base_url(config: &Config) -> Option<String> {
    env_or_config(
        std::env::var("TALKBRIDGE_BASE_URL").ok(),
        config.account.base_url.as_ref(),
    )
    .map(|u| u.trim_end_matches('/').to_string())
    .filter(|u| !u.is_empty())
}

/// Resolve the API user: env TALKBRIDGE_API_USER overrides config.
pub fn resolve_api_user(config: &Config) -> Option<String> {
    env_or_config(
        std::env::var("TALKBRIDGE_API_USER").ok(),
        config.account.api_user.as_ref(),
    )
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("TALKBRIDGE_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".talkbridge").join("config.json"))
                .unwrap_or_else(|| PathBuf::from("config.json"))
        })
}

/// Load config from the given path, or the default path
/// (TALKBRIDGE_CONFIG_PATH or ~/.talkbridge/config.json).
/// Missing file => default config. Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    if config.account.base_url.is_some() != config.account.api_user.is_some() {
        log::warn!(
            "config {}: account.baseUrl and account.apiUser should be set together; \
             file links will come from payloads",
            path.display()
        );
    }
    Ok((config, path))
}
