//! Configuration structures
//!
//! Loaded by `kanflow_infra::config` from the environment or a JSON/TOML
//! file. Every section except `api` may be omitted.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    endpoints, DEFAULT_API_URL, DEFAULT_KEYCHAIN_SERVICE, DEFAULT_LOGIN_PATH,
    DEFAULT_TIMEOUT_SECS,
};
use crate::impl_domain_status_conversions;

/// Top-level client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub credentials: CredentialConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP API settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Root of the backend API (e.g. `https://kanflow.example.com/api`).
    /// Per-call service segments are appended to this value.
    pub api_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Entry point the login redirect navigates to after teardown.
    #[serde(default = "default_login_path")]
    pub login_path: String,
    #[serde(default = "default_refresh_path")]
    pub refresh_path: String,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl ApiConfig {
    /// Per-request timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            login_path: default_login_path(),
            refresh_path: default_refresh_path(),
            user_agent: None,
        }
    }
}

/// Which backend holds the credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialStoreKind {
    #[default]
    Memory,
    File,
    Keychain,
}

impl_domain_status_conversions!(CredentialStoreKind {
    Memory => "memory",
    File => "file",
    Keychain => "keychain",
});

/// Credential storage settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialConfig {
    #[serde(default)]
    pub store: CredentialStoreKind,
    /// Cookie jar location for [`CredentialStoreKind::File`].
    #[serde(default)]
    pub file_path: Option<PathBuf>,
    #[serde(default = "default_keychain_service")]
    pub keychain_service: String,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            store: CredentialStoreKind::default(),
            file_path: None,
            keychain_service: default_keychain_service(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl_domain_status_conversions!(LogFormat {
    Text => "text",
    Json => "json",
});

/// Tracing subscriber settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `"info,kanflow_infra=debug"`.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: default_log_filter(), format: LogFormat::default() }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_login_path() -> String {
    DEFAULT_LOGIN_PATH.to_string()
}

fn default_refresh_path() -> String {
    endpoints::REFRESH.to_string()
}

fn default_keychain_service() -> String {
    DEFAULT_KEYCHAIN_SERVICE.to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_json_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "api": { "api_url": "https://kanflow.test/api" } }"#)
                .unwrap();

        assert_eq!(config.api.api_url, "https://kanflow.test/api");
        assert_eq!(config.api.timeout(), Duration::from_secs(10));
        assert_eq!(config.api.login_path, "/login");
        assert_eq!(config.api.refresh_path, "/user/refresh");
        assert_eq!(config.credentials.store, CredentialStoreKind::Memory);
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn store_kind_parses_from_env_style_strings() {
        assert_eq!("Keychain".parse::<CredentialStoreKind>().unwrap(), CredentialStoreKind::Keychain);
        assert!("cookie".parse::<CredentialStoreKind>().is_err());
    }
}
