//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Reads a `.env` file into the environment when one exists (dotenvy)
//! 2. Attempts to load from environment variables
//! 3. If `KANFLOW_API_URL` is unset, falls back to loading from file
//! 4. Probes multiple paths for config files (JSON or TOML)
//!
//! ## Environment Variables
//! - `KANFLOW_API_URL`: API root, e.g. `https://kanflow.example.com/api` (required)
//! - `KANFLOW_API_TIMEOUT_SECS`: Per-request timeout in seconds
//! - `KANFLOW_LOGIN_PATH`: Where the session teardown redirects to
//! - `KANFLOW_REFRESH_PATH`: Token refresh endpoint
//! - `KANFLOW_USER_AGENT`: User-Agent header sent with every request
//! - `KANFLOW_CREDENTIAL_STORE`: `memory`, `file` or `keychain`
//! - `KANFLOW_CREDENTIAL_FILE`: Cookie jar path for the file store
//! - `KANFLOW_KEYCHAIN_SERVICE`: Keychain service name
//! - `KANFLOW_LOG_FILTER`: `EnvFilter` directive
//! - `KANFLOW_LOG_FORMAT`: `text` or `json`
//!
//! ## File Locations
//! The loader probes `config.{json,toml}` and `kanflow.{json,toml}` in the
//! current directory, its parent and grandparent, then the same set relative
//! to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use kanflow_domain::{
    ApiConfig, Config, CredentialConfig, CredentialStoreKind, KanflowError, LogFormat,
    LoggingConfig, Result,
};
use url::Url;

const CONFIG_FILE_NAMES: [&str; 4] = ["config.json", "config.toml", "kanflow.json", "kanflow.toml"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `KanflowError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - A value fails validation (e.g. an unparseable API URL)
pub fn load() -> Result<Config> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(err) if err.not_found() => {}
        Err(err) => tracing::warn!(error = %err, "Ignoring unreadable .env file"),
    }

    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only `KANFLOW_API_URL` is required; everything else falls back to the
/// defaults of [`Config`].
///
/// # Errors
/// Returns `KanflowError::Config` if `KANFLOW_API_URL` is missing or a
/// variable has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let defaults = ApiConfig::default();
    let api = ApiConfig {
        api_url: env_var("KANFLOW_API_URL")?,
        timeout_secs: env_parse("KANFLOW_API_TIMEOUT_SECS")?.unwrap_or(defaults.timeout_secs),
        login_path: env_opt("KANFLOW_LOGIN_PATH").unwrap_or(defaults.login_path),
        refresh_path: env_opt("KANFLOW_REFRESH_PATH").unwrap_or(defaults.refresh_path),
        user_agent: env_opt("KANFLOW_USER_AGENT"),
    };

    let credential_defaults = CredentialConfig::default();
    let credentials = CredentialConfig {
        store: env_parse::<CredentialStoreKind>("KANFLOW_CREDENTIAL_STORE")?
            .unwrap_or(credential_defaults.store),
        file_path: env_opt("KANFLOW_CREDENTIAL_FILE").map(PathBuf::from),
        keychain_service: env_opt("KANFLOW_KEYCHAIN_SERVICE")
            .unwrap_or(credential_defaults.keychain_service),
    };

    let logging_defaults = LoggingConfig::default();
    let logging = LoggingConfig {
        filter: env_opt("KANFLOW_LOG_FILTER").unwrap_or(logging_defaults.filter),
        format: env_parse::<LogFormat>("KANFLOW_LOG_FORMAT")?.unwrap_or(logging_defaults.format),
    };

    validate(Config { api, credentials, logging })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `KanflowError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(KanflowError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            KanflowError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| KanflowError::Config(format!("Failed to read config file: {e}")))?;

    validate(parse_config(&contents, &config_path)?)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| KanflowError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| KanflowError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(KanflowError::Config(format!("Unsupported config format: {extension}"))),
    }
}

fn validate(config: Config) -> Result<Config> {
    let url = Url::parse(&config.api.api_url)
        .map_err(|e| KanflowError::Config(format!("Invalid api_url {}: {e}", config.api.api_url)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(KanflowError::Config(format!(
            "api_url must be http or https, got {}",
            url.scheme()
        )));
    }
    if config.api.timeout_secs == 0 {
        return Err(KanflowError::Config("timeout_secs must be greater than zero".into()));
    }
    if !config.api.login_path.starts_with('/') {
        return Err(KanflowError::Config(format!(
            "login_path must start with '/', got {}",
            config.api.login_path
        )));
    }
    Ok(config)
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    candidates(&roots).into_iter().find(|path| path.exists())
}

fn candidates(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for root in roots {
        for dir in [root.clone(), root.join(".."), root.join("../..")] {
            paths.extend(CONFIG_FILE_NAMES.iter().map(|name| dir.join(name)));
        }
    }
    paths
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        KanflowError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Optional, non-empty environment variable
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.parse::<T>().map_err(|e| KanflowError::Config(format!("Invalid {key}: {e}")))
        })
        .transpose()
}
