//! Tracing subscriber setup
//!
//! Libraries only emit `tracing` events; hosts call [`init_tracing`] once at
//! startup to decide where they go. `RUST_LOG`, when set, overrides the
//! configured filter.

use kanflow_domain::{KanflowError, LogFormat, LoggingConfig, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// Returns `Ok(false)` when a subscriber was already installed, which is the
/// normal case in tests that initialize tracing repeatedly.
///
/// # Errors
/// Returns `KanflowError::Config` for an invalid filter directive.
pub fn init_tracing(config: &LoggingConfig) -> Result<bool> {
    let filter = build_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.format {
        LogFormat::Text => registry.with(fmt::layer().with_target(true)).try_init(),
        LogFormat::Json => {
            registry.with(fmt::layer().json().with_current_span(true)).try_init()
        }
    };

    Ok(installed.is_ok())
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.filter)
        .map_err(|e| KanflowError::Config(format!("Invalid log filter {:?}: {e}", config.filter)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_directive_filters() {
        let config = LoggingConfig { filter: "info,kanflow_infra=debug".into(), ..Default::default() };
        assert!(build_filter(&config).is_ok());
    }

    #[test]
    fn second_init_is_not_an_error() {
        let config = LoggingConfig::default();
        let _ = init_tracing(&config).unwrap();
        assert!(!init_tracing(&config).unwrap());
    }
}
