//! Conversions from external infrastructure errors into domain errors.

use keyring::Error as KeyringError;
use kanflow_domain::KanflowError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub KanflowError);

impl From<InfraError> for KanflowError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<KanflowError> for InfraError {
    fn from(value: KanflowError) -> Self {
        Self(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoKanflowError {
    fn into_kanflow(self) -> KanflowError;
}

/* -------------------------------------------------------------------------- */
/* keyring::Error → KanflowError */
/* -------------------------------------------------------------------------- */

impl IntoKanflowError for KeyringError {
    fn into_kanflow(self) -> KanflowError {
        match self {
            KeyringError::NoEntry => KanflowError::NotFound("keychain entry not found".into()),
            KeyringError::BadEncoding(_) => {
                KanflowError::Storage("credential in keychain is not valid UTF-8".into())
            }
            KeyringError::NoStorageAccess(err) | KeyringError::PlatformFailure(err) => {
                KanflowError::Storage(format!("keychain unavailable: {err}"))
            }
            other => KanflowError::Storage(other.to_string()),
        }
    }
}

impl From<KeyringError> for InfraError {
    fn from(value: KeyringError) -> Self {
        Self(value.into_kanflow())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → KanflowError */
/* -------------------------------------------------------------------------- */

impl IntoKanflowError for std::io::Error {
    fn into_kanflow(self) -> KanflowError {
        match self.kind() {
            std::io::ErrorKind::NotFound => KanflowError::NotFound(self.to_string()),
            std::io::ErrorKind::PermissionDenied => {
                KanflowError::Storage(format!("permission denied: {self}"))
            }
            _ => KanflowError::Storage(self.to_string()),
        }
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        Self(value.into_kanflow())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → KanflowError */
/* -------------------------------------------------------------------------- */

impl IntoKanflowError for serde_json::Error {
    fn into_kanflow(self) -> KanflowError {
        KanflowError::Storage(format!("malformed credential file: {self}"))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        Self(value.into_kanflow())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → KanflowError */
/* -------------------------------------------------------------------------- */

impl IntoKanflowError for reqwest::Error {
    fn into_kanflow(self) -> KanflowError {
        if self.is_builder() {
            KanflowError::Config(format!("invalid HTTP client configuration: {self}"))
        } else if self.is_timeout() {
            KanflowError::Network(format!("HTTP request timed out: {self}"))
        } else {
            KanflowError::Network(format!("HTTP request failed: {self}"))
        }
    }
}

impl From<reqwest::Error> for InfraError {
    fn from(value: reqwest::Error) -> Self {
        Self(value.into_kanflow())
    }
}
