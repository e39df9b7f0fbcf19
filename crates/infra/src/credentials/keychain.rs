//! Platform keychain credential store

use async_trait::async_trait;
use keyring::{Entry, Error as KeyringError};
use kanflow_core::{CredentialKey, CredentialStore};
use kanflow_domain::{KanflowError, Result};
use tracing::debug;

use crate::errors::InfraError;

/// Stores each credential as its own keychain entry under `service`.
///
/// Keychain calls block, so they run on the blocking thread pool.
#[derive(Debug, Clone)]
pub struct KeychainCredentialStore {
    service: String,
}

impl KeychainCredentialStore {
    pub fn new(service: impl Into<String>) -> Self {
        Self { service: service.into() }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    async fn with_entry<T, F>(&self, key: CredentialKey, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Entry) -> std::result::Result<T, KeyringError> + Send + 'static,
    {
        let service = self.service.clone();
        tokio::task::spawn_blocking(move || {
            let entry = Entry::new(&service, key.as_str()).map_err(InfraError::from)?;
            op(&entry).map_err(|err| KanflowError::from(InfraError::from(err)))
        })
        .await
        .map_err(|e| KanflowError::Internal(format!("keychain task failed: {e}")))?
    }
}

#[async_trait]
impl CredentialStore for KeychainCredentialStore {
    async fn get(&self, key: CredentialKey) -> Result<Option<String>> {
        self.with_entry(key, |entry| match entry.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(KeyringError::NoEntry) => Ok(None),
            Err(err) => Err(err),
        })
        .await
    }

    async fn set(&self, key: CredentialKey, value: &str) -> Result<()> {
        debug!(%key, service = %self.service, "writing keychain entry");
        let value = value.to_string();
        self.with_entry(key, move |entry| entry.set_password(&value)).await
    }

    async fn delete(&self, key: CredentialKey) -> Result<()> {
        self.with_entry(key, |entry| match entry.delete_credential() {
            Ok(()) | Err(KeyringError::NoEntry) => Ok(()),
            Err(err) => Err(err),
        })
        .await
    }
}
