//! Credential store backends
//!
//! Implementations of [`kanflow_core::CredentialStore`]. Which one a client
//! uses is decided by [`CredentialConfig`].

pub mod file;
pub mod keychain;
pub mod memory;

use std::sync::Arc;

use kanflow_core::CredentialStore;
use kanflow_domain::constants::DEFAULT_CREDENTIAL_FILE;
use kanflow_domain::{CredentialConfig, CredentialStoreKind, Result};
use tracing::debug;

pub use file::FileCredentialStore;
pub use keychain::KeychainCredentialStore;
pub use memory::MemoryCredentialStore;

/// Create the store selected by configuration.
pub fn build_store(config: &CredentialConfig) -> Result<Arc<dyn CredentialStore>> {
    debug!(store = %config.store, "building credential store");
    let store: Arc<dyn CredentialStore> = match config.store {
        CredentialStoreKind::Memory => Arc::new(MemoryCredentialStore::new()),
        CredentialStoreKind::File => {
            let path = config.file_path.clone().unwrap_or_else(|| DEFAULT_CREDENTIAL_FILE.into());
            Arc::new(FileCredentialStore::open(path)?)
        }
        CredentialStoreKind::Keychain => {
            Arc::new(KeychainCredentialStore::new(config.keychain_service.clone()))
        }
    };
    Ok(store)
}
