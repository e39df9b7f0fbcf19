use std::collections::HashMap;

use async_trait::async_trait;
use kanflow_core::{CredentialKey, CredentialStore};
use kanflow_domain::Result;
use parking_lot::RwLock;

/// In-process credential store.
///
/// Nothing survives the process; suited to servers and tests.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: RwLock<HashMap<CredentialKey, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self, key: CredentialKey) -> Result<Option<String>> {
        Ok(self.entries.read().get(&key).cloned())
    }

    async fn set(&self, key: CredentialKey, value: &str) -> Result<()> {
        self.entries.write().insert(key, value.to_string());
        Ok(())
    }

    async fn delete(&self, key: CredentialKey) -> Result<()> {
        self.entries.write().remove(&key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_delete() {
        let store = MemoryCredentialStore::new();
        assert!(store.get(CredentialKey::AccessToken).await.unwrap().is_none());

        store.set(CredentialKey::AccessToken, "tok1").await.unwrap();
        store.set(CredentialKey::AccessToken, "tok2").await.unwrap();
        assert_eq!(store.get(CredentialKey::AccessToken).await.unwrap(), Some("tok2".into()));
        assert_eq!(store.len(), 1);

        store.delete(CredentialKey::AccessToken).await.unwrap();
        store.delete(CredentialKey::AccessToken).await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn clear_removes_both_keys() {
        let store = MemoryCredentialStore::new();
        store.set(CredentialKey::AccessToken, "tok").await.unwrap();
        store.set(CredentialKey::RefreshToken, "ref").await.unwrap();

        store.clear().await.unwrap();
        assert!(store.is_empty());
    }
}
