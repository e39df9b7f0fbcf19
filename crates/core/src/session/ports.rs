//! Port interfaces for session state
//!
//! These traits define the boundaries between the API client and whatever
//! the host platform offers for credential persistence and navigation.

use std::fmt;

use async_trait::async_trait;
use kanflow_domain::constants::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use kanflow_domain::Result;
use parking_lot::Mutex;

/// Named credential entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialKey {
    /// Short-lived bearer token sent in `Authorization`.
    AccessToken,
    /// Long-lived token used only against the refresh endpoint.
    RefreshToken,
}

impl CredentialKey {
    pub const ALL: [Self; 2] = [Self::AccessToken, Self::RefreshToken];

    /// Storage key (`access_token` / `refresh_token`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AccessToken => ACCESS_TOKEN_KEY,
            Self::RefreshToken => REFRESH_TOKEN_KEY,
        }
    }
}

impl fmt::Display for CredentialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key-value store for session credentials
///
/// Implementations must treat deleting an absent key as success so that
/// logout stays idempotent. Values are secrets: never log them.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Read a credential, `None` when absent
    async fn get(&self, key: CredentialKey) -> Result<Option<String>>;

    /// Write (or overwrite) a credential
    async fn set(&self, key: CredentialKey, value: &str) -> Result<()>;

    /// Remove a credential; absent keys are not an error
    async fn delete(&self, key: CredentialKey) -> Result<()>;

    /// Remove every credential
    async fn clear(&self) -> Result<()> {
        for key in CredentialKey::ALL {
            self.delete(key).await?;
        }
        Ok(())
    }
}

/// Navigation hook fired when the session is torn down
pub trait LoginRedirect: Send + Sync {
    /// Send the user to the login entry point.
    fn redirect_to_login(&self, login_path: &str);
}

/// Redirect that only remembers where it was sent.
///
/// Used by headless hosts and tests.
#[derive(Debug, Default)]
pub struct RecordingRedirect {
    visits: Mutex<Vec<String>>,
}

impl RecordingRedirect {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths redirected to, oldest first.
    #[must_use]
    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().clone()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.visits.lock().len()
    }
}

impl LoginRedirect for RecordingRedirect {
    fn redirect_to_login(&self, login_path: &str) {
        tracing::info!(login_path, "redirecting to login");
        self.visits.lock().push(login_path.to_string());
    }
}
