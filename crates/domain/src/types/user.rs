//! User and authentication payloads

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authenticated user as returned by `/user/me`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
}

/// Login request body
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Registration request body
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Payload of login, register and refresh responses.
///
/// `access_token` is optional on the wire; a missing token is a failure the
/// caller has to report.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccessTokenPayload {
    #[serde(default)]
    pub access_token: Option<String>,
}

impl AccessTokenPayload {
    /// The token, if present and non-empty.
    #[must_use]
    pub fn into_token(self) -> Option<String> {
        self.access_token.filter(|token| !token.is_empty())
    }
}
