//! Session lifecycle on top of [`ApiClient`]
//!
//! Login and registration store the returned access token; the refresh token
//! arrives as a `Set-Cookie` and is captured by the client itself.

use std::sync::Arc;

use kanflow_core::{guard_route, CredentialKey, RouteDecision};
use kanflow_domain::constants::endpoints;
use kanflow_domain::types::{AccessTokenPayload, Credentials, NewUser, User};
use reqwest::Method;
use tracing::{info, instrument, warn};

use super::client::ApiClient;
use super::errors::ApiError;
use super::request::{Payload, RequestDescriptor};

/// Login, registration and sign-out
#[derive(Debug, Clone)]
pub struct SessionService {
    client: Arc<ApiClient>,
}

impl SessionService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    /// Sign in and store the issued access token.
    ///
    /// A 401 here means bad credentials, so it never triggers a refresh.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<(), ApiError> {
        self.authenticate(endpoints::LOGIN, Payload::json(credentials)?).await?;
        info!("logged in");
        Ok(())
    }

    /// Create an account; the backend signs the new user in immediately.
    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn register(&self, user: &NewUser) -> Result<(), ApiError> {
        self.authenticate(endpoints::REGISTER, Payload::json(user)?).await?;
        info!("registered");
        Ok(())
    }

    /// Tell the backend to drop the refresh cookie, then tear the session
    /// down locally whatever the backend said.
    ///
    /// The backend call never refreshes on 401, so the teardown and its
    /// redirect happen exactly once.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) -> Result<(), ApiError> {
        let request = RequestDescriptor::new(Method::POST, self.client.url(endpoints::LOGOUT, None)?)
            .with_body(Payload::empty_object())
            .without_auth_retry();
        if let Err(err) = self.client.execute(request).await {
            warn!(error = %err, "server-side logout failed, clearing local session anyway");
        }
        self.client.logout().await
    }

    pub async fn is_authenticated(&self) -> Result<bool, ApiError> {
        Ok(self.client.access_token().await?.is_some())
    }

    /// Profile of the signed-in user.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.client.get(endpoints::ME, None, None).await
    }

    /// Navigation decision for `path` given the stored credentials.
    pub async fn route(&self, path: &str) -> Result<RouteDecision, ApiError> {
        let signed_in = self.is_authenticated().await?;
        Ok(guard_route(path, signed_in, &self.client.config().login_path))
    }

    async fn authenticate(&self, path: &str, payload: Payload) -> Result<(), ApiError> {
        let request = RequestDescriptor::new(Method::POST, self.client.url(path, None)?)
            .with_body(payload)
            .without_auth_retry();

        let token = self
            .client
            .execute(request)
            .await?
            .into_payload::<AccessTokenPayload>()?
            .into_token()
            .ok_or_else(|| ApiError::Auth("response did not include an access token".into()))?;

        self.client.store().set(CredentialKey::AccessToken, &token).await?;
        Ok(())
    }
}
