//! Authenticated API client
//!
//! Injects the stored bearer token and refresh cookie into every request,
//! unwraps the `{success, payload, message}` envelope, and recovers from an
//! expired access token by refreshing it once and replaying the request.
//! Concurrent 401s share a single refresh through the client's
//! [`RefreshGate`].

use std::sync::Arc;
use std::time::Duration;

use kanflow_core::{CredentialKey, CredentialStore, LoginRedirect, RecordingRedirect};
use kanflow_domain::constants::REFRESH_TOKEN_KEY;
use kanflow_domain::types::{AccessTokenPayload, Envelope};
use kanflow_domain::{ApiConfig, Config};
use reqwest::header::{HeaderValue, CONTENT_TYPE, COOKIE};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::errors::ApiError;
use super::refresh::{Admission, RefreshGate, RefreshLease};
use super::request::{query_pairs, resolve_url, Payload, RequestBody, RequestDescriptor};
use crate::credentials::{build_store, MemoryCredentialStore};
use crate::http::HttpClient;

const REFRESH_FAILED: &str = "Failed to refresh token";

/// Raw outcome of one request
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    /// Parsed JSON body, a JSON string for non-JSON text, `null` when empty.
    pub body: Value,
}

impl ApiResponse {
    /// Turn a non-2xx response into [`ApiError::Http`].
    pub fn error_for_status(self) -> Result<Self, ApiError> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(ApiError::from_status(self.status, self.body))
        }
    }

    /// Unwrap the envelope and decode its payload.
    ///
    /// 204/205 and empty bodies decode from `null`, so `()` and `Option<T>`
    /// targets work for endpoints without content.
    pub fn into_payload<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        let status = self.status;
        let payload = Envelope::open(self.body).map_err(|rejection| ApiError::Rejected {
            message: rejection.message,
            payload: rejection.payload,
        })?;

        serde_json::from_value(payload).map_err(|e| {
            ApiError::Decode(format!("unexpected payload for HTTP {}: {e}", status.as_u16()))
        })
    }
}

/// API client with single-flight credential refresh
pub struct ApiClient {
    http: HttpClient,
    config: ApiConfig,
    store: Arc<dyn CredentialStore>,
    redirect: Arc<dyn LoginRedirect>,
    gate: RefreshGate,
}

impl ApiClient {
    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Build a client from loaded configuration, using the configured
    /// credential store backend.
    pub fn from_config(config: &Config, redirect: Arc<dyn LoginRedirect>) -> Result<Self, ApiError> {
        let store = build_store(&config.credentials)?;
        Self::builder().config(config.api.clone()).store(store).redirect(redirect).build()
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    pub fn refresh_gate(&self) -> &RefreshGate {
        &self.gate
    }

    /// Resolve `path` against the API root and optional service segment.
    pub fn url(&self, path: &str, service: Option<&str>) -> Result<Url, ApiError> {
        resolve_url(&self.config.api_url, service, path)
    }

    /// Execute a GET request with optional query parameters (a JSON object).
    #[instrument(skip(self, params), fields(path = %path))]
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<&Value>,
        service: Option<&str>,
    ) -> Result<T, ApiError> {
        let query = params.map(query_pairs).transpose()?.unwrap_or_default();
        let request = RequestDescriptor::new(Method::GET, self.url(path, service)?).with_query(query);
        self.execute(request).await?.into_payload()
    }

    /// Execute a POST request with a JSON or multipart body
    #[instrument(skip(self, payload), fields(path = %path))]
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        payload: impl Into<Payload>,
        service: Option<&str>,
    ) -> Result<T, ApiError> {
        let request =
            RequestDescriptor::new(Method::POST, self.url(path, service)?).with_body(payload.into());
        self.execute(request).await?.into_payload()
    }

    /// Execute a PATCH request
    #[instrument(skip(self, payload), fields(path = %path))]
    pub async fn patch<T: DeserializeOwned>(
        &self,
        path: &str,
        payload: impl Into<Payload>,
        service: Option<&str>,
    ) -> Result<T, ApiError> {
        let request =
            RequestDescriptor::new(Method::PATCH, self.url(path, service)?).with_body(payload.into());
        self.execute(request).await?.into_payload()
    }

    /// Execute a DELETE request
    #[instrument(skip(self), fields(path = %path))]
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        service: Option<&str>,
    ) -> Result<T, ApiError> {
        let request = RequestDescriptor::new(Method::DELETE, self.url(path, service)?);
        self.execute(request).await?.into_payload()
    }

    /// Send a request, recovering once from an expired access token.
    ///
    /// A 401 either replays immediately (a refresh already finished since the
    /// request went out), waits for the refresh in flight, or leads a new
    /// refresh. The replay is the only retry: a second 401 ends the session
    /// and is returned as [`ApiError::Http`]. So does any error body carrying
    /// the backend's "Refresh token expired" message, which never starts a
    /// refresh.
    ///
    /// Requests built with
    /// [`without_auth_retry`](RequestDescriptor::without_auth_retry) bypass
    /// all of this and only map non-2xx responses to errors.
    ///
    /// Successful responses are returned raw, with the envelope still intact.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.url.path()))]
    pub async fn execute(&self, request: RequestDescriptor) -> Result<ApiResponse, ApiError> {
        let generation = self.gate.generation();
        let token = self.access_token().await?;
        let response = self.send(&request, token.as_deref()).await?;

        if !request.auth_retry {
            return response.error_for_status();
        }
        let rejection = match response.error_for_status() {
            Ok(response) => return Ok(response),
            Err(err) => err,
        };
        if rejection.status() != Some(StatusCode::UNAUTHORIZED.as_u16())
            || rejection.signals_expired_refresh()
        {
            return self.end_session_if_expired(Err(rejection)).await;
        }

        let token = match self.gate.admit(generation, &request) {
            Admission::Replay => match self.access_token().await? {
                Some(token) => token,
                None => return Err(rejection),
            },
            Admission::Wait(waiter) => {
                waiter.await.map_err(|_| ApiError::RefreshAborted)??
            }
            Admission::Lead(lease) => self.lead_refresh(lease).await?,
        };

        debug!("replaying request with refreshed credential");
        let replay = self.send(&request, Some(&token)).await?;
        if replay.status == StatusCode::UNAUTHORIZED {
            warn!("request rejected again after refresh, ending session");
            self.end_session().await;
            return replay.error_for_status();
        }
        self.end_session_if_expired(replay.error_for_status()).await
    }

    /// Remove both credentials and send the user to the login page.
    ///
    /// Safe to call when already logged out.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        let cleared = self.store.clear().await.map_err(ApiError::from);
        self.redirect.redirect_to_login(&self.config.login_path);
        info!("session cleared");
        cleared
    }

    /// Stored access token, if any.
    pub async fn access_token(&self) -> Result<Option<String>, ApiError> {
        Ok(self.store.get(CredentialKey::AccessToken).await?.filter(|token| !token.is_empty()))
    }

    async fn end_session_if_expired(
        &self,
        outcome: Result<ApiResponse, ApiError>,
    ) -> Result<ApiResponse, ApiError> {
        match outcome {
            Err(err) if err.signals_expired_refresh() => {
                warn!(error = %err, "refresh token expired, ending session");
                self.end_session().await;
                Err(err)
            }
            other => other,
        }
    }

    /// Forced logout; a store failure is logged, never raised over the
    /// error that caused the teardown.
    async fn end_session(&self) {
        if let Err(teardown) = self.logout().await {
            warn!(error = %teardown, "failed to clear credentials");
        }
    }

    async fn lead_refresh(&self, lease: RefreshLease<'_>) -> Result<String, ApiError> {
        match self.refresh_access_token().await {
            Ok(token) => {
                info!("access token refreshed");
                lease.succeed(&token);
                Ok(token)
            }
            Err(err) => {
                warn!(error = %err, "token refresh failed, ending session");
                // Credentials must be gone before any waiter observes the failure.
                self.end_session().await;
                lease.fail(&err);
                Err(err)
            }
        }
    }

    async fn refresh_access_token(&self) -> Result<String, ApiError> {
        let request = RequestDescriptor::new(Method::POST, self.url(&self.config.refresh_path, None)?)
            .with_body(Payload::empty_object())
            .without_auth_retry();

        let current = self.access_token().await?;
        let token = self
            .send(&request, current.as_deref())
            .await?
            .error_for_status()?
            .into_payload::<Option<AccessTokenPayload>>()
            .map_err(|err| match err {
                ApiError::Decode(_) => ApiError::RefreshFailed(REFRESH_FAILED.into()),
                other => other,
            })?
            .and_then(AccessTokenPayload::into_token)
            .ok_or_else(|| ApiError::RefreshFailed(REFRESH_FAILED.into()))?;

        self.store.set(CredentialKey::AccessToken, &token).await?;
        Ok(token)
    }

    /// One network attempt, bounded by the configured timeout.
    async fn send(
        &self,
        request: &RequestDescriptor,
        token: Option<&str>,
    ) -> Result<ApiResponse, ApiError> {
        let mut builder = self.http.request(request.method.clone(), request.url.clone());
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = builder.headers(request.headers.clone());

        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(refresh) = self.store.get(CredentialKey::RefreshToken).await? {
            let cookie = HeaderValue::from_str(&format!("{REFRESH_TOKEN_KEY}={refresh}"))
                .map_err(|_| ApiError::Store("stored refresh token is not a valid header".into()))?;
            builder = builder.header(COOKIE, cookie);
        }

        builder = match &request.body {
            RequestBody::Empty => builder.header(CONTENT_TYPE, "application/json"),
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(form) => builder.multipart(form.to_form()?),
        };

        let timeout = self.config.timeout();
        let exchange = async {
            let response = self.http.send(builder).await?;
            let status = response.status();
            self.store_refresh_cookie(rotated_refresh_cookie(&response)).await?;
            let text = response
                .text()
                .await
                .map_err(|e| ApiError::Network(format!("failed to read response body: {e}")))?;
            Ok::<_, ApiError>(ApiResponse { status, body: parse_body(&text) })
        };

        let response = tokio::time::timeout(timeout, exchange).await.map_err(|_| {
            warn!(timeout_ms = duration_ms(timeout), "request timed out");
            ApiError::Timeout(timeout)
        })??;

        debug!(status = %response.status, "response received");
        Ok(response)
    }

    /// Persist a rotated `refresh_token` cookie; an empty value deletes it.
    async fn store_refresh_cookie(&self, rotated: Option<String>) -> Result<(), ApiError> {
        match rotated {
            Some(value) if value.is_empty() => {
                self.store.delete(CredentialKey::RefreshToken).await?;
            }
            Some(value) => {
                debug!("refresh cookie rotated");
                self.store.set(CredentialKey::RefreshToken, &value).await?;
            }
            None => {}
        }
        Ok(())
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}

fn rotated_refresh_cookie(response: &Response) -> Option<String> {
    response
        .cookies()
        .find(|cookie| cookie.name() == REFRESH_TOKEN_KEY)
        .map(|cookie| cookie.value().to_string())
}

fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Builder for API client
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<ApiConfig>,
    store: Option<Arc<dyn CredentialStore>>,
    redirect: Option<Arc<dyn LoginRedirect>>,
}

impl ApiClientBuilder {
    /// Set the API configuration
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the credential store (defaults to an in-memory store)
    pub fn store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the login redirect (defaults to a [`RecordingRedirect`])
    pub fn redirect(mut self, redirect: Arc<dyn LoginRedirect>) -> Self {
        self.redirect = Some(redirect);
        self
    }

    /// Build the API client
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] for an unparseable API URL, a zero
    /// timeout, or when the HTTP client cannot be created.
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let config = self.config.unwrap_or_default();

        Url::parse(&config.api_url)
            .map_err(|e| ApiError::Config(format!("invalid api_url {}: {e}", config.api_url)))?;
        if config.timeout_secs == 0 {
            return Err(ApiError::Config("timeout_secs must be greater than zero".into()));
        }

        let mut http = HttpClient::builder().timeout(None).connect_timeout(config.timeout());
        if let Some(agent) = &config.user_agent {
            http = http.user_agent(agent.clone());
        }
        let http = http
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to build HttpClient: {e}")))?;

        Ok(ApiClient {
            http,
            store: self.store.unwrap_or_else(|| Arc::new(MemoryCredentialStore::new())),
            redirect: self.redirect.unwrap_or_else(|| Arc::new(RecordingRedirect::new())),
            config,
            gate: RefreshGate::new(),
        })
    }
}
