#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use kanflow_core::{CredentialKey, CredentialStore, RecordingRedirect};
use kanflow_domain::ApiConfig;
use kanflow_infra::{ApiClient, MemoryCredentialStore};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const REFRESH_PATH: &str = "/api/user/refresh";

/// Mock backend plus a client wired to it with `tok1`/`r1` already stored.
pub struct TestApi {
    pub server: MockServer,
    pub client: Arc<ApiClient>,
    pub store: Arc<MemoryCredentialStore>,
    pub redirect: Arc<RecordingRedirect>,
}

impl TestApi {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let store = Arc::new(MemoryCredentialStore::new());
        store.set(CredentialKey::AccessToken, "tok1").await.expect("seed access token");
        store.set(CredentialKey::RefreshToken, "r1").await.expect("seed refresh token");
        let redirect = Arc::new(RecordingRedirect::new());

        let client = ApiClient::builder()
            .config(ApiConfig { api_url: format!("{}/api", server.uri()), ..ApiConfig::default() })
            .store(store.clone())
            .redirect(redirect.clone())
            .build()
            .expect("client should build");

        Self { server, client: Arc::new(client), store, redirect }
    }

    /// `path` answers 200 with `body` for `Bearer tok`, 401 for anything else.
    pub async fn protect(&self, http_method: &str, route: &str, token: &str, body: Value) {
        Mock::given(method(http_method))
            .and(path(route))
            .and(header("Authorization", format!("Bearer {token}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .with_priority(1)
            .mount(&self.server)
            .await;
        Mock::given(method(http_method))
            .and(path(route))
            .respond_with(unauthorized())
            .mount(&self.server)
            .await;
    }

    pub async fn requests_to(&self, route: &str) -> Vec<Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|req| req.url.path() == route)
            .collect()
    }

    pub async fn refresh_calls(&self) -> usize {
        self.requests_to(REFRESH_PATH).await.len()
    }

    pub async fn credential(&self, key: CredentialKey) -> Option<String> {
        self.store.get(key).await.expect("memory store never fails")
    }

    /// Poll until `count` requests are parked behind the refresh.
    pub async fn wait_for_queue(&self, count: usize) {
        for _ in 0..200 {
            if self.client.refresh_gate().queued().len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("queue never reached {count} waiting requests");
    }
}

pub fn unauthorized() -> ResponseTemplate {
    ResponseTemplate::new(401).set_body_json(json!({ "success": false, "message": "Token expired" }))
}

pub fn refresh_ok(token: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("set-cookie", "refresh_token=r2; Path=/; HttpOnly")
        .set_body_json(json!({
            "success": true,
            "message": "Refreshing token",
            "payload": { "access_token": token }
        }))
}

pub fn bearer(request: &Request) -> Option<String> {
    request
        .headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_owned)
}
