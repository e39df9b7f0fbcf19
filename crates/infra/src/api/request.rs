//! Replayable request descriptions
//!
//! A [`RequestDescriptor`] captures everything needed to issue a request
//! again after a token refresh. Only the `Authorization` header is computed
//! per attempt; method, URL, query, headers and body are reused as-is.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, Url};
use serde::Serialize;
use serde_json::Value;

use super::errors::ApiError;

/// Body of an outgoing request
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(FormPayload),
}

/// Caller-facing body for `post`/`patch`
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Form(FormPayload),
}

impl Payload {
    /// Serialize any value into a JSON payload.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, ApiError> {
        serde_json::to_value(value)
            .map(Self::Json)
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to serialize body: {e}")))
    }

    /// The `{}` body sent when a caller has nothing to post.
    pub fn empty_object() -> Self {
        Self::Json(Value::Object(serde_json::Map::new()))
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<FormPayload> for Payload {
    fn from(form: FormPayload) -> Self {
        Self::Form(form)
    }
}

impl From<Payload> for RequestBody {
    fn from(payload: Payload) -> Self {
        match payload {
            Payload::Json(value) => Self::Json(value),
            Payload::Form(form) => Self::Multipart(form),
        }
    }
}

/// One field of a multipart form
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text(String),
    File { file_name: String, mime: Option<String>, bytes: Vec<u8> },
}

/// Multipart form kept in owned, cloneable form.
///
/// reqwest's `Form` is consumed on send, so the form is rebuilt from these
/// parts for every attempt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormPayload {
    parts: Vec<(String, FormPart)>,
}

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push((name.into(), FormPart::Text(value.into())));
        self
    }

    #[must_use]
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: Option<&str>,
        bytes: Vec<u8>,
    ) -> Self {
        self.parts.push((
            name.into(),
            FormPart::File {
                file_name: file_name.into(),
                mime: mime.map(str::to_owned),
                bytes,
            },
        ));
        self
    }

    pub fn parts(&self) -> &[(String, FormPart)] {
        &self.parts
    }

    /// Build a fresh reqwest form for one attempt.
    pub fn to_form(&self) -> Result<Form, ApiError> {
        let mut form = Form::new();
        for (name, part) in &self.parts {
            form = match part {
                FormPart::Text(value) => form.text(name.clone(), value.clone()),
                FormPart::File { file_name, mime, bytes } => {
                    let mut file = Part::bytes(bytes.clone()).file_name(file_name.clone());
                    if let Some(mime) = mime {
                        file = file.mime_str(mime).map_err(|e| {
                            ApiError::InvalidRequest(format!("invalid mime type {mime}: {e}"))
                        })?;
                    }
                    form.part(name.clone(), file)
                }
            };
        }
        Ok(form)
    }
}

/// Everything needed to (re)issue one request
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: Url,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: RequestBody,
    /// Whether a 401 may trigger the refresh-and-replay path. Disabled for
    /// the login, register and refresh calls themselves.
    pub auth_retry: bool,
}

impl RequestDescriptor {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
            auth_retry: true,
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = body.into();
        self
    }

    #[must_use]
    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    /// Extra header sent on every attempt, the replay included.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    #[must_use]
    pub fn without_auth_retry(mut self) -> Self {
        self.auth_retry = false;
        self
    }
}

/// Resolve a request path against the configured API root.
///
/// The effective base is `api_url` followed by the optional service segment;
/// the path is joined with exactly one `/`. Absolute `http(s)` paths are used
/// untouched.
pub fn resolve_url(api_url: &str, service: Option<&str>, path: &str) -> Result<Url, ApiError> {
    if path.starts_with("http://") || path.starts_with("https://") {
        return Url::parse(path).map_err(|e| ApiError::InvalidRequest(format!("{path}: {e}")));
    }

    let mut base = api_url.trim_end_matches('/').to_string();
    if let Some(service) = service.map(|s| s.trim_matches('/')).filter(|s| !s.is_empty()) {
        base.push('/');
        base.push_str(service);
    }

    let path = path.trim_start_matches('/');
    let joined = if path.is_empty() { base } else { format!("{base}/{path}") };
    Url::parse(&joined).map_err(|e| ApiError::Config(format!("invalid API URL {joined}: {e}")))
}

/// Flatten a JSON object into query pairs.
///
/// Scalars are stringified, arrays repeat the key, `null` entries are
/// skipped. Anything but an object is rejected.
pub fn query_pairs(params: &Value) -> Result<Vec<(String, String)>, ApiError> {
    let Some(map) = params.as_object() else {
        if params.is_null() {
            return Ok(Vec::new());
        }
        return Err(ApiError::InvalidRequest("query parameters must be an object".into()));
    };

    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                pairs.extend(items.iter().filter_map(scalar).map(|v| (key.clone(), v)));
            }
            other => {
                if let Some(v) = scalar(other) {
                    pairs.push((key.clone(), v));
                }
            }
        }
    }
    Ok(pairs)
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn joins_with_single_slash() {
        let url = resolve_url("http://localhost:8000/api/", None, "/tasks").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/tasks");

        let url = resolve_url("http://localhost:8000/api", None, "tasks").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/tasks");
    }

    #[test]
    fn appends_service_segment() {
        let url = resolve_url("http://localhost:8000/api", Some("/v2/"), "/user/me").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/v2/user/me");

        let url = resolve_url("http://localhost:8000/api", Some(""), "/user/me").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/user/me");
    }

    #[test]
    fn absolute_paths_pass_through() {
        let url = resolve_url("http://localhost:8000/api", Some("/v2"), "https://cdn.example.com/a")
            .unwrap();
        assert_eq!(url.as_str(), "https://cdn.example.com/a");
    }

    #[test]
    fn invalid_base_is_config_error() {
        let err = resolve_url("not a url", None, "/tasks").unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn flattens_query_objects() {
        let pairs =
            query_pairs(&json!({ "workspaceId": "w1", "page": 2, "tag": ["a", "b"], "skip": null }))
                .unwrap();
        assert!(pairs.contains(&("workspaceId".into(), "w1".into())));
        assert!(pairs.contains(&("page".into(), "2".into())));
        assert!(pairs.contains(&("tag".into(), "a".into())));
        assert!(pairs.contains(&("tag".into(), "b".into())));
        assert_eq!(pairs.len(), 4);

        assert!(query_pairs(&Value::Null).unwrap().is_empty());
        assert!(query_pairs(&json!([1])).is_err());
    }

    #[test]
    fn form_payload_is_rebuildable() {
        let form = FormPayload::new()
            .text("title", "Roadmap")
            .file("attachment", "notes.txt", Some("text/plain"), b"hello".to_vec());
        assert_eq!(form.parts().len(), 2);
        assert!(form.to_form().is_ok());
        assert!(form.to_form().is_ok());

        let bad = FormPayload::new().file("f", "x", Some("not a mime"), Vec::new());
        assert!(matches!(bad.to_form(), Err(ApiError::InvalidRequest(_))));
    }

    #[test]
    fn descriptor_clone_is_identical() {
        let url = resolve_url("http://localhost:8000/api", None, "/tasks").unwrap();
        let original = RequestDescriptor::new(Method::POST, url)
            .with_body(Payload::Json(json!({ "workspaceId": "w1" })));
        let replay = original.clone();
        assert_eq!(replay.method, original.method);
        assert_eq!(replay.url, original.url);
        assert_eq!(replay.body, original.body);
        assert!(replay.auth_retry);
        assert!(!replay.without_auth_retry().auth_retry);
    }
}
