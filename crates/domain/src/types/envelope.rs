//! The `{success, payload, message}` response envelope
//!
//! Every JSON endpoint of the backend wraps its data in this envelope. The
//! client unwraps it so callers only ever see the payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Generic response wrapper used by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub payload: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A 2xx envelope whose `success` flag was false
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub message: String,
    pub payload: Option<Value>,
}

impl Envelope<Value> {
    /// Unwrap a response body.
    ///
    /// Objects carrying a `payload` or `success` key are treated as
    /// envelopes: the payload is returned (`null` when absent) unless
    /// `success` is false. Any other body is returned untouched.
    pub fn open(body: Value) -> Result<Value, Rejection> {
        let is_envelope = body
            .as_object()
            .is_some_and(|map| map.contains_key("payload") || map.contains_key("success"));
        if !is_envelope {
            return Ok(body);
        }

        match serde_json::from_value::<Self>(body.clone()) {
            Ok(envelope) if envelope.success => Ok(envelope.payload.unwrap_or(Value::Null)),
            Ok(envelope) => Err(Rejection {
                message: envelope.message.unwrap_or_else(|| "request was not successful".into()),
                payload: envelope.payload.filter(|p| !p.is_null()),
            }),
            // `success` with a non-boolean value; not ours to interpret.
            Err(_) => Ok(body),
        }
    }
}

/// Extract the server's `message` field from an error body.
#[must_use]
pub fn error_message(body: &Value) -> Option<String> {
    body.get("message").and_then(Value::as_str).map(str::to_owned)
}

const fn default_success() -> bool {
    true
}
