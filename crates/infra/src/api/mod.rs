//! Kanflow API client
//!
//! HTTP client for the Kanflow backend. Attaches stored credentials to every
//! request and recovers from an expired access token with a single refresh
//! shared by all requests that hit the same 401 window.
//!
//! # Architecture
//!
//! - `client`: request dispatch, envelope unwrapping, 401 recovery
//! - `refresh`: per-client single-flight refresh gate
//! - `request`: replayable request descriptors and URL resolution
//! - `session`: login, registration, sign-out
//! - `commands`: typed wrappers for workspace, task, team and notification
//!   endpoints

pub mod client;
pub mod commands;
pub mod errors;
pub mod refresh;
pub mod request;
pub mod session;

pub use client::{ApiClient, ApiClientBuilder, ApiResponse};
pub use commands::KanflowCommands;
pub use errors::{ApiError, ApiErrorCategory};
pub use refresh::{Admission, PendingRequest, RefreshGate, RefreshLease};
pub use request::{resolve_url, FormPart, FormPayload, Payload, RequestBody, RequestDescriptor};
pub use session::SessionService;
