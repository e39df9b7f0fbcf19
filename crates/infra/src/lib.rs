//! # Kanflow Infrastructure
//!
//! Infrastructure implementations of the core session ports and the
//! authenticated API client.
//!
//! This crate contains:
//! - HTTP transport (reqwest) with fixed per-call timeout
//! - The authenticated `ApiClient` with single-flight token refresh
//! - Session login/logout and typed Kanflow commands
//! - Credential store backends (memory, cookie file, platform keychain)
//! - Configuration loading and tracing setup
//!
//! ## Architecture
//! - Implements traits defined in `kanflow-core`
//! - Contains all "impure" code (network, filesystem, keychain)

pub mod api;
pub mod config;
pub mod credentials;
pub mod errors;
pub mod http;
pub mod observability;

// Re-export commonly used items
pub use api::{
    ApiClient, ApiClientBuilder, ApiError, ApiErrorCategory, ApiResponse, FormPart, FormPayload,
    KanflowCommands, Payload, RequestBody, RequestDescriptor, SessionService,
};
pub use credentials::{
    build_store, FileCredentialStore, KeychainCredentialStore, MemoryCredentialStore,
};
pub use http::HttpClient;
