//! # Kanflow Core
//!
//! Session logic with no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (credential storage, login navigation)
//! - Pure session rules (route guard)
//!
//! ## Architecture Principles
//! - Only depends on `kanflow-domain`
//! - No HTTP, filesystem or keychain code
//! - All external dependencies via traits

pub mod session;

pub use session::ports::{CredentialKey, CredentialStore, LoginRedirect, RecordingRedirect};
pub use session::route_guard::{guard_route, is_public_path, RouteDecision};
