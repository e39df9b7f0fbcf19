//! # Kanflow Domain
//!
//! Domain types and models for the Kanflow client.
//!
//! This crate contains:
//! - Backend DTOs (users, workspaces, tasks, team members, notifications)
//! - The `{success, payload, message}` response envelope
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants (credential keys, endpoint paths)
//!
//! ## Architecture
//! - No dependencies on other Kanflow crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
