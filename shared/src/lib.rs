//! Shared types for Brewtrail
//!
//! Domain models, the error system and validation helpers used by
//! brew-server and its API clients.

pub mod credentials;
pub mod error;
pub mod models;
pub mod validation;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
