//! Data models
//!
//! Shared between brew-server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (Postgres BIGSERIAL).

pub mod booking;
pub mod brewery;
pub mod review;
pub mod tour;
pub mod user;

// Re-exports
pub use booking::*;
pub use brewery::*;
pub use review::*;
pub use tour::*;
pub use user::*;
