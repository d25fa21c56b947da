//! brew-server: Kenya Brew Trails booking API
//!
//! # Module layout
//!
//! ```text
//! brew-server/src/
//! ├── config.rs    # environment configuration
//! ├── state.rs     # shared application state
//! ├── error.rs     # database/domain error bridge
//! ├── auth/        # JWT, middleware, Argon2, revocation
//! ├── storage.rs   # image upload storage
//! ├── db/          # PostgreSQL queries
//! └── api/         # HTTP routes and handlers
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod state;
pub mod storage;

pub use auth::{CurrentUser, JwtService};
pub use config::Config;
pub use state::AppState;
