//! Authentication: access tokens, middleware and password hashing

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod revocation;

pub use jwt::{Claims, JwtConfig, JwtError, JwtService, TokenCheck};
pub use middleware::{AuthFailure, CurrentUser, require_admin, require_auth};
pub use password::Argon2Hasher;
