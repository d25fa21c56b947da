//! JWT token service
//!
//! Issues HS256 access tokens and checks incoming bearer tokens.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::revocation::RevocationList;
use shared::models::User;

const ISSUER: &str = "brew-server";

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Access token lifetime in seconds
    pub expires_secs: i64,
}

/// Claims stored in an access token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    pub username: String,
    #[serde(default)]
    pub admin: bool,
    /// Token ID, used for revocation
    pub jti: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("token generation failed: {0}")]
    GenerationFailed(String),
}

/// Outcome of checking a request's bearer token
#[derive(Debug, Clone, PartialEq)]
pub enum TokenCheck {
    Valid(Claims),
    Expired,
    Invalid,
    Missing,
    Revoked,
}

/// JWT token service
#[derive(Debug)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    revoked: RevocationList,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
            revoked: RevocationList::new(),
        }
    }

    pub fn expires_secs(&self) -> i64 {
        self.config.expires_secs
    }

    /// Issue an access token for `user`
    pub fn generate_token(&self, user: &User) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            admin: user.is_admin,
            jti: uuid::Uuid::new_v4().to_string(),
            exp: (now + Duration::seconds(self.config.expires_secs)).timestamp(),
            iat: now.timestamp(),
            iss: ISSUER.to_string(),
        };
        self.encode(&claims)
    }

    fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Check the raw `Authorization` header value
    pub fn check(&self, authorization: Option<&str>) -> TokenCheck {
        let Some(header) = authorization else {
            return TokenCheck::Missing;
        };
        let Some(token) = Self::extract_from_header(header) else {
            return TokenCheck::Missing;
        };
        self.check_token(token)
    }

    /// Check a bare token
    pub fn check_token(&self, token: &str) -> TokenCheck {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss"]);

        let claims = match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => data.claims,
            Err(e) => {
                tracing::debug!(error = %e, "JWT validation failed");
                return match e.kind() {
                    ErrorKind::ExpiredSignature => TokenCheck::Expired,
                    _ => TokenCheck::Invalid,
                };
            }
        };

        if self.revoked.is_revoked(&claims.jti) {
            return TokenCheck::Revoked;
        }
        TokenCheck::Valid(claims)
    }

    /// Revoke a token until it expires
    pub fn revoke(&self, claims: &Claims) {
        self.revoked.revoke(&claims.jti, claims.exp);
    }

    /// Forget revocations of tokens that have expired
    pub fn prune_revoked(&self) -> usize {
        self.revoked.prune(Utc::now().timestamp())
    }

    /// Extract the token from a `Bearer <token>` header
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}
