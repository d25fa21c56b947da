//! Credential hashing seam
//!
//! Entities never hash passwords themselves; a [`CredentialHasher`] is
//! injected by the caller (Argon2 in the server, a cheap fake in tests).

use thiserror::Error;

use crate::error::{AppError, AppResult, ErrorCode};

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 8;

/// Errors raised while producing a password hash
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("password hashing failed: {0}")]
    Hash(String),
}

impl From<CredentialError> for AppError {
    fn from(err: CredentialError) -> Self {
        tracing::error!(error = %err, "Credential hashing failed");
        AppError::new(ErrorCode::InternalError)
    }
}

/// Salted one-way password hashing
pub trait CredentialHasher: Send + Sync {
    /// Hash `plaintext` with a fresh random salt
    fn hash(&self, plaintext: &str) -> Result<String, CredentialError>;

    /// Verify `plaintext` against a stored hash in constant time
    ///
    /// A malformed stored hash is a mismatch, not an error.
    fn verify(&self, plaintext: &str, hash: &str) -> bool;
}

/// Reject passwords shorter than [`MIN_PASSWORD_LEN`]
pub fn validate_password(plaintext: &str) -> AppResult<()> {
    if plaintext.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::invalid_field(
            ErrorCode::PasswordTooShort,
            "password",
            format!("must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Deterministic stand-in for Argon2 in model tests
    pub struct PlainHasher;

    impl CredentialHasher for PlainHasher {
        fn hash(&self, plaintext: &str) -> Result<String, CredentialError> {
            Ok(format!("plain${plaintext}"))
        }

        fn verify(&self, plaintext: &str, hash: &str) -> bool {
            hash.strip_prefix("plain$") == Some(plaintext)
        }
    }
}
