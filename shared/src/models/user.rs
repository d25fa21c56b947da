//! User Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::credentials::{CredentialHasher, validate_password};
use crate::error::{AppError, AppResult, ErrorCode};
use crate::validation;

/// Registered user
///
/// The password hash is loaded from the database but never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
    #[serde(default)]
    pub is_admin: bool,
}

impl User {
    /// Replace the stored hash with a fresh hash of `plaintext`
    pub fn set_password(&mut self, hasher: &dyn CredentialHasher, plaintext: &str) -> AppResult<()> {
        validate_password(plaintext)?;
        self.password_hash = hasher.hash(plaintext)?;
        Ok(())
    }

    /// Check `plaintext` against the stored hash
    pub fn check_password(&self, hasher: &dyn CredentialHasher, plaintext: &str) -> bool {
        !self.password_hash.is_empty() && hasher.verify(plaintext, &self.password_hash)
    }

    /// "First Last", falling back to the username
    pub fn display_name(&self) -> String {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if full.is_empty() {
            self.username.clone()
        } else {
            full
        }
    }
}

/// Registration payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UserCreate {
    /// Trim identifiers and lowercase the email
    pub fn normalized(mut self) -> Self {
        self.username = self.username.trim().to_string();
        self.email = self.email.trim().to_lowercase();
        self.first_name = self.first_name.map(|s| s.trim().to_string());
        self.last_name = self.last_name.map(|s| s.trim().to_string());
        self
    }

    pub fn validate(&self) -> AppResult<()> {
        validation::required_text("username", &self.username, 80)?;
        // Logins containing '@' are looked up as emails
        if self.username.contains('@') {
            return Err(AppError::invalid_field(
                ErrorCode::InvalidFormat,
                "username",
                "must not contain '@'",
            ));
        }
        validation::email("email", &self.email)?;
        validate_password(&self.password)?;
        validation::optional_text("first_name", self.first_name.as_deref(), 50)?;
        validation::optional_text("last_name", self.last_name.as_deref(), 50)?;
        Ok(())
    }
}

/// Hashed registration ready for insertion
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl NewUser {
    pub fn new(create: UserCreate, password_hash: String) -> Self {
        Self {
            username: create.username,
            email: create.email,
            password_hash,
            first_name: create.first_name,
            last_name: create.last_name,
        }
    }
}

/// Profile update payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl UserUpdate {
    pub fn validate(&self) -> AppResult<()> {
        validation::optional_text("first_name", self.first_name.as_deref(), 50)?;
        validation::optional_text("last_name", self.last_name.as_deref(), 50)?;
        if let Some(email) = &self.email {
            validation::email("email", email)?;
        }
        Ok(())
    }
}

/// Password change payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

/// Login payload; `login` accepts a username or an email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "username", alias = "email")]
    pub login: String,
    pub password: String,
}

/// Issued access token together with the authenticated user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::testing::PlainHasher;

    fn user() -> User {
        User {
            id: 1,
            username: "wanjiru".into(),
            email: "wanjiru@example.co.ke".into(),
            password_hash: String::new(),
            first_name: Some("Wanjiru".into()),
            last_name: Some("Kamau".into()),
            created_at: Utc::now(),
            is_active: true,
            is_admin: false,
        }
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let mut u = user();
        u.set_password(&PlainHasher, "malt-and-hops").unwrap();
        let json = serde_json::to_value(&u).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(!json.to_string().contains("malt-and-hops"));
        assert_eq!(json["username"], "wanjiru");
        assert_eq!(json["is_active"], true);
    }

    #[test]
    fn test_set_and_check_password() {
        let mut u = user();
        assert!(!u.check_password(&PlainHasher, "anything"));

        u.set_password(&PlainHasher, "malt-and-hops").unwrap();
        assert_ne!(u.password_hash, "malt-and-hops");
        assert!(u.check_password(&PlainHasher, "malt-and-hops"));
        assert!(!u.check_password(&PlainHasher, "malt-and-hop"));
    }

    #[test]
    fn test_set_password_rejects_short() {
        let mut u = user();
        let err = u.set_password(&PlainHasher, "short").unwrap_err();
        assert_eq!(err.code, ErrorCode::PasswordTooShort);
        assert!(u.password_hash.is_empty());
    }

    #[test]
    fn test_display_name() {
        let mut u = user();
        assert_eq!(u.display_name(), "Wanjiru Kamau");
        u.first_name = None;
        u.last_name = None;
        assert_eq!(u.display_name(), "wanjiru");
    }

    #[test]
    fn test_create_normalized_and_validated() {
        let create = UserCreate {
            username: "  otieno ".into(),
            email: " Otieno@Example.COM ".into(),
            password: "long-enough".into(),
            first_name: None,
            last_name: None,
        }
        .normalized();
        assert_eq!(create.username, "otieno");
        assert_eq!(create.email, "otieno@example.com");
        assert!(create.validate().is_ok());

        let bad = UserCreate {
            email: "nope".into(),
            ..create.clone()
        };
        assert_eq!(bad.validate().unwrap_err().code, ErrorCode::InvalidFormat);

        let blank = UserCreate {
            username: "".into(),
            ..create.clone()
        };
        assert_eq!(blank.validate().unwrap_err().code, ErrorCode::RequiredField);
    }

    #[test]
    fn test_username_cannot_look_like_email() {
        let create = UserCreate {
            username: "kip@example.co.ke".into(),
            email: "kip@example.co.ke".into(),
            password: "long-enough".into(),
            first_name: None,
            last_name: None,
        };
        let err = create.validate().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
        assert_eq!(err.details.unwrap()["field"], "username");
    }

    #[test]
    fn test_login_accepts_username_or_email_key() {
        let by_name: LoginRequest =
            serde_json::from_str(r#"{"username":"wanjiru","password":"x"}"#).unwrap();
        assert_eq!(by_name.login, "wanjiru");
        let by_email: LoginRequest =
            serde_json::from_str(r#"{"email":"w@example.com","password":"x"}"#).unwrap();
        assert_eq!(by_email.login, "w@example.com");
    }
}
