//! Authentication middleware
//!
//! Axum middleware for bearer-token authentication and admin authorization.
//!
//! # Failure responses
//!
//! | Check | HTTP | `error` |
//! |-------|------|---------|
//! | no / non-bearer header | 401 | `authorization_required` |
//! | expired | 401 | `token_expired` |
//! | malformed / bad signature | 401 | `invalid_token` |
//! | logged out | 401 | `token_revoked` |

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use serde::Serialize;
use shared::error::{AppError, ErrorCode};

use super::jwt::{Claims, TokenCheck};
use crate::state::AppState;

/// Authentication failure categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    Expired,
    Invalid,
    Missing,
    Revoked,
}

impl AuthFailure {
    pub fn error(&self) -> &'static str {
        match self {
            Self::Expired => "token_expired",
            Self::Invalid => "invalid_token",
            Self::Missing => "authorization_required",
            Self::Revoked => "token_revoked",
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Expired => ErrorCode::TokenExpired,
            Self::Invalid => ErrorCode::TokenInvalid,
            Self::Missing => ErrorCode::NotAuthenticated,
            Self::Revoked => ErrorCode::TokenRevoked,
        }
    }
}

#[derive(Serialize)]
struct AuthFailureBody {
    error: &'static str,
    message: &'static str,
}

impl IntoResponse for AuthFailure {
    fn into_response(self) -> Response {
        let body = AuthFailureBody {
            error: self.error(),
            message: self.code().message(),
        };
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

/// Authenticated caller, injected into request extensions by [`require_auth`]
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub is_admin: bool,
    pub claims: Claims,
}

impl CurrentUser {
    fn from_claims(claims: Claims) -> Option<Self> {
        Some(Self {
            id: claims.user_id()?,
            username: claims.username.clone(),
            is_admin: claims.admin,
            claims,
        })
    }

    /// Owners and admins may act on a resource
    pub fn can_access(&self, owner_id: i64) -> bool {
        self.is_admin || self.id == owner_id
    }
}

/// Check the request's bearer token and resolve the caller
pub fn authenticate(state: &AppState, headers: &http::HeaderMap) -> Result<CurrentUser, AuthFailure> {
    let header = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    match state.jwt.check(header) {
        TokenCheck::Valid(claims) => CurrentUser::from_claims(claims).ok_or(AuthFailure::Invalid),
        TokenCheck::Expired => Err(AuthFailure::Expired),
        TokenCheck::Invalid => Err(AuthFailure::Invalid),
        TokenCheck::Missing => Err(AuthFailure::Missing),
        TokenCheck::Revoked => Err(AuthFailure::Revoked),
    }
}

/// Require a valid bearer token
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthFailure> {
    // CORS preflight
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    match authenticate(&state, req.headers()) {
        Ok(user) => {
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(failure) => {
            tracing::warn!(
                reason = failure.error(),
                uri = %req.uri(),
                "Authentication failed"
            );
            Err(failure)
        }
    }
}

/// Require an admin caller; layer inside [`require_auth`]
pub async fn require_admin(req: Request, next: Next) -> Result<Response, Response> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(|| AuthFailure::Missing.into_response())?;

    if !user.is_admin {
        tracing::warn!(
            user_id = user.id,
            username = %user.username,
            uri = %req.uri(),
            "Admin required"
        );
        return Err(AppError::new(ErrorCode::AdminRequired).into_response());
    }

    Ok(next.run(req).await)
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AuthFailure;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Already resolved by the middleware
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let user = authenticate(state, &parts.headers)?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}
