//! Unified service-layer error type for brew-server
//!
//! `ServiceError` bridges the gap between DB-layer errors (`sqlx::Error`)
//! and the API-layer error (`AppError`). Constraint violations reported by
//! Postgres are classified into structured 4xx errors; everything else is
//! logged and surfaced as a 500.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";
const NUMERIC_VALUE_OUT_OF_RANGE: &str = "22003";

/// Service-layer error
///
/// - `Db`: Database/infrastructure errors (auto-logged, mapped to DatabaseError)
/// - `App`: Business-rule errors (transparent pass-through to client)
#[derive(Debug)]
pub enum ServiceError {
    Db(BoxError),
    App(AppError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            let code = db_err.code();
            if let Some(app_err) = classify_constraint(code.as_deref(), db_err.constraint()) {
                tracing::debug!(
                    code = code.as_deref().unwrap_or_default(),
                    constraint = db_err.constraint().unwrap_or_default(),
                    "Constraint violation"
                );
                return ServiceError::App(app_err);
            }
        }
        ServiceError::Db(e.into())
    }
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        ServiceError::Db(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::new(ErrorCode::DatabaseError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Convenience type alias for service-layer results
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Map a Postgres SQLSTATE and constraint name to a client-facing error
///
/// Returns `None` for anything that is not an integrity violation or a
/// numeric overflow.
pub fn classify_constraint(code: Option<&str>, constraint: Option<&str>) -> Option<AppError> {
    let err = match code? {
        UNIQUE_VIOLATION => match constraint {
            Some("users_username_key") => AppError::new(ErrorCode::UsernameExists),
            Some("users_email_key") => AppError::new(ErrorCode::EmailExists),
            _ => AppError::new(ErrorCode::AlreadyExists),
        },
        FOREIGN_KEY_VIOLATION => {
            let err = AppError::with_message(
                ErrorCode::ReferenceNotFound,
                match constraint.and_then(referenced_entity) {
                    Some(entity) => format!("Referenced {entity} does not exist"),
                    None => ErrorCode::ReferenceNotFound.message().to_string(),
                },
            );
            match constraint {
                Some(c) => err.with_detail("constraint", c),
                None => err,
            }
        }
        CHECK_VIOLATION => {
            let err = AppError::validation("Value violates a data constraint");
            match constraint {
                Some(c) => err.with_detail("constraint", c),
                None => err,
            }
        }
        NUMERIC_VALUE_OUT_OF_RANGE => AppError::new(ErrorCode::ValueOutOfRange),
        _ => return None,
    };
    Some(err)
}

fn referenced_entity(constraint: &str) -> Option<&'static str> {
    match constraint {
        "tours_brewery_id_fkey" | "reviews_brewery_id_fkey" => Some("brewery"),
        "bookings_tour_id_fkey" => Some("tour"),
        "bookings_user_id_fkey" | "reviews_user_id_fkey" => Some("user"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_unique_violations() {
        let err = classify_constraint(Some("23505"), Some("users_email_key")).unwrap();
        assert_eq!(err.code, ErrorCode::EmailExists);
        assert_eq!(err.http_status(), StatusCode::CONFLICT);

        let err = classify_constraint(Some("23505"), Some("users_username_key")).unwrap();
        assert_eq!(err.code, ErrorCode::UsernameExists);

        let err = classify_constraint(Some("23505"), Some("something_else")).unwrap();
        assert_eq!(err.code, ErrorCode::AlreadyExists);
    }

    #[test]
    fn test_foreign_key_violation() {
        let err = classify_constraint(Some("23503"), Some("tours_brewery_id_fkey")).unwrap();
        assert_eq!(err.code, ErrorCode::ReferenceNotFound);
        assert_eq!(err.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Referenced brewery does not exist");
        assert_eq!(
            err.details.unwrap().get("constraint").unwrap(),
            "tours_brewery_id_fkey"
        );

        let err = classify_constraint(Some("23503"), None).unwrap();
        assert!(err.details.is_none());
    }

    #[test]
    fn test_check_violation() {
        let err = classify_constraint(Some("23514"), Some("reviews_rating_check")).unwrap();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_numeric_overflow() {
        let err = classify_constraint(Some("22003"), None).unwrap();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_other_codes_are_not_classified() {
        assert!(classify_constraint(Some("08006"), None).is_none());
        assert!(classify_constraint(None, Some("users_email_key")).is_none());
    }

    #[test]
    fn test_infrastructure_errors_become_database_error() {
        let err: ServiceError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, ServiceError::Db(_)));
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::DatabaseError);
        assert_eq!(app.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
