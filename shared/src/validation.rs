//! Field validation helpers for create/update payloads
//!
//! Every helper returns a field-level [`AppError`] so the route layer can
//! report exactly which input was rejected.

use crate::error::{AppError, AppResult, ErrorCode};

/// Required, non-blank text no longer than `max` characters
pub fn required_text(field: &str, value: &str, max: usize) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::invalid_field(
            ErrorCode::RequiredField,
            field,
            "is required",
        ));
    }
    max_len(field, value, max)
}

/// Optional text; when present it must fit in `max` characters
pub fn optional_text(field: &str, value: Option<&str>, max: usize) -> AppResult<()> {
    match value {
        Some(v) => max_len(field, v, max),
        None => Ok(()),
    }
}

fn max_len(field: &str, value: &str, max: usize) -> AppResult<()> {
    if value.chars().count() > max {
        return Err(AppError::invalid_field(
            ErrorCode::ValueOutOfRange,
            field,
            format!("must be at most {max} characters"),
        ));
    }
    Ok(())
}

/// Minimal shape check for an email address
pub fn email(field: &str, value: &str) -> AppResult<()> {
    required_text(field, value, 120)?;
    let valid = value
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        return Err(AppError::invalid_field(
            ErrorCode::InvalidFormat,
            field,
            "is not a valid email address",
        ));
    }
    Ok(())
}

/// Inclusive range check
pub fn in_range<T>(field: &str, value: T, min: T, max: T) -> AppResult<()>
where
    T: PartialOrd + std::fmt::Display,
{
    if value < min || value > max {
        return Err(AppError::invalid_field(
            ErrorCode::ValueOutOfRange,
            field,
            format!("must be between {min} and {max}"),
        ));
    }
    Ok(())
}

/// Lower-bound check
pub fn at_least<T>(field: &str, value: T, min: T) -> AppResult<()>
where
    T: PartialOrd + std::fmt::Display,
{
    if value < min {
        return Err(AppError::invalid_field(
            ErrorCode::ValueOutOfRange,
            field,
            format!("must be at least {min}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(required_text("name", "Tusker", 100).is_ok());

        let err = required_text("name", "   ", 100).unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert_eq!(err.details.unwrap().get("field").unwrap(), "name");

        let err = required_text("name", &"x".repeat(101), 100).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
    }

    #[test]
    fn test_optional_text() {
        assert!(optional_text("website", None, 10).is_ok());
        assert!(optional_text("website", Some("short"), 10).is_ok());
        assert!(optional_text("website", Some("far too long"), 10).is_err());
    }

    #[test]
    fn test_email() {
        assert!(email("email", "wanjiru@example.co.ke").is_ok());
        assert_eq!(
            email("email", "not-an-email").unwrap_err().code,
            ErrorCode::InvalidFormat
        );
        assert!(email("email", "@example.com").is_err());
        assert!(email("email", "a@localhost").is_err());
    }

    #[test]
    fn test_ranges() {
        assert!(in_range("latitude", -1.29, -90.0, 90.0).is_ok());
        assert!(in_range("latitude", 91.0, -90.0, 90.0).is_err());
        assert!(at_least("duration", 1, 1).is_ok());
        assert!(at_least("duration", 0, 1).is_err());
    }
}
