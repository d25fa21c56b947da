//! Unified error codes for Brewtrail
//!
//! This module defines all error codes shared by the server and API clients.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: User errors
//! - 4xxx: Brewery errors
//! - 5xxx: Tour errors
//! - 6xxx: Booking errors
//! - 7xxx: Review errors
//! - 8xxx: Upload errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,
    /// A foreign key points at a row that does not exist
    ReferenceNotFound = 9,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated (no token supplied)
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Token has been revoked (logged out)
    TokenRevoked = 1005,
    /// Account is disabled
    AccountDisabled = 1007,
    /// Password too short
    PasswordTooShort = 1008,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 3xxx: User ====================
    /// User not found
    UserNotFound = 3001,
    /// Username already taken
    UsernameExists = 3002,
    /// Email already registered
    EmailExists = 3003,

    // ==================== 4xxx: Brewery ====================
    /// Brewery not found
    BreweryNotFound = 4001,
    /// Brewery is deactivated
    BreweryInactive = 4002,

    // ==================== 5xxx: Tour ====================
    /// Tour not found
    TourNotFound = 5001,
    /// Tour is deactivated
    TourInactive = 5002,
    /// Requested date is not offered by the tour
    TourDateUnavailable = 5003,

    // ==================== 6xxx: Booking ====================
    /// Booking not found
    BookingNotFound = 6001,
    /// Not enough seats left on the tour for the requested date
    CapacityExceeded = 6002,
    /// Booking status cannot move to the requested state
    InvalidStatusTransition = 6003,
    /// Booking date lies in the past
    BookingDateInPast = 6004,

    // ==================== 7xxx: Review ====================
    /// Review not found
    ReviewNotFound = 7001,
    /// Rating outside 1..=5
    RatingOutOfRange = 7002,

    // ==================== 8xxx: Upload ====================
    /// File too large
    FileTooLarge = 8001,
    /// Unsupported file format
    UnsupportedFileFormat = 8002,
    /// No file provided in request
    NoFileProvided = 8003,
    /// Empty file provided
    EmptyFile = 8004,
    /// Upload namespace is not one of breweries/tours/users
    UnknownUploadNamespace = 8005,
    /// File storage failed
    FileStorageFailed = 8006,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",
            ErrorCode::ReferenceNotFound => "Referenced resource does not exist",

            // Auth
            ErrorCode::NotAuthenticated => "Please include your access token",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Token has expired. Please log in again",
            ErrorCode::TokenInvalid => "Please provide a valid token",
            ErrorCode::TokenRevoked => "Token has been revoked. Please log in again",
            ErrorCode::AccountDisabled => "Account is disabled",
            ErrorCode::PasswordTooShort => "Password must be at least 8 characters",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Administrator role is required",

            // User
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::UsernameExists => "Username already exists",
            ErrorCode::EmailExists => "Email already registered",

            // Brewery
            ErrorCode::BreweryNotFound => "Brewery not found",
            ErrorCode::BreweryInactive => "Brewery is no longer active",

            // Tour
            ErrorCode::TourNotFound => "Tour not found",
            ErrorCode::TourInactive => "Tour is no longer active",
            ErrorCode::TourDateUnavailable => "Tour is not offered on the requested date",

            // Booking
            ErrorCode::BookingNotFound => "Booking not found",
            ErrorCode::CapacityExceeded => "Not enough places left on this tour",
            ErrorCode::InvalidStatusTransition => "Booking status cannot be changed",
            ErrorCode::BookingDateInPast => "Booking date must be in the future",

            // Review
            ErrorCode::ReviewNotFound => "Review not found",
            ErrorCode::RatingOutOfRange => "Rating must be between 1 and 5",

            // Upload
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::NoFileProvided => "No file provided",
            ErrorCode::EmptyFile => "Empty file provided",
            ErrorCode::UnknownUploadNamespace => "Unknown upload namespace",
            ErrorCode::FileStorageFailed => "File storage failed",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),
            9 => Ok(ErrorCode::ReferenceNotFound),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::TokenRevoked),
            1007 => Ok(ErrorCode::AccountDisabled),
            1008 => Ok(ErrorCode::PasswordTooShort),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2003 => Ok(ErrorCode::AdminRequired),

            // User
            3001 => Ok(ErrorCode::UserNotFound),
            3002 => Ok(ErrorCode::UsernameExists),
            3003 => Ok(ErrorCode::EmailExists),

            // Brewery
            4001 => Ok(ErrorCode::BreweryNotFound),
            4002 => Ok(ErrorCode::BreweryInactive),

            // Tour
            5001 => Ok(ErrorCode::TourNotFound),
            5002 => Ok(ErrorCode::TourInactive),
            5003 => Ok(ErrorCode::TourDateUnavailable),

            // Booking
            6001 => Ok(ErrorCode::BookingNotFound),
            6002 => Ok(ErrorCode::CapacityExceeded),
            6003 => Ok(ErrorCode::InvalidStatusTransition),
            6004 => Ok(ErrorCode::BookingDateInPast),

            // Review
            7001 => Ok(ErrorCode::ReviewNotFound),
            7002 => Ok(ErrorCode::RatingOutOfRange),

            // Upload
            8001 => Ok(ErrorCode::FileTooLarge),
            8002 => Ok(ErrorCode::UnsupportedFileFormat),
            8003 => Ok(ErrorCode::NoFileProvided),
            8004 => Ok(ErrorCode::EmptyFile),
            8005 => Ok(ErrorCode::UnknownUploadNamespace),
            8006 => Ok(ErrorCode::FileStorageFailed),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
