//! Unified error codes for the Vitrine backend
//!
//! Error codes are shared between the server and frontend clients and are
//! organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: User errors
//! - 4xxx: Post errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
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

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Password reset code does not match
    OtpInvalid = 1005,
    /// Password reset code is past its expiry window
    OtpExpired = 1006,
    /// No password reset is pending for this account
    NoPendingReset = 1007,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2002,
    /// Actor does not own the resource
    NotOwner = 2003,

    // ==================== 3xxx: User ====================
    /// User not found
    UserNotFound = 3001,
    /// Email already registered
    EmailTaken = 3002,
    /// Username already registered
    UsernameTaken = 3003,
    /// A user cannot follow themselves
    SelfFollow = 3004,

    // ==================== 4xxx: Post ====================
    /// Post not found
    PostNotFound = 4001,
    /// Tag not found on the post
    TagNotFound = 4002,
    /// Tag label too short
    InvalidTagLabel = 4003,
    /// Tag link must be an http(s) URL
    InvalidTagLink = 4004,
    /// Comment text must not be empty
    CommentEmpty = 4005,
    /// Post image is required
    ImageMissing = 4006,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Asset storage error
    StorageError = 9003,
    /// Outbound mail error
    MailError = 9004,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default human-readable message for this code
    pub fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Success",
            ErrorCode::Unknown => "Unknown error",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field missing",

            // Auth
            ErrorCode::NotAuthenticated => "Authentication required",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Token expired",
            ErrorCode::TokenInvalid => "Invalid token",
            ErrorCode::OtpInvalid => "Invalid reset code",
            ErrorCode::OtpExpired => "Reset code expired",
            ErrorCode::NoPendingReset => "No password reset pending",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Admin role required",
            ErrorCode::NotOwner => "Not the owner of this resource",

            // User
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::EmailTaken => "Email already exists",
            ErrorCode::UsernameTaken => "Username already exists",
            ErrorCode::SelfFollow => "You cannot follow yourself",

            // Post
            ErrorCode::PostNotFound => "Post not found",
            ErrorCode::TagNotFound => "Tag not found",
            ErrorCode::InvalidTagLabel => "Label too short",
            ErrorCode::InvalidTagLink => "Invalid URL",
            ErrorCode::CommentEmpty => "Comment text required",
            ErrorCode::ImageMissing => "Image is required",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::StorageError => "Asset storage error",
            ErrorCode::MailError => "Failed to send email",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> u16 {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, PartialEq, Eq)]
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
        let code = match value {
            0 => ErrorCode::Success,
            1 => ErrorCode::Unknown,
            2 => ErrorCode::ValidationFailed,
            3 => ErrorCode::NotFound,
            4 => ErrorCode::AlreadyExists,
            5 => ErrorCode::InvalidRequest,
            6 => ErrorCode::InvalidFormat,
            7 => ErrorCode::RequiredField,

            1001 => ErrorCode::NotAuthenticated,
            1002 => ErrorCode::InvalidCredentials,
            1003 => ErrorCode::TokenExpired,
            1004 => ErrorCode::TokenInvalid,
            1005 => ErrorCode::OtpInvalid,
            1006 => ErrorCode::OtpExpired,
            1007 => ErrorCode::NoPendingReset,

            2001 => ErrorCode::PermissionDenied,
            2002 => ErrorCode::AdminRequired,
            2003 => ErrorCode::NotOwner,

            3001 => ErrorCode::UserNotFound,
            3002 => ErrorCode::EmailTaken,
            3003 => ErrorCode::UsernameTaken,
            3004 => ErrorCode::SelfFollow,

            4001 => ErrorCode::PostNotFound,
            4002 => ErrorCode::TagNotFound,
            4003 => ErrorCode::InvalidTagLabel,
            4004 => ErrorCode::InvalidTagLink,
            4005 => ErrorCode::CommentEmpty,
            4006 => ErrorCode::ImageMissing,

            9001 => ErrorCode::InternalError,
            9002 => ErrorCode::DatabaseError,
            9003 => ErrorCode::StorageError,
            9004 => ErrorCode::MailError,

            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::PermissionDenied.code(), 2001);
        assert_eq!(ErrorCode::EmailTaken.code(), 3002);
        assert_eq!(ErrorCode::TagNotFound.code(), 4002);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_u16_round_trip() {
        for code in [
            ErrorCode::ValidationFailed,
            ErrorCode::OtpExpired,
            ErrorCode::SelfFollow,
            ErrorCode::InvalidTagLink,
            ErrorCode::MailError,
        ] {
            let raw: u16 = code.into();
            assert_eq!(ErrorCode::try_from(raw).unwrap(), code);
        }
    }

    #[test]
    fn test_unknown_code_rejected() {
        assert_eq!(ErrorCode::try_from(8888), Err(InvalidErrorCode(8888)));
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::PostNotFound).unwrap();
        assert_eq!(json, "4001");
        let back: ErrorCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ErrorCode::PostNotFound);
    }
}
