//! Application-wide error types.
//!
//! Domain errors from `immoloc-core` convert into [`AppError`] at the API boundary,
//! which decides the HTTP status, the machine-readable code and the text shown
//! to the owner.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Message shown to the owner when the failure is not theirs to fix.
pub const GENERIC_USER_MESSAGE: &str = "Une erreur est survenue. Veuillez réessayer.";

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication failed or session missing.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Resource belongs to another owner.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Input rejected before reaching storage.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation not allowed in the current state (finalized ledger, missing attachments).
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// Conflict (duplicate fiscal year, referenced property).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Uploaded file too large.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Object storage failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::Conflict(_) => 409,
            Self::PayloadTooLarge(_) => 413,
            Self::BusinessRule(_) => 422,
            Self::Storage(_) | Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::Conflict(_) => "CONFLICT",
            Self::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the text to display to the owner.
    ///
    /// Infrastructure failures are never echoed back verbatim.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg)
            | Self::Validation(msg)
            | Self::BusinessRule(msg)
            | Self::Conflict(msg)
            | Self::PayloadTooLarge(msg) => msg,
            Self::Storage(_) | Self::Database(_) | Self::Internal(_) => GENERIC_USER_MESSAGE,
        }
    }

    /// Returns true for failures caused by infrastructure rather than input.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}
