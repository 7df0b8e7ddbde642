//! Property error types.

use immoloc_shared::types::PropertyId;
use thiserror::Error;

/// Property operation errors.
#[derive(Debug, Error)]
pub enum PropertyError {
    /// Display name missing.
    #[error("La dénomination du bien est obligatoire")]
    NameRequired,

    /// Property missing or owned by someone else.
    #[error("Bien introuvable : {0}")]
    NotFound(PropertyId),

    /// Accounting entries still reference the property.
    #[error("Ce bien a {entries} ligne(s) comptable(s) et ne peut pas être supprimé")]
    StillReferenced {
        /// Number of referencing entries.
        entries: u64,
    },

    /// Persistence failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl PropertyError {
    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NameRequired => "VALIDATION_ERROR",
            Self::NotFound(_) => "PROPERTY_NOT_FOUND",
            Self::StillReferenced { .. } => "PROPERTY_IN_USE",
            Self::Repository(_) => "REPOSITORY_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::NameRequired => 400,
            Self::NotFound(_) => 404,
            Self::StillReferenced { .. } => 409,
            Self::Repository(_) => 500,
        }
    }
}
