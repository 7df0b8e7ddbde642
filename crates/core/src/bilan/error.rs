//! Ledger error types.

use immoloc_shared::types::{BilanId, EntryId};
use thiserror::Error;

/// Errors raised by the ledger lifecycle.
#[derive(Debug, Error)]
pub enum BilanError {
    /// Ledger missing or owned by someone else.
    #[error("Bilan introuvable : {0}")]
    NotFound(BilanId),

    /// The owner already has an open ledger.
    #[error("Un bilan est déjà en cours pour l'année {year}")]
    AlreadyOpen {
        /// Year of the open ledger.
        year: i32,
    },

    /// Year outside the window or already used.
    #[error("L'année {0} n'est pas disponible pour un nouveau bilan")]
    YearUnavailable(i32),

    /// Ledger is already finalized.
    #[error("Le bilan {0} est déjà terminé")]
    AlreadyFinalized(BilanId),

    /// Some entries need a supporting file first. Cannot be overridden.
    #[error("Pièces justificatives manquantes sur {} ligne(s)", .entry_ids.len())]
    MissingAttachments {
        /// Offending entries.
        entry_ids: Vec<EntryId>,
    },

    /// Persistence failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl BilanError {
    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "BILAN_NOT_FOUND",
            Self::AlreadyOpen { .. } => "BILAN_ALREADY_OPEN",
            Self::YearUnavailable(_) => "YEAR_UNAVAILABLE",
            Self::AlreadyFinalized(_) => "BILAN_ALREADY_FINALIZED",
            Self::MissingAttachments { .. } => "MISSING_ATTACHMENTS",
            Self::Repository(_) => "REPOSITORY_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::AlreadyOpen { .. } | Self::YearUnavailable(_) | Self::AlreadyFinalized(_) => 409,
            Self::MissingAttachments { .. } => 422,
            Self::Repository(_) => 500,
        }
    }
}
