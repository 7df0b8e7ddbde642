//! Entry error types.

use chrono::NaiveDate;
use immoloc_shared::types::{BilanId, EntryId, PropertyId};
use thiserror::Error;

/// Errors raised while editing or saving entries.
#[derive(Debug, Error)]
pub enum EntryError {
    /// Date not in the ledger's fiscal year. The date field has been cleared.
    #[error("La date {date} doit être comprise dans l'année {fiscal_year}")]
    DateOutsideFiscalYear {
        /// Rejected date.
        date: NaiveDate,
        /// Fiscal year of the ledger.
        fiscal_year: i32,
    },

    /// Date text could not be parsed.
    #[error("Date invalide : {0}")]
    InvalidDate(String),

    /// Affectation text is not part of the vocabulary.
    #[error("Affectation inconnue : {0}")]
    UnknownAffectation(String),

    /// Ledger missing or owned by someone else.
    #[error("Bilan introuvable : {0}")]
    BilanNotFound(BilanId),

    /// Ledger is finalized and read-only.
    #[error("Le bilan {0} est terminé et ne peut plus être modifié")]
    BilanFinalized(BilanId),

    /// Property missing or owned by someone else.
    #[error("Bien introuvable : {0}")]
    PropertyNotFound(PropertyId),

    /// Entry missing or owned by someone else.
    #[error("Ligne introuvable : {0}")]
    NotFound(EntryId),

    /// Entry exists but belongs to another ledger.
    #[error("La ligne {entry_id} n'appartient pas au bilan {bilan_id}")]
    WrongBilan {
        /// Entry.
        entry_id: EntryId,
        /// Ledger named by the caller.
        bilan_id: BilanId,
    },

    /// Entry exists but is filed under another property.
    #[error("La ligne {entry_id} n'appartient pas au bien {property_id}")]
    WrongProperty {
        /// Entry.
        entry_id: EntryId,
        /// Property named by the caller.
        property_id: PropertyId,
    },

    /// Persistence failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl EntryError {
    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::DateOutsideFiscalYear { .. } => "DATE_OUTSIDE_FISCAL_YEAR",
            Self::InvalidDate(_) => "INVALID_DATE",
            Self::UnknownAffectation(_) => "UNKNOWN_AFFECTATION",
            Self::BilanNotFound(_) => "BILAN_NOT_FOUND",
            Self::BilanFinalized(_) => "BILAN_FINALIZED",
            Self::PropertyNotFound(_) => "PROPERTY_NOT_FOUND",
            Self::NotFound(_) => "ENTRY_NOT_FOUND",
            Self::WrongBilan { .. } => "ENTRY_BILAN_MISMATCH",
            Self::WrongProperty { .. } => "ENTRY_PROPERTY_MISMATCH",
            Self::Repository(_) => "REPOSITORY_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::DateOutsideFiscalYear { .. }
            | Self::InvalidDate(_)
            | Self::UnknownAffectation(_)
            | Self::WrongBilan { .. }
            | Self::WrongProperty { .. } => 400,
            Self::BilanNotFound(_) | Self::PropertyNotFound(_) | Self::NotFound(_) => 404,
            Self::BilanFinalized(_) => 409,
            Self::Repository(_) => 500,
        }
    }
}
