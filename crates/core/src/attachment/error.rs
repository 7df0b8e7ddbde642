//! Attachment error types.

use immoloc_shared::types::{AttachmentId, EntryId};
use thiserror::Error;

use crate::storage::StorageError;

/// Attachment operation errors.
#[derive(Debug, Error)]
pub enum AttachmentError {
    /// Attachment not found.
    #[error("Pièce jointe introuvable : {0}")]
    NotFound(AttachmentId),

    /// Entry missing, not saved yet, or owned by someone else.
    #[error("Ligne introuvable : {0}")]
    EntryNotFound(EntryId),

    /// The entry's ledger is finalized.
    #[error("Le bilan est terminé, ses pièces jointes ne peuvent plus être modifiées")]
    BilanFinalized,

    /// Storage operation failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl AttachmentError {
    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "ATTACHMENT_NOT_FOUND",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::BilanFinalized => "BILAN_FINALIZED",
            Self::Storage(e) => e.error_code(),
            Self::Repository(_) => "REPOSITORY_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) | Self::EntryNotFound(_) => 404,
            Self::BilanFinalized => 409,
            Self::Storage(e) => e.http_status_code(),
            Self::Repository(_) => 500,
        }
    }
}
