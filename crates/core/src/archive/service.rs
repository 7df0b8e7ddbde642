//! Archive service.

use std::future::Future;
use std::sync::Arc;

use futures::future::join_all;
use immoloc_shared::types::{BilanId, UserId};
use thiserror::Error;
use tracing::warn;

use super::types::{ArchivedBilan, group_by_property};
use crate::bilan::Bilan;
use crate::entry::AccountingEntry;
use crate::session::Session;

/// Archive errors.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Persistence failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl ArchiveError {
    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Repository(_) => "REPOSITORY_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Repository(_) => 500,
        }
    }
}

/// Repository trait for the archive view.
pub trait ArchiveRepository: Send + Sync {
    /// Finalized ledgers of an owner, newest year first.
    fn list_finalized(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<Bilan>, ArchiveError>> + Send;

    /// Entries of a ledger with their property's display name, by date.
    fn entries_with_property(
        &self,
        bilan_id: BilanId,
    ) -> impl Future<Output = Result<Vec<(String, AccountingEntry)>, ArchiveError>> + Send;
}

/// Archive service.
pub struct ArchiveService<R: ArchiveRepository> {
    repo: Arc<R>,
}

impl<R: ArchiveRepository> ArchiveService<R> {
    /// Create a new archive service.
    #[must_use]
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Finalized ledgers with entries grouped by property.
    ///
    /// Entry loads run concurrently. A ledger whose load fails is skipped and
    /// ledgers without entries are left out.
    ///
    /// # Errors
    ///
    /// Returns an error only if the ledger list itself cannot be read.
    pub async fn list(&self, session: &Session) -> Result<Vec<ArchivedBilan>, ArchiveError> {
        let bilans = self.repo.list_finalized(session.user_id).await?;
        let loads = join_all(
            bilans
                .iter()
                .map(|b| self.repo.entries_with_property(b.id)),
        )
        .await;

        Ok(bilans
            .into_iter()
            .zip(loads)
            .filter_map(|(bilan, rows)| match rows {
                Ok(rows) if rows.is_empty() => None,
                Ok(rows) => Some(ArchivedBilan {
                    properties: group_by_property(rows),
                    bilan,
                }),
                Err(err) => {
                    warn!(bilan_id = %bilan.id, error = %err, "Skipping archived ledger");
                    None
                }
            })
            .collect())
    }
}
