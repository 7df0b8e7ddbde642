//! Ledger lifecycle: open, inspect, finalize.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use immoloc_shared::types::{BilanId, UserId};
use tracing::info;

use super::completeness::{Coverage, find_missing_coverage};
use super::error::BilanError;
use super::types::{Bilan, FinalizeOutcome, PropertyRef};
use super::years::available_years;
use crate::entry::AccountingEntry;
use crate::session::Session;

/// Repository trait for ledger persistence.
///
/// Implemented by the db crate.
pub trait BilanRepository: Send + Sync {
    /// The owner's open ledger, if any.
    fn find_open(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<Bilan>, BilanError>> + Send;

    /// A ledger by ID, only if owned by `user_id`.
    fn find_by_id(
        &self,
        id: BilanId,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<Bilan>, BilanError>> + Send;

    /// Every year the owner has a ledger for, open or finalized.
    fn used_years(&self, user_id: UserId)
    -> impl Future<Output = Result<Vec<i32>, BilanError>> + Send;

    /// Inserts an open ledger.
    fn create(
        &self,
        user_id: UserId,
        year: i32,
    ) -> impl Future<Output = Result<Bilan, BilanError>> + Send;

    /// Entries of a ledger with their attachments.
    fn list_entries(
        &self,
        id: BilanId,
    ) -> impl Future<Output = Result<Vec<AccountingEntry>, BilanError>> + Send;

    /// The owner's properties.
    fn list_properties(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<PropertyRef>, BilanError>> + Send;

    /// Flips an open ledger to finalized. `None` if it was not open anymore.
    fn mark_finalized(
        &self,
        id: BilanId,
        at: DateTime<Utc>,
    ) -> impl Future<Output = Result<Option<Bilan>, BilanError>> + Send;
}

/// Ledger lifecycle service.
pub struct BilanService<R: BilanRepository> {
    repo: Arc<R>,
}

impl<R: BilanRepository> BilanService<R> {
    /// Creates a new ledger service.
    #[must_use]
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// The owner's open ledger, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    pub async fn current(&self, session: &Session) -> Result<Option<Bilan>, BilanError> {
        self.repo.find_open(session.user_id).await
    }

    /// A ledger owned by the session's user.
    ///
    /// # Errors
    ///
    /// Returns `BilanError::NotFound` if missing or owned by someone else.
    pub async fn get(&self, session: &Session, id: BilanId) -> Result<Bilan, BilanError> {
        self.repo
            .find_by_id(id, session.user_id)
            .await?
            .ok_or(BilanError::NotFound(id))
    }

    /// Years a new ledger may still be opened for, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    pub async fn available_years(
        &self,
        session: &Session,
        current_year: i32,
    ) -> Result<Vec<i32>, BilanError> {
        let used = self.repo.used_years(session.user_id).await?;
        Ok(available_years(current_year, &used))
    }

    /// Opens a ledger for `year`.
    ///
    /// # Errors
    ///
    /// Returns `BilanError::AlreadyOpen` if the owner has an open ledger, and
    /// `BilanError::YearUnavailable` if the year is outside the window or used.
    pub async fn open(
        &self,
        session: &Session,
        year: i32,
        current_year: i32,
    ) -> Result<Bilan, BilanError> {
        if let Some(open) = self.repo.find_open(session.user_id).await? {
            return Err(BilanError::AlreadyOpen { year: open.year });
        }

        if !self
            .available_years(session, current_year)
            .await?
            .contains(&year)
        {
            return Err(BilanError::YearUnavailable(year));
        }

        let bilan = self.repo.create(session.user_id, year).await?;
        info!(user_id = %session.user_id, bilan_id = %bilan.id, year, "Bilan opened");
        Ok(bilan)
    }

    /// What is missing before the ledger can be finalized.
    ///
    /// # Errors
    ///
    /// Returns `BilanError::NotFound` if the ledger is not the owner's.
    pub async fn coverage(&self, session: &Session, id: BilanId) -> Result<Coverage, BilanError> {
        let bilan = self.get(session, id).await?;
        let entries = self.repo.list_entries(bilan.id).await?;
        let properties = self.repo.list_properties(session.user_id).await?;
        Ok(find_missing_coverage(&properties, &entries))
    }

    /// Finalizes a ledger.
    ///
    /// Entries missing a mandatory attachment block unconditionally. Properties
    /// without entries only ask for confirmation: with `confirmed == false` the
    /// ledger is left open and their names are returned.
    ///
    /// # Errors
    ///
    /// Returns `BilanError::MissingAttachments` for the hard block,
    /// `BilanError::AlreadyFinalized` if the ledger is already read-only.
    pub async fn finalize(
        &self,
        session: &Session,
        id: BilanId,
        confirmed: bool,
        now: DateTime<Utc>,
    ) -> Result<FinalizeOutcome, BilanError> {
        let bilan = self.get(session, id).await?;
        if !bilan.is_open() {
            return Err(BilanError::AlreadyFinalized(id));
        }

        let entries = self.repo.list_entries(id).await?;
        let properties = self.repo.list_properties(session.user_id).await?;
        let coverage = find_missing_coverage(&properties, &entries);

        if coverage.is_hard_blocked() {
            info!(
                bilan_id = %id,
                missing = coverage.entries_missing_attachment.len(),
                "Finalize refused: mandatory attachments missing"
            );
            return Err(BilanError::MissingAttachments {
                entry_ids: coverage.entries_missing_attachment,
            });
        }

        if !coverage.properties_without_entries.is_empty() && !confirmed {
            return Ok(FinalizeOutcome::ConfirmationRequired {
                properties_without_entries: coverage.properties_without_entries,
            });
        }

        let bilan = self
            .repo
            .mark_finalized(id, now)
            .await?
            .ok_or(BilanError::AlreadyFinalized(id))?;

        info!(user_id = %session.user_id, bilan_id = %id, year = bilan.year, "Bilan finalized");
        Ok(FinalizeOutcome::Finalized { bilan })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachment::Attachment;
    use crate::bilan::types::BilanStatus;
    use crate::entry::{Affectation, Amounts};
    use chrono::NaiveDate;
    use immoloc_shared::types::{AttachmentId, EntryId, PropertyId, SessionId};
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockBilanRepository {
        bilans: Mutex<HashMap<BilanId, Bilan>>,
        entries: Mutex<Vec<AccountingEntry>>,
        properties: Mutex<HashMap<UserId, Vec<PropertyRef>>>,
    }

    impl MockBilanRepository {
        fn add_property(&self, user_id: UserId, name: &str) -> PropertyId {
            let id = PropertyId::new();
            self.properties
                .lock()
                .unwrap()
                .entry(user_id)
                .or_default()
                .push(PropertyRef {
                    id,
                    name: name.to_string(),
                });
            id
        }

        fn add_entry(
            &self,
            bilan_id: BilanId,
            property_id: PropertyId,
            affectation: Affectation,
            with_attachment: bool,
        ) -> EntryId {
            let id = EntryId::new();
            let attachments = if with_attachment {
                vec![Attachment {
                    id: AttachmentId::new(),
                    entry_id: id,
                    user_id: UserId::new(),
                    file_name: "f.pdf".into(),
                    storage_path: "p".into(),
                    file_size: 1,
                    mime_type: "application/pdf".into(),
                    created_at: Utc::now(),
                }]
            } else {
                Vec::new()
            };
            self.entries.lock().unwrap().push(AccountingEntry {
                id,
                bilan_id,
                property_id,
                date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                affectation: Some(affectation),
                label: affectation.as_str().into(),
                amounts: Amounts::normalize(Some(dec!(100)), None),
                attachments,
                created_at: Utc::now(),
            });
            id
        }
    }

    impl BilanRepository for MockBilanRepository {
        async fn find_open(&self, user_id: UserId) -> Result<Option<Bilan>, BilanError> {
            Ok(self
                .bilans
                .lock()
                .unwrap()
                .values()
                .find(|b| b.user_id == user_id && b.is_open())
                .cloned())
        }

        async fn find_by_id(
            &self,
            id: BilanId,
            user_id: UserId,
        ) -> Result<Option<Bilan>, BilanError> {
            Ok(self
                .bilans
                .lock()
                .unwrap()
                .get(&id)
                .filter(|b| b.user_id == user_id)
                .cloned())
        }

        async fn used_years(&self, user_id: UserId) -> Result<Vec<i32>, BilanError> {
            Ok(self
                .bilans
                .lock()
                .unwrap()
                .values()
                .filter(|b| b.user_id == user_id)
                .map(|b| b.year)
                .collect())
        }

        async fn create(&self, user_id: UserId, year: i32) -> Result<Bilan, BilanError> {
            let bilan = Bilan {
                id: BilanId::new(),
                user_id,
                year,
                status: BilanStatus::Open,
                created_at: Utc::now(),
                finalized_at: None,
            };
            self.bilans.lock().unwrap().insert(bilan.id, bilan.clone());
            Ok(bilan)
        }

        async fn list_entries(&self, id: BilanId) -> Result<Vec<AccountingEntry>, BilanError> {
            Ok(self
                .entries
                .lock()
                .unwrap()
                .iter()
                .filter(|e| e.bilan_id == id)
                .cloned()
                .collect())
        }

        async fn list_properties(&self, user_id: UserId) -> Result<Vec<PropertyRef>, BilanError> {
            Ok(self
                .properties
                .lock()
                .unwrap()
                .get(&user_id)
                .cloned()
                .unwrap_or_default())
        }

        async fn mark_finalized(
            &self,
            id: BilanId,
            at: DateTime<Utc>,
        ) -> Result<Option<Bilan>, BilanError> {
            let mut bilans = self.bilans.lock().unwrap();
            Ok(bilans.get_mut(&id).filter(|b| b.is_open()).map(|b| {
                b.status = BilanStatus::Finalized;
                b.finalized_at = Some(at);
                b.clone()
            }))
        }
    }

    fn session() -> Session {
        Session::new(UserId::new(), SessionId::new(), "owner@example.fr")
    }

    fn service() -> (BilanService<MockBilanRepository>, Arc<MockBilanRepository>) {
        let repo = Arc::new(MockBilanRepository::default());
        (BilanService::new(Arc::clone(&repo)), repo)
    }

    #[tokio::test]
    async fn test_available_years_exclude_used() {
        let (service, repo) = service();
        let session = session();
        repo.create(session.user_id, 2023).await.unwrap();
        repo.create(session.user_id, 2024).await.unwrap();

        let years = service.available_years(&session, 2025).await.unwrap();
        assert_eq!(years, vec![2025]);
    }

    #[tokio::test]
    async fn test_open_rejects_second_open_ledger() {
        let (service, _) = service();
        let session = session();
        service.open(&session, 2025, 2025).await.unwrap();

        let err = service.open(&session, 2024, 2025).await.unwrap_err();
        assert!(matches!(err, BilanError::AlreadyOpen { year: 2025 }));
    }

    #[tokio::test]
    async fn test_open_rejects_used_or_out_of_window_year() {
        let (service, repo) = service();
        let session = session();
        let old = repo.create(session.user_id, 2024).await.unwrap();
        repo.mark_finalized(old.id, Utc::now()).await.unwrap();

        assert!(matches!(
            service.open(&session, 2024, 2025).await,
            Err(BilanError::YearUnavailable(2024))
        ));
        assert!(matches!(
            service.open(&session, 2021, 2025).await,
            Err(BilanError::YearUnavailable(2021))
        ));
        assert!(service.open(&session, 2023, 2025).await.is_ok());
    }

    #[tokio::test]
    async fn test_finalize_hard_blocks_on_missing_attachment_even_when_confirmed() {
        let (service, repo) = service();
        let session = session();
        let bilan = service.open(&session, 2024, 2024).await.unwrap();
        let flat = repo.add_property(session.user_id, "Studio Lille");
        let works = repo.add_entry(bilan.id, flat, Affectation::Travaux, false);

        let err = service
            .finalize(&session, bilan.id, true, Utc::now())
            .await
            .unwrap_err();
        match err {
            BilanError::MissingAttachments { entry_ids } => assert_eq!(entry_ids, vec![works]),
            other => panic!("unexpected {other:?}"),
        }
        assert!(service.get(&session, bilan.id).await.unwrap().is_open());
    }

    #[tokio::test]
    async fn test_finalize_asks_confirmation_for_uncovered_property() {
        let (service, repo) = service();
        let session = session();
        let bilan = service.open(&session, 2024, 2024).await.unwrap();
        let flat = repo.add_property(session.user_id, "Studio Lille");
        repo.add_property(session.user_id, "Maison Arras");
        repo.add_entry(bilan.id, flat, Affectation::Loyer, false);

        let outcome = service
            .finalize(&session, bilan.id, false, Utc::now())
            .await
            .unwrap();
        assert_eq!(
            outcome,
            FinalizeOutcome::ConfirmationRequired {
                properties_without_entries: vec!["Maison Arras".to_string()]
            }
        );
        assert!(service.get(&session, bilan.id).await.unwrap().is_open());

        let now = Utc::now();
        let outcome = service
            .finalize(&session, bilan.id, true, now)
            .await
            .unwrap();
        match outcome {
            FinalizeOutcome::Finalized { bilan } => {
                assert_eq!(bilan.status, BilanStatus::Finalized);
                assert_eq!(bilan.finalized_at, Some(now));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_finalize_without_warnings_is_immediate() {
        let (service, repo) = service();
        let session = session();
        let bilan = service.open(&session, 2024, 2024).await.unwrap();
        let flat = repo.add_property(session.user_id, "Studio Lille");
        repo.add_entry(bilan.id, flat, Affectation::Travaux, true);

        let outcome = service
            .finalize(&session, bilan.id, false, Utc::now())
            .await
            .unwrap();
        assert!(matches!(outcome, FinalizeOutcome::Finalized { .. }));
        assert!(service.current(&session).await.unwrap().is_none());

        let err = service
            .finalize(&session, bilan.id, true, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, BilanError::AlreadyFinalized(_)));
    }

    #[tokio::test]
    async fn test_other_owner_cannot_see_ledger() {
        let (service, _) = service();
        let owner = session();
        let bilan = service.open(&owner, 2024, 2024).await.unwrap();

        let err = service.get(&session(), bilan.id).await.unwrap_err();
        assert!(matches!(err, BilanError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_coverage_reports_both_lists() {
        let (service, repo) = service();
        let session = session();
        let bilan = service.open(&session, 2024, 2024).await.unwrap();
        let flat = repo.add_property(session.user_id, "A");
        repo.add_property(session.user_id, "B");
        repo.add_entry(bilan.id, flat, Affectation::Mobilier, false);

        let coverage = service.coverage(&session, bilan.id).await.unwrap();
        assert_eq!(coverage.properties_without_entries, vec!["B"]);
        assert_eq!(coverage.entries_missing_attachment.len(), 1);
    }
}
