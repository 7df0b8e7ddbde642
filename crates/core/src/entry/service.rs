//! Entry editing against an open ledger.

use std::future::Future;
use std::sync::Arc;

use immoloc_shared::types::{BilanId, EntryId, PropertyId, UserId};
use serde::Serialize;
use tracing::info;

use super::buffer::{EntryBuffer, Flush};
use super::error::EntryError;
use super::types::{AccountingEntry, EntryDraft, FieldEdit, NormalizedEntry};
use crate::bilan::Bilan;
use crate::session::Session;

/// Repository trait for entry persistence.
///
/// Implemented by the db crate.
pub trait EntryRepository: Send + Sync {
    /// A ledger, only if owned by `user_id`.
    fn find_bilan(
        &self,
        bilan_id: BilanId,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<Bilan>, EntryError>> + Send;

    /// True if the property exists and is owned by `user_id`.
    fn property_belongs_to(
        &self,
        property_id: PropertyId,
        user_id: UserId,
    ) -> impl Future<Output = Result<bool, EntryError>> + Send;

    /// An entry with its attachments, only if its ledger is owned by `user_id`.
    fn find_by_id(
        &self,
        id: EntryId,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<AccountingEntry>, EntryError>> + Send;

    /// Entries of a ledger, optionally for one property, ordered by date.
    fn list(
        &self,
        bilan_id: BilanId,
        property_id: Option<PropertyId>,
    ) -> impl Future<Output = Result<Vec<AccountingEntry>, EntryError>> + Send;

    /// Inserts a new entry.
    ///
    /// The ledger's open status is checked in the same unit of work as the
    /// write; a ledger finalized meanwhile yields `BilanFinalized`.
    fn insert(
        &self,
        user_id: UserId,
        bilan_id: BilanId,
        property_id: PropertyId,
        entry: NormalizedEntry,
    ) -> impl Future<Output = Result<AccountingEntry, EntryError>> + Send;

    /// Overwrites the editable fields of an entry, under the same open-ledger
    /// guard as [`Self::insert`].
    fn update(
        &self,
        id: EntryId,
        entry: NormalizedEntry,
    ) -> impl Future<Output = Result<AccountingEntry, EntryError>> + Send;

    /// Deletes an entry and its attachment rows.
    fn delete(&self, id: EntryId) -> impl Future<Output = Result<bool, EntryError>> + Send;
}

/// Result of committing a batch of edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommitOutcome {
    /// Written to the store.
    Saved {
        /// Stored entry.
        entry: AccountingEntry,
    },
    /// Not written: the draft has no date yet.
    Held {
        /// Local state after the edits.
        draft: EntryDraft,
    },
}

/// Where a batch of edits goes.
#[derive(Debug, Clone, Copy)]
pub struct CommitTarget {
    /// Open ledger.
    pub bilan_id: BilanId,
    /// Property the entry belongs to.
    pub property_id: PropertyId,
    /// Existing entry, or `None` for a new row.
    pub entry_id: Option<EntryId>,
}

/// Entry editing service.
pub struct EntryService<R: EntryRepository> {
    repo: Arc<R>,
}

impl<R: EntryRepository> EntryService<R> {
    /// Creates a new entry service.
    #[must_use]
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    async fn owned_bilan(&self, session: &Session, bilan_id: BilanId) -> Result<Bilan, EntryError> {
        self.repo
            .find_bilan(bilan_id, session.user_id)
            .await?
            .ok_or(EntryError::BilanNotFound(bilan_id))
    }

    async fn open_bilan(&self, session: &Session, bilan_id: BilanId) -> Result<Bilan, EntryError> {
        let bilan = self.owned_bilan(session, bilan_id).await?;
        if bilan.is_open() {
            Ok(bilan)
        } else {
            Err(EntryError::BilanFinalized(bilan_id))
        }
    }

    async fn owned_property(
        &self,
        session: &Session,
        property_id: PropertyId,
    ) -> Result<(), EntryError> {
        if self
            .repo
            .property_belongs_to(property_id, session.user_id)
            .await?
        {
            Ok(())
        } else {
            Err(EntryError::PropertyNotFound(property_id))
        }
    }

    /// Entries of a ledger, for one property or all of them.
    ///
    /// # Errors
    ///
    /// Returns `EntryError::BilanNotFound` if the ledger is not the owner's.
    pub async fn list(
        &self,
        session: &Session,
        bilan_id: BilanId,
        property_id: Option<PropertyId>,
    ) -> Result<Vec<AccountingEntry>, EntryError> {
        self.owned_bilan(session, bilan_id).await?;
        self.repo.list(bilan_id, property_id).await
    }

    /// A fresh, unsaved row for a property of an open ledger.
    ///
    /// # Errors
    ///
    /// Fails if the ledger is finalized or either resource is not the owner's.
    pub async fn new_draft(
        &self,
        session: &Session,
        bilan_id: BilanId,
        property_id: PropertyId,
    ) -> Result<EntryDraft, EntryError> {
        self.open_bilan(session, bilan_id).await?;
        self.owned_property(session, property_id).await?;
        Ok(EntryDraft::default())
    }

    /// Applies edits through an [`EntryBuffer`] and writes when it flushes.
    ///
    /// For a new row, the edits start from the default draft. Nothing is
    /// written while the row has no date.
    ///
    /// # Errors
    ///
    /// Fails on an invalid edit, a date outside the fiscal year, a finalized
    /// ledger, or a store failure. Nothing is written in any of those cases.
    pub async fn commit(
        &self,
        session: &Session,
        target: CommitTarget,
        edits: &[FieldEdit],
    ) -> Result<CommitOutcome, EntryError> {
        let bilan = self.open_bilan(session, target.bilan_id).await?;
        self.owned_property(session, target.property_id).await?;

        let mut buffer = match target.entry_id {
            Some(entry_id) => {
                let existing = self
                    .repo
                    .find_by_id(entry_id, session.user_id)
                    .await?
                    .ok_or(EntryError::NotFound(entry_id))?;
                if existing.bilan_id != bilan.id {
                    return Err(EntryError::WrongBilan {
                        entry_id,
                        bilan_id: bilan.id,
                    });
                }
                if existing.property_id != target.property_id {
                    return Err(EntryError::WrongProperty {
                        entry_id,
                        property_id: target.property_id,
                    });
                }
                EntryBuffer::from_entry(&existing, bilan.year)
            }
            None => EntryBuffer::new(bilan.year),
        };

        for edit in edits {
            buffer.apply(edit)?;
        }

        match buffer.flush()? {
            Flush::Held => Ok(CommitOutcome::Held {
                draft: buffer.draft().clone(),
            }),
            Flush::Clean => {
                let entry_id = buffer.entry_id().ok_or_else(|| {
                    EntryError::repository("clean buffer without a stored entry")
                })?;
                let entry = self
                    .repo
                    .find_by_id(entry_id, session.user_id)
                    .await?
                    .ok_or(EntryError::NotFound(entry_id))?;
                Ok(CommitOutcome::Saved { entry })
            }
            Flush::Write { entry_id, entry } => {
                let saved = match entry_id {
                    Some(id) => self.repo.update(id, entry).await?,
                    None => {
                        self.repo
                            .insert(session.user_id, bilan.id, target.property_id, entry)
                            .await?
                    }
                };
                buffer.mark_saved(&saved);
                info!(bilan_id = %bilan.id, entry_id = %saved.id, "Entry saved");
                Ok(CommitOutcome::Saved { entry: saved })
            }
        }
    }

    /// Deletes an entry of an open ledger and returns it as it was.
    ///
    /// The caller removes the returned attachments' objects from storage.
    ///
    /// # Errors
    ///
    /// Fails if the entry is not the owner's or its ledger is finalized.
    pub async fn delete(
        &self,
        session: &Session,
        entry_id: EntryId,
    ) -> Result<AccountingEntry, EntryError> {
        let entry = self
            .repo
            .find_by_id(entry_id, session.user_id)
            .await?
            .ok_or(EntryError::NotFound(entry_id))?;
        self.open_bilan(session, entry.bilan_id).await?;

        if !self.repo.delete(entry_id).await? {
            return Err(EntryError::NotFound(entry_id));
        }
        info!(bilan_id = %entry.bilan_id, entry_id = %entry_id, "Entry deleted");
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bilan::BilanStatus;
    use crate::entry::{Affectation, Amounts};
    use chrono::{NaiveDate, Utc};
    use immoloc_shared::types::SessionId;
    use rust_decimal_macros::dec;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockEntryRepository {
        bilans: Mutex<HashMap<BilanId, Bilan>>,
        properties: Mutex<HashSet<(PropertyId, UserId)>>,
        entries: Mutex<HashMap<EntryId, AccountingEntry>>,
        fail_writes: Mutex<bool>,
        finalized_before_write: Mutex<bool>,
    }

    impl EntryRepository for MockEntryRepository {
        async fn find_bilan(
            &self,
            bilan_id: BilanId,
            user_id: UserId,
        ) -> Result<Option<Bilan>, EntryError> {
            Ok(self
                .bilans
                .lock()
                .unwrap()
                .get(&bilan_id)
                .filter(|b| b.user_id == user_id)
                .cloned())
        }

        async fn property_belongs_to(
            &self,
            property_id: PropertyId,
            user_id: UserId,
        ) -> Result<bool, EntryError> {
            Ok(self
                .properties
                .lock()
                .unwrap()
                .contains(&(property_id, user_id)))
        }

        async fn find_by_id(
            &self,
            id: EntryId,
            _user_id: UserId,
        ) -> Result<Option<AccountingEntry>, EntryError> {
            Ok(self.entries.lock().unwrap().get(&id).cloned())
        }

        async fn list(
            &self,
            bilan_id: BilanId,
            property_id: Option<PropertyId>,
        ) -> Result<Vec<AccountingEntry>, EntryError> {
            let mut entries: Vec<_> = self
                .entries
                .lock()
                .unwrap()
                .values()
                .filter(|e| e.bilan_id == bilan_id)
                .filter(|e| property_id.is_none_or(|p| e.property_id == p))
                .cloned()
                .collect();
            entries.sort_by_key(|e| e.date);
            Ok(entries)
        }

        async fn insert(
            &self,
            _user_id: UserId,
            bilan_id: BilanId,
            property_id: PropertyId,
            entry: NormalizedEntry,
        ) -> Result<AccountingEntry, EntryError> {
            if *self.fail_writes.lock().unwrap() {
                return Err(EntryError::repository("insert failed"));
            }
            if *self.finalized_before_write.lock().unwrap() {
                return Err(EntryError::BilanFinalized(bilan_id));
            }
            let stored = AccountingEntry {
                id: EntryId::new(),
                bilan_id,
                property_id,
                date: entry.date,
                affectation: entry.affectation,
                label: entry.label,
                amounts: entry.amounts,
                attachments: Vec::new(),
                created_at: Utc::now(),
            };
            self.entries
                .lock()
                .unwrap()
                .insert(stored.id, stored.clone());
            Ok(stored)
        }

        async fn update(
            &self,
            id: EntryId,
            entry: NormalizedEntry,
        ) -> Result<AccountingEntry, EntryError> {
            if *self.fail_writes.lock().unwrap() {
                return Err(EntryError::repository("update failed"));
            }
            let mut entries = self.entries.lock().unwrap();
            let stored = entries.get_mut(&id).ok_or(EntryError::NotFound(id))?;
            if *self.finalized_before_write.lock().unwrap() {
                return Err(EntryError::BilanFinalized(stored.bilan_id));
            }
            stored.date = entry.date;
            stored.affectation = entry.affectation;
            stored.label = entry.label;
            stored.amounts = entry.amounts;
            Ok(stored.clone())
        }

        async fn delete(&self, id: EntryId) -> Result<bool, EntryError> {
            Ok(self.entries.lock().unwrap().remove(&id).is_some())
        }
    }

    struct Fixture {
        service: EntryService<MockEntryRepository>,
        repo: Arc<MockEntryRepository>,
        session: Session,
        bilan_id: BilanId,
        property_id: PropertyId,
    }

    fn fixture(year: i32) -> Fixture {
        let repo = Arc::new(MockEntryRepository::default());
        let session = Session::new(UserId::new(), SessionId::new(), "owner@example.fr");
        let bilan = Bilan {
            id: BilanId::new(),
            user_id: session.user_id,
            year,
            status: BilanStatus::Open,
            created_at: Utc::now(),
            finalized_at: None,
        };
        let property_id = PropertyId::new();
        repo.properties
            .lock()
            .unwrap()
            .insert((property_id, session.user_id));
        let bilan_id = bilan.id;
        repo.bilans.lock().unwrap().insert(bilan.id, bilan);
        Fixture {
            service: EntryService::new(Arc::clone(&repo)),
            repo,
            session,
            bilan_id,
            property_id,
        }
    }

    impl Fixture {
        fn target(&self, entry_id: Option<EntryId>) -> CommitTarget {
            CommitTarget {
                bilan_id: self.bilan_id,
                property_id: self.property_id,
                entry_id,
            }
        }

        fn finalize(&self) {
            let mut bilans = self.repo.bilans.lock().unwrap();
            if let Some(b) = bilans.get_mut(&self.bilan_id) {
                b.status = BilanStatus::Finalized;
            }
        }
    }

    #[tokio::test]
    async fn test_round_trip_rent_entry() {
        let f = fixture(2024);
        let outcome = f
            .service
            .commit(
                &f.session,
                f.target(None),
                &[
                    FieldEdit::Date("2024-03-15".into()),
                    FieldEdit::Affectation("Loyer".into()),
                    FieldEdit::Credit("850".into()),
                ],
            )
            .await
            .unwrap();
        let CommitOutcome::Saved { entry } = outcome else {
            panic!("expected a save");
        };

        let listed = f
            .service
            .list(&f.session, f.bilan_id, Some(f.property_id))
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        let reloaded = &listed[0];
        assert_eq!(reloaded.id, entry.id);
        assert_eq!(reloaded.date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(reloaded.affectation, Some(Affectation::Loyer));
        assert_eq!(reloaded.label, "Loyer");
        assert_eq!(reloaded.amounts.credit, Some(dec!(850)));
        assert_eq!(reloaded.amounts.debit, None);
        assert!(reloaded.attachments.is_empty());
    }

    #[tokio::test]
    async fn test_undated_row_is_not_persisted() {
        let f = fixture(2024);
        let outcome = f
            .service
            .commit(&f.session, f.target(None), &[FieldEdit::Debit("60".into())])
            .await
            .unwrap();
        match outcome {
            CommitOutcome::Held { draft } => {
                assert_eq!(draft.amounts.debit, Some(dec!(60)));
                assert_eq!(draft.amounts.credit, None);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(f.repo.entries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_date_outside_year_is_rejected() {
        let f = fixture(2024);
        let err = f
            .service
            .commit(
                &f.session,
                f.target(None),
                &[FieldEdit::Date("2025-01-02".into())],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EntryError::DateOutsideFiscalYear { .. }));
        assert!(f.repo.entries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_edit_existing_entry_switches_side() {
        let f = fixture(2024);
        let CommitOutcome::Saved { entry } = f
            .service
            .commit(
                &f.session,
                f.target(None),
                &[
                    FieldEdit::Date("2024-04-01".into()),
                    FieldEdit::Credit("850".into()),
                ],
            )
            .await
            .unwrap()
        else {
            panic!("expected a save");
        };

        let CommitOutcome::Saved { entry: updated } = f
            .service
            .commit(
                &f.session,
                f.target(Some(entry.id)),
                &[
                    FieldEdit::Affectation("Travaux".into()),
                    FieldEdit::Debit("1200".into()),
                ],
            )
            .await
            .unwrap()
        else {
            panic!("expected a save");
        };
        assert_eq!(updated.id, entry.id);
        assert_eq!(updated.label, "Travaux");
        assert_eq!(
            updated.amounts,
            Amounts {
                credit: None,
                debit: Some(dec!(1200))
            }
        );
    }

    #[tokio::test]
    async fn test_failed_write_leaves_store_unchanged() {
        let f = fixture(2024);
        *f.repo.fail_writes.lock().unwrap() = true;
        let err = f
            .service
            .commit(
                &f.session,
                f.target(None),
                &[FieldEdit::Date("2024-04-01".into())],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EntryError::Repository(_)));
        assert!(f.repo.entries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_finalized_ledger_is_read_only() {
        let f = fixture(2024);
        let CommitOutcome::Saved { entry } = f
            .service
            .commit(
                &f.session,
                f.target(None),
                &[FieldEdit::Date("2024-04-01".into())],
            )
            .await
            .unwrap()
        else {
            panic!("expected a save");
        };
        f.finalize();

        assert!(matches!(
            f.service
                .commit(&f.session, f.target(Some(entry.id)), &[])
                .await,
            Err(EntryError::BilanFinalized(_))
        ));
        assert!(matches!(
            f.service.delete(&f.session, entry.id).await,
            Err(EntryError::BilanFinalized(_))
        ));
        assert!(matches!(
            f.service
                .new_draft(&f.session, f.bilan_id, f.property_id)
                .await,
            Err(EntryError::BilanFinalized(_))
        ));
        assert_eq!(
            f.service
                .list(&f.session, f.bilan_id, None)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_ledger_finalized_before_write_is_refused() {
        let f = fixture(2024);
        let CommitOutcome::Saved { entry } = f
            .service
            .commit(
                &f.session,
                f.target(None),
                &[FieldEdit::Date("2024-04-01".into())],
            )
            .await
            .unwrap()
        else {
            panic!("expected a save");
        };
        *f.repo.finalized_before_write.lock().unwrap() = true;

        let err = f
            .service
            .commit(
                &f.session,
                f.target(None),
                &[FieldEdit::Date("2024-05-01".into())],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EntryError::BilanFinalized(id) if id == f.bilan_id));

        let err = f
            .service
            .commit(
                &f.session,
                f.target(Some(entry.id)),
                &[FieldEdit::Credit("90".into())],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EntryError::BilanFinalized(_)));

        let entries = f.repo.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[&entry.id].amounts, Amounts::BLANK);
    }

    #[tokio::test]
    async fn test_entry_of_another_property_is_rejected() {
        let f = fixture(2024);
        let CommitOutcome::Saved { entry } = f
            .service
            .commit(
                &f.session,
                f.target(None),
                &[FieldEdit::Date("2024-04-01".into())],
            )
            .await
            .unwrap()
        else {
            panic!("expected a save");
        };
        let other_property = PropertyId::new();
        f.repo
            .properties
            .lock()
            .unwrap()
            .insert((other_property, f.session.user_id));

        let target = CommitTarget {
            property_id: other_property,
            ..f.target(Some(entry.id))
        };
        let err = f
            .service
            .commit(&f.session, target, &[FieldEdit::Debit("30".into())])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EntryError::WrongProperty { entry_id, property_id }
                if entry_id == entry.id && property_id == other_property
        ));
        assert_eq!(err.error_code(), "ENTRY_PROPERTY_MISMATCH");
        assert_eq!(
            f.repo.entries.lock().unwrap()[&entry.id].property_id,
            f.property_id
        );
    }

    #[tokio::test]
    async fn test_foreign_property_is_rejected() {
        let f = fixture(2024);
        let target = CommitTarget {
            property_id: PropertyId::new(),
            ..f.target(None)
        };
        let err = f
            .service
            .commit(&f.session, target, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, EntryError::PropertyNotFound(_)));
    }

    #[tokio::test]
    async fn test_new_draft_defaults() {
        let f = fixture(2024);
        let draft = f
            .service
            .new_draft(&f.session, f.bilan_id, f.property_id)
            .await
            .unwrap();
        assert_eq!(draft, EntryDraft::default());
    }

    #[tokio::test]
    async fn test_delete_returns_entry() {
        let f = fixture(2024);
        let CommitOutcome::Saved { entry } = f
            .service
            .commit(
                &f.session,
                f.target(None),
                &[FieldEdit::Date("2024-09-09".into())],
            )
            .await
            .unwrap()
        else {
            panic!("expected a save");
        };

        let deleted = f.service.delete(&f.session, entry.id).await.unwrap();
        assert_eq!(deleted.id, entry.id);
        assert!(f.repo.entries.lock().unwrap().is_empty());
    }
}
