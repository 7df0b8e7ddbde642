//! Attachment service implementation.

use std::future::Future;
use std::sync::Arc;

use immoloc_shared::types::{AttachmentId, EntryId, UserId};
use tracing::{info, warn};

use super::error::AttachmentError;
use super::types::{Attachment, FileUpload, NewAttachment};
use crate::bilan::BilanStatus;
use crate::session::Session;
use crate::storage::{Bucket, StorageService};

/// Repository trait for attachment persistence.
///
/// Implemented by the db crate.
pub trait AttachmentRepository: Send + Sync {
    /// Status of the ledger holding `entry_id`, if the entry is the owner's.
    fn entry_ledger_status(
        &self,
        entry_id: EntryId,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<BilanStatus>, AttachmentError>> + Send;

    /// Create a new attachment record.
    fn create(
        &self,
        input: NewAttachment,
    ) -> impl Future<Output = Result<Attachment, AttachmentError>> + Send;

    /// Find an attachment owned by `user_id`.
    fn find_by_id(
        &self,
        id: AttachmentId,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<Attachment>, AttachmentError>> + Send;

    /// Attachments of an entry, newest first.
    fn list_by_entry(
        &self,
        entry_id: EntryId,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<Attachment>, AttachmentError>> + Send;

    /// Delete an attachment record.
    fn delete(&self, id: AttachmentId) -> impl Future<Output = Result<bool, AttachmentError>> + Send;
}

/// Attachment service.
pub struct AttachmentService<R: AttachmentRepository> {
    storage: Arc<StorageService>,
    repo: Arc<R>,
}

impl<R: AttachmentRepository> AttachmentService<R> {
    /// Create a new attachment service.
    #[must_use]
    pub fn new(storage: Arc<StorageService>, repo: Arc<R>) -> Self {
        Self { storage, repo }
    }

    async fn ensure_editable(&self, session: &Session, entry_id: EntryId) -> Result<(), AttachmentError> {
        match self.repo.entry_ledger_status(entry_id, session.user_id).await? {
            Some(BilanStatus::Open) => Ok(()),
            Some(BilanStatus::Finalized) => Err(AttachmentError::BilanFinalized),
            None => Err(AttachmentError::EntryNotFound(entry_id)),
        }
    }

    /// Store a file and attach it to a saved entry of an open ledger.
    ///
    /// The object goes to `{user}/{entry}/{unique}.{ext}`. If the row cannot
    /// be inserted, the object is removed again.
    ///
    /// # Errors
    ///
    /// Fails if the entry is not editable, the file is rejected, or storage
    /// or the store fails.
    pub async fn upload(
        &self,
        session: &Session,
        entry_id: EntryId,
        file: FileUpload,
    ) -> Result<Attachment, AttachmentError> {
        self.ensure_editable(session, entry_id).await?;
        self.storage.validate_upload(&file.content_type, file.size())?;

        let path = StorageService::object_path(
            &[session.user_id.to_string(), entry_id.to_string()],
            &file.file_name,
        );
        let stored = self
            .storage
            .upload(Bucket::EntryAttachments, &path, &file.content_type, file.data)
            .await?;

        let input = NewAttachment {
            entry_id,
            user_id: session.user_id,
            file_name: file.file_name,
            storage_path: stored.path,
            file_size: i64::try_from(stored.size).unwrap_or(i64::MAX),
            mime_type: file.content_type,
        };

        match self.repo.create(input).await {
            Ok(attachment) => {
                info!(entry_id = %entry_id, attachment_id = %attachment.id, "Attachment uploaded");
                Ok(attachment)
            }
            Err(err) => {
                if let Err(cleanup) = self
                    .storage
                    .remove(Bucket::EntryAttachments, std::slice::from_ref(&path))
                    .await
                {
                    warn!(path = %path, error = %cleanup, "Failed to remove orphaned attachment object");
                }
                Err(err)
            }
        }
    }

    /// Delete an attachment of an open ledger.
    ///
    /// A storage failure is logged and does not prevent the row deletion.
    ///
    /// # Errors
    ///
    /// Fails if the attachment is not the owner's, its ledger is finalized,
    /// or the store fails.
    pub async fn delete(
        &self,
        session: &Session,
        attachment_id: AttachmentId,
    ) -> Result<(), AttachmentError> {
        let attachment = self
            .repo
            .find_by_id(attachment_id, session.user_id)
            .await?
            .ok_or(AttachmentError::NotFound(attachment_id))?;
        self.ensure_editable(session, attachment.entry_id).await?;

        self.remove_objects(std::slice::from_ref(&attachment)).await;

        if !self.repo.delete(attachment_id).await? {
            return Err(AttachmentError::NotFound(attachment_id));
        }
        info!(attachment_id = %attachment_id, "Attachment deleted");
        Ok(())
    }

    /// Attachments of an entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn list(
        &self,
        session: &Session,
        entry_id: EntryId,
    ) -> Result<Vec<Attachment>, AttachmentError> {
        self.repo.list_by_entry(entry_id, session.user_id).await
    }

    /// Remove the stored objects of attachments whose rows are gone or going.
    ///
    /// Failures are logged only.
    pub async fn remove_objects(&self, attachments: &[Attachment]) {
        if attachments.is_empty() {
            return;
        }
        let paths: Vec<String> = attachments
            .iter()
            .map(|a| a.storage_path.clone())
            .collect();
        if let Err(err) = self.storage.remove(Bucket::EntryAttachments, &paths).await {
            warn!(error = %err, count = paths.len(), "Failed to remove attachment objects");
        }
    }

    /// Public URL of an attachment.
    #[must_use]
    pub fn public_url(&self, attachment: &Attachment) -> String {
        self.storage
            .public_url(Bucket::EntryAttachments, &attachment.storage_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{StorageConfig, StorageError, StorageProvider};
    use bytes::Bytes;
    use chrono::Utc;
    use immoloc_shared::types::SessionId;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockAttachmentRepository {
        attachments: Mutex<HashMap<AttachmentId, Attachment>>,
        entries: Mutex<HashMap<EntryId, (UserId, BilanStatus)>>,
        fail_create: Mutex<bool>,
        attempted_paths: Mutex<Vec<String>>,
    }

    impl AttachmentRepository for MockAttachmentRepository {
        async fn entry_ledger_status(
            &self,
            entry_id: EntryId,
            user_id: UserId,
        ) -> Result<Option<BilanStatus>, AttachmentError> {
            Ok(self
                .entries
                .lock()
                .unwrap()
                .get(&entry_id)
                .filter(|(owner, _)| *owner == user_id)
                .map(|(_, status)| *status))
        }

        async fn create(&self, input: NewAttachment) -> Result<Attachment, AttachmentError> {
            self.attempted_paths
                .lock()
                .unwrap()
                .push(input.storage_path.clone());
            if *self.fail_create.lock().unwrap() {
                return Err(AttachmentError::repository("insert failed"));
            }
            let attachment = Attachment {
                id: AttachmentId::new(),
                entry_id: input.entry_id,
                user_id: input.user_id,
                file_name: input.file_name,
                storage_path: input.storage_path,
                file_size: input.file_size,
                mime_type: input.mime_type,
                created_at: Utc::now(),
            };
            self.attachments
                .lock()
                .unwrap()
                .insert(attachment.id, attachment.clone());
            Ok(attachment)
        }

        async fn find_by_id(
            &self,
            id: AttachmentId,
            user_id: UserId,
        ) -> Result<Option<Attachment>, AttachmentError> {
            Ok(self
                .attachments
                .lock()
                .unwrap()
                .get(&id)
                .filter(|a| a.user_id == user_id)
                .cloned())
        }

        async fn list_by_entry(
            &self,
            entry_id: EntryId,
            user_id: UserId,
        ) -> Result<Vec<Attachment>, AttachmentError> {
            Ok(self
                .attachments
                .lock()
                .unwrap()
                .values()
                .filter(|a| a.entry_id == entry_id && a.user_id == user_id)
                .cloned()
                .collect())
        }

        async fn delete(&self, id: AttachmentId) -> Result<bool, AttachmentError> {
            Ok(self.attachments.lock().unwrap().remove(&id).is_some())
        }
    }

    struct Fixture {
        service: AttachmentService<MockAttachmentRepository>,
        repo: Arc<MockAttachmentRepository>,
        storage: Arc<StorageService>,
        session: Session,
        entry_id: EntryId,
    }

    fn fixture(status: BilanStatus) -> Fixture {
        let storage = Arc::new(
            StorageService::from_config(StorageConfig::new(StorageProvider::Memory)).unwrap(),
        );
        let repo = Arc::new(MockAttachmentRepository::default());
        let session = Session::new(UserId::new(), SessionId::new(), "owner@example.fr");
        let entry_id = EntryId::new();
        repo.entries
            .lock()
            .unwrap()
            .insert(entry_id, (session.user_id, status));
        Fixture {
            service: AttachmentService::new(Arc::clone(&storage), Arc::clone(&repo)),
            repo,
            storage,
            session,
            entry_id,
        }
    }

    fn invoice() -> FileUpload {
        FileUpload::new("facture.pdf", "application/pdf", Bytes::from_static(b"%PDF"))
    }

    #[tokio::test]
    async fn test_upload_stores_object_and_row() {
        let f = fixture(BilanStatus::Open);
        let attachment = f
            .service
            .upload(&f.session, f.entry_id, invoice())
            .await
            .unwrap();

        assert_eq!(attachment.file_name, "facture.pdf");
        assert_eq!(attachment.file_size, 4);
        assert!(
            attachment
                .storage_path
                .starts_with(&format!("{}/{}/", f.session.user_id, f.entry_id))
        );
        assert!(attachment.storage_path.ends_with(".pdf"));
        assert!(
            f.storage
                .exists(Bucket::EntryAttachments, &attachment.storage_path)
                .await
        );
        assert!(
            f.service
                .public_url(&attachment)
                .contains("/comptabilite-attachments/")
        );
    }

    #[tokio::test]
    async fn test_failed_insert_removes_object() {
        let f = fixture(BilanStatus::Open);
        *f.repo.fail_create.lock().unwrap() = true;

        let err = f
            .service
            .upload(&f.session, f.entry_id, invoice())
            .await
            .unwrap_err();
        assert!(matches!(err, AttachmentError::Repository(_)));

        let path = f.repo.attempted_paths.lock().unwrap()[0].clone();
        assert!(!f.storage.exists(Bucket::EntryAttachments, &path).await);
    }

    #[tokio::test]
    async fn test_rejected_file() {
        let f = fixture(BilanStatus::Open);
        let file = FileUpload::new("script.sh", "text/x-shellscript", Bytes::from_static(b"#!"));
        let err = f
            .service
            .upload(&f.session, f.entry_id, file)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AttachmentError::Storage(StorageError::InvalidMimeType { .. })
        ));
    }

    #[tokio::test]
    async fn test_finalized_ledger_rejects_upload() {
        let f = fixture(BilanStatus::Finalized);
        let err = f
            .service
            .upload(&f.session, f.entry_id, invoice())
            .await
            .unwrap_err();
        assert!(matches!(err, AttachmentError::BilanFinalized));
    }

    #[tokio::test]
    async fn test_unknown_entry() {
        let f = fixture(BilanStatus::Open);
        let err = f
            .service
            .upload(&f.session, EntryId::new(), invoice())
            .await
            .unwrap_err();
        assert!(matches!(err, AttachmentError::EntryNotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_removes_object_and_row() {
        let f = fixture(BilanStatus::Open);
        let attachment = f
            .service
            .upload(&f.session, f.entry_id, invoice())
            .await
            .unwrap();

        f.service.delete(&f.session, attachment.id).await.unwrap();

        assert!(
            !f.storage
                .exists(Bucket::EntryAttachments, &attachment.storage_path)
                .await
        );
        assert!(
            f.service
                .list(&f.session, f.entry_id)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_delete_unknown_attachment() {
        let f = fixture(BilanStatus::Open);
        let result = f.service.delete(&f.session, AttachmentId::new()).await;
        assert!(matches!(result, Err(AttachmentError::NotFound(_))));
    }
}
