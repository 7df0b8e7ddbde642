//! Property document service.

use std::future::Future;
use std::sync::Arc;

use immoloc_shared::types::{DocumentId, PropertyId, UserId};
use thiserror::Error;
use tracing::{info, warn};

use super::types::{
    DocumentCategory, DocumentGroups, NewDocument, PropertyDocument, group_by_category,
};
use crate::attachment::FileUpload;
use crate::session::Session;
use crate::storage::{StorageError, StorageService};

/// Document operation errors.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Document not found.
    #[error("Document non trouvé")]
    NotFound(DocumentId),

    /// Property missing or owned by someone else.
    #[error("Bien introuvable : {0}")]
    PropertyNotFound(PropertyId),

    /// Storage operation failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl DocumentError {
    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "DOCUMENT_NOT_FOUND",
            Self::PropertyNotFound(_) => "PROPERTY_NOT_FOUND",
            Self::Storage(e) => e.error_code(),
            Self::Repository(_) => "REPOSITORY_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) | Self::PropertyNotFound(_) => 404,
            Self::Storage(e) => e.http_status_code(),
            Self::Repository(_) => 500,
        }
    }
}

/// Repository trait for document persistence.
pub trait DocumentRepository: Send + Sync {
    /// True if the property exists and is owned by `user_id`.
    fn property_belongs_to(
        &self,
        property_id: PropertyId,
        user_id: UserId,
    ) -> impl Future<Output = Result<bool, DocumentError>> + Send;

    /// Insert a document row.
    fn create(
        &self,
        input: NewDocument,
    ) -> impl Future<Output = Result<PropertyDocument, DocumentError>> + Send;

    /// Find a document owned by `user_id`.
    fn find_by_id(
        &self,
        id: DocumentId,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<PropertyDocument>, DocumentError>> + Send;

    /// Documents of a property, newest first.
    fn list_by_property(
        &self,
        property_id: PropertyId,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<PropertyDocument>, DocumentError>> + Send;

    /// Delete a document row.
    fn delete(&self, id: DocumentId) -> impl Future<Output = Result<bool, DocumentError>> + Send;
}

/// Property document service.
pub struct DocumentService<R: DocumentRepository> {
    storage: Arc<StorageService>,
    repo: Arc<R>,
}

impl<R: DocumentRepository> DocumentService<R> {
    /// Create a new document service.
    #[must_use]
    pub fn new(storage: Arc<StorageService>, repo: Arc<R>) -> Self {
        Self { storage, repo }
    }

    /// Store a file in its category's bucket and record it.
    ///
    /// The object goes to `{user}/{property}/{category}/{unique}.{ext}`. If
    /// the row cannot be inserted, the object is removed again.
    ///
    /// # Errors
    ///
    /// Fails for a foreign property, a rejected file, or a storage or store
    /// failure.
    pub async fn upload(
        &self,
        session: &Session,
        property_id: PropertyId,
        category: DocumentCategory,
        file: FileUpload,
    ) -> Result<PropertyDocument, DocumentError> {
        if !self
            .repo
            .property_belongs_to(property_id, session.user_id)
            .await?
        {
            return Err(DocumentError::PropertyNotFound(property_id));
        }
        self.storage.validate_upload(&file.content_type, file.size())?;

        let bucket = category.bucket();
        let path = StorageService::object_path(
            &[
                session.user_id.to_string(),
                property_id.to_string(),
                category.as_str().to_string(),
            ],
            &file.file_name,
        );
        let stored = self
            .storage
            .upload(bucket, &path, &file.content_type, file.data)
            .await?;

        let input = NewDocument {
            property_id,
            user_id: session.user_id,
            category,
            file_name: file.file_name,
            storage_path: stored.path,
            file_size: i64::try_from(stored.size).unwrap_or(i64::MAX),
            mime_type: file.content_type,
        };

        match self.repo.create(input).await {
            Ok(document) => {
                info!(property_id = %property_id, document_id = %document.id, category = %category, "Document uploaded");
                Ok(document)
            }
            Err(err) => {
                if let Err(cleanup) = self
                    .storage
                    .remove(bucket, std::slice::from_ref(&path))
                    .await
                {
                    warn!(path = %path, error = %cleanup, "Failed to remove orphaned document object");
                }
                Err(err)
            }
        }
    }

    /// Documents of a property grouped by category.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn list(
        &self,
        session: &Session,
        property_id: PropertyId,
    ) -> Result<DocumentGroups, DocumentError> {
        let documents = self
            .repo
            .list_by_property(property_id, session.user_id)
            .await?;
        Ok(group_by_category(documents))
    }

    /// Delete a document. A storage failure is logged and does not prevent
    /// the row deletion.
    ///
    /// # Errors
    ///
    /// Fails if the document is not the owner's or the store fails.
    pub async fn delete(&self, session: &Session, id: DocumentId) -> Result<(), DocumentError> {
        let document = self
            .repo
            .find_by_id(id, session.user_id)
            .await?
            .ok_or(DocumentError::NotFound(id))?;

        self.remove_objects(std::slice::from_ref(&document)).await;

        if !self.repo.delete(id).await? {
            return Err(DocumentError::NotFound(id));
        }
        info!(document_id = %id, "Document deleted");
        Ok(())
    }

    /// Remove the stored objects of documents. Failures are logged only.
    pub async fn remove_objects(&self, documents: &[PropertyDocument]) {
        for category in DocumentCategory::ALL {
            let paths: Vec<String> = documents
                .iter()
                .filter(|d| d.category == category)
                .map(|d| d.storage_path.clone())
                .collect();
            if paths.is_empty() {
                continue;
            }
            if let Err(err) = self.storage.remove(category.bucket(), &paths).await {
                warn!(error = %err, category = %category, "Failed to remove document objects");
            }
        }
    }

    /// Public URL of a document.
    #[must_use]
    pub fn public_url(&self, document: &PropertyDocument) -> String {
        self.storage
            .public_url(document.category.bucket(), &document.storage_path)
    }
}
