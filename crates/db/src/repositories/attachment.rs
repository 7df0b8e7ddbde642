//! Attachment repository for database operations.
//!
//! Implements entry attachment CRUD operations using SeaORM.

use chrono::Utc;
use immoloc_core::attachment::{
    Attachment, AttachmentError, AttachmentRepository as AttachmentRepoTrait, NewAttachment,
};
use immoloc_core::bilan::BilanStatus;
use immoloc_shared::types::{AttachmentId, EntryId, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::{decode, utc};
use crate::entities::{accounting_entries, bilans, entry_attachments};

/// Attachment repository implementation.
#[derive(Debug, Clone)]
pub struct AttachmentRepository {
    db: DatabaseConnection,
}

impl AttachmentRepository {
    /// Create a new attachment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl AttachmentRepoTrait for AttachmentRepository {
    async fn entry_ledger_status(
        &self,
        entry_id: EntryId,
        user_id: UserId,
    ) -> Result<Option<BilanStatus>, AttachmentError> {
        let row = accounting_entries::Entity::find_by_id(entry_id.into_inner())
            .filter(accounting_entries::Column::UserId.eq(user_id.into_inner()))
            .find_also_related(bilans::Entity)
            .one(&self.db)
            .await
            .map_err(|e| AttachmentError::repository(e.to_string()))?;

        let Some((_, Some(bilan))) = row else {
            return Ok(None);
        };
        decode(BilanStatus::parse(&bilan.status), "status", &bilan.status)
            .map(Some)
            .map_err(|e| AttachmentError::repository(e.to_string()))
    }

    async fn create(&self, input: NewAttachment) -> Result<Attachment, AttachmentError> {
        let model = entry_attachments::ActiveModel {
            id: Set(AttachmentId::new().into_inner()),
            entry_id: Set(input.entry_id.into_inner()),
            user_id: Set(input.user_id.into_inner()),
            file_name: Set(input.file_name),
            storage_path: Set(input.storage_path),
            file_size: Set(input.file_size),
            mime_type: Set(input.mime_type),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| AttachmentError::repository(e.to_string()))?;

        Ok(to_domain(model))
    }

    async fn find_by_id(
        &self,
        id: AttachmentId,
        user_id: UserId,
    ) -> Result<Option<Attachment>, AttachmentError> {
        let model = entry_attachments::Entity::find_by_id(id.into_inner())
            .filter(entry_attachments::Column::UserId.eq(user_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(|e| AttachmentError::repository(e.to_string()))?;

        Ok(model.map(to_domain))
    }

    async fn list_by_entry(
        &self,
        entry_id: EntryId,
        user_id: UserId,
    ) -> Result<Vec<Attachment>, AttachmentError> {
        let models = entry_attachments::Entity::find()
            .filter(entry_attachments::Column::EntryId.eq(entry_id.into_inner()))
            .filter(entry_attachments::Column::UserId.eq(user_id.into_inner()))
            .order_by_desc(entry_attachments::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| AttachmentError::repository(e.to_string()))?;

        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn delete(&self, id: AttachmentId) -> Result<bool, AttachmentError> {
        let result = entry_attachments::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await
            .map_err(|e| AttachmentError::repository(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }
}

/// Convert database model to domain attachment.
pub(crate) fn to_domain(model: entry_attachments::Model) -> Attachment {
    Attachment {
        id: model.id.into(),
        entry_id: model.entry_id.into(),
        user_id: model.user_id.into(),
        file_name: model.file_name,
        storage_path: model.storage_path,
        file_size: model.file_size,
        mime_type: model.mime_type,
        created_at: utc(model.created_at),
    }
}
