//! Property document repository for database operations.

use chrono::Utc;
use immoloc_core::document::{
    DocumentCategory, DocumentError, DocumentRepository as DocumentRepoTrait, NewDocument,
    PropertyDocument,
};
use immoloc_shared::types::{DocumentId, PropertyId, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use super::{decode, utc};
use crate::entities::{properties, property_documents};

/// Property document repository implementation.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    db: DatabaseConnection,
}

impl DocumentRepository {
    /// Create a new document repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl DocumentRepoTrait for DocumentRepository {
    async fn property_belongs_to(
        &self,
        property_id: PropertyId,
        user_id: UserId,
    ) -> Result<bool, DocumentError> {
        let count = properties::Entity::find_by_id(property_id.into_inner())
            .filter(properties::Column::UserId.eq(user_id.into_inner()))
            .count(&self.db)
            .await
            .map_err(|e| DocumentError::repository(e.to_string()))?;

        Ok(count > 0)
    }

    async fn create(&self, input: NewDocument) -> Result<PropertyDocument, DocumentError> {
        let model = property_documents::ActiveModel {
            id: Set(DocumentId::new().into_inner()),
            property_id: Set(input.property_id.into_inner()),
            user_id: Set(input.user_id.into_inner()),
            category: Set(input.category.as_str().to_string()),
            file_name: Set(input.file_name),
            storage_path: Set(input.storage_path),
            file_size: Set(input.file_size),
            mime_type: Set(input.mime_type),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| DocumentError::repository(e.to_string()))?;

        to_domain(model).map_err(|e| DocumentError::repository(e.to_string()))
    }

    async fn find_by_id(
        &self,
        id: DocumentId,
        user_id: UserId,
    ) -> Result<Option<PropertyDocument>, DocumentError> {
        let model = property_documents::Entity::find_by_id(id.into_inner())
            .filter(property_documents::Column::UserId.eq(user_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(|e| DocumentError::repository(e.to_string()))?;

        model
            .map(to_domain)
            .transpose()
            .map_err(|e| DocumentError::repository(e.to_string()))
    }

    async fn list_by_property(
        &self,
        property_id: PropertyId,
        user_id: UserId,
    ) -> Result<Vec<PropertyDocument>, DocumentError> {
        let models = property_documents::Entity::find()
            .filter(property_documents::Column::PropertyId.eq(property_id.into_inner()))
            .filter(property_documents::Column::UserId.eq(user_id.into_inner()))
            .order_by_desc(property_documents::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DocumentError::repository(e.to_string()))?;

        models
            .into_iter()
            .map(to_domain)
            .collect::<Result<_, _>>()
            .map_err(|e| DocumentError::repository(e.to_string()))
    }

    async fn delete(&self, id: DocumentId) -> Result<bool, DocumentError> {
        let result = property_documents::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await
            .map_err(|e| DocumentError::repository(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }
}

/// Convert database model to domain document.
fn to_domain(model: property_documents::Model) -> Result<PropertyDocument, DbErr> {
    Ok(PropertyDocument {
        id: model.id.into(),
        property_id: model.property_id.into(),
        user_id: model.user_id.into(),
        category: decode(
            DocumentCategory::parse(&model.category),
            "category",
            &model.category,
        )?,
        file_name: model.file_name,
        storage_path: model.storage_path,
        file_size: model.file_size,
        mime_type: model.mime_type,
        created_at: utc(model.created_at),
    })
}
