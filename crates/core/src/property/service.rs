//! Property service.

use std::future::Future;
use std::sync::Arc;

use immoloc_shared::types::{PropertyId, UserId};
use tracing::info;

use super::error::PropertyError;
use super::types::{Property, PropertyInput, PropertyOrder};
use crate::session::Session;

/// Repository trait for property persistence.
pub trait PropertyRepository: Send + Sync {
    /// Properties of an owner.
    fn list(
        &self,
        user_id: UserId,
        order: PropertyOrder,
    ) -> impl Future<Output = Result<Vec<Property>, PropertyError>> + Send;

    /// One property of an owner.
    fn find_by_id(
        &self,
        id: PropertyId,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<Property>, PropertyError>> + Send;

    /// Insert a property.
    fn create(
        &self,
        user_id: UserId,
        input: PropertyInput,
    ) -> impl Future<Output = Result<Property, PropertyError>> + Send;

    /// Overwrite a property. `None` if it is not the owner's.
    fn update(
        &self,
        id: PropertyId,
        user_id: UserId,
        input: PropertyInput,
    ) -> impl Future<Output = Result<Option<Property>, PropertyError>> + Send;

    /// Number of accounting entries referencing the property.
    fn count_entries(&self, id: PropertyId) -> impl Future<Output = Result<u64, PropertyError>> + Send;

    /// Delete a property and its document rows.
    fn delete(
        &self,
        id: PropertyId,
        user_id: UserId,
    ) -> impl Future<Output = Result<bool, PropertyError>> + Send;
}

/// Property service.
pub struct PropertyService<R: PropertyRepository> {
    repo: Arc<R>,
}

impl<R: PropertyRepository> PropertyService<R> {
    /// Create a new property service.
    #[must_use]
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Owner's properties.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn list(
        &self,
        session: &Session,
        order: PropertyOrder,
    ) -> Result<Vec<Property>, PropertyError> {
        self.repo.list(session.user_id, order).await
    }

    /// One property.
    ///
    /// # Errors
    ///
    /// Returns `PropertyError::NotFound` if it is not the owner's.
    pub async fn get(&self, session: &Session, id: PropertyId) -> Result<Property, PropertyError> {
        self.repo
            .find_by_id(id, session.user_id)
            .await?
            .ok_or(PropertyError::NotFound(id))
    }

    /// Create a property.
    ///
    /// # Errors
    ///
    /// Fails on a blank name or a store failure.
    pub async fn create(
        &self,
        session: &Session,
        input: PropertyInput,
    ) -> Result<Property, PropertyError> {
        let input = input.validated()?;
        let property = self.repo.create(session.user_id, input).await?;
        info!(user_id = %session.user_id, property_id = %property.id, "Property created");
        Ok(property)
    }

    /// Update a property.
    ///
    /// # Errors
    ///
    /// Fails on a blank name, an unknown property or a store failure.
    pub async fn update(
        &self,
        session: &Session,
        id: PropertyId,
        input: PropertyInput,
    ) -> Result<Property, PropertyError> {
        let input = input.validated()?;
        self.repo
            .update(id, session.user_id, input)
            .await?
            .ok_or(PropertyError::NotFound(id))
    }

    /// Delete a property that no accounting entry references.
    ///
    /// Returns the deleted property so the caller can clean up its documents.
    ///
    /// # Errors
    ///
    /// Returns `PropertyError::StillReferenced` while entries point at it.
    pub async fn delete(&self, session: &Session, id: PropertyId) -> Result<Property, PropertyError> {
        let property = self.get(session, id).await?;

        let entries = self.repo.count_entries(id).await?;
        if entries > 0 {
            return Err(PropertyError::StillReferenced { entries });
        }

        if !self.repo.delete(id, session.user_id).await? {
            return Err(PropertyError::NotFound(id));
        }
        info!(user_id = %session.user_id, property_id = %id, "Property deleted");
        Ok(property)
    }
}
