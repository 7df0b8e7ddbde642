//! Property repository for database operations.

use chrono::Utc;
use immoloc_core::property::{
    AcquisitionType, Property, PropertyError, PropertyInput, PropertyOrder,
    PropertyRepository as PropertyRepoTrait, PropertyType, TenureRight, VatRegime, YesNo,
};
use immoloc_shared::types::{PropertyId, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use super::{decode, utc};
use crate::entities::{accounting_entries, properties};

/// Property repository implementation.
#[derive(Debug, Clone)]
pub struct PropertyRepository {
    db: DatabaseConnection,
}

impl PropertyRepository {
    /// Create a new property repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(
        &self,
        id: PropertyId,
        user_id: UserId,
    ) -> Result<Option<properties::Model>, DbErr> {
        properties::Entity::find_by_id(id.into_inner())
            .filter(properties::Column::UserId.eq(user_id.into_inner()))
            .one(&self.db)
            .await
    }
}

impl PropertyRepoTrait for PropertyRepository {
    async fn list(
        &self,
        user_id: UserId,
        order: PropertyOrder,
    ) -> Result<Vec<Property>, PropertyError> {
        let query = properties::Entity::find()
            .filter(properties::Column::UserId.eq(user_id.into_inner()));
        let query = match order {
            PropertyOrder::Newest => query.order_by_desc(properties::Column::CreatedAt),
            PropertyOrder::Name => query.order_by_asc(properties::Column::Name),
        };

        let models = query
            .all(&self.db)
            .await
            .map_err(|e| PropertyError::repository(e.to_string()))?;

        models
            .into_iter()
            .map(to_domain)
            .collect::<Result<_, _>>()
            .map_err(|e| PropertyError::repository(e.to_string()))
    }

    async fn find_by_id(
        &self,
        id: PropertyId,
        user_id: UserId,
    ) -> Result<Option<Property>, PropertyError> {
        self.find_model(id, user_id)
            .await
            .and_then(|model| model.map(to_domain).transpose())
            .map_err(|e| PropertyError::repository(e.to_string()))
    }

    async fn create(
        &self,
        user_id: UserId,
        input: PropertyInput,
    ) -> Result<Property, PropertyError> {
        let now = Utc::now().into();
        let mut active = properties::ActiveModel {
            id: Set(PropertyId::new().into_inner()),
            user_id: Set(user_id.into_inner()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        apply_input(&mut active, input);

        let model = active
            .insert(&self.db)
            .await
            .map_err(|e| PropertyError::repository(e.to_string()))?;

        to_domain(model).map_err(|e| PropertyError::repository(e.to_string()))
    }

    async fn update(
        &self,
        id: PropertyId,
        user_id: UserId,
        input: PropertyInput,
    ) -> Result<Option<Property>, PropertyError> {
        let Some(existing) = self
            .find_model(id, user_id)
            .await
            .map_err(|e| PropertyError::repository(e.to_string()))?
        else {
            return Ok(None);
        };

        let mut active: properties::ActiveModel = existing.into();
        apply_input(&mut active, input);
        active.updated_at = Set(Utc::now().into());

        let model = active
            .update(&self.db)
            .await
            .map_err(|e| PropertyError::repository(e.to_string()))?;

        to_domain(model)
            .map(Some)
            .map_err(|e| PropertyError::repository(e.to_string()))
    }

    async fn count_entries(&self, id: PropertyId) -> Result<u64, PropertyError> {
        accounting_entries::Entity::find()
            .filter(accounting_entries::Column::PropertyId.eq(id.into_inner()))
            .count(&self.db)
            .await
            .map_err(|e| PropertyError::repository(e.to_string()))
    }

    async fn delete(&self, id: PropertyId, user_id: UserId) -> Result<bool, PropertyError> {
        let result = properties::Entity::delete_many()
            .filter(properties::Column::Id.eq(id.into_inner()))
            .filter(properties::Column::UserId.eq(user_id.into_inner()))
            .exec(&self.db)
            .await
            .map_err(|e| PropertyError::repository(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }
}

fn apply_input(active: &mut properties::ActiveModel, input: PropertyInput) {
    active.name = Set(input.name);
    active.property_type = Set(input.property_type.as_str().to_string());
    active.tenure_right = Set(input.tenure_right.as_str().to_string());
    active.vat_regime = Set(input.vat_regime.as_str().to_string());
    active.surface = Set(input.surface);
    active.personal_use = Set(input.personal_use.as_str().to_string());
    active.acquisition_type = Set(input.acquisition_type.as_str().to_string());
    active.acquisition_date = Set(input.acquisition_date);
    active.rental_start_date = Set(input.rental_start_date);
    active.loan = Set(input.loan.as_str().to_string());
}

/// Convert database model to domain property.
fn to_domain(model: properties::Model) -> Result<Property, DbErr> {
    Ok(Property {
        id: model.id.into(),
        user_id: model.user_id.into(),
        property_type: decode(
            PropertyType::parse(&model.property_type),
            "property_type",
            &model.property_type,
        )?,
        tenure_right: decode(
            TenureRight::parse(&model.tenure_right),
            "tenure_right",
            &model.tenure_right,
        )?,
        vat_regime: decode(
            VatRegime::parse(&model.vat_regime),
            "vat_regime",
            &model.vat_regime,
        )?,
        surface: model.surface,
        personal_use: decode(
            YesNo::parse(&model.personal_use),
            "personal_use",
            &model.personal_use,
        )?,
        acquisition_type: decode(
            AcquisitionType::parse(&model.acquisition_type),
            "acquisition_type",
            &model.acquisition_type,
        )?,
        acquisition_date: model.acquisition_date,
        rental_start_date: model.rental_start_date,
        loan: decode(YesNo::parse(&model.loan), "loan", &model.loan)?,
        name: model.name,
        created_at: utc(model.created_at),
        updated_at: utc(model.updated_at),
    })
}
