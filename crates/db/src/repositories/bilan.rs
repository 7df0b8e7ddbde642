//! Ledger repository for database operations.

use chrono::{DateTime, Utc};
use immoloc_core::bilan::{
    Bilan, BilanError, BilanRepository as BilanRepoTrait, BilanStatus, PropertyRef,
};
use immoloc_core::entry::AccountingEntry;
use immoloc_shared::types::{BilanId, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, sea_query::Expr,
};

use super::entry::load_entries;
use super::{decode, utc};
use crate::entities::{accounting_entries, bilans, properties};

/// Ledger repository implementation.
#[derive(Debug, Clone)]
pub struct BilanRepository {
    db: DatabaseConnection,
}

impl BilanRepository {
    /// Create a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl BilanRepoTrait for BilanRepository {
    async fn find_open(&self, user_id: UserId) -> Result<Option<Bilan>, BilanError> {
        let model = bilans::Entity::find()
            .filter(bilans::Column::UserId.eq(user_id.into_inner()))
            .filter(bilans::Column::Status.eq(BilanStatus::Open.as_str()))
            .one(&self.db)
            .await
            .map_err(|e| BilanError::repository(e.to_string()))?;

        model
            .map(to_domain)
            .transpose()
            .map_err(|e| BilanError::repository(e.to_string()))
    }

    async fn find_by_id(&self, id: BilanId, user_id: UserId) -> Result<Option<Bilan>, BilanError> {
        find_owned(&self.db, id, user_id)
            .await
            .map_err(|e| BilanError::repository(e.to_string()))
    }

    async fn used_years(&self, user_id: UserId) -> Result<Vec<i32>, BilanError> {
        bilans::Entity::find()
            .select_only()
            .column(bilans::Column::Year)
            .filter(bilans::Column::UserId.eq(user_id.into_inner()))
            .order_by_asc(bilans::Column::Year)
            .into_tuple::<i32>()
            .all(&self.db)
            .await
            .map_err(|e| BilanError::repository(e.to_string()))
    }

    async fn create(&self, user_id: UserId, year: i32) -> Result<Bilan, BilanError> {
        let now = Utc::now().into();
        let model = bilans::ActiveModel {
            id: Set(BilanId::new().into_inner()),
            user_id: Set(user_id.into_inner()),
            year: Set(year),
            status: Set(BilanStatus::Open.as_str().to_string()),
            finalized_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(|e| BilanError::repository(e.to_string()))?;

        to_domain(model).map_err(|e| BilanError::repository(e.to_string()))
    }

    async fn list_entries(&self, id: BilanId) -> Result<Vec<AccountingEntry>, BilanError> {
        let models = accounting_entries::Entity::find()
            .filter(accounting_entries::Column::BilanId.eq(id.into_inner()))
            .order_by_asc(accounting_entries::Column::EntryDate)
            .order_by_asc(accounting_entries::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| BilanError::repository(e.to_string()))?;

        load_entries(&self.db, models)
            .await
            .map_err(|e| BilanError::repository(e.to_string()))
    }

    async fn list_properties(&self, user_id: UserId) -> Result<Vec<PropertyRef>, BilanError> {
        let rows = properties::Entity::find()
            .select_only()
            .column(properties::Column::Id)
            .column(properties::Column::Name)
            .filter(properties::Column::UserId.eq(user_id.into_inner()))
            .order_by_asc(properties::Column::Name)
            .into_tuple::<(uuid::Uuid, String)>()
            .all(&self.db)
            .await
            .map_err(|e| BilanError::repository(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| PropertyRef {
                id: id.into(),
                name,
            })
            .collect())
    }

    async fn mark_finalized(
        &self,
        id: BilanId,
        at: DateTime<Utc>,
    ) -> Result<Option<Bilan>, BilanError> {
        let at: sea_orm::prelude::DateTimeWithTimeZone = at.into();

        // Guarded on the open status so two concurrent finalizations cannot both win.
        let result = bilans::Entity::update_many()
            .col_expr(
                bilans::Column::Status,
                Expr::value(BilanStatus::Finalized.as_str()),
            )
            .col_expr(bilans::Column::FinalizedAt, Expr::value(at))
            .col_expr(bilans::Column::UpdatedAt, Expr::value(at))
            .filter(bilans::Column::Id.eq(id.into_inner()))
            .filter(bilans::Column::Status.eq(BilanStatus::Open.as_str()))
            .exec(&self.db)
            .await
            .map_err(|e| BilanError::repository(e.to_string()))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        let model = bilans::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(|e| BilanError::repository(e.to_string()))?;

        model
            .map(to_domain)
            .transpose()
            .map_err(|e| BilanError::repository(e.to_string()))
    }
}

/// Loads a ledger only if it belongs to `user_id`.
pub(crate) async fn find_owned(
    db: &DatabaseConnection,
    id: BilanId,
    user_id: UserId,
) -> Result<Option<Bilan>, DbErr> {
    bilans::Entity::find_by_id(id.into_inner())
        .filter(bilans::Column::UserId.eq(user_id.into_inner()))
        .one(db)
        .await?
        .map(to_domain)
        .transpose()
}

/// Convert database model to domain ledger.
pub(crate) fn to_domain(model: bilans::Model) -> Result<Bilan, DbErr> {
    Ok(Bilan {
        id: model.id.into(),
        user_id: model.user_id.into(),
        year: model.year,
        status: decode(BilanStatus::parse(&model.status), "status", &model.status)?,
        created_at: utc(model.created_at),
        finalized_at: model.finalized_at.map(utc),
    })
}
