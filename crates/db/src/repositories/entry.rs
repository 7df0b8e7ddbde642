//! Accounting entry repository for database operations.

use std::collections::HashMap;

use chrono::Utc;
use immoloc_core::attachment::Attachment;
use immoloc_core::bilan::{Bilan, BilanStatus};
use immoloc_core::entry::{
    AccountingEntry, Affectation, Amounts, EntryError, EntryRepository as EntryRepoTrait,
    NormalizedEntry,
};
use immoloc_shared::types::{BilanId, EntryId, PropertyId, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::{attachment, bilan, utc};
use crate::entities::{accounting_entries, bilans, entry_attachments, properties};

/// Accounting entry repository implementation.
#[derive(Debug, Clone)]
pub struct EntryRepository {
    db: DatabaseConnection,
}

impl EntryRepository {
    /// Create a new entry repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load_one(&self, model: accounting_entries::Model) -> Result<AccountingEntry, DbErr> {
        let mut entries = load_entries(&self.db, vec![model]).await?;
        entries
            .pop()
            .ok_or_else(|| DbErr::Custom("entry vanished while loading".to_string()))
    }
}

/// Locks the ledger row until `txn` ends and checks it is still open.
///
/// Finalizing updates the same row, so it cannot interleave with the write.
async fn lock_open_bilan(txn: &DatabaseTransaction, bilan_id: Uuid) -> Result<(), EntryError> {
    let bilan = bilans::Entity::find_by_id(bilan_id)
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(|e| EntryError::repository(e.to_string()))?;

    match bilan {
        Some(bilan) if bilan.status == BilanStatus::Open.as_str() => Ok(()),
        Some(_) => Err(EntryError::BilanFinalized(bilan_id.into())),
        None => Err(EntryError::BilanNotFound(bilan_id.into())),
    }
}

impl EntryRepoTrait for EntryRepository {
    async fn find_bilan(
        &self,
        bilan_id: BilanId,
        user_id: UserId,
    ) -> Result<Option<Bilan>, EntryError> {
        bilan::find_owned(&self.db, bilan_id, user_id)
            .await
            .map_err(|e| EntryError::repository(e.to_string()))
    }

    async fn property_belongs_to(
        &self,
        property_id: PropertyId,
        user_id: UserId,
    ) -> Result<bool, EntryError> {
        let count = properties::Entity::find_by_id(property_id.into_inner())
            .filter(properties::Column::UserId.eq(user_id.into_inner()))
            .count(&self.db)
            .await
            .map_err(|e| EntryError::repository(e.to_string()))?;

        Ok(count > 0)
    }

    async fn find_by_id(
        &self,
        id: EntryId,
        user_id: UserId,
    ) -> Result<Option<AccountingEntry>, EntryError> {
        let model = accounting_entries::Entity::find_by_id(id.into_inner())
            .filter(accounting_entries::Column::UserId.eq(user_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(|e| EntryError::repository(e.to_string()))?;

        match model {
            Some(model) => self
                .load_one(model)
                .await
                .map(Some)
                .map_err(|e| EntryError::repository(e.to_string())),
            None => Ok(None),
        }
    }

    async fn list(
        &self,
        bilan_id: BilanId,
        property_id: Option<PropertyId>,
    ) -> Result<Vec<AccountingEntry>, EntryError> {
        let mut query = accounting_entries::Entity::find()
            .filter(accounting_entries::Column::BilanId.eq(bilan_id.into_inner()));
        if let Some(property_id) = property_id {
            query = query
                .filter(accounting_entries::Column::PropertyId.eq(property_id.into_inner()));
        }

        let models = query
            .order_by_asc(accounting_entries::Column::EntryDate)
            .order_by_asc(accounting_entries::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| EntryError::repository(e.to_string()))?;

        load_entries(&self.db, models)
            .await
            .map_err(|e| EntryError::repository(e.to_string()))
    }

    async fn insert(
        &self,
        user_id: UserId,
        bilan_id: BilanId,
        property_id: PropertyId,
        entry: NormalizedEntry,
    ) -> Result<AccountingEntry, EntryError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EntryError::repository(e.to_string()))?;
        lock_open_bilan(&txn, bilan_id.into_inner()).await?;

        let now = Utc::now().into();
        let model = accounting_entries::ActiveModel {
            id: Set(EntryId::new().into_inner()),
            user_id: Set(user_id.into_inner()),
            bilan_id: Set(bilan_id.into_inner()),
            property_id: Set(property_id.into_inner()),
            entry_date: Set(entry.date),
            affectation: Set(entry.affectation.map(|a| a.as_str().to_string())),
            label: Set(entry.label),
            credit: Set(entry.amounts.credit),
            debit: Set(entry.amounts.debit),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| EntryError::repository(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| EntryError::repository(e.to_string()))?;

        to_domain(model, Vec::new()).map_err(|e| EntryError::repository(e.to_string()))
    }

    async fn update(
        &self,
        id: EntryId,
        entry: NormalizedEntry,
    ) -> Result<AccountingEntry, EntryError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EntryError::repository(e.to_string()))?;
        let current = accounting_entries::Entity::find_by_id(id.into_inner())
            .one(&txn)
            .await
            .map_err(|e| EntryError::repository(e.to_string()))?
            .ok_or(EntryError::NotFound(id))?;
        lock_open_bilan(&txn, current.bilan_id).await?;

        let model = accounting_entries::ActiveModel {
            id: Set(id.into_inner()),
            entry_date: Set(entry.date),
            affectation: Set(entry.affectation.map(|a| a.as_str().to_string())),
            label: Set(entry.label),
            credit: Set(entry.amounts.credit),
            debit: Set(entry.amounts.debit),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(|e| EntryError::repository(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| EntryError::repository(e.to_string()))?;

        self.load_one(model)
            .await
            .map_err(|e| EntryError::repository(e.to_string()))
    }

    async fn delete(&self, id: EntryId) -> Result<bool, EntryError> {
        let result = accounting_entries::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await
            .map_err(|e| EntryError::repository(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }
}

/// Converts entry rows to domain entries, fetching their attachments in one query.
///
/// Row order is kept; attachments come newest first.
pub(crate) async fn load_entries(
    db: &DatabaseConnection,
    models: Vec<accounting_entries::Model>,
) -> Result<Vec<AccountingEntry>, DbErr> {
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
    let files = entry_attachments::Entity::find()
        .filter(entry_attachments::Column::EntryId.is_in(ids))
        .order_by_desc(entry_attachments::Column::CreatedAt)
        .all(db)
        .await?;

    let mut by_entry: HashMap<Uuid, Vec<Attachment>> = HashMap::new();
    for file in files {
        by_entry
            .entry(file.entry_id)
            .or_default()
            .push(attachment::to_domain(file));
    }

    models
        .into_iter()
        .map(|model| {
            let files = by_entry.remove(&model.id).unwrap_or_default();
            to_domain(model, files)
        })
        .collect()
}

/// Convert database model to domain entry.
///
/// An unknown stored category is read back as no category.
fn to_domain(
    model: accounting_entries::Model,
    attachments: Vec<Attachment>,
) -> Result<AccountingEntry, DbErr> {
    let amounts = Amounts {
        credit: model.credit,
        debit: model.debit,
    };
    if !amounts.is_exclusive() {
        return Err(DbErr::Custom(format!(
            "entry {} has both credit and debit",
            model.id
        )));
    }

    Ok(AccountingEntry {
        id: model.id.into(),
        bilan_id: model.bilan_id.into(),
        property_id: model.property_id.into(),
        date: model.entry_date,
        affectation: model.affectation.as_deref().and_then(Affectation::parse),
        label: model.label,
        amounts,
        attachments,
        created_at: utc(model.created_at),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use rust_decimal::Decimal;

    fn model(credit: Option<Decimal>, debit: Option<Decimal>) -> accounting_entries::Model {
        let now = Utc::now().into();
        accounting_entries::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            bilan_id: Uuid::new_v4(),
            property_id: Uuid::new_v4(),
            entry_date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            affectation: Some("Loyer".to_string()),
            label: "Loyer mars".to_string(),
            credit,
            debit,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_to_domain_reads_category_and_amounts() {
        let entry = to_domain(model(Some(dec!(750.00)), None), Vec::new()).unwrap();
        assert_eq!(entry.affectation, Some(Affectation::Loyer));
        assert_eq!(entry.amounts.credit, Some(dec!(750.00)));
        assert_eq!(entry.amounts.debit, None);
    }

    #[test]
    fn test_to_domain_drops_unknown_category() {
        let mut row = model(None, Some(dec!(12)));
        row.affectation = Some("Salaire".to_string());
        let entry = to_domain(row, Vec::new()).unwrap();
        assert_eq!(entry.affectation, None);
    }

    #[test]
    fn test_to_domain_rejects_double_flow() {
        assert!(to_domain(model(Some(dec!(1)), Some(dec!(2))), Vec::new()).is_err());
    }
}
