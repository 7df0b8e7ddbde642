//! Archive repository: finalized ledgers and their entries.

use std::collections::HashMap;

use immoloc_core::archive::{ArchiveError, ArchiveRepository as ArchiveRepoTrait};
use immoloc_core::bilan::{Bilan, BilanStatus};
use immoloc_core::entry::AccountingEntry;
use immoloc_shared::types::{BilanId, UserId};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use super::{bilan, entry::load_entries};
use crate::entities::{accounting_entries, bilans, properties};

/// Archive repository implementation.
#[derive(Debug, Clone)]
pub struct ArchiveRepository {
    db: DatabaseConnection,
}

impl ArchiveRepository {
    /// Create a new archive repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl ArchiveRepoTrait for ArchiveRepository {
    async fn list_finalized(&self, user_id: UserId) -> Result<Vec<Bilan>, ArchiveError> {
        let models = bilans::Entity::find()
            .filter(bilans::Column::UserId.eq(user_id.into_inner()))
            .filter(bilans::Column::Status.eq(BilanStatus::Finalized.as_str()))
            .order_by_desc(bilans::Column::Year)
            .all(&self.db)
            .await
            .map_err(|e| ArchiveError::repository(e.to_string()))?;

        models
            .into_iter()
            .map(bilan::to_domain)
            .collect::<Result<_, _>>()
            .map_err(|e| ArchiveError::repository(e.to_string()))
    }

    async fn entries_with_property(
        &self,
        bilan_id: BilanId,
    ) -> Result<Vec<(String, AccountingEntry)>, ArchiveError> {
        let rows = accounting_entries::Entity::find()
            .filter(accounting_entries::Column::BilanId.eq(bilan_id.into_inner()))
            .find_also_related(properties::Entity)
            .order_by_asc(accounting_entries::Column::EntryDate)
            .order_by_asc(accounting_entries::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| ArchiveError::repository(e.to_string()))?;

        let mut names: HashMap<Uuid, String> = HashMap::new();
        let mut models = Vec::with_capacity(rows.len());
        for (model, property) in rows {
            if let Some(property) = property {
                names.insert(property.id, property.name);
            }
            models.push(model);
        }

        let entries = load_entries(&self.db, models)
            .await
            .map_err(|e| ArchiveError::repository(e.to_string()))?;

        Ok(entries
            .into_iter()
            .map(|entry| {
                let name = names
                    .get(&entry.property_id.into_inner())
                    .cloned()
                    .unwrap_or_default();
                (name, entry)
            })
            .collect())
    }
}
