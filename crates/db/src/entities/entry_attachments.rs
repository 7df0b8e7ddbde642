//! `SeaORM` Entity for entry_attachments table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "entry_attachments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub entry_id: Uuid,
    pub user_id: Uuid,
    pub file_name: String,
    #[sea_orm(unique)]
    pub storage_path: String,
    pub file_size: i64,
    pub mime_type: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounting_entries::Entity",
        from = "Column::EntryId",
        to = "super::accounting_entries::Column::Id",
        on_delete = "Cascade"
    )]
    AccountingEntries,
}

impl Related<super::accounting_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountingEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
