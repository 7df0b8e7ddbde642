//! `SeaORM` Entity for accounting_entries table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "accounting_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub bilan_id: Uuid,
    pub property_id: Uuid,
    pub entry_date: Date,
    pub affectation: Option<String>,
    pub label: String,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))", nullable)]
    pub credit: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))", nullable)]
    pub debit: Option<Decimal>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bilans::Entity",
        from = "Column::BilanId",
        to = "super::bilans::Column::Id",
        on_delete = "Cascade"
    )]
    Bilans,
    #[sea_orm(
        belongs_to = "super::properties::Entity",
        from = "Column::PropertyId",
        to = "super::properties::Column::Id",
        on_delete = "Restrict"
    )]
    Properties,
    #[sea_orm(has_many = "super::entry_attachments::Entity")]
    EntryAttachments,
}

impl Related<super::bilans::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bilans.def()
    }
}

impl Related<super::properties::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Properties.def()
    }
}

impl Related<super::entry_attachments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EntryAttachments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
