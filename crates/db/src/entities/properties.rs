//! `SeaORM` Entity for properties table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "properties")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub property_type: String,
    pub tenure_right: String,
    pub vat_regime: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub surface: Option<Decimal>,
    pub personal_use: String,
    pub acquisition_type: String,
    pub acquisition_date: Option<Date>,
    pub rental_start_date: Option<Date>,
    pub loan: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(has_many = "super::accounting_entries::Entity")]
    AccountingEntries,
    #[sea_orm(has_many = "super::property_documents::Entity")]
    PropertyDocuments,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::accounting_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountingEntries.def()
    }
}

impl Related<super::property_documents::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PropertyDocuments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
