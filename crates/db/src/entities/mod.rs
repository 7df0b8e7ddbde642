//! `SeaORM` entities, one module per table.

pub mod accounting_entries;
pub mod bilans;
pub mod entry_attachments;
pub mod profiles;
pub mod properties;
pub mod property_documents;
pub mod sessions;
pub mod users;
