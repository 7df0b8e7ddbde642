//! Repository implementations for database operations.
//!
//! Domain repositories implement the traits declared in `immoloc-core`;
//! [`UserRepository`] and [`SessionRepository`] serve the auth routes directly.

pub mod archive;
pub mod attachment;
pub mod bilan;
pub mod document;
pub mod entry;
pub mod profile;
pub mod property;
pub mod session;
pub mod user;

pub use archive::ArchiveRepository;
pub use attachment::AttachmentRepository;
pub use bilan::BilanRepository;
pub use document::DocumentRepository;
pub use entry::EntryRepository;
pub use profile::ProfileRepository;
pub use property::PropertyRepository;
pub use session::SessionRepository;
pub use user::UserRepository;

use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use sea_orm::prelude::DateTimeWithTimeZone;

/// Turns a stored label back into its vocabulary value.
pub(crate) fn decode<T>(parsed: Option<T>, column: &str, raw: &str) -> Result<T, DbErr> {
    parsed.ok_or_else(|| DbErr::Custom(format!("unexpected {column} value: {raw:?}")))
}

pub(crate) fn utc(at: DateTimeWithTimeZone) -> DateTime<Utc> {
    at.with_timezone(&Utc)
}
