//! Read-only view of finalized ledgers.

mod service;
mod types;

pub use service::{ArchiveError, ArchiveRepository, ArchiveService};
pub use types::{ArchivedBilan, PropertyLedger, Totals, group_by_property};
