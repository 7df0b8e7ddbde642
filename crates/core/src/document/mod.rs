//! Legal documents and amortization schedules filed against a property.

mod service;
mod types;

pub use service::{DocumentError, DocumentRepository, DocumentService};
pub use types::{DocumentCategory, DocumentGroups, NewDocument, PropertyDocument};
