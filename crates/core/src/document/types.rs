//! Property document types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use immoloc_shared::types::{DocumentId, PropertyId, UserId};
use serde::{Deserialize, Serialize};

use crate::storage::Bucket;

/// Kind of property document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DocumentCategory {
    /// Lease (bail).
    #[serde(rename = "bail")]
    Lease,
    /// Ownership certificate.
    #[serde(rename = "attestation_propriete")]
    OwnershipCertificate,
    /// Notarial statements.
    #[serde(rename = "releves_notaires")]
    NotaryStatements,
    /// Loan amortization schedule.
    #[serde(rename = "tableau_amortissement")]
    AmortizationSchedule,
}

impl DocumentCategory {
    /// All categories.
    pub const ALL: [Self; 4] = [
        Self::Lease,
        Self::OwnershipCertificate,
        Self::NotaryStatements,
        Self::AmortizationSchedule,
    ];

    /// Stored value, also used as a path segment.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Lease => "bail",
            Self::OwnershipCertificate => "attestation_propriete",
            Self::NotaryStatements => "releves_notaires",
            Self::AmortizationSchedule => "tableau_amortissement",
        }
    }

    /// Parse a stored value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }

    /// Bucket holding this category.
    #[must_use]
    pub const fn bucket(&self) -> Bucket {
        match self {
            Self::AmortizationSchedule => Bucket::AmortizationSchedules,
            Self::Lease | Self::OwnershipCertificate | Self::NotaryStatements => {
                Bucket::LegalDocuments
            }
        }
    }
}

impl std::fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file filed against a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDocument {
    /// Document ID.
    pub id: DocumentId,
    /// Property.
    pub property_id: PropertyId,
    /// Owner.
    pub user_id: UserId,
    /// Category.
    pub category: DocumentCategory,
    /// Name of the uploaded file.
    pub file_name: String,
    /// Path inside the category's bucket.
    pub storage_path: String,
    /// Size in bytes.
    pub file_size: i64,
    /// MIME type.
    pub mime_type: String,
    /// Upload time.
    pub created_at: DateTime<Utc>,
}

/// Row to insert after the object has been written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    /// Property.
    pub property_id: PropertyId,
    /// Owner.
    pub user_id: UserId,
    /// Category.
    pub category: DocumentCategory,
    /// Name of the uploaded file.
    pub file_name: String,
    /// Path inside the category's bucket.
    pub storage_path: String,
    /// Size in bytes.
    pub file_size: i64,
    /// MIME type.
    pub mime_type: String,
}

/// Documents of a property by category, newest first within each.
///
/// Every category is present, possibly empty.
pub type DocumentGroups = BTreeMap<DocumentCategory, Vec<PropertyDocument>>;

/// Groups documents by category, keeping their relative order.
pub(crate) fn group_by_category(documents: Vec<PropertyDocument>) -> DocumentGroups {
    let mut groups: DocumentGroups = DocumentCategory::ALL
        .into_iter()
        .map(|c| (c, Vec::new()))
        .collect();
    for doc in documents {
        groups.entry(doc.category).or_default().push(doc);
    }
    groups
}
