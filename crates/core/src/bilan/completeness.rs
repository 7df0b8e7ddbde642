//! Ledger completeness check.

use std::collections::HashSet;

use immoloc_shared::types::EntryId;
use serde::Serialize;

use super::types::PropertyRef;
use crate::entry::AccountingEntry;

/// What is missing before a ledger can be finalized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Coverage {
    /// Owned properties with no entry in the ledger. Soft block.
    pub properties_without_entries: Vec<String>,
    /// Entries whose category needs a file and have none. Hard block.
    pub entries_missing_attachment: Vec<EntryId>,
}

impl Coverage {
    /// Nothing blocks finalization, not even a warning.
    #[must_use]
    pub fn is_clear(&self) -> bool {
        self.properties_without_entries.is_empty() && self.entries_missing_attachment.is_empty()
    }

    /// Finalization is refused no matter what the owner confirms.
    #[must_use]
    pub fn is_hard_blocked(&self) -> bool {
        !self.entries_missing_attachment.is_empty()
    }
}

/// Compares the owner's properties against the ledger's entries.
///
/// Property names keep the order of `properties`.
#[must_use]
pub fn find_missing_coverage(properties: &[PropertyRef], entries: &[AccountingEntry]) -> Coverage {
    let covered: HashSet<_> = entries.iter().map(|e| e.property_id).collect();

    Coverage {
        properties_without_entries: properties
            .iter()
            .filter(|p| !covered.contains(&p.id))
            .map(|p| p.name.clone())
            .collect(),
        entries_missing_attachment: entries
            .iter()
            .filter(|e| e.is_missing_mandatory_attachment())
            .map(|e| e.id)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachment::Attachment;
    use crate::entry::{Affectation, Amounts};
    use chrono::{NaiveDate, Utc};
    use immoloc_shared::types::{AttachmentId, BilanId, PropertyId, UserId};
    use rust_decimal_macros::dec;

    fn property(name: &str) -> PropertyRef {
        PropertyRef {
            id: PropertyId::new(),
            name: name.to_string(),
        }
    }

    fn entry(property_id: PropertyId, affectation: Affectation) -> AccountingEntry {
        AccountingEntry {
            id: EntryId::new(),
            bilan_id: BilanId::new(),
            property_id,
            date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            affectation: Some(affectation),
            label: affectation.as_str().to_string(),
            amounts: Amounts::normalize(None, Some(dec!(300))),
            attachments: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_all_covered() {
        let flat = property("Appartement Lyon");
        let entries = vec![entry(flat.id, Affectation::Loyer)];
        let coverage = find_missing_coverage(&[flat], &entries);
        assert!(coverage.is_clear());
    }

    #[test]
    fn test_property_without_entries_is_soft() {
        let flat = property("Appartement Lyon");
        let house = property("Maison Nantes");
        let entries = vec![entry(flat.id, Affectation::Loyer)];

        let coverage = find_missing_coverage(&[flat, house], &entries);
        assert_eq!(coverage.properties_without_entries, vec!["Maison Nantes"]);
        assert!(!coverage.is_hard_blocked());
    }

    #[test]
    fn test_no_entries_reports_every_property() {
        let coverage =
            find_missing_coverage(&[property("A"), property("B")], &[]);
        assert_eq!(coverage.properties_without_entries, vec!["A", "B"]);
    }

    #[test]
    fn test_missing_attachment_is_hard() {
        let flat = property("Appartement Lyon");
        let works = entry(flat.id, Affectation::Travaux);
        let works_id = works.id;
        let mut receipt = entry(flat.id, Affectation::TaxeFonciere);
        receipt.attachments.push(Attachment {
            id: AttachmentId::new(),
            entry_id: receipt.id,
            user_id: UserId::new(),
            file_name: "avis.pdf".to_string(),
            storage_path: "u/e/avis.pdf".to_string(),
            file_size: 10,
            mime_type: "application/pdf".to_string(),
            created_at: Utc::now(),
        });

        let coverage = find_missing_coverage(&[flat], &[works, receipt]);
        assert_eq!(coverage.entries_missing_attachment, vec![works_id]);
        assert!(coverage.is_hard_blocked());
    }
}
