//! Archive view types.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::bilan::Bilan;
use crate::entry::AccountingEntry;

/// Sums of a group of entries. Missing amounts count as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Totals {
    /// Sum of credits.
    pub credits: Decimal,
    /// Sum of debits.
    pub debits: Decimal,
    /// Credits minus debits.
    pub balance: Decimal,
}

impl Totals {
    /// Totals of `entries`.
    #[must_use]
    pub fn of(entries: &[AccountingEntry]) -> Self {
        let credits: Decimal = entries.iter().map(|e| e.amounts.credit_or_zero()).sum();
        let debits: Decimal = entries.iter().map(|e| e.amounts.debit_or_zero()).sum();
        Self {
            credits,
            debits,
            balance: credits - debits,
        }
    }
}

/// Entries of one property within a finalized ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyLedger {
    /// Property display name.
    pub property_name: String,
    /// Entries by date.
    pub entries: Vec<AccountingEntry>,
    /// Sums.
    pub totals: Totals,
}

/// A finalized ledger with its entries per property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchivedBilan {
    /// Ledger.
    #[serde(flatten)]
    pub bilan: Bilan,
    /// Properties by name.
    pub properties: Vec<PropertyLedger>,
}

/// Groups `(property name, entry)` rows by name, keeping entry order.
#[must_use]
pub fn group_by_property(rows: Vec<(String, AccountingEntry)>) -> Vec<PropertyLedger> {
    let mut by_name: BTreeMap<String, Vec<AccountingEntry>> = BTreeMap::new();
    for (name, entry) in rows {
        by_name.entry(name).or_default().push(entry);
    }
    by_name
        .into_iter()
        .map(|(property_name, entries)| PropertyLedger {
            totals: Totals::of(&entries),
            property_name,
            entries,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Amounts;
    use chrono::{NaiveDate, Utc};
    use immoloc_shared::types::{BilanId, EntryId, PropertyId};
    use rust_decimal_macros::dec;

    fn entry(day: u32, credit: Option<Decimal>, debit: Option<Decimal>) -> AccountingEntry {
        AccountingEntry {
            id: EntryId::new(),
            bilan_id: BilanId::new(),
            property_id: PropertyId::new(),
            date: NaiveDate::from_ymd_opt(2023, 5, day).unwrap(),
            affectation: None,
            label: String::new(),
            amounts: Amounts { credit, debit },
            attachments: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_totals_treat_missing_as_zero() {
        let entries = [
            entry(1, Some(dec!(850)), None),
            entry(2, None, Some(dec!(120.50))),
            entry(3, None, None),
        ];
        let totals = Totals::of(&entries);
        assert_eq!(totals.credits, dec!(850));
        assert_eq!(totals.debits, dec!(120.50));
        assert_eq!(totals.balance, dec!(729.50));
    }

    #[test]
    fn test_group_by_property_name() {
        let rows = vec![
            ("Villa".to_string(), entry(1, Some(dec!(1000)), None)),
            ("Studio".to_string(), entry(2, Some(dec!(500)), None)),
            ("Villa".to_string(), entry(3, None, Some(dec!(200)))),
        ];
        let groups = group_by_property(rows);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].property_name, "Studio");
        assert_eq!(groups[1].property_name, "Villa");
        assert_eq!(groups[1].entries.len(), 2);
        assert!(groups[1].entries[0].date < groups[1].entries[1].date);
        assert_eq!(groups[1].totals.balance, dec!(800));
    }

    #[test]
    fn test_empty_rows() {
        assert!(group_by_property(Vec::new()).is_empty());
    }
}
