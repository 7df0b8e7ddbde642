//! Property tests for credit/debit normalization.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::amounts::{Amounts, MAX_INTEGER_DIGITS, MAX_SCALE, parse_amount};

/// Raw field contents: blanks, zeros, numbers with either separator, garbage.
fn arb_raw_amount() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("0".to_string()),
        Just("0,00".to_string()),
        "[1-9][0-9]{0,5}".prop_map(|s| s),
        "[0-9]{1,5}[.,][0-9]{1,2}".prop_map(|s| s),
        "[a-z]{1,6}".prop_map(|s| s),
    ]
}

fn is_blank(raw: &str) -> bool {
    parse_amount(raw).is_none_or(|v| v.is_zero())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_normalized_amounts_are_exclusive(
        credit in arb_raw_amount(),
        debit in arb_raw_amount(),
    ) {
        let amounts = Amounts::from_raw(&credit, &debit);
        prop_assert!(amounts.is_exclusive());
        prop_assert!(amounts.credit.is_none() || amounts.debit.is_none());
    }

    #[test]
    fn prop_blank_inputs_normalize_to_canonical_blank(
        credit in arb_raw_amount(),
        debit in arb_raw_amount(),
    ) {
        prop_assume!(is_blank(&credit) && is_blank(&debit));
        prop_assert_eq!(Amounts::from_raw(&credit, &debit), Amounts::BLANK);
    }

    #[test]
    fn prop_credit_wins_when_both_present(
        credit in 1u32..1_000_000,
        debit in 1u32..1_000_000,
    ) {
        let amounts = Amounts::normalize(Some(Decimal::from(credit)), Some(Decimal::from(debit)));
        prop_assert_eq!(amounts.credit, Some(Decimal::from(credit)));
        prop_assert_eq!(amounts.debit, None);
    }

    #[test]
    fn prop_edit_sequence_stays_exclusive(
        edits in prop::collection::vec((any::<bool>(), arb_raw_amount()), 1..12),
    ) {
        let mut amounts = Amounts::BLANK;
        for (is_credit, raw) in &edits {
            if *is_credit {
                amounts.edit_credit(raw);
            } else {
                amounts.edit_debit(raw);
            }
            prop_assert!(amounts.is_exclusive());
        }
    }

    #[test]
    fn prop_parsed_amounts_fit_the_column(
        raw in "[0-9]{1,16}([.,][0-9]{1,5})?",
    ) {
        if let Some(value) = parse_amount(&raw) {
            prop_assert!(value.scale() <= MAX_SCALE);
            let integer_digits = value.trunc().to_string().trim_start_matches('-').len();
            prop_assert!(u32::try_from(integer_digits).unwrap() <= MAX_INTEGER_DIGITS);
        }
    }

    #[test]
    fn prop_amounts_over_two_decimals_are_rejected(
        units in 0u32..1_000_000,
        thousandths in 1u32..10,
    ) {
        let raw = format!("{units}.00{thousandths}");
        prop_assert_eq!(parse_amount(&raw), None);
    }

    #[test]
    fn prop_normalize_is_idempotent(
        credit in arb_raw_amount(),
        debit in arb_raw_amount(),
    ) {
        let once = Amounts::from_raw(&credit, &debit);
        prop_assert_eq!(once.normalized(), once);
    }
}
