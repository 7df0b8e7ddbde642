//! Property tests for the intake wizard.

use proptest::prelude::*;

use super::wizard::{WizardError, WizardState};
use super::years::available_years;

fn arb_used_years(current: i32) -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(current - 5..=current, 0..6)
}

fn year_step(available: Vec<i32>) -> WizardState {
    WizardState::FiscalYear {
        acquired_property: false,
        new_address: None,
        available_years: available,
        selected_year: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_only_offered_years_can_be_selected(
        current in 2020i32..2040,
        used in arb_used_years(2030),
        candidate in 2015i32..2045,
    ) {
        let available = available_years(current, &used);
        let result = year_step(available.clone()).select_year(candidate);
        if available.contains(&candidate) {
            prop_assert!(result.is_ok());
        } else {
            prop_assert_eq!(result, Err(WizardError::YearUnavailable(candidate)));
        }
    }

    #[test]
    fn prop_available_years_within_window_and_unused(
        current in 2020i32..2040,
        used in arb_used_years(2030),
    ) {
        let available = available_years(current, &used);
        prop_assert!(available.len() <= 3);
        for year in &available {
            prop_assert!(*year <= current && *year > current - 3);
            prop_assert!(!used.contains(year));
        }
    }

    #[test]
    fn prop_back_from_instructions_forgets_choice(
        current in 2020i32..2040,
        accepted in any::<bool>(),
    ) {
        let available = available_years(current, &[]);
        let year = available[0];
        let state = year_step(available.clone())
            .select_year(year)
            .and_then(WizardState::confirm_year)
            .and_then(|s| s.set_accepted(accepted))
            .and_then(WizardState::back)
            .unwrap();

        prop_assert_eq!(state, year_step(available));
    }
}
