//! Property tests for date expansion and totals.

use chrono::NaiveDate;
use proptest::prelude::*;

use physio_invoice_core::calc::{expand_range, sync_range};
use physio_invoice_core::models::{ComputedTotals, DateSelectionMode, InvoiceDraft};

fn any_date() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2035, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

proptest! {
    #[test]
    fn expansion_is_inclusive_and_ascending(a in any_date(), b in any_date()) {
        let days = expand_range(a, b);
        let (start, end) = if a <= b { (a, b) } else { (b, a) };

        prop_assert_eq!(days.first().copied(), Some(start));
        prop_assert_eq!(days.last().copied(), Some(end));
        prop_assert_eq!(
            days.len() as i64,
            (end - start).num_days() + 1
        );
        prop_assert!(days.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn expansion_ignores_bound_order(a in any_date(), b in any_date()) {
        prop_assert_eq!(expand_range(a, b), expand_range(b, a));
    }

    #[test]
    fn synced_range_draft_matches_expansion(a in any_date(), b in any_date()) {
        let mut draft = InvoiceDraft::new();
        draft.date_selection_mode = DateSelectionMode::Range;
        draft.start_date = Some(a);
        draft.end_date = Some(b);
        sync_range(&mut draft);

        let expected: Vec<NaiveDate> = expand_range(a, b);
        let got: Vec<NaiveDate> = draft.selected_dates.iter().copied().collect();
        prop_assert_eq!(got, expected);

        // Bounds come back sorted.
        prop_assert_eq!(draft.start_date, Some(a.min(b)));
        prop_assert_eq!(draft.end_date, Some(a.max(b)));

        // Re-running changes nothing.
        prop_assert!(!sync_range(&mut draft));
    }

    #[test]
    fn totals_scale_with_sessions_and_charge(
        a in any_date(),
        span in 0i64..60,
        sessions in 1u32..=5,
        charge in 1.0f64..5000.0,
    ) {
        let b = a + chrono::Duration::days(span);
        let mut draft = InvoiceDraft::new();
        draft.date_selection_mode = DateSelectionMode::Range;
        draft.start_date = Some(a);
        draft.end_date = Some(b);
        draft.sessions_per_day = sessions;
        draft.charge_per_session = charge;
        sync_range(&mut draft);

        let totals = ComputedTotals::from_draft(&draft);
        let days = (span + 1) as u32;
        prop_assert_eq!(totals.total_sessions, days * sessions);
        prop_assert_eq!(totals.total_amount, f64::from(days * sessions) * charge);
    }
}
