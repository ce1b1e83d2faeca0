//! Calendar-date expansion for range selection.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::models::{DateSelectionMode, InvoiceDraft};

/// Expand two dates into the ascending inclusive sequence of every calendar
/// day between them. Order-independent: the earlier date is always treated
/// as the start.
pub fn expand_range(a: NaiveDate, b: NaiveDate) -> Vec<NaiveDate> {
    let (start, end) = if a <= b { (a, b) } else { (b, a) };
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// Re-derive `selected_dates` from the draft's range bounds and rewrite the
/// bounds to sorted order. Returns whether anything changed.
///
/// Converges to a fixed point: once the bounds are sorted and the selection
/// matches the expansion, further calls return `false`. No-op outside range
/// mode or while either bound is missing.
pub fn sync_range(draft: &mut InvoiceDraft) -> bool {
    if draft.date_selection_mode != DateSelectionMode::Range {
        return false;
    }
    let (Some(start), Some(end)) = (draft.start_date, draft.end_date) else {
        return false;
    };

    let dates: BTreeSet<NaiveDate> = expand_range(start, end).into_iter().collect();
    let sorted_start = start.min(end);
    let sorted_end = start.max(end);

    if draft.selected_dates == dates && start == sorted_start && end == sorted_end {
        return false;
    }

    draft.selected_dates = dates;
    draft.start_date = Some(sorted_start);
    draft.end_date = Some(sorted_end);
    true
}
