//! Invoice draft model and derived totals.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Patient gender as selected on the form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "Male"),
            Gender::Female => write!(f, "Female"),
            Gender::Other => write!(f, "Other"),
        }
    }
}

/// How treatment dates are chosen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DateSelectionMode {
    /// A contiguous start/end range, expanded to every day in between.
    Range,
    /// Discrete days picked one by one; no gap-filling.
    Individual,
}

/// Default charge per session in rupees.
pub const DEFAULT_CHARGE_PER_SESSION: f64 = 800.0;

/// Allowed sessions-per-day range.
pub const SESSIONS_PER_DAY_RANGE: std::ops::RangeInclusive<u32> = 1..=5;

/// An in-progress invoice. Transient editing state; becomes a
/// [`PatientRecord`](super::PatientRecord) snapshot on generation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraft {
    pub patient_name: String,
    /// Kept as entered; validated as a positive number before generation.
    pub age: String,
    pub gender: Option<Gender>,
    /// Referring doctor; rendered as "Self" when empty.
    pub referred_by: String,
    pub bill_date: Option<NaiveDate>,
    pub reference_date: Option<NaiveDate>,
    /// Free-text condition / diagnosis.
    pub condition: String,
    /// Free-text treatment given.
    pub treatment: String,
    pub date_selection_mode: DateSelectionMode,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Deduplicated, ascending. chrono serializes each date as `YYYY-MM-DD`.
    pub selected_dates: BTreeSet<NaiveDate>,
    pub sessions_per_day: u32,
    pub charge_per_session: f64,
}

impl InvoiceDraft {
    /// A fresh draft: bill date today (local time), one session per day,
    /// the default charge, range selection.
    pub fn new() -> Self {
        Self {
            patient_name: String::new(),
            age: String::new(),
            gender: None,
            referred_by: String::new(),
            bill_date: Some(chrono::Local::now().date_naive()),
            reference_date: None,
            condition: String::new(),
            treatment: String::new(),
            date_selection_mode: DateSelectionMode::Range,
            start_date: None,
            end_date: None,
            selected_dates: BTreeSet::new(),
            sessions_per_day: 1,
            charge_per_session: DEFAULT_CHARGE_PER_SESSION,
        }
    }

    /// Number of distinct treatment days.
    pub fn total_days(&self) -> usize {
        self.selected_dates.len()
    }

    /// Treatment period bounds, when any dates are selected.
    pub fn period(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.selected_dates.first(), self.selected_dates.last()) {
            (Some(&first), Some(&last)) => Some((first, last)),
            _ => None,
        }
    }

    /// Switch selection mode, clearing the current selection.
    pub fn set_mode(&mut self, mode: DateSelectionMode) {
        self.date_selection_mode = mode;
        self.selected_dates.clear();
        self.start_date = None;
        self.end_date = None;
    }
}

impl Default for InvoiceDraft {
    fn default() -> Self {
        Self::new()
    }
}

/// Partial update to a draft. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct DraftPatch {
    pub patient_name: Option<String>,
    pub age: Option<String>,
    pub gender: Option<Gender>,
    pub referred_by: Option<String>,
    pub bill_date: Option<NaiveDate>,
    pub reference_date: Option<NaiveDate>,
    pub condition: Option<String>,
    pub treatment: Option<String>,
    pub sessions_per_day: Option<u32>,
    pub charge_per_session: Option<f64>,
}

impl DraftPatch {
    /// Apply every set field to the draft.
    pub fn apply(self, draft: &mut InvoiceDraft) {
        if let Some(v) = self.patient_name {
            draft.patient_name = v;
        }
        if let Some(v) = self.age {
            draft.age = v;
        }
        if let Some(v) = self.gender {
            draft.gender = Some(v);
        }
        if let Some(v) = self.referred_by {
            draft.referred_by = v;
        }
        if let Some(v) = self.bill_date {
            draft.bill_date = Some(v);
        }
        if let Some(v) = self.reference_date {
            draft.reference_date = Some(v);
        }
        if let Some(v) = self.condition {
            draft.condition = v;
        }
        if let Some(v) = self.treatment {
            draft.treatment = v;
        }
        if let Some(v) = self.sessions_per_day {
            draft.sessions_per_day = v;
        }
        if let Some(v) = self.charge_per_session {
            draft.charge_per_session = v;
        }
    }
}

/// Totals derived from a draft. Never stored independently of a record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComputedTotals {
    pub total_sessions: u32,
    pub total_amount: f64,
}

impl ComputedTotals {
    /// Pure derivation: days x sessions/day, then x charge/session.
    pub fn from_draft(draft: &InvoiceDraft) -> Self {
        let total_sessions = draft.selected_dates.len() as u32 * draft.sessions_per_day;
        Self {
            total_sessions,
            total_amount: f64::from(total_sessions) * draft.charge_per_session,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_new_draft_defaults() {
        let draft = InvoiceDraft::new();
        assert_eq!(draft.sessions_per_day, 1);
        assert_eq!(draft.charge_per_session, DEFAULT_CHARGE_PER_SESSION);
        assert_eq!(draft.date_selection_mode, DateSelectionMode::Range);
        assert!(draft.bill_date.is_some());
        assert!(draft.selected_dates.is_empty());
    }

    #[test]
    fn test_totals_example() {
        // 5 distinct days x 2 sessions x Rs. 800 = 10 sessions, Rs. 8000
        let mut draft = InvoiceDraft::new();
        for day in 1..=5 {
            draft
                .selected_dates
                .insert(NaiveDate::from_ymd_opt(2024, 3, day).unwrap());
        }
        draft.sessions_per_day = 2;
        draft.charge_per_session = 800.0;

        let totals = ComputedTotals::from_draft(&draft);
        assert_eq!(totals.total_sessions, 10);
        assert_eq!(totals.total_amount, 8000.0);
    }

    #[test]
    fn test_totals_empty_selection() {
        let draft = InvoiceDraft::new();
        let totals = ComputedTotals::from_draft(&draft);
        assert_eq!(totals.total_sessions, 0);
        assert_eq!(totals.total_amount, 0.0);
    }

    #[test]
    fn test_set_mode_clears_selection() {
        let mut draft = InvoiceDraft::new();
        draft.selected_dates.insert(date("2024-03-01"));
        draft.start_date = Some(date("2024-03-01"));
        draft.end_date = Some(date("2024-03-01"));

        draft.set_mode(DateSelectionMode::Individual);
        assert!(draft.selected_dates.is_empty());
        assert!(draft.start_date.is_none());
        assert!(draft.end_date.is_none());
    }

    #[test]
    fn test_period_bounds() {
        let mut draft = InvoiceDraft::new();
        assert!(draft.period().is_none());

        draft.selected_dates.insert(date("2024-03-03"));
        draft.selected_dates.insert(date("2024-03-01"));
        assert_eq!(
            draft.period(),
            Some((date("2024-03-01"), date("2024-03-03")))
        );
    }

    #[test]
    fn test_patch_applies_only_set_fields() {
        let mut draft = InvoiceDraft::new();
        draft.patient_name = "Asha".into();

        DraftPatch {
            age: Some("42".into()),
            gender: Some(Gender::Female),
            ..Default::default()
        }
        .apply(&mut draft);

        assert_eq!(draft.patient_name, "Asha");
        assert_eq!(draft.age, "42");
        assert_eq!(draft.gender, Some(Gender::Female));
    }

    #[test]
    fn test_selected_dates_serialize_as_iso() {
        let mut draft = InvoiceDraft::new();
        draft.selected_dates.insert(date("2024-03-05"));
        let json = serde_json::to_string(&draft).unwrap();
        assert!(json.contains("\"2024-03-05\""));
        assert!(json.contains("\"selectedDates\""));
    }
}
