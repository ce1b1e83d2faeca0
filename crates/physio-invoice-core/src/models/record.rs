//! Patient record snapshots.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::invoice::{ComputedTotals, DateSelectionMode, Gender, InvoiceDraft};

/// An immutable snapshot of a generated invoice. Created when generation
/// succeeds, deleted explicitly by the user, never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    /// Unique ID assigned at generation time
    pub id: String,
    pub patient_name: String,
    pub age: String,
    pub gender: Option<Gender>,
    pub referred_by: String,
    pub bill_date: NaiveDate,
    pub condition: String,
    pub treatment: String,
    pub total_sessions: u32,
    pub total_amount: f64,
    /// Generation timestamp (RFC3339)
    pub created_at: String,
    /// Everything needed to re-render the PDF later
    pub selected_dates: BTreeSet<NaiveDate>,
    pub sessions_per_day: u32,
    pub charge_per_session: f64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl PatientRecord {
    /// Snapshot a validated draft and its totals.
    ///
    /// The draft must carry a bill date; validation guarantees this before
    /// a record is ever created.
    pub fn from_draft(draft: &InvoiceDraft, totals: &ComputedTotals) -> Option<Self> {
        Some(Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_name: draft.patient_name.clone(),
            age: draft.age.clone(),
            gender: draft.gender,
            referred_by: draft.referred_by.clone(),
            bill_date: draft.bill_date?,
            condition: draft.condition.clone(),
            treatment: draft.treatment.clone(),
            total_sessions: totals.total_sessions,
            total_amount: totals.total_amount,
            created_at: chrono::Utc::now().to_rfc3339(),
            selected_dates: draft.selected_dates.clone(),
            sessions_per_day: draft.sessions_per_day,
            charge_per_session: draft.charge_per_session,
            start_date: draft.start_date,
            end_date: draft.end_date,
        })
    }

    /// Reconstruct a draft for re-download. The reference date is not
    /// snapshotted, so it comes back empty; the mode is reported as range.
    pub fn to_draft(&self) -> InvoiceDraft {
        InvoiceDraft {
            patient_name: self.patient_name.clone(),
            age: self.age.clone(),
            gender: self.gender,
            referred_by: self.referred_by.clone(),
            bill_date: Some(self.bill_date),
            reference_date: None,
            condition: self.condition.clone(),
            treatment: self.treatment.clone(),
            date_selection_mode: DateSelectionMode::Range,
            start_date: self.start_date,
            end_date: self.end_date,
            selected_dates: self.selected_dates.clone(),
            sessions_per_day: self.sessions_per_day,
            charge_per_session: self.charge_per_session,
        }
    }
}

/// Aggregates over the record list, shown on the records view.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecordTotals {
    pub patients: usize,
    pub sessions: u32,
    pub revenue: f64,
}

impl RecordTotals {
    pub fn from_records(records: &[PatientRecord]) -> Self {
        records.iter().fold(Self::default(), |acc, r| Self {
            patients: acc.patients + 1,
            sessions: acc.sessions + r.total_sessions,
            revenue: acc.revenue + r.total_amount,
        })
    }
}
