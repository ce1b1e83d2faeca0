//! The persisted state blob.

use serde::{Deserialize, Serialize};

use crate::models::{ClinicSettings, InvoiceDraft, PatientRecord};

/// Everything the application persists, as one unit. Field names match the
/// stored JSON layout (`clinicSettings`, `patientInvoice`, `patientRecords`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    pub clinic_settings: ClinicSettings,
    /// The current draft; survives restarts mid-edit.
    pub patient_invoice: InvoiceDraft,
    /// Newest first.
    pub patient_records: Vec<PatientRecord>,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            clinic_settings: ClinicSettings::default(),
            patient_invoice: InvoiceDraft::new(),
            patient_records: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_layout_keys() {
        let state = PersistedState::default();
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"clinicSettings\""));
        assert!(json.contains("\"patientInvoice\""));
        assert!(json.contains("\"patientRecords\""));
    }

    #[test]
    fn test_round_trips_through_json() {
        let mut state = PersistedState::default();
        state.clinic_settings.clinic_name = "City Physio".into();
        state.patient_invoice.patient_name = "Asha".into();

        let json = serde_json::to_string(&state).unwrap();
        let back: PersistedState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
