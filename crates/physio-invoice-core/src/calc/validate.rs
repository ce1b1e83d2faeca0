//! Pre-generation validation for drafts and clinic settings.
//!
//! Every failing rule maps to exactly one field-level message; generation is
//! blocked while any error exists. Failures here are user-facing, never
//! exceptions crossing component boundaries.

use std::fmt;

use crate::models::{ClinicSettings, InvoiceDraft, SESSIONS_PER_DAY_RANGE};

/// Draft fields that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    PatientName,
    Age,
    Gender,
    BillDate,
    SelectedDates,
    ChargePerSession,
    SessionsPerDay,
}

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: DraftField,
    pub message: &'static str,
}

/// The full set of draft validation failures, in form order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn fields(&self) -> Vec<DraftField> {
        self.0.iter().map(|e| e.field).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message).collect();
        write!(f, "{}", messages.join(". "))
    }
}

/// Missing clinic settings fields, in form order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsErrors(pub Vec<&'static str>);

impl fmt::Display for SettingsErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(". "))
    }
}

/// Check every rule a draft must pass before an invoice can be generated.
pub fn validate_draft(draft: &InvoiceDraft) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    if draft.patient_name.trim().is_empty() {
        errors.push(FieldError {
            field: DraftField::PatientName,
            message: "Patient name is required",
        });
    }

    if draft.age.trim().is_empty() {
        errors.push(FieldError {
            field: DraftField::Age,
            message: "Age is required",
        });
    } else {
        match draft.age.trim().parse::<f64>() {
            Ok(age) if age > 0.0 => {}
            _ => errors.push(FieldError {
                field: DraftField::Age,
                message: "Please enter a valid age",
            }),
        }
    }

    if draft.gender.is_none() {
        errors.push(FieldError {
            field: DraftField::Gender,
            message: "Gender is required",
        });
    }

    if draft.bill_date.is_none() {
        errors.push(FieldError {
            field: DraftField::BillDate,
            message: "Bill date is required",
        });
    }

    if draft.selected_dates.is_empty() {
        errors.push(FieldError {
            field: DraftField::SelectedDates,
            message: "Please select treatment dates",
        });
    }

    if draft.charge_per_session <= 0.0 {
        errors.push(FieldError {
            field: DraftField::ChargePerSession,
            message: "Charge per session must be greater than 0",
        });
    }

    if !SESSIONS_PER_DAY_RANGE.contains(&draft.sessions_per_day) {
        errors.push(FieldError {
            field: DraftField::SessionsPerDay,
            message: "Sessions per day must be between 1 and 5",
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}

/// Check the rules for saving clinic settings. Stricter than
/// [`ClinicSettings::is_configured`]: saving also requires an email.
pub fn validate_settings(settings: &ClinicSettings) -> Result<(), SettingsErrors> {
    let mut errors = Vec::new();

    if settings.clinic_name.trim().is_empty() {
        errors.push("Clinic Name is required");
    }
    if settings.doctors.is_empty() {
        errors.push("At least one Doctor is required");
    }
    if settings.address.trim().is_empty() {
        errors.push("Address is required");
    }
    if settings.phone.trim().is_empty() {
        errors.push("Phone Number is required");
    }
    if settings.email.trim().is_empty() {
        errors.push("Email is required");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(SettingsErrors(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;
    use chrono::NaiveDate;

    fn valid_draft() -> InvoiceDraft {
        let mut draft = InvoiceDraft::new();
        draft.patient_name = "Asha Verma".into();
        draft.age = "42".into();
        draft.gender = Some(Gender::Female);
        draft
            .selected_dates
            .insert(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        draft
    }

    #[test]
    fn test_valid_draft_passes() {
        assert!(validate_draft(&valid_draft()).is_ok());
    }

    #[test]
    fn test_empty_draft_reports_every_missing_field() {
        let mut draft = InvoiceDraft::new();
        draft.bill_date = None;
        draft.charge_per_session = 0.0;

        let errors = validate_draft(&draft).unwrap_err();
        assert_eq!(
            errors.fields(),
            vec![
                DraftField::PatientName,
                DraftField::Age,
                DraftField::Gender,
                DraftField::BillDate,
                DraftField::SelectedDates,
                DraftField::ChargePerSession,
            ]
        );
    }

    #[test]
    fn test_error_set_matches_invalid_fields_exactly() {
        let mut draft = valid_draft();
        draft.age = "abc".into();
        draft.charge_per_session = -5.0;

        let errors = validate_draft(&draft).unwrap_err();
        assert_eq!(
            errors.fields(),
            vec![DraftField::Age, DraftField::ChargePerSession]
        );
    }

    #[test]
    fn test_age_must_be_positive_number() {
        for bad in ["0", "-3", "abc", "  "] {
            let mut draft = valid_draft();
            draft.age = bad.into();
            let errors = validate_draft(&draft).unwrap_err();
            assert_eq!(errors.fields(), vec![DraftField::Age], "age = {:?}", bad);
        }
    }

    #[test]
    fn test_sessions_per_day_bounds() {
        for bad in [0, 6, 10] {
            let mut draft = valid_draft();
            draft.sessions_per_day = bad;
            let errors = validate_draft(&draft).unwrap_err();
            assert_eq!(errors.fields(), vec![DraftField::SessionsPerDay]);
        }
        for ok in 1..=5 {
            let mut draft = valid_draft();
            draft.sessions_per_day = ok;
            assert!(validate_draft(&draft).is_ok());
        }
    }

    #[test]
    fn test_messages_join_for_display() {
        let mut draft = valid_draft();
        draft.patient_name.clear();
        draft.gender = None;

        let errors = validate_draft(&draft).unwrap_err();
        assert_eq!(
            errors.to_string(),
            "Patient name is required. Gender is required"
        );
    }

    #[test]
    fn test_settings_save_requires_email() {
        let mut settings = ClinicSettings {
            clinic_name: "City Physio".into(),
            address: "12 Main Road".into(),
            phone: "9876543210".into(),
            ..Default::default()
        };
        settings.add_doctor("Dr. Rao");

        let errors = validate_settings(&settings).unwrap_err();
        assert_eq!(errors.0, vec!["Email is required"]);

        settings.email = "clinic@example.com".into();
        assert!(validate_settings(&settings).is_ok());
    }
}
