//! Clinic profile models.

use serde::{Deserialize, Serialize};

/// A doctor listed on the clinic letterhead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    /// Unique ID, generated locally
    pub id: String,
    /// Display name
    pub name: String,
}

impl Doctor {
    /// Create a new doctor with a generated ID.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
        }
    }
}

/// Clinic identity and contact configuration, printed on every invoice.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClinicSettings {
    pub clinic_name: String,
    pub tagline: String,
    /// Insertion order preserved; the first doctor signs the invoice.
    pub doctors: Vec<Doctor>,
    pub address: String,
    pub phone: String,
    pub email: String,
    /// Free-text operating hours shown in the invoice footer.
    pub clinic_hours: String,
}

impl ClinicSettings {
    /// Whether the profile is complete enough to produce an invoice.
    pub fn is_configured(&self) -> bool {
        self.missing_requirements().is_empty()
    }

    /// Requirements an invoice depends on that are still unmet.
    pub fn missing_requirements(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.clinic_name.trim().is_empty() {
            missing.push("Clinic Name");
        }
        if !self.doctors.iter().any(|d| !d.name.trim().is_empty()) {
            missing.push("At least one Doctor");
        }
        if self.address.trim().is_empty() {
            missing.push("Address");
        }
        if self.phone.trim().is_empty() {
            missing.push("Phone Number");
        }
        missing
    }

    /// Add a doctor by name, trimming whitespace. Blank names are rejected.
    pub fn add_doctor(&mut self, name: &str) -> Option<Doctor> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let doctor = Doctor::new(name);
        self.doctors.push(doctor.clone());
        Some(doctor)
    }

    /// Remove a doctor by ID. Returns whether one was removed.
    pub fn remove_doctor(&mut self, id: &str) -> bool {
        let before = self.doctors.len();
        self.doctors.retain(|d| d.id != id);
        self.doctors.len() < before
    }

    /// First configured doctor, used for the signature block.
    pub fn signing_doctor(&self) -> Option<&Doctor> {
        self.doctors.first()
    }
}
