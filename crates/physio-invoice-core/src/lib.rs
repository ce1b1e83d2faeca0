//! Physio-Invoice Core Library
//!
//! Local-first invoicing core for small physiotherapy clinics.
//!
//! # Architecture
//!
//! ```text
//! Settings edits          Draft edits (patient, dates, charges)
//!       │                           │
//!       └──────────┬────────────────┘
//!                  ▼
//!        [Store: one persisted blob, saved in full on every mutation]
//!                  │
//!          Generate invoice
//!                  │
//!      ┌───────────┼─────────────────┐
//!      ▼           ▼                 ▼
//!  validate    snapshot          render PDF
//!  (calc)   PatientRecord    (summary + session log)
//!                  │                 │
//!            record list     Invoice_<name>_<date>.pdf
//! ```
//!
//! # Core Principle
//!
//! **Every failure is a local, user-facing validation failure.** Either the
//! input is valid and the operation proceeds, or it is invalid and reported
//! field by field; nothing is retryable or fatal.
//!
//! # Modules
//!
//! - [`store`]: SQLite-backed persisted state blob and the state container
//! - [`models`]: Domain types (ClinicSettings, InvoiceDraft, PatientRecord, etc.)
//! - [`calc`]: Date-range expansion, totals, pre-generation validation
//! - [`pdf`]: Two-page invoice document assembly

pub mod calc;
pub mod models;
pub mod pdf;
pub mod store;

// Re-export commonly used types
pub use calc::{validate_draft, validate_settings, DraftField, ValidationErrors};
pub use models::{
    ClinicSettings, ComputedTotals, DateSelectionMode, Doctor, DraftPatch, Gender, InvoiceDraft,
    PatientRecord, RecordTotals,
};
pub use pdf::PdfError;
pub use store::{Store, StoreError};

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use calc::{FieldError, SettingsErrors};

// =========================================================================
// Error Type
// =========================================================================

#[derive(Debug, thiserror::Error)]
pub enum InvoiceError {
    #[error("Clinic settings required: missing {fields}. Configure your clinic in Settings before generating invoices", fields = .missing.join(", "))]
    ClinicNotConfigured { missing: Vec<&'static str> },

    #[error("Invalid draft: {0}")]
    InvalidDraft(ValidationErrors),

    #[error("Invalid settings: {0}")]
    InvalidSettings(SettingsErrors),

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Document error: {0}")]
    Pdf(#[from] PdfError),
}

pub type InvoiceResult<T> = Result<T, InvoiceError>;

/// Completion signal of a successful generation.
#[derive(Debug, Clone)]
pub struct GeneratedInvoice {
    pub record_id: String,
    pub path: PathBuf,
    pub totals: ComputedTotals,
}

// =========================================================================
// Main API Object
// =========================================================================

/// The application surface: settings, draft editing, generation, records.
///
/// Owns the [`Store`] (single writer); every operation runs to completion
/// synchronously.
pub struct InvoiceCore {
    store: Store,
    output_dir: PathBuf,
}

impl InvoiceCore {
    /// Open or create the database at `db_path`; PDFs land in `output_dir`.
    pub fn open<P, Q>(db_path: P, output_dir: Q) -> InvoiceResult<Self>
    where
        P: AsRef<Path>,
        Q: Into<PathBuf>,
    {
        Ok(Self {
            store: Store::open(db_path)?,
            output_dir: output_dir.into(),
        })
    }

    /// In-memory state (for testing).
    pub fn open_in_memory<Q: Into<PathBuf>>(output_dir: Q) -> InvoiceResult<Self> {
        Ok(Self {
            store: Store::open_in_memory()?,
            output_dir: output_dir.into(),
        })
    }

    // =========================================================================
    // Clinic Settings Operations
    // =========================================================================

    pub fn clinic_settings(&self) -> &ClinicSettings {
        self.store.settings()
    }

    /// Save the full settings form. All missing required fields are
    /// reported together.
    pub fn save_clinic_settings(&mut self, settings: ClinicSettings) -> InvoiceResult<()> {
        calc::validate_settings(&settings).map_err(InvoiceError::InvalidSettings)?;
        self.store.set_settings(settings)?;
        Ok(())
    }

    /// Add a doctor to the letterhead. Blank names are ignored.
    pub fn add_doctor(&mut self, name: &str) -> InvoiceResult<Option<Doctor>> {
        Ok(self.store.add_doctor(name)?)
    }

    pub fn remove_doctor(&mut self, id: &str) -> InvoiceResult<bool> {
        Ok(self.store.remove_doctor(id)?)
    }

    // =========================================================================
    // Draft Operations
    // =========================================================================

    pub fn draft(&self) -> &InvoiceDraft {
        self.store.draft()
    }

    /// Current totals for the draft as it stands.
    pub fn totals(&self) -> ComputedTotals {
        ComputedTotals::from_draft(self.store.draft())
    }

    /// Field-level check of the draft, for surfacing errors before generation.
    pub fn check_draft(&self) -> Result<(), ValidationErrors> {
        calc::validate_draft(self.store.draft())
    }

    /// Apply a partial edit, then re-derive the date selection in range mode.
    pub fn update_draft(&mut self, patch: DraftPatch) -> InvoiceResult<InvoiceDraft> {
        let draft = self.store.update_draft(|draft| {
            patch.apply(draft);
            calc::sync_range(draft);
        })?;
        Ok(draft.clone())
    }

    /// Switch selection mode, clearing any current selection.
    pub fn set_date_selection_mode(&mut self, mode: DateSelectionMode) -> InvoiceResult<InvoiceDraft> {
        let draft = self.store.update_draft(|draft| draft.set_mode(mode))?;
        Ok(draft.clone())
    }

    /// Select a start/end range. The bounds may arrive in either order; the
    /// stored draft always carries them sorted, with every day in between
    /// selected.
    pub fn select_date_range(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> InvoiceResult<InvoiceDraft> {
        let draft = self.store.update_draft(|draft| {
            draft.set_mode(DateSelectionMode::Range);
            draft.start_date = Some(start);
            draft.end_date = Some(end);
            calc::sync_range(draft);
        })?;
        Ok(draft.clone())
    }

    /// Select discrete days. Duplicates collapse; the bounds mirror the
    /// min/max of the selection.
    pub fn select_individual_days(&mut self, days: &[NaiveDate]) -> InvoiceResult<InvoiceDraft> {
        let draft = self.store.update_draft(|draft| {
            draft.set_mode(DateSelectionMode::Individual);
            draft.selected_dates = days.iter().copied().collect();
            if let Some((first, last)) = draft.period() {
                draft.start_date = Some(first);
                draft.end_date = Some(last);
            }
        })?;
        Ok(draft.clone())
    }

    /// Reset the draft to defaults.
    pub fn reset_draft(&mut self) -> InvoiceResult<()> {
        Ok(self.store.reset_draft()?)
    }

    // =========================================================================
    // Generation
    // =========================================================================

    /// Validate, snapshot a [`PatientRecord`], write the PDF, and reset the
    /// draft. Blocked outright while the clinic profile is incomplete,
    /// regardless of draft validity.
    pub fn generate_invoice(&mut self) -> InvoiceResult<GeneratedInvoice> {
        self.require_configured_clinic()?;
        calc::validate_draft(self.store.draft()).map_err(InvoiceError::InvalidDraft)?;

        let draft = self.store.draft().clone();
        let totals = ComputedTotals::from_draft(&draft);
        let record = PatientRecord::from_draft(&draft, &totals).ok_or_else(|| {
            InvoiceError::InvalidDraft(ValidationErrors(vec![FieldError {
                field: DraftField::BillDate,
                message: "Bill date is required",
            }]))
        })?;

        let path = pdf::save_invoice(self.store.settings(), &draft, &self.output_dir)?;
        self.store.add_record(record.clone())?;
        self.store.reset_draft()?;

        Ok(GeneratedInvoice {
            record_id: record.id,
            path,
            totals,
        })
    }

    // =========================================================================
    // Record Operations
    // =========================================================================

    /// Records, newest first.
    pub fn records(&self) -> &[PatientRecord] {
        self.store.records()
    }

    pub fn record_totals(&self) -> RecordTotals {
        self.store.record_totals()
    }

    /// Delete exactly the record with this ID.
    pub fn delete_record(&mut self, id: &str) -> InvoiceResult<bool> {
        Ok(self.store.delete_record(id)?)
    }

    /// Re-render a past record's PDF. Gated on clinic configuration the
    /// same way generation is.
    pub fn download_record(&self, id: &str) -> InvoiceResult<PathBuf> {
        self.require_configured_clinic()?;
        let record = self
            .store
            .get_record(id)
            .ok_or_else(|| InvoiceError::RecordNotFound(id.to_string()))?;

        Ok(pdf::save_invoice(
            self.store.settings(),
            &record.to_draft(),
            &self.output_dir,
        )?)
    }

    fn require_configured_clinic(&self) -> InvoiceResult<()> {
        let missing = self.store.settings().missing_requirements();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(InvoiceError::ClinicNotConfigured { missing })
        }
    }
}
