//! Domain types for clinic configuration, invoice drafts, and patient records.

mod clinic;
mod invoice;
mod record;

pub use clinic::{ClinicSettings, Doctor};
pub use invoice::{
    ComputedTotals, DateSelectionMode, DraftPatch, Gender, InvoiceDraft,
    DEFAULT_CHARGE_PER_SESSION, SESSIONS_PER_DAY_RANGE,
};
pub use record::{PatientRecord, RecordTotals};
