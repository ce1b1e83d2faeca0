//! Invoice calculator: date-range expansion and pre-generation validation.
//!
//! Everything here is a pure derivation over an [`InvoiceDraft`](crate::models::InvoiceDraft);
//! no I/O, no side effects beyond the draft passed in by `&mut`.

mod dates;
mod validate;

pub use dates::{expand_range, sync_range};
pub use validate::{
    validate_draft, validate_settings, DraftField, FieldError, SettingsErrors, ValidationErrors,
};
