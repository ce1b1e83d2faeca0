//! Persistence layer: a SQLite-backed blob plus the in-memory state container.
//!
//! Load-at-open, save-on-every-mutation. [`Store`] is the single writer;
//! every mutating method persists the full state before returning, so the
//! on-disk blob never lags the in-memory view.

mod schema;
mod state;

pub use schema::{SCHEMA, STORAGE_KEY};
pub use state::PersistedState;

use std::path::Path;

use rusqlite::{Connection, OptionalExtension};
use thiserror::Error;

use crate::models::{
    ClinicSettings, Doctor, InvoiceDraft, PatientRecord, RecordTotals,
};

/// Store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    fn initialize(&self) -> StoreResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Load the full state blob, if one has been saved.
    pub fn load_state(&self) -> StoreResult<Option<PersistedState>> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload FROM app_storage WHERE name = ?",
                [STORAGE_KEY],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Overwrite the full state blob.
    pub fn save_state(&self, state: &PersistedState) -> StoreResult<()> {
        let json = serde_json::to_string(state)?;
        self.conn.execute(
            r#"
            INSERT INTO app_storage (name, payload, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(name) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
            [STORAGE_KEY, &json],
        )?;
        Ok(())
    }
}

/// Explicit state container over the persisted blob. All reads come from
/// memory; all writes go through a mutation method that saves in full.
pub struct Store {
    db: Database,
    state: PersistedState,
}

impl Store {
    /// Open the store at a path, loading saved state or starting fresh.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Self::from_database(Database::open(path)?)
    }

    /// In-memory store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_database(Database::open_in_memory()?)
    }

    fn from_database(db: Database) -> StoreResult<Self> {
        let state = db.load_state()?.unwrap_or_default();
        Ok(Self { db, state })
    }

    fn persist(&self) -> StoreResult<()> {
        self.db.save_state(&self.state)
    }

    pub fn settings(&self) -> &ClinicSettings {
        &self.state.clinic_settings
    }

    pub fn draft(&self) -> &InvoiceDraft {
        &self.state.patient_invoice
    }

    /// Records, newest first.
    pub fn records(&self) -> &[PatientRecord] {
        &self.state.patient_records
    }

    pub fn record_totals(&self) -> RecordTotals {
        RecordTotals::from_records(&self.state.patient_records)
    }

    /// Replace the clinic settings wholesale.
    pub fn set_settings(&mut self, settings: ClinicSettings) -> StoreResult<()> {
        self.state.clinic_settings = settings;
        self.persist()
    }

    /// Add a doctor by name. Blank names are rejected without a write.
    pub fn add_doctor(&mut self, name: &str) -> StoreResult<Option<Doctor>> {
        match self.state.clinic_settings.add_doctor(name) {
            Some(doctor) => {
                self.persist()?;
                Ok(Some(doctor))
            }
            None => Ok(None),
        }
    }

    /// Remove a doctor by ID.
    pub fn remove_doctor(&mut self, id: &str) -> StoreResult<bool> {
        if self.state.clinic_settings.remove_doctor(id) {
            self.persist()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Mutate the draft through a closure, then persist.
    pub fn update_draft(
        &mut self,
        f: impl FnOnce(&mut InvoiceDraft),
    ) -> StoreResult<&InvoiceDraft> {
        f(&mut self.state.patient_invoice);
        self.persist()?;
        Ok(&self.state.patient_invoice)
    }

    /// Reset the draft to defaults.
    pub fn reset_draft(&mut self) -> StoreResult<()> {
        self.state.patient_invoice = InvoiceDraft::new();
        self.persist()
    }

    /// Prepend a record (newest first).
    pub fn add_record(&mut self, record: PatientRecord) -> StoreResult<()> {
        self.state.patient_records.insert(0, record);
        self.persist()
    }

    /// Delete exactly the record with this ID, leaving the rest in order.
    pub fn delete_record(&mut self, id: &str) -> StoreResult<bool> {
        let before = self.state.patient_records.len();
        self.state.patient_records.retain(|r| r.id != id);
        if self.state.patient_records.len() < before {
            self.persist()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Look up a record by ID.
    pub fn get_record(&self, id: &str) -> Option<&PatientRecord> {
        self.state.patient_records.iter().find(|r| r.id == id)
    }
}
