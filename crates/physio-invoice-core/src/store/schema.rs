//! SQLite schema definition.

/// The blob name everything is stored under.
pub const STORAGE_KEY: &str = "physio-invoice-storage";

/// Complete database schema. The application state is one named JSON blob,
/// loaded in full at open and overwritten in full on every mutation.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS app_storage (
    name TEXT PRIMARY KEY,
    payload TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
