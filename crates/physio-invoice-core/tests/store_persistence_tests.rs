//! Persistence integration tests: state must survive close/reopen on the
//! same database file.

use chrono::NaiveDate;

use physio_invoice_core::models::{
    ClinicSettings, ComputedTotals, DateSelectionMode, Gender, InvoiceDraft, PatientRecord,
};
use physio_invoice_core::store::Store;

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn make_record(name: &str, first_day: &str) -> PatientRecord {
    let mut draft = InvoiceDraft::new();
    draft.patient_name = name.into();
    draft.age = "35".into();
    draft.gender = Some(Gender::Male);
    draft.selected_dates.insert(date(first_day));
    let totals = ComputedTotals::from_draft(&draft);
    PatientRecord::from_draft(&draft, &totals).unwrap()
}

#[test]
fn test_settings_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("clinic.db");

    {
        let mut store = Store::open(&db_path).unwrap();
        let mut settings = ClinicSettings {
            clinic_name: "City Physio".into(),
            tagline: "Move better".into(),
            address: "12 Main Road".into(),
            phone: "9876543210".into(),
            email: "desk@cityphysio.example".into(),
            clinic_hours: "Mon-Sat 9-6".into(),
            ..Default::default()
        };
        settings.add_doctor("Dr. Rao");
        store.set_settings(settings).unwrap();
    }

    let store = Store::open(&db_path).unwrap();
    assert_eq!(store.settings().clinic_name, "City Physio");
    assert_eq!(store.settings().doctors.len(), 1);
    assert_eq!(store.settings().doctors[0].name, "Dr. Rao");
    assert!(store.settings().is_configured());
}

#[test]
fn test_draft_survives_reopen_mid_edit() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("clinic.db");

    {
        let mut store = Store::open(&db_path).unwrap();
        store
            .update_draft(|d| {
                d.patient_name = "Asha Verma".into();
                d.date_selection_mode = DateSelectionMode::Individual;
                d.selected_dates.insert(date("2024-03-01"));
                d.selected_dates.insert(date("2024-03-04"));
                d.charge_per_session = 1200.0;
            })
            .unwrap();
    }

    let store = Store::open(&db_path).unwrap();
    let draft = store.draft();
    assert_eq!(draft.patient_name, "Asha Verma");
    assert_eq!(draft.date_selection_mode, DateSelectionMode::Individual);
    assert_eq!(draft.selected_dates.len(), 2);
    assert_eq!(draft.charge_per_session, 1200.0);
}

#[test]
fn test_records_keep_order_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("clinic.db");

    {
        let mut store = Store::open(&db_path).unwrap();
        store.add_record(make_record("First", "2024-03-01")).unwrap();
        store.add_record(make_record("Second", "2024-03-02")).unwrap();
        store.add_record(make_record("Third", "2024-03-03")).unwrap();
    }

    let store = Store::open(&db_path).unwrap();
    let names: Vec<_> = store
        .records()
        .iter()
        .map(|r| r.patient_name.as_str())
        .collect();
    assert_eq!(names, vec!["Third", "Second", "First"]);
}

#[test]
fn test_delete_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("clinic.db");

    let target = {
        let mut store = Store::open(&db_path).unwrap();
        store.add_record(make_record("Keep", "2024-03-01")).unwrap();
        store.add_record(make_record("Drop", "2024-03-02")).unwrap();
        let target = store.records()[0].id.clone();
        assert!(store.delete_record(&target).unwrap());
        target
    };

    let store = Store::open(&db_path).unwrap();
    assert_eq!(store.records().len(), 1);
    assert_eq!(store.records()[0].patient_name, "Keep");
    assert!(store.get_record(&target).is_none());
}

#[test]
fn test_fresh_database_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path().join("new.db")).unwrap();

    assert!(!store.settings().is_configured());
    assert!(store.records().is_empty());
    assert!(store.draft().patient_name.is_empty());
    assert_eq!(store.record_totals().patients, 0);
}
