mod common;

use std::fs;

use common::{epoch, file_store, temp_dir};
use finance_core::{
    core::ManualClock,
    domain::{NewAccount, NewCategory, NewNote, NewTransaction},
    storage::JsonFileStore,
    StoreWarning,
};
use insta::assert_snapshot;

const STORAGE_KEY: &str = "finance-storage";

#[test]
fn file_backend_survives_restart() {
    let dir = temp_dir();
    let clock = ManualClock::new(epoch());
    let mut store = file_store(&dir, &clock);
    let food = store.add_category(NewCategory::new("Food"));
    let bank = store.add_account(NewAccount::new("Bank").with_description("Checking"));
    store.add_transaction(NewTransaction::income(2500.0, food.id, bank.id).recurring());
    store.add_note(NewNote::new("Budget", "spend less on takeout"));

    let reopened = file_store(&dir, &clock);
    assert_eq!(reopened.ledger(), store.ledger());
    assert_eq!(reopened.get_stats().balance, 2500.0);
    assert!(dir.join("finance-storage.json").exists());
}

#[test]
fn corrupt_document_opens_empty_with_warning() {
    let dir = temp_dir();
    fs::write(dir.join("finance-storage.json"), "{\"state\": [oops").unwrap();

    let mut store = file_store(&dir, &ManualClock::new(epoch()));
    assert!(store.ledger().is_empty());
    let warnings = store.take_warnings();
    assert!(matches!(
        warnings.as_slice(),
        [StoreWarning::HydrateFailed { key, .. }] if key == STORAGE_KEY
    ));
}

#[test]
fn newer_document_version_is_not_loaded() {
    let dir = temp_dir();
    fs::write(
        dir.join("finance-storage.json"),
        r#"{"state":{"transactions":[],"categories":[],"accounts":[],"notes":[]},"version":99}"#,
    )
    .unwrap();

    let mut store = file_store(&dir, &ManualClock::new(epoch()));
    assert!(store.ledger().is_empty());
    let warnings = store.take_warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].to_string().contains("99"));
}

#[test]
fn missing_document_opens_empty_without_warning() {
    let dir = temp_dir();
    let mut store = file_store(&dir, &ManualClock::new(epoch()));
    assert!(store.ledger().is_empty());
    assert!(store.take_warnings().is_empty());
    assert_eq!(store.storage_size(), "0 KB");
}

#[test]
fn failed_write_keeps_previous_document_and_memory_state() {
    let dir = temp_dir();
    let clock = ManualClock::new(epoch());
    let mut store = file_store(&dir, &clock);
    store.add_category(NewCategory::new("Food"));

    let backend = JsonFileStore::new(&dir).unwrap();
    let path = backend.item_path(STORAGE_KEY);
    let original = fs::read_to_string(&path).expect("read original document");

    // A directory at the temp file name makes File::create fail.
    fs::create_dir_all(path.with_extension("json.tmp")).unwrap();

    let travel = store.add_category(NewCategory::new("Travel"));
    assert_eq!(store.list_categories().len(), 2);
    assert_eq!(store.category_name(travel.id), "Travel");

    let warnings = store.take_warnings();
    assert!(matches!(
        warnings.as_slice(),
        [StoreWarning::WriteFailed { .. }]
    ));
    let current = fs::read_to_string(&path).expect("read after failure");
    assert_eq!(current, original);
}

#[test]
fn storage_size_tracks_the_document_bytes() {
    let dir = temp_dir();
    let mut store = file_store(&dir, &ManualClock::new(epoch()));
    store.add_note(NewNote::new("short", ""));

    let bytes = fs::metadata(dir.join("finance-storage.json")).unwrap().len();
    assert!(bytes < 1024);
    assert_eq!(store.storage_size(), format!("{bytes} B"));

    store.add_note(NewNote::new("long", "x".repeat(4096)));
    assert!(store.storage_size().ends_with(" KB"));
}

#[test]
fn clear_removes_the_file_but_keeps_the_session() {
    let dir = temp_dir();
    let clock = ManualClock::new(epoch());
    let mut store = file_store(&dir, &clock);
    store.seed_sample_data();
    store.set_profile("Dana".into(), None);

    store.clear_storage().unwrap();

    assert!(!dir.join("finance-storage.json").exists());
    let reopened = file_store(&dir, &clock);
    assert!(reopened.ledger().is_empty());
    assert_eq!(reopened.session().display_name(), "Dana");
}

#[test]
fn exported_document_layout() {
    let dir = temp_dir();
    let mut store = file_store(&dir, &ManualClock::new(epoch()));
    let food = store.add_category(NewCategory::new("Food"));
    store.add_transaction(NewTransaction::expense(12.5, food.id, 1));

    let json = store.export_json().unwrap();
    assert_eq!(
        json,
        fs::read_to_string(dir.join("finance-storage.json")).unwrap()
    );
    assert_snapshot!(json, @r###"{"state":{"transactions":[{"id":1735723800001,"user_id":null,"category_id":1735723800000,"account_id":1,"type":"expense","amount":12.5,"is_recursive":false,"created_at":"2025-01-01T09:30:00Z","updated_at":"2025-01-01T09:30:00Z"}],"categories":[{"id":1735723800000,"user_id":null,"name":"Food","description":null,"created_at":"2025-01-01T09:30:00Z","updated_at":"2025-01-01T09:30:00Z"}],"accounts":[],"notes":[]},"version":1}"###);
}
