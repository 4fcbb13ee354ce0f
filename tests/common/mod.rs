#![allow(dead_code)]

use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};
use finance_core::{
    core::{LedgerStore, ManualClock, StoreOptions},
    storage::{JsonFileStore, MemoryStore},
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// 2025-01-01T09:30:00Z, i.e. id 1_735_723_800_000.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 9, 30, 0).unwrap()
}

/// Store over a shared in-memory backend driven by a manual clock.
pub fn memory_store() -> (LedgerStore, MemoryStore, ManualClock) {
    let backend = MemoryStore::new();
    let clock = ManualClock::new(epoch());
    let store = reopen_memory(&backend, &clock);
    (store, backend, clock)
}

/// Fresh store instance over an existing backend, as after an app restart.
pub fn reopen_memory(backend: &MemoryStore, clock: &ManualClock) -> LedgerStore {
    LedgerStore::with_clock(
        Box::new(backend.clone()),
        Box::new(clock.clone()),
        StoreOptions::default(),
    )
}

/// Creates an isolated directory that outlives the calling test.
pub fn temp_dir() -> std::path::PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

pub fn file_store(dir: &std::path::Path, clock: &ManualClock) -> LedgerStore {
    let backend = JsonFileStore::new(dir).expect("create json file store");
    LedgerStore::with_clock(
        Box::new(backend),
        Box::new(clock.clone()),
        StoreOptions::default(),
    )
}
