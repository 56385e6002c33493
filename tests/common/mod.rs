#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use tempfile::TempDir;
use yakstra_core::{
    config::{Config, ConfigManager},
    domain::Transaction,
    storage::JsonFileStore,
    time::FixedClock,
    Tracker,
};

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Returns a fresh directory that survives until the test binary exits.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Opens a tracker over a JSON file store in `base`, pinned to `today`.
pub fn open_tracker(base: &Path, today: NaiveDate) -> Tracker {
    let store = JsonFileStore::new(base.join("data")).expect("create json store");
    Tracker::with_clock(
        Box::new(store),
        Config::default(),
        Box::new(FixedClock::on_date(today)),
    )
}

/// Creates an isolated tracker and config manager backed by a unique directory.
pub fn setup_test_env(today: NaiveDate) -> (Tracker, ConfigManager, PathBuf) {
    let base = temp_base();
    let tracker = open_tracker(&base, today);
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    (tracker, config_manager, base)
}

/// January 2024: one salary, one grocery run.
pub fn january_sample() -> Vec<Transaction> {
    vec![
        Transaction::income("Salary", 5000.0, "Salary", "2024-01-15")
            .with_id("1")
            .with_payment_method("Bank Transfer"),
        Transaction::expense("Groceries", 120.5, "Food & Dining", "2024-01-20")
            .with_id("2")
            .with_payment_method("Card")
            .with_description("Weekly shop"),
    ]
}
