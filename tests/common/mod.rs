#![allow(dead_code)]

use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};
use fintrack_core::storage::JsonStorage;
use fintrack_core::Transaction;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the
/// test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated JSON storage backend rooted in a unique directory.
pub fn setup_storage() -> JsonStorage {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    JsonStorage::new(Some(base), Some(3)).expect("create json storage backend")
}

pub fn noon(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

pub fn expense_on(amount: f64, category: &str, y: i32, m: u32, d: u32) -> Transaction {
    Transaction::expense(amount, category, noon(y, m, d))
}

pub fn income_on(amount: f64, category: &str, y: i32, m: u32, d: u32) -> Transaction {
    Transaction::income(amount, category, noon(y, m, d))
}
