#![cfg(test)]

use std::cell::RefCell;
use std::sync::{Mutex, MutexGuard, PoisonError};

use lazy_static::lazy_static;

use crate::store::Store;

lazy_static! {
    static ref GLOBAL_STORE_LOCK: Mutex<()> = Mutex::new(());
}

/// Serialize tests that swap the process-wide backing store.
pub fn lock_global_store() -> MutexGuard<'static, ()> {
    GLOBAL_STORE_LOCK
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Returns the same value for every key and remembers which keys were requested.
pub struct RecordingStore {
    value: Option<String>,
    requested: RefCell<Vec<String>>,
}

impl RecordingStore {
    pub fn returning(value: Option<&str>) -> Self {
        Self {
            value: value.map(str::to_string),
            requested: RefCell::new(Vec::new()),
        }
    }

    pub fn requested_keys(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

impl Store for RecordingStore {
    fn value(&self, key: &str) -> Option<String> {
        self.requested.borrow_mut().push(key.to_string());
        self.value.clone()
    }
}

pub struct PanickingStore;

impl Store for PanickingStore {
    fn value(&self, key: &str) -> Option<String> {
        panic!("backing store failure for {}", key);
    }
}
