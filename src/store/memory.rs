use anyhow::{bail, Result};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use super::KeyValueStore;

/// In-process key-value store. Writes can be made to fail on demand.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
    fail_writes: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `put` fail until switched back off.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.get() {
            bail!("write rejected for key {}", key);
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
