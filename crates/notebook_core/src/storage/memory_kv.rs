use super::{KeyValueStore, StorageResult};
use std::cell::RefCell;
use std::collections::HashMap;

/// Process-local store for ephemeral sessions and tests.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds one raw value, e.g. a payload written by an older build.
    pub fn with_item(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.items.borrow_mut().insert(key.into(), value.into());
        self
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}
