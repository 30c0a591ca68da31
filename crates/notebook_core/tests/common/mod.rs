#![allow(dead_code)]

use chrono::{DateTime, Utc};
use notebook_core::model::iso_datetime;
use notebook_core::{
    Importance, KeyValueStore, MemoryKeyValueStore, Note, NoteId, StorageError, StorageResult,
};
use std::cell::Cell;

/// In-memory store whose reads and writes can be switched to fail.
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: MemoryKeyValueStore,
    pub fail_reads: Cell<bool>,
    pub fail_writes: Cell<bool>,
    pub writes: Cell<usize>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.get_item(key).unwrap()
    }
}

impl KeyValueStore for FlakyStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        if self.fail_reads.get() {
            return Err(StorageError::Unavailable("read refused".to_string()));
        }
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        if self.fail_writes.get() {
            return Err(StorageError::Unavailable("quota exceeded".to_string()));
        }
        self.writes.set(self.writes.get() + 1);
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        if self.fail_writes.get() {
            return Err(StorageError::Unavailable("quota exceeded".to_string()));
        }
        self.inner.remove_item(key)
    }
}

pub fn date(value: &str) -> DateTime<Utc> {
    iso_datetime::parse(value).unwrap()
}

pub fn note(id: NoteId, title: &str, content: &str, importance: Importance) -> Note {
    Note::new(id, title, content, date("2024-01-05")).with_importance(importance)
}
