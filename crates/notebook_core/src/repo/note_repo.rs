//! Note repository contract and key-value implementation.
//!
//! # Responsibility
//! - Load, insert, replace and delete notes in the stored collection.
//! - Keep JSON encoding of the collection inside the persistence boundary.
//!
//! # Invariants
//! - The collection is read whole and rewritten whole on every mutation.
//! - After a successful `save`, exactly one entry carries `note.id`.
//! - Insertion order is preserved; updates replace entries in place.
//! - A failed read never leads to a write: an unreadable or malformed
//!   collection is only ever recovered as empty by `load_all`, and
//!   mutations refuse to run against it.
//!
//! Single writer only: two concurrent read-modify-write cycles lose one
//! update.

use crate::model::note::{Note, NoteId};
use crate::storage::{KeyValueStore, StorageError, NOTES_KEY};
use chrono::Utc;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note mutations.
#[derive(Debug)]
pub enum RepoError {
    /// Storage read/write or encoding failed.
    Persistence(StorageError),
    /// Update targeted an id that is not in the collection.
    NotFound(NoteId),
    /// Insert targeted an id that is already in the collection.
    DuplicateId(NoteId),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Persistence(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::DuplicateId(id) => write!(f, "note id already exists: {id}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persistence(err) => Some(err),
            Self::NotFound(_) | Self::DuplicateId(_) => None,
        }
    }
}

impl From<StorageError> for RepoError {
    fn from(value: StorageError) -> Self {
        Self::Persistence(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Persistence(StorageError::Encode(value))
    }
}

/// Repository interface used by the list, form and detail states.
pub trait NoteRepository {
    /// Returns the stored collection; unset, unreadable or malformed storage
    /// yields an empty collection.
    fn load_all(&self) -> Vec<Note>;

    /// Appends (`is_update == false`) or replaces in place (`true`).
    /// Fails without writing when the stored collection cannot be read
    /// or decoded.
    fn save(&self, note: &Note, is_update: bool) -> RepoResult<()>;

    /// Removes the entry with `id`. Returns whether an entry was removed;
    /// a missing id is not an error.
    fn delete_by_id(&self, id: NoteId) -> RepoResult<bool>;

    /// Allocates an id for a new note, strictly greater than every stored id.
    fn next_note_id(&self) -> RepoResult<NoteId>;

    /// Looks one note up in a freshly loaded collection.
    fn find_by_id(&self, id: NoteId) -> Option<Note> {
        self.load_all().into_iter().find(|note| note.id == id)
    }
}

/// Note repository storing the whole collection under `NOTES_KEY`.
pub struct KvNoteRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> KvNoteRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the wrapped store.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn read_collection(&self) -> RepoResult<Vec<Note>> {
        match self.store.get_item(NOTES_KEY)? {
            Some(raw) => Ok(decode_collection(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn write_collection(&self, notes: &[Note]) -> RepoResult<()> {
        let encoded = serde_json::to_string(notes)?;
        self.store.set_item(NOTES_KEY, &encoded)?;
        Ok(())
    }
}

impl<S: KeyValueStore> NoteRepository for KvNoteRepository<S> {
    fn load_all(&self) -> Vec<Note> {
        match self.read_collection() {
            Ok(notes) => notes,
            Err(RepoError::Persistence(StorageError::Decode(err))) => {
                warn!("event=notes_load module=repo status=recovered reason=decode_failed error={err}");
                Vec::new()
            }
            Err(err) => {
                error!("event=notes_load module=repo status=error error={err}");
                Vec::new()
            }
        }
    }

    fn save(&self, note: &Note, is_update: bool) -> RepoResult<()> {
        let started_at = Instant::now();
        let mode = if is_update { "update" } else { "create" };
        let mut notes = self.read_collection().inspect_err(|err| {
            error!(
                "event=note_save module=repo status=error mode={mode} note_id={} stage=read error={err}",
                note.id
            );
        })?;
        let existing = notes.iter().position(|entry| entry.id == note.id);

        match (is_update, existing) {
            (true, Some(index)) => notes[index] = note.clone(),
            (true, None) => return Err(RepoError::NotFound(note.id)),
            (false, None) => notes.push(note.clone()),
            (false, Some(_)) => return Err(RepoError::DuplicateId(note.id)),
        }

        if let Err(err) = self.write_collection(&notes) {
            error!(
                "event=note_save module=repo status=error mode={mode} note_id={} error={err}",
                note.id
            );
            return Err(err);
        }

        info!(
            "event=note_save module=repo status=ok mode={mode} note_id={} total={} duration_ms={}",
            note.id,
            notes.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    fn delete_by_id(&self, id: NoteId) -> RepoResult<bool> {
        let mut notes = self.read_collection().inspect_err(|err| {
            error!("event=note_delete module=repo status=error note_id={id} stage=read error={err}");
        })?;
        let before = notes.len();
        notes.retain(|note| note.id != id);
        let removed = notes.len() != before;

        if let Err(err) = self.write_collection(&notes) {
            error!("event=note_delete module=repo status=error note_id={id} error={err}");
            return Err(err);
        }

        info!(
            "event=note_delete module=repo status=ok note_id={id} removed={removed} total={}",
            notes.len()
        );
        Ok(removed)
    }

    fn next_note_id(&self) -> RepoResult<NoteId> {
        let notes = self.read_collection()?;
        Ok(next_id_after(&notes, Utc::now().timestamp_millis()))
    }
}

/// Decodes a stored payload. One bad record makes the whole payload malformed.
fn decode_collection(raw: &str) -> Result<Vec<Note>, StorageError> {
    serde_json::from_str::<Vec<Note>>(raw).map_err(StorageError::Decode)
}

/// Picks the clock value unless an existing id is already at or past it.
fn next_id_after(notes: &[Note], now_ms: NoteId) -> NoteId {
    notes
        .iter()
        .map(|note| note.id)
        .max()
        .map_or(now_ms, |max_id| now_ms.max(max_id.saturating_add(1)))
}
