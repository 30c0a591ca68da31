//! Core domain logic for MyNoteBook.
//! This crate is the single source of truth for note invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod route;
pub mod storage;
pub mod view;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{validate_fields, Importance, Note, NoteId, NoteValidationError};
pub use repo::note_repo::{KvNoteRepository, NoteRepository, RepoError, RepoResult};
pub use route::{Route, RouteError};
pub use storage::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError, StorageResult,
    NOTES_KEY,
};
pub use view::detail::NoteDetailState;
pub use view::form::NoteFormState;
pub use view::list::NoteListState;
pub use view::{Alert, ConfirmPrompt, NoteCard};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
