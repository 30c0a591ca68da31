//! Screen state for the list, form and detail screens.
//!
//! # Responsibility
//! - Hold what each screen binds to, owned by that screen.
//! - Turn repository outcomes into routes or user-facing alerts.
//!
//! # Invariants
//! - Every state reloads from the repository on open/focus; nothing is
//!   shared between screens except the `Route` they navigate with.
//! - Failures surface as `Alert` values; no state panics or loses user input.

use crate::model::note::{Importance, Note, NoteId};
use crate::repo::note_repo::RepoError;

pub mod detail;
pub mod form;
pub mod list;

/// Blocking message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    pub(crate) fn from_save_error(err: &RepoError) -> Self {
        match err {
            RepoError::Persistence(_) => {
                Self::new("Save failed", "An error occurred. Please try again.")
            }
            RepoError::NotFound(_) => Self::new("Save failed", "This note no longer exists."),
            RepoError::DuplicateId(_) => {
                Self::new("Save failed", "A note with this id already exists.")
            }
        }
    }

    pub(crate) fn from_delete_error(_err: &RepoError) -> Self {
        Self::new(
            "Delete failed",
            "The note could not be deleted. Please try again.",
        )
    }
}

/// Blocking confirm/cancel prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub title: String,
    pub message: String,
    pub cancel_label: String,
    pub confirm_label: String,
}

/// Display projection of one note, as rendered on list and detail cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteCard {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date_label: String,
    pub importance: Importance,
    pub color_hex: &'static str,
}

impl From<&Note> for NoteCard {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id,
            title: note.title.clone(),
            content: note.content.clone(),
            date_label: note.calendar_date().format("%Y-%m-%d").to_string(),
            importance: note.importance,
            color_hex: note.importance.color_hex(),
        }
    }
}
