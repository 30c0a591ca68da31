//! Note detail screen state.
//!
//! # Invariants
//! - Delete only runs after `request_delete` raised a prompt and the user
//!   confirmed it.
//! - A failed delete keeps the screen on the same note.

use crate::model::note::{Note, NoteId};
use crate::repo::note_repo::NoteRepository;
use crate::route::Route;
use crate::view::{Alert, ConfirmPrompt, NoteCard};
use log::{info, warn};

const NOT_FOUND_MESSAGE: &str = "Note not found";

/// One note plus its pending delete confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDetailState {
    note: Option<Note>,
    pending_delete: Option<ConfirmPrompt>,
}

impl NoteDetailState {
    /// Loads the note for `note_id` from a fresh collection.
    pub fn open(repo: &impl NoteRepository, note_id: Option<NoteId>) -> Self {
        let note = note_id.and_then(|id| {
            let found = repo.find_by_id(id);
            if found.is_none() {
                info!("event=detail_open module=view status=not_found note_id={id}");
            }
            found
        });
        Self {
            note,
            pending_delete: None,
        }
    }

    pub fn note(&self) -> Option<&Note> {
        self.note.as_ref()
    }

    pub fn is_found(&self) -> bool {
        self.note.is_some()
    }

    pub fn card(&self) -> Option<NoteCard> {
        self.note.as_ref().map(NoteCard::from)
    }

    pub fn not_found_message(&self) -> &'static str {
        NOT_FOUND_MESSAGE
    }

    /// Route to the form seeded with this note.
    pub fn edit(&self) -> Option<Route> {
        self.note.as_ref().map(|note| Route::NoteForm {
            editing_id: Some(note.id),
        })
    }

    pub fn pending_delete(&self) -> Option<&ConfirmPrompt> {
        self.pending_delete.as_ref()
    }

    /// Raises the delete confirmation. `None` when there is nothing to delete.
    pub fn request_delete(&mut self) -> Option<&ConfirmPrompt> {
        self.note.as_ref()?;
        Some(&*self.pending_delete.insert(ConfirmPrompt {
            title: "Delete Note".to_string(),
            message: "Are you sure you want to delete this note?".to_string(),
            cancel_label: "Cancel".to_string(),
            confirm_label: "Delete".to_string(),
        }))
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Runs the confirmed delete.
    ///
    /// Returns `Ok(None)` when no prompt is pending, `Ok(Some(list route))`
    /// after a successful delete.
    pub fn confirm_delete(&mut self, repo: &impl NoteRepository) -> Result<Option<Route>, Alert> {
        if self.pending_delete.take().is_none() {
            return Ok(None);
        }
        let Some(id) = self.note.as_ref().map(|note| note.id) else {
            return Ok(None);
        };

        match repo.delete_by_id(id) {
            Ok(_) => Ok(Some(Route::NoteList)),
            Err(err) => {
                warn!("event=note_delete module=view status=error note_id={id} error={err}");
                Err(Alert::from_delete_error(&err))
            }
        }
    }

    pub fn back(&self) -> Route {
        Route::NoteList
    }
}
