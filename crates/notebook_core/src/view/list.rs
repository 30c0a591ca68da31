//! Note list screen state.

use crate::model::note::{Note, NoteId};
use crate::repo::note_repo::NoteRepository;
use crate::route::Route;
use crate::view::NoteCard;
use log::debug;

const SCREEN_TITLE: &str = "MyNoteBook";
const EMPTY_MESSAGE: &str = "No notes were created.";

/// Collection shown on the home screen, refreshed on every focus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteListState {
    notes: Vec<Note>,
}

impl NoteListState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the held collection with a fresh load.
    pub fn on_focus(&mut self, repo: &impl NoteRepository) {
        self.notes = repo.load_all();
        debug!(
            "event=list_focus module=view status=ok count={}",
            self.notes.len()
        );
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Cards in stored order.
    pub fn cards(&self) -> Vec<NoteCard> {
        self.notes.iter().map(NoteCard::from).collect()
    }

    pub fn title(&self) -> &'static str {
        SCREEN_TITLE
    }

    pub fn empty_message(&self) -> &'static str {
        EMPTY_MESSAGE
    }

    /// Route to the detail screen for a note currently on the list.
    pub fn open_note(&self, id: NoteId) -> Option<Route> {
        self.notes
            .iter()
            .any(|note| note.id == id)
            .then_some(Route::NoteDetail { note_id: Some(id) })
    }

    /// Route to an empty form.
    pub fn create_note(&self) -> Route {
        Route::NoteForm { editing_id: None }
    }
}
