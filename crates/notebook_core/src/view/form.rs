//! Create/edit form screen state.
//!
//! # Invariants
//! - Mode (create vs edit) is decided once in `open` and never changes.
//! - A rejected or failed submit leaves every field as the user left it.
//! - Stored title/content are trimmed copies of the edited text.

use crate::model::note::{validate_fields, Importance, Note, NoteId};
use crate::repo::note_repo::NoteRepository;
use crate::route::Route;
use crate::view::Alert;
use chrono::{DateTime, SubsecRound, Utc};
use log::{info, warn};

const CREATE_HEADING: &str = "Create a new note";
const EDIT_HEADING: &str = "Update Note";
const MISSING_FIELDS_MESSAGE: &str = "Please fill in the title and content.";

/// Editable fields of one note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteFormState {
    editing_id: Option<NoteId>,
    title: String,
    content: String,
    date: DateTime<Utc>,
    importance: Importance,
    date_picker_open: bool,
}

impl NoteFormState {
    /// Opens the form for `editing_id`, reloading the note from `repo`.
    ///
    /// An id that no longer resolves falls back to create mode.
    pub fn open(repo: &impl NoteRepository, editing_id: Option<NoteId>) -> Self {
        let Some(id) = editing_id else {
            return Self::blank(Utc::now());
        };
        match repo.find_by_id(id) {
            Some(note) => Self::edit(note),
            None => {
                warn!("event=form_open module=view status=recovered reason=note_missing note_id={id}");
                Self::blank(Utc::now())
            }
        }
    }

    /// Create mode with empty text, `date` preselected and `Low` importance.
    pub fn blank(date: DateTime<Utc>) -> Self {
        Self {
            editing_id: None,
            title: String::new(),
            content: String::new(),
            date: date.trunc_subsecs(3),
            importance: Importance::default(),
            date_picker_open: false,
        }
    }

    /// Edit mode seeded from an existing note.
    pub fn edit(note: Note) -> Self {
        Self {
            editing_id: Some(note.id),
            title: note.title,
            content: note.content,
            date: note.date,
            importance: note.importance,
            date_picker_open: false,
        }
    }

    pub fn editing_id(&self) -> Option<NoteId> {
        self.editing_id
    }

    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }

    pub fn heading(&self) -> &'static str {
        if self.is_editing() {
            EDIT_HEADING
        } else {
            CREATE_HEADING
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn date_label(&self) -> String {
        self.date.date_naive().format("%Y-%m-%d").to_string()
    }

    pub fn importance(&self) -> Importance {
        self.importance
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn set_importance(&mut self, importance: Importance) {
        self.importance = importance;
    }

    pub fn is_date_picker_open(&self) -> bool {
        self.date_picker_open
    }

    pub fn open_date_picker(&mut self) {
        self.date_picker_open = true;
    }

    /// Applies the picked date and closes the picker.
    pub fn confirm_date(&mut self, date: DateTime<Utc>) {
        self.date = date.trunc_subsecs(3);
        self.date_picker_open = false;
    }

    /// Closes the picker, keeping the previous date.
    pub fn dismiss_date_picker(&mut self) {
        self.date_picker_open = false;
    }

    /// Validates and persists the form.
    ///
    /// Returns the list route on success. Validation failures never reach
    /// the repository.
    /// Validates and stores the note; returns the next route and the saved id.
    pub fn submit(&self, repo: &impl NoteRepository) -> Result<(Route, NoteId), Alert> {
        if let Err(err) = validate_fields(&self.title, &self.content) {
            info!("event=note_submit module=view status=rejected reason=\"{err}\"");
            return Err(Alert::new("Missing fields", MISSING_FIELDS_MESSAGE));
        }

        let id = match self.editing_id {
            Some(id) => id,
            None => repo.next_note_id().map_err(|err| {
                warn!("event=note_submit module=view status=error stage=allocate_id error={err}");
                Alert::from_save_error(&err)
            })?,
        };
        let note = Note::new(id, self.title.trim(), self.content.trim(), self.date)
            .with_importance(self.importance);

        repo.save(&note, self.is_editing()).map_err(|err| {
            warn!("event=note_submit module=view status=error stage=save note_id={id} error={err}");
            Alert::from_save_error(&err)
        })?;
        Ok((Route::NoteList, id))
    }

    /// Leaves the form without saving.
    pub fn back(&self) -> Route {
        Route::NoteList
    }
}
