//! FFI use-case API for the Flutter shell.
//!
//! # Responsibility
//! - Expose list/detail/form/delete use-cases to Dart via FRB.
//! - Resolve the on-device storage file once per process.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Storage-touching functions are async on the Dart side (no `frb(sync)`).
//! - Failures come back as display-ready messages, never as error codes.

use log::error;
use notebook_core::db::open_db;
use notebook_core::model::iso_datetime;
use notebook_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Importance, KvNoteRepository, Note, NoteCard, NoteDetailState, NoteFormState, NoteListState,
    Route, SqliteKeyValueStore,
};
use std::path::PathBuf;
use std::sync::OnceLock;

const STORAGE_FILE_NAME: &str = "mynotebook.sqlite3";
const STORAGE_PATH_ENV: &str = "MYNOTEBOOK_DB_PATH";
static STORAGE_PATH: OnceLock<PathBuf> = OnceLock::new();

type SqliteNoteRepository<'conn> = KvNoteRepository<SqliteKeyValueStore<'conn>>;

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Idempotent for the same `level + log_dir`; conflicting calls return an error.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Points note storage at `db_path` (usually the app documents directory).
///
/// # FFI contract
/// - Sync call; must run before the first storage-touching call.
/// - Repeating the same path is accepted; a different path is rejected.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_storage(db_path: String) -> String {
    let trimmed = db_path.trim();
    if trimmed.is_empty() {
        return "db_path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = STORAGE_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "storage already configured at `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// One note as rendered on a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteItem {
    pub note_id: i64,
    pub title: String,
    pub content: String,
    /// Stored ISO-8601 timestamp, for seeding the date picker.
    pub date_iso: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date_label: String,
    /// `high|medium|low`.
    pub importance: String,
    pub color_hex: String,
}

/// Home screen payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteListView {
    pub title: String,
    pub empty_message: String,
    pub items: Vec<NoteItem>,
    /// Non-empty when storage could not be opened.
    pub message: String,
}

/// Detail screen payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDetailView {
    pub found: bool,
    pub item: Option<NoteItem>,
    /// Location of the edit form when `found`.
    pub edit_location: Option<String>,
    pub message: String,
}

/// Form screen payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteFormView {
    pub heading: String,
    pub editing_id: Option<i64>,
    pub title: String,
    pub content: String,
    pub date_iso: String,
    pub importance: String,
    pub message: String,
}

/// Outcome of a save or delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Location to navigate to on success.
    pub route: Option<String>,
    pub note_id: Option<i64>,
    /// Alert title on failure, empty on success.
    pub alert_title: String,
    pub message: String,
}

impl ActionResponse {
    fn success(route: Route, note_id: Option<i64>, message: impl Into<String>) -> Self {
        Self {
            ok: true,
            route: Some(route.location()),
            note_id,
            alert_title: String::new(),
            message: message.into(),
        }
    }

    fn failure(alert_title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            route: None,
            note_id: None,
            alert_title: alert_title.into(),
            message: message.into(),
        }
    }
}

/// Loads the home screen.
///
/// # FFI contract
/// - Async on the Dart side, DB-backed execution.
/// - Never panics; storage failures yield an empty list plus `message`.
pub fn notes_list() -> NoteListView {
    let mut state = NoteListState::new();
    let message = match with_note_repository(|repo| state.on_focus(repo)) {
        Ok(()) => String::new(),
        Err(err) => err,
    };
    NoteListView {
        title: state.title().to_string(),
        empty_message: state.empty_message().to_string(),
        items: state.notes().iter().map(to_note_item).collect(),
        message,
    }
}

/// Loads the detail screen for a `/note?id=...` location.
///
/// # FFI contract
/// - Async on the Dart side, DB-backed execution.
/// - Malformed locations render the not-found state.
pub fn note_detail(location: String) -> NoteDetailView {
    let note_id = match Route::parse(&location) {
        Ok(Route::NoteDetail { note_id }) => note_id,
        _ => None,
    };
    let state = match with_note_repository(|repo| NoteDetailState::open(repo, note_id)) {
        Ok(state) => state,
        Err(err) => {
            return NoteDetailView {
                found: false,
                item: None,
                edit_location: None,
                message: err,
            };
        }
    };

    NoteDetailView {
        found: state.is_found(),
        item: state.note().map(to_note_item),
        edit_location: state.edit().map(|route| route.location()),
        message: if state.is_found() {
            String::new()
        } else {
            state.not_found_message().to_string()
        },
    }
}

/// Seeds the form for a `/form` or `/form?id=...` location.
///
/// # FFI contract
/// - Async on the Dart side, DB-backed execution.
/// - Unknown ids and malformed locations open the form in create mode.
pub fn note_form_open(location: String) -> NoteFormView {
    let editing_id = match Route::parse(&location) {
        Ok(Route::NoteForm { editing_id }) => editing_id,
        _ => None,
    };
    let (state, message) =
        match with_note_repository(|repo| NoteFormState::open(repo, editing_id)) {
            Ok(state) => (state, String::new()),
            Err(err) => (NoteFormState::blank(chrono::Utc::now()), err),
        };

    NoteFormView {
        heading: state.heading().to_string(),
        editing_id: state.editing_id(),
        title: state.title().to_string(),
        content: state.content().to_string(),
        date_iso: iso_datetime::format(&state.date()),
        importance: state.importance().label().to_string(),
        message,
    }
}

/// Validates and saves the form fields.
///
/// # FFI contract
/// - Async on the Dart side, DB-backed execution.
/// - `editing_id = None` creates; `Some(id)` replaces that note in place.
/// - Never panics; returns the list location on success.
pub fn note_form_submit(
    editing_id: Option<i64>,
    title: String,
    content: String,
    date_iso: String,
    importance: String,
) -> ActionResponse {
    let Some(date) = iso_datetime::parse(&date_iso) else {
        return ActionResponse::failure("Invalid date", "Please pick a valid date.");
    };
    let Some(importance) = Importance::parse(&importance) else {
        return ActionResponse::failure("Invalid importance", "Please pick an importance level.");
    };

    let outcome = with_note_repository(|repo| {
        let mut form = NoteFormState::open(repo, editing_id);
        if form.editing_id() != editing_id {
            return ActionResponse::failure("Save failed", "This note no longer exists.");
        }
        form.set_title(title);
        form.set_content(content);
        form.confirm_date(date);
        form.set_importance(importance);
        match form.submit(repo) {
            Ok((route, saved_id)) => ActionResponse::success(route, Some(saved_id), "Note saved."),
            Err(alert) => ActionResponse::failure(alert.title, alert.message),
        }
    });
    outcome.unwrap_or_else(|err| ActionResponse::failure("Save failed", err))
}

/// Deletes a note the user already confirmed on the Dart side.
///
/// # FFI contract
/// - Async on the Dart side, DB-backed execution.
/// - Never panics; unknown ids report "Note not found".
pub fn note_delete(note_id: i64) -> ActionResponse {
    let outcome = with_note_repository(|repo| {
        let mut detail = NoteDetailState::open(repo, Some(note_id));
        if detail.request_delete().is_none() {
            return ActionResponse::failure("Delete failed", detail.not_found_message());
        }
        match detail.confirm_delete(repo) {
            Ok(Some(route)) => ActionResponse::success(route, Some(note_id), "Note deleted."),
            Ok(None) => ActionResponse::failure("Delete failed", detail.not_found_message()),
            Err(alert) => ActionResponse::failure(alert.title, alert.message),
        }
    });
    outcome.unwrap_or_else(|err| ActionResponse::failure("Delete failed", err))
}

fn resolve_storage_path() -> PathBuf {
    STORAGE_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(STORAGE_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(STORAGE_FILE_NAME)
        })
        .clone()
}

fn with_note_repository<T>(f: impl FnOnce(&SqliteNoteRepository<'_>) -> T) -> Result<T, String> {
    let conn = open_db(resolve_storage_path()).map_err(|err| {
        error!("event=ffi_storage module=ffi status=error error_code=storage_open_failed error={err}");
        format!("note storage open failed: {err}")
    })?;
    let store = SqliteKeyValueStore::try_new(&conn).map_err(|err| {
        error!("event=ffi_storage module=ffi status=error error_code=storage_init_failed error={err}");
        format!("note storage init failed: {err}")
    })?;
    let repo = KvNoteRepository::new(store);
    Ok(f(&repo))
}

fn to_note_item(note: &Note) -> NoteItem {
    let card = NoteCard::from(note);
    NoteItem {
        note_id: card.id,
        title: card.title,
        content: card.content,
        date_iso: iso_datetime::format(&note.date),
        date_label: card.date_label,
        importance: card.importance.label().to_string(),
        color_hex: card.color_hex.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        configure_storage, core_version, init_logging, note_delete, note_detail, note_form_open,
        note_form_submit, notes_list, ping,
    };
    use std::sync::{Mutex, MutexGuard};

    static STORAGE_LOCK: Mutex<()> = Mutex::new(());

    /// Serializes tests sharing the process-wide storage file and routes
    /// them to a temp file.
    fn storage() -> MutexGuard<'static, ()> {
        let guard = STORAGE_LOCK
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let path = std::env::temp_dir().join(format!(
            "mynotebook-ffi-test-{}.sqlite3",
            std::process::id()
        ));
        let error = configure_storage(path.to_string_lossy().into_owned());
        assert!(error.is_empty(), "{error}");
        guard
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "/tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn configure_storage_rejects_switching_paths() {
        let _guard = storage();
        let error = configure_storage("/somewhere/else.sqlite3".to_string());
        assert!(error.contains("refusing to switch"));
        assert!(!configure_storage("  ".to_string()).is_empty());
    }

    #[test]
    fn create_edit_delete_round_trip_through_ffi() {
        let _guard = storage();

        let form = note_form_open("/form".to_string());
        assert_eq!(form.heading, "Create a new note");
        assert_eq!(form.editing_id, None);
        assert_eq!(form.importance, "low");

        let created = note_form_submit(
            None,
            "Groceries".to_string(),
            "Milk, eggs".to_string(),
            "2024-01-05T00:00:00.000Z".to_string(),
            "medium".to_string(),
        );
        assert!(created.ok, "{}", created.message);
        assert_eq!(created.route.as_deref(), Some("/"));
        let note_id = created.note_id.expect("created note should report its id");

        let listed = notes_list();
        let item = listed
            .items
            .iter()
            .find(|item| item.note_id == note_id)
            .expect("created note should be listed");
        assert_eq!(item.importance, "medium");
        assert_eq!(item.date_label, "2024-01-05");

        let detail = note_detail(format!("/note?id={note_id}"));
        assert!(detail.found);
        let edit_location = detail.edit_location.expect("found note should be editable");

        let form = note_form_open(edit_location);
        assert_eq!(form.heading, "Update Note");
        assert_eq!(form.editing_id, Some(note_id));

        let updated = note_form_submit(
            form.editing_id,
            form.title,
            "Milk, eggs, bread".to_string(),
            form.date_iso,
            form.importance,
        );
        assert!(updated.ok, "{}", updated.message);
        assert_eq!(updated.note_id, Some(note_id));
        let detail = note_detail(format!("/note?id={note_id}"));
        assert_eq!(
            detail.item.map(|item| item.content).as_deref(),
            Some("Milk, eggs, bread")
        );

        let deleted = note_delete(note_id);
        assert!(deleted.ok, "{}", deleted.message);
        assert!(!note_detail(format!("/note?id={note_id}")).found);
        assert!(!note_delete(note_id).ok);
    }

    #[test]
    fn submit_rejects_blank_fields_and_bad_inputs() {
        let _guard = storage();

        let blank = note_form_submit(
            None,
            " ".to_string(),
            "body".to_string(),
            "2024-01-05".to_string(),
            "low".to_string(),
        );
        assert!(!blank.ok);
        assert_eq!(blank.message, "Please fill in the title and content.");

        let bad_date = note_form_submit(
            None,
            "t".to_string(),
            "c".to_string(),
            "soon".to_string(),
            "low".to_string(),
        );
        assert!(!bad_date.ok);

        let stale_edit = note_form_submit(
            Some(1),
            "t".to_string(),
            "c".to_string(),
            "2024-01-05".to_string(),
            "low".to_string(),
        );
        assert!(!stale_edit.ok);
        assert_eq!(stale_edit.message, "This note no longer exists.");
    }

    #[test]
    fn malformed_detail_location_renders_not_found() {
        let _guard = storage();
        let detail = note_detail("/note?id=%7Bbroken".to_string());
        assert!(!detail.found);
        assert_eq!(detail.message, "Note not found");
        assert_eq!(detail.edit_location, None);
    }
}
