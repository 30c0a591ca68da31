//! Terminal front-end for MyNoteBook.
//!
//! # Responsibility
//! - Drive the list/detail/form states against a file-backed store.
//! - Double as a smoke probe for `notebook_core` linkage (`ping`).

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use notebook_core::db::open_db;
use notebook_core::model::iso_datetime;
use notebook_core::{
    init_logging, Alert, Importance, KvNoteRepository, NoteCard, NoteDetailState, NoteFormState,
    NoteId, NoteListState, NoteRepository, SqliteKeyValueStore,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "notebook", version, about = "Local notes with an importance tag and a date")]
struct Cli {
    /// SQLite file holding the notes.
    #[arg(long, env = "MYNOTEBOOK_DB_PATH", default_value = "mynotebook.sqlite3")]
    db: PathBuf,

    /// Directory for rolling log files; logging stays off when omitted.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[arg(long, default_value_t = notebook_core::default_log_level().to_string())]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all notes in stored order.
    List,
    /// Show one note.
    Show { id: NoteId },
    /// Create a note.
    New(NewArgs),
    /// Change fields of an existing note.
    Edit {
        id: NoteId,
        #[command(flatten)]
        fields: EditArgs,
    },
    /// Delete a note; asks for `--yes` as confirmation.
    Delete {
        id: NoteId,
        #[arg(long)]
        yes: bool,
    },
    /// Print core linkage info.
    Ping,
}

#[derive(Args, Debug)]
struct NewArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    content: String,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp; defaults to now.
    #[arg(long, value_parser = parse_date)]
    date: Option<DateTime<Utc>>,
    #[arg(long, value_enum, default_value_t = ImportanceArg::Low)]
    importance: ImportanceArg,
}

#[derive(Args, Debug)]
struct EditArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    content: Option<String>,
    #[arg(long, value_parser = parse_date)]
    date: Option<DateTime<Utc>>,
    #[arg(long, value_enum)]
    importance: Option<ImportanceArg>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ImportanceArg {
    High,
    Medium,
    Low,
}

impl From<ImportanceArg> for Importance {
    fn from(value: ImportanceArg) -> Self {
        match value {
            ImportanceArg::High => Importance::High,
            ImportanceArg::Medium => Importance::Medium,
            ImportanceArg::Low => Importance::Low,
        }
    }
}

fn parse_date(value: &str) -> Result<DateTime<Utc>, String> {
    iso_datetime::parse(value).ok_or_else(|| format!("`{value}` is not a date (use YYYY-MM-DD)"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(Outcome::Done) => ExitCode::SUCCESS,
        Ok(Outcome::Alert(alert)) => {
            eprintln!("{}: {}", alert.title, alert.message);
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

enum Outcome {
    Done,
    Alert(Alert),
}

fn run(cli: Cli) -> Result<Outcome, Box<dyn Error>> {
    if let Some(log_dir) = &cli.log_dir {
        let log_dir = std::path::absolute(log_dir)?;
        init_logging(&cli.log_level, &log_dir.to_string_lossy())?;
    }

    if let Command::Ping = cli.command {
        println!("notebook_core ping={}", notebook_core::ping());
        println!("notebook_core version={}", notebook_core::core_version());
        return Ok(Outcome::Done);
    }

    let conn = open_db(&cli.db)?;
    let repo = KvNoteRepository::new(SqliteKeyValueStore::try_new(&conn)?);
    info!("event=cli_command module=cli status=start command={:?}", cli.command);

    let outcome = match cli.command {
        Command::List => list(&repo),
        Command::Show { id } => show(&repo, id),
        Command::New(args) => create(&repo, args),
        Command::Edit { id, fields } => edit(&repo, id, fields),
        Command::Delete { id, yes } => delete(&repo, id, yes),
        Command::Ping => Outcome::Done,
    };
    Ok(outcome)
}

fn list(repo: &impl NoteRepository) -> Outcome {
    let mut state = NoteListState::new();
    state.on_focus(repo);
    println!("{}", state.title());
    if state.is_empty() {
        println!("{}", state.empty_message());
    }
    for card in state.cards() {
        println!(
            "{:>15}  [{:<6}] {}  {}",
            card.id,
            card.importance.label(),
            card.date_label,
            card.title
        );
    }
    Outcome::Done
}

fn show(repo: &impl NoteRepository, id: NoteId) -> Outcome {
    let state = NoteDetailState::open(repo, Some(id));
    match state.card() {
        Some(card) => {
            print_card(&card);
            Outcome::Done
        }
        None => Outcome::Alert(Alert::new("Not found", state.not_found_message())),
    }
}

fn create(repo: &impl NoteRepository, args: NewArgs) -> Outcome {
    let mut form = NoteFormState::open(repo, None);
    form.set_title(args.title);
    form.set_content(args.content);
    if let Some(date) = args.date {
        form.open_date_picker();
        form.confirm_date(date);
    }
    form.set_importance(args.importance.into());
    submit(repo, &form)
}

fn edit(repo: &impl NoteRepository, id: NoteId, fields: EditArgs) -> Outcome {
    let mut form = NoteFormState::open(repo, Some(id));
    if form.editing_id() != Some(id) {
        return Outcome::Alert(Alert::new("Not found", "Note not found"));
    }
    if let Some(title) = fields.title {
        form.set_title(title);
    }
    if let Some(content) = fields.content {
        form.set_content(content);
    }
    if let Some(date) = fields.date {
        form.open_date_picker();
        form.confirm_date(date);
    }
    if let Some(importance) = fields.importance {
        form.set_importance(importance.into());
    }
    submit(repo, &form)
}

fn submit(repo: &impl NoteRepository, form: &NoteFormState) -> Outcome {
    match form.submit(repo) {
        Ok((_, id)) => {
            println!("saved note {id}");
            list(repo)
        }
        Err(alert) => Outcome::Alert(alert),
    }
}

fn delete(repo: &impl NoteRepository, id: NoteId, confirmed: bool) -> Outcome {
    let mut state = NoteDetailState::open(repo, Some(id));
    let Some(prompt) = state.request_delete().cloned() else {
        return Outcome::Alert(Alert::new("Not found", state.not_found_message()));
    };

    if !confirmed {
        println!("{}: {}", prompt.title, prompt.message);
        println!("Re-run with --yes to {}.", prompt.confirm_label.to_lowercase());
        state.cancel_delete();
        return Outcome::Done;
    }

    match state.confirm_delete(repo) {
        Ok(_) => list(repo),
        Err(alert) => Outcome::Alert(alert),
    }
}

fn print_card(card: &NoteCard) {
    println!("{}", card.title);
    println!("{}", card.content);
    println!("{}  importance={} ({})", card.date_label, card.importance, card.color_hex);
}
