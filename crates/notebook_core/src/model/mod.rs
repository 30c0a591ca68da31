//! Note domain model.
//!
//! # Responsibility
//! - Define the single persisted entity (`Note`) and its display tags.
//! - Own the wire shape of the stored collection.
//!
//! # Invariants
//! - Every note is identified by a stable, never reused `NoteId`.
//! - Dates travel as ISO-8601 strings with millisecond precision.

pub mod iso_datetime;
pub mod note;
