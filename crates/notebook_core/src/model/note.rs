//! Note record and importance tags.
//!
//! # Responsibility
//! - Define the record stored in the notes collection.
//! - Provide submission-time validation for user-entered text.
//!
//! # Invariants
//! - `id` is assigned once at creation and never changes.
//! - `title` and `content` are non-empty after trimming when submitted.
//! - `date` carries at most millisecond precision, so it survives a storage
//!   round-trip unchanged.

use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable note identifier, an epoch-millisecond value at creation time.
pub type NoteId = i64;

/// Visual importance tag. Carries no behavior beyond display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    High,
    Medium,
    #[default]
    Low,
}

impl Importance {
    /// Picker order, most important first.
    pub const ALL: [Importance; 3] = [Importance::High, Importance::Medium, Importance::Low];

    /// Wire and display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Swatch color used for the card dot and the picker.
    pub fn color_hex(self) -> &'static str {
        match self {
            Self::High => "#F45B69",
            Self::Medium => "#FFD4CA",
            Self::Low => "#7EE4EC",
        }
    }

    /// Parses a label case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

impl Display for Importance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Submission-time validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteValidationError {
    EmptyTitle,
    EmptyContent,
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::EmptyContent => write!(f, "content must not be empty"),
        }
    }
}

impl Error for NoteValidationError {}

/// One user-authored note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    #[serde(with = "crate::model::iso_datetime")]
    pub date: DateTime<Utc>,
    /// Older payloads may omit the tag; those read back as `Low`.
    #[serde(default)]
    pub importance: Importance,
}

impl Note {
    /// Creates a note with `Low` importance.
    ///
    /// The date is truncated to milliseconds to match the stored format.
    pub fn new(
        id: NoteId,
        title: impl Into<String>,
        content: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
            date: date.trunc_subsecs(3),
            importance: Importance::Low,
        }
    }

    pub fn with_importance(mut self, importance: Importance) -> Self {
        self.importance = importance;
        self
    }

    /// Checks the text fields a submission must carry.
    ///
    /// # Errors
    /// - `EmptyTitle` when `title` is blank after trimming (checked first).
    /// - `EmptyContent` when `content` is blank after trimming.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        validate_fields(&self.title, &self.content)
    }

    /// Calendar date shown on cards.
    pub fn calendar_date(&self) -> NaiveDate {
        self.date.date_naive()
    }
}

/// Validates raw form text before a `Note` is built from it.
pub fn validate_fields(title: &str, content: &str) -> Result<(), NoteValidationError> {
    if title.trim().is_empty() {
        return Err(NoteValidationError::EmptyTitle);
    }
    if content.trim().is_empty() {
        return Err(NoteValidationError::EmptyContent);
    }
    Ok(())
}
