//! Typed navigation contract between screens.
//!
//! # Responsibility
//! - Render and decode the location strings the shell navigates with.
//! - Keep untrusted route parameters from reaching view states undecoded.
//!
//! # Invariants
//! - Screens pass note identifiers only; note data is always reloaded.
//! - A malformed `id` parameter decodes as absent, never as an error.

use crate::model::note::NoteId;
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

const LIST_PATH: &str = "/";
const DETAIL_PATH: &str = "/note";
const FORM_PATH: &str = "/form";
const ID_PARAM: &str = "id";

/// Screen destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    NoteList,
    /// `None` renders the not-found state.
    NoteDetail { note_id: Option<NoteId> },
    /// `None` opens the form in create mode.
    NoteForm { editing_id: Option<NoteId> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    UnknownPath(String),
}

impl Display for RouteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownPath(path) => write!(f, "unknown route path `{path}`"),
        }
    }
}

impl Error for RouteError {}

impl Route {
    /// Renders the location string for this route.
    pub fn location(&self) -> String {
        match self {
            Self::NoteList => LIST_PATH.to_string(),
            Self::NoteDetail { note_id } => with_id(DETAIL_PATH, *note_id),
            Self::NoteForm { editing_id } => with_id(FORM_PATH, *editing_id),
        }
    }

    /// Decodes a location string such as `/note?id=1704412800000`.
    ///
    /// # Errors
    /// - `UnknownPath` when the path names no screen.
    pub fn parse(location: &str) -> Result<Self, RouteError> {
        let trimmed = location.trim();
        let (path, query) = match trimmed.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (trimmed, None),
        };
        let path = path.trim_end_matches('/');
        let id = || decode_note_id(query.and_then(|query| query_param(query, ID_PARAM)));

        match path {
            "" => Ok(Self::NoteList),
            DETAIL_PATH => Ok(Self::NoteDetail { note_id: id() }),
            FORM_PATH => Ok(Self::NoteForm { editing_id: id() }),
            other => Err(RouteError::UnknownPath(other.to_string())),
        }
    }
}

fn with_id(path: &str, id: Option<NoteId>) -> String {
    match id {
        Some(id) => format!("{path}?{ID_PARAM}={id}"),
        None => path.to_string(),
    }
}

fn query_param<'a>(query: &'a str, name: &str) -> Option<&'a str> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// Decodes a raw `id` parameter; malformed values are logged and dropped.
pub fn decode_note_id(raw: Option<&str>) -> Option<NoteId> {
    let raw = raw?;
    match raw.trim().parse::<NoteId>() {
        Ok(id) => Some(id),
        Err(err) => {
            warn!(
                "event=route_decode module=route status=recovered param={ID_PARAM} bytes={} error={err}",
                raw.len()
            );
            None
        }
    }
}
