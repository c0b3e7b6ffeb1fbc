//! Error types.
//!
//! Only corrupt input is fatal. A relation or discourse reference that simply
//! points nowhere is represented in the output (dropped relation, `None`
//! field) and never surfaces here.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or parsing USR text.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A relation entry in the dependency or construction column has no
    /// `target:label` separator.
    #[error("line {line}: relation entry `{entry}` is missing the `:` separator")]
    MalformedRelation { line: usize, entry: String },

    /// A token record appeared before the first `<sent_id=...>` marker.
    #[error("line {line}: token record found before any <sent_id=...> marker")]
    MissingSentence { line: usize },

    /// A line starts like a sentence marker but carries no usable id.
    #[error("line {line}: malformed sentence marker `{text}`")]
    MalformedMarker { line: usize, text: String },

    /// A sentence-id filter named a sentence the input does not contain.
    #[error("sentence id `{id}` not found in the input")]
    SentenceNotFound { id: String },

    #[error("failed to read `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ParseError {
    /// 1-based input line the error points at, when there is one.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::MalformedRelation { line, .. }
            | ParseError::MissingSentence { line }
            | ParseError::MalformedMarker { line, .. } => Some(*line),
            ParseError::SentenceNotFound { .. } | ParseError::Io { .. } => None,
        }
    }
}

pub type Result<T, E = ParseError> = std::result::Result<T, E>;
