use thiserror::Error;

use crate::label::LabelError;

/// Malformed marker text. Offsets are byte positions in the source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("end marker `{marker}` at byte {offset} has no open marker to close")]
    UnmatchedEndMarker { marker: String, offset: usize },

    #[error("note `{marker}` opened at byte {offset} is never closed")]
    UnterminatedNote { marker: String, offset: usize },

    #[error("milestone `{marker}` at byte {offset} is missing its `\\*`")]
    UnterminatedMilestone { marker: String, offset: usize },

    #[error("`{marker}` at byte {offset} is missing its number")]
    MissingNumber { marker: String, offset: usize },

    #[error("invalid verse label `{label}` at byte {offset}: {source}")]
    InvalidVerseLabel {
        label: String,
        offset: usize,
        #[source]
        source: LabelError,
    },

    #[error("verse at byte {offset} appears before the first chapter")]
    VerseOutsideChapter { offset: usize },

    #[error("`\\v front` at byte {offset} must be the first verse of its chapter")]
    MisplacedFront { offset: usize },
}

impl ParseError {
    /// Byte offset of the offending token.
    pub fn offset(&self) -> usize {
        match self {
            ParseError::UnmatchedEndMarker { offset, .. }
            | ParseError::UnterminatedNote { offset, .. }
            | ParseError::UnterminatedMilestone { offset, .. }
            | ParseError::MissingNumber { offset, .. }
            | ParseError::InvalidVerseLabel { offset, .. }
            | ParseError::VerseOutsideChapter { offset }
            | ParseError::MisplacedFront { offset } => *offset,
        }
    }
}
