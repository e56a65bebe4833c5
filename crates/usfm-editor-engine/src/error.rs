use thiserror::Error;
use usfm_editor_syntax::{ParseError, VerseLabel};

/// Why a verse transform refused to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransformPrecondition {
    #[error("there is no numbered verse before this one")]
    NoPreviousVerse,
    #[error("the front verse cannot be transformed")]
    FrontVerse,
    #[error("verse is not a range")]
    NotARange,
    #[error("only the last verse of a chapter can be followed by a new verse")]
    NotLastVerse,
    #[error("previous verse does not precede this one")]
    NotAscending,
    #[error("verse number would overflow")]
    NumberOverflow,
    #[error("range spans more than {} verses", crate::editing::transforms::MAX_UNJOINED)]
    RangeTooLong,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error(transparent)]
    Malformed(#[from] ParseError),

    #[error("{0} already exists")]
    DuplicateNumber(DuplicateNumber),

    #[error("transform rejected: {0}")]
    InvalidTransformPrecondition(#[from] TransformPrecondition),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("offset {offset} is not a character boundary in text of {len} bytes")]
    InvalidOffset { offset: usize, len: usize },

    #[error("invalid marker: {0}")]
    InvalidMarker(String),

    #[error("invalid chapter number `{0}`")]
    InvalidNumber(String),

    #[error("invalid text: {0}")]
    InvalidText(String),
}

/// The number an edit would have duplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuplicateNumber {
    Chapter(String),
    Verse { chapter: String, label: VerseLabel },
}

impl std::fmt::Display for DuplicateNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DuplicateNumber::Chapter(number) => write!(f, "chapter {number}"),
            DuplicateNumber::Verse { chapter, label } => write!(f, "verse {chapter}:{label}"),
        }
    }
}

impl EditError {
    pub(crate) fn path(what: impl std::fmt::Display) -> Self {
        EditError::InvalidPath(what.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = EditError::DuplicateNumber(DuplicateNumber::Verse {
            chapter: "3".into(),
            label: VerseLabel::Range { start: 4, end: 5 },
        });
        assert_eq!(err.to_string(), "verse 3:4-5 already exists");

        let err = EditError::from(TransformPrecondition::NotARange);
        assert_eq!(err.to_string(), "transform rejected: verse is not a range");
    }
}
