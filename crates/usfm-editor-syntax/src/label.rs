//! Verse labels: `\v 3`, `\v 5-7` and the chapter-front pseudo verse.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The number (or numbers) a verse marker carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerseLabel {
    /// Content between `\c` and the first `\v` of a chapter.
    Front,
    /// A single verse, `\v 3`.
    Single(u32),
    /// Joined verses, `\v 5-7`. Always `start < end`.
    Range { start: u32, end: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    #[error("verse label is empty")]
    Empty,
    #[error("`{0}` is not a verse number")]
    NotANumber(String),
    #[error("verse range {start}-{end} must be ascending")]
    DescendingRange { start: u32, end: u32 },
}

impl VerseLabel {
    /// Build a label covering `start..=end`, collapsing to `Single` when equal.
    pub fn span(start: u32, end: u32) -> Result<Self, LabelError> {
        match start.cmp(&end) {
            std::cmp::Ordering::Equal => Ok(VerseLabel::Single(start)),
            std::cmp::Ordering::Less => Ok(VerseLabel::Range { start, end }),
            std::cmp::Ordering::Greater => Err(LabelError::DescendingRange { start, end }),
        }
    }

    /// First verse number covered; `0` for the front verse.
    pub fn start(&self) -> u32 {
        match *self {
            VerseLabel::Front => 0,
            VerseLabel::Single(n) => n,
            VerseLabel::Range { start, .. } => start,
        }
    }

    /// Last verse number covered; `0` for the front verse.
    pub fn end(&self) -> u32 {
        match *self {
            VerseLabel::Front => 0,
            VerseLabel::Single(n) => n,
            VerseLabel::Range { end, .. } => end,
        }
    }

    pub fn is_front(&self) -> bool {
        matches!(self, VerseLabel::Front)
    }

    /// Whether verse number `n` falls inside this label.
    pub fn contains(&self, n: u32) -> bool {
        !self.is_front() && self.start() <= n && n <= self.end()
    }

    /// Whether two numbered labels share at least one verse number.
    ///
    /// The front verse never overlaps anything.
    pub fn overlaps(&self, other: &VerseLabel) -> bool {
        if self.is_front() || other.is_front() {
            return false;
        }
        self.start() <= other.end() && other.start() <= self.end()
    }
}

impl FromStr for VerseLabel {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(LabelError::Empty);
        }
        if s.eq_ignore_ascii_case("front") {
            return Ok(VerseLabel::Front);
        }

        let number = |part: &str| {
            part.parse::<u32>()
                .map_err(|_| LabelError::NotANumber(s.to_string()))
        };

        match s.split_once('-') {
            Some((start, end)) => {
                let (start, end) = (number(start)?, number(end)?);
                if start >= end {
                    return Err(LabelError::DescendingRange { start, end });
                }
                Ok(VerseLabel::Range { start, end })
            }
            None => Ok(VerseLabel::Single(number(s)?)),
        }
    }
}

impl fmt::Display for VerseLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerseLabel::Front => f.write_str("front"),
            VerseLabel::Single(n) => write!(f, "{n}"),
            VerseLabel::Range { start, end } => write!(f, "{start}-{end}"),
        }
    }
}
