//! Structural addresses into a [`Book`](super::Book).
//!
//! Paths are indices, never label strings: two verses that print the same
//! label are still distinct positions.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VersePath {
    pub chapter: usize,
    pub verse: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockPath {
    pub verse: VersePath,
    pub block: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RunPath {
    pub block: BlockPath,
    pub run: usize,
}

/// A byte offset inside a run's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextPoint {
    pub run: RunPath,
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: TextPoint,
    pub focus: TextPoint,
}

impl VersePath {
    pub fn new(chapter: usize, verse: usize) -> Self {
        Self { chapter, verse }
    }

    pub fn block(self, block: usize) -> BlockPath {
        BlockPath { verse: self, block }
    }
}

impl BlockPath {
    pub fn run(self, run: usize) -> RunPath {
        RunPath { block: self, run }
    }
}

impl RunPath {
    pub fn point(self, offset: usize) -> TextPoint {
        TextPoint { run: self, offset }
    }
}

impl Selection {
    pub fn caret(at: TextPoint) -> Self {
        Self {
            anchor: at,
            focus: at,
        }
    }

    /// The selection's endpoints in document order.
    pub fn ordered(&self) -> (TextPoint, TextPoint) {
        if self.anchor <= self.focus {
            (self.anchor, self.focus)
        } else {
            (self.focus, self.anchor)
        }
    }
}
