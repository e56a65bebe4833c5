use std::sync::{Arc, OnceLock};

use usfm_editor_syntax::Taxonomy;

use crate::editing::commands::apply_command;
use crate::editing::invariants::{self, Violation};
use crate::editing::normalize::normalize;
use crate::editing::{Cmd, Patch};
use crate::error::EditError;
use crate::models::Book;
use crate::parsing::parse_with;
use crate::serializer::serialize;

/// An editing session over one book.
///
/// The document owns its tree and shares a read-only [`Taxonomy`]. All
/// mutation goes through [`Document::apply`], which validates the command,
/// applies it and normalizes the result. A rejected command leaves the tree
/// and version untouched.
///
/// ```rust
/// # use usfm_editor_engine::editing::{Cmd, Document};
/// # use usfm_editor_engine::models::VersePath;
/// let mut doc = Document::parse("\\c 1\n\\v 1 a\n\\v 2 b").unwrap();
///
/// doc.apply(Cmd::JoinWithPreviousVerse { at: VersePath::new(0, 2) }).unwrap();
///
/// assert_eq!(doc.text(), "\\c 1\n\\v 1-2 ab");
/// assert_eq!(doc.version(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) book: Book,
    pub(crate) taxonomy: Arc<Taxonomy>,
    /// Incremented on each successful command
    pub(crate) version: u64,
}

fn standard_taxonomy() -> Arc<Taxonomy> {
    static STANDARD: OnceLock<Arc<Taxonomy>> = OnceLock::new();
    STANDARD
        .get_or_init(|| Arc::new(Taxonomy::standard().clone()))
        .clone()
}

impl Document {
    /// Parse marker text with the bundled stylesheet.
    pub fn parse(text: &str) -> Result<Self, EditError> {
        Self::parse_with_taxonomy(text, standard_taxonomy())
    }

    pub fn parse_with_taxonomy(text: &str, taxonomy: Arc<Taxonomy>) -> Result<Self, EditError> {
        let book = parse_with(text, &taxonomy)?;
        Ok(Self {
            book,
            taxonomy,
            version: 0,
        })
    }

    /// Create a new document from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::parse(text)?)
    }

    /// Serialize the current tree
    pub fn text(&self) -> String {
        serialize(&self.book)
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Get the current version
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn apply(&mut self, cmd: Cmd) -> Result<Patch, EditError> {
        let chapter = cmd.chapter();
        apply_command(&mut self.book, &self.taxonomy, cmd)?;
        normalize(&mut self.book, &self.taxonomy);
        self.version += 1;
        Ok(Patch {
            changed_chapters: vec![chapter],
            version: self.version,
        })
    }

    /// Invariant violations in the current tree. Only duplicate numbers
    /// carried over from the parsed text can show up here.
    pub fn check(&self) -> Vec<Violation> {
        invariants::check(&self.book, &self.taxonomy)
    }
}
