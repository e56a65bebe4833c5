pub mod path;
pub mod tree;

pub use path::{BlockPath, RunPath, Selection, TextPoint, VersePath};
pub use tree::{
    Block, Book, Chapter, ChapterNumber, InlineContainer, Mark, Marks, NodeKind, ParagraphBlock,
    TextRun, Verse,
};
