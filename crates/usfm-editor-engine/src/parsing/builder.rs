//! # Structural Builder
//!
//! Turns the flat raw tag tree into a [`Book`].
//!
//! Line-level raw nodes arrive as siblings, so the builder keeps a cursor on
//! the block list currently being filled:
//!
//! | Raw node | Effect |
//! |----------|--------|
//! | content before any marker | leading inline container of the headers |
//! | `Paragraph` before `\c` | header paragraph |
//! | `Chapter` | new chapter with a front verse holding the chapter line |
//! | `Verse` | new verse, its leading content in an inline container |
//! | `Paragraph` after `\c` | paragraph appended to the current verse |
//!
//! Character spans are flattened into runs with a stack of open marks.
//! Notes, milestones and self-delimiting markers become literal run text
//! under the marks open around them.
//!
//! The result is passed through the normalizer before it is returned.

use usfm_editor_syntax::{RawNode, Taxonomy, VerseLabel};

use crate::editing::normalize::normalize;
use crate::models::{Block, Book, Chapter, Mark, Marks, TextRun, Verse};

pub fn build(nodes: Vec<RawNode>, taxonomy: &Taxonomy) -> Book {
    let mut builder = Builder::default();
    for node in nodes {
        builder.node(node);
    }
    let mut book = builder.book;
    normalize(&mut book, taxonomy);
    book
}

#[derive(Default)]
struct Builder {
    book: Book,
}

impl Builder {
    fn node(&mut self, node: RawNode) {
        match node {
            RawNode::Chapter { number, children } => self.chapter(number, children),
            RawNode::Verse { label, children } => self.verse(label, children),
            RawNode::Paragraph { marker, children } => {
                let runs = flatten(children);
                self.blocks().push(Block::paragraph(marker, runs));
            }
            inline => {
                let runs = flatten(vec![inline]);
                self.append_inline(runs);
            }
        }
    }

    fn chapter(&mut self, number: String, children: Vec<RawNode>) {
        if self
            .book
            .chapters
            .iter()
            .any(|chapter| chapter.number.text == number)
        {
            log::warn!("duplicate chapter number {number}");
        }

        let mut chapter = Chapter::new(number);
        chapter.verses[0].children = vec![Block::inline(flatten(children))];
        self.book.chapters.push(chapter);
    }

    fn verse(&mut self, label: VerseLabel, children: Vec<RawNode>) {
        let runs = flatten(children);
        let Some(chapter) = self.book.chapters.last_mut() else {
            // The parser rejects this; keep the content rather than lose it.
            log::warn!("verse {label} before the first chapter folded into the headers");
            self.append_inline(runs);
            return;
        };

        if label.is_front() {
            chapter.verses[0].children.push(Block::inline(runs));
            return;
        }

        if chapter.verses.iter().any(|verse| verse.label.overlaps(&label)) {
            log::warn!(
                "verse {label} overlaps an earlier verse in chapter {}",
                chapter.number.text
            );
        }
        chapter.verses.push(Verse {
            label,
            children: vec![Block::inline(runs)],
        });
    }

    /// The block list new line-level content goes into.
    fn blocks(&mut self) -> &mut Vec<Block> {
        match self.book.chapters.last_mut() {
            Some(chapter) => match chapter.verses.last_mut() {
                Some(verse) => &mut verse.children,
                None => &mut self.book.headers,
            },
            None => &mut self.book.headers,
        }
    }

    /// Add runs to the last block of the current list, or start an inline
    /// container for them.
    fn append_inline(&mut self, runs: Vec<TextRun>) {
        let blocks = self.blocks();
        match blocks.last_mut().and_then(Block::runs_mut) {
            Some(existing) => existing.extend(runs),
            None => blocks.push(Block::inline(runs)),
        }
    }
}

/// Flatten nested character spans into runs.
pub fn flatten(nodes: Vec<RawNode>) -> Vec<TextRun> {
    let mut runs = Vec::new();
    let mut stack = Vec::new();
    flatten_into(nodes, &mut stack, &mut runs);
    runs
}

fn flatten_into(nodes: Vec<RawNode>, stack: &mut Vec<Mark>, runs: &mut Vec<TextRun>) {
    for node in nodes {
        match node {
            RawNode::Text(text) => runs.push(run(text, stack)),
            RawNode::Opaque { source, .. } => runs.push(run(source, stack)),
            RawNode::Character {
                marker,
                attributes,
                children,
            } => {
                stack.push(Mark::with_attributes(marker, attributes));
                flatten_into(children, stack, runs);
                stack.pop();
            }
            RawNode::Chapter { children, .. }
            | RawNode::Verse { children, .. }
            | RawNode::Paragraph { children, .. } => flatten_into(children, stack, runs),
        }
    }
}

fn run(text: String, stack: &[Mark]) -> TextRun {
    TextRun::marked(text, stack.iter().cloned().collect::<Marks>())
}
