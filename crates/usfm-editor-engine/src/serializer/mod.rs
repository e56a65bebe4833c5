//! # Serializer
//!
//! Writes a [`Book`] back to marker text in canonical layout: every `\c`,
//! `\v` and paragraph marker starts a line, and a marker is separated from
//! its content by one space.
//!
//! Each structural node is written with a leading newline. The result then
//! goes through [`normalize_whitespace`], which collapses the doubled
//! newlines this produces and drops the one at the very start.
//!
//! Character styles are written with the mark stack in [`marks`]. Marks never
//! stay open across blocks, matching the parser, which closes open spans at
//! the end of every line-level scope.

pub mod marks;

use std::sync::OnceLock;

use regex::Regex;

use crate::models::{Block, Book, Chapter, Verse};

pub use marks::{close_all, serialize_runs, write_runs};

fn blank_lines_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{2,}").expect("Invalid blank line regex"))
}

/// Serialize a whole book.
pub fn serialize(book: &Book) -> String {
    let mut out = String::new();
    write_blocks(&mut out, &book.headers);
    for chapter in &book.chapters {
        write_chapter(&mut out, chapter);
    }
    normalize_whitespace(&out)
}

/// Collapse every run of newlines to one, then strip one leading newline.
pub fn normalize_whitespace(text: &str) -> String {
    let collapsed = blank_lines_regex().replace_all(text, "\n");
    match collapsed.strip_prefix('\n') {
        Some(rest) => rest.to_string(),
        None => collapsed.into_owned(),
    }
}

fn write_chapter(out: &mut String, chapter: &Chapter) {
    out.push_str("\n\\c ");
    out.push_str(&chapter.number.text);
    for verse in &chapter.verses {
        write_verse(out, verse);
    }
}

fn write_verse(out: &mut String, verse: &Verse) {
    if verse.label.is_front() {
        out.push('\n');
    } else {
        out.push_str(&format!("\n\\v {} ", verse.label));
    }
    write_blocks(out, &verse.children);
}

fn write_blocks(out: &mut String, blocks: &[Block]) {
    for block in blocks {
        if let Block::Paragraph(paragraph) = block {
            out.push_str("\n\\");
            out.push_str(&paragraph.marker);
            let starts_with_break = paragraph
                .children
                .first()
                .is_some_and(|run| run.text.starts_with('\n') || run.text.starts_with("\r\n"));
            if !block.is_empty() && !starts_with_break {
                out.push(' ');
            }
        }
        let mut stack = Vec::new();
        write_runs(out, block.runs(), &mut stack);
        close_all(out, &mut stack);
    }
}
