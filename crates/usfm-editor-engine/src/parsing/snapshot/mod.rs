//! # Snapshot Testing Support
//!
//! [`outline`] renders a [`Book`] as a stable indented text dump for `insta`
//! snapshots and the CLI `tree` command. One node per line, two spaces of
//! indentation per level:
//!
//! ```text
//! Headers
//!   Paragraph id
//!     Run "GEN"
//! Chapter 1
//!   Verse front
//!     Inline
//!   Verse 1
//!     Inline
//!       Run "In "
//!       Run "God" [nd]
//! ```

use usfm_editor_syntax::format_attributes;

use crate::models::{Block, Book, TextRun};

pub fn outline(book: &Book) -> String {
    let mut out = String::new();
    if !book.headers.is_empty() {
        out.push_str("Headers\n");
        for block in &book.headers {
            write_block(&mut out, block, 1);
        }
    }
    for chapter in &book.chapters {
        out.push_str(&format!("Chapter {}\n", chapter.number.text));
        for verse in &chapter.verses {
            out.push_str(&format!("  Verse {}\n", verse.label));
            for block in &verse.children {
                write_block(&mut out, block, 2);
            }
        }
    }
    out
}

fn write_block(out: &mut String, block: &Block, depth: usize) {
    let prefix = "  ".repeat(depth);
    match block {
        Block::Inline(_) => out.push_str(&format!("{prefix}Inline\n")),
        Block::Paragraph(paragraph) => {
            out.push_str(&format!("{prefix}Paragraph {}\n", paragraph.marker))
        }
        Block::Text(run) => {
            write_run(out, run, depth);
            return;
        }
    }
    for run in block.runs() {
        write_run(out, run, depth + 1);
    }
}

fn write_run(out: &mut String, run: &TextRun, depth: usize) {
    let prefix = "  ".repeat(depth);
    out.push_str(&format!("{prefix}Run {:?}", run.text));
    if !run.marks.is_empty() {
        let marks: Vec<String> = run
            .marks
            .iter()
            .map(|mark| format!("{}{}", mark.tag, format_attributes(&mark.attributes)))
            .collect();
        out.push_str(&format!(" [{}]", marks.join(", ")));
    }
    out.push('\n');
}
