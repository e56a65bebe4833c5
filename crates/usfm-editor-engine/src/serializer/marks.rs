//! # Mark Stack
//!
//! Runs carry flat mark sets; the marker text needs properly nested
//! open/close pairs. The stack holds the marks currently open, outermost
//! first. For every run:
//!
//! 1. Pop until the stack is a prefix of the run's marks. Each pop writes the
//!    mark's attributes and its end marker, with `+` when something is still
//!    open beneath it.
//! 2. Push the run's remaining marks in order, with `+` when the stack was
//!    already non-empty.
//! 3. Write the run text.
//!
//! ```text
//! runs:   "a" {wj}    "b" {wj,nd}    "c" {}
//! stack:  [wj]        [wj,nd]        []
//! out:    \wj a       \+nd b         \+nd*\wj*c
//! ```
//!
//! The stack is passed in by the caller so serialization needs no hidden
//! state and can be resumed across run sequences.

use usfm_editor_syntax::format_attributes;

use crate::models::{Mark, TextRun};

/// Write `runs` to `out`, leaving marks still open on `stack`.
pub fn write_runs(out: &mut String, runs: &[TextRun], stack: &mut Vec<Mark>) {
    for run in runs {
        let marks = run.marks.as_slice();
        while !marks.starts_with(stack.as_slice()) {
            close_one(out, stack);
        }
        for mark in &marks[stack.len()..] {
            open(out, mark, !stack.is_empty());
            stack.push(mark.clone());
        }
        out.push_str(&run.text);
    }
}

/// Close every mark on `stack`, innermost first.
pub fn close_all(out: &mut String, stack: &mut Vec<Mark>) {
    while !stack.is_empty() {
        close_one(out, stack);
    }
}

/// Serialize a run sequence on its own, closing everything it opens.
pub fn serialize_runs(runs: &[TextRun]) -> String {
    let mut out = String::new();
    let mut stack = Vec::new();
    write_runs(&mut out, runs, &mut stack);
    close_all(&mut out, &mut stack);
    out
}

fn open(out: &mut String, mark: &Mark, nested: bool) {
    out.push('\\');
    if nested {
        out.push('+');
    }
    out.push_str(&mark.tag);
    out.push(' ');
}

fn close_one(out: &mut String, stack: &mut Vec<Mark>) {
    let Some(mark) = stack.pop() else {
        return;
    };
    out.push_str(&format_attributes(&mark.attributes));
    out.push('\\');
    if !stack.is_empty() {
        out.push('+');
    }
    out.push_str(&mark.tag);
    out.push('*');
}
