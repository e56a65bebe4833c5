//! Structural checks over a normalized [`Book`].
//!
//! Used by the normalizer's debug assertion, the property tests and the CLI
//! `check` command. Returns every violation rather than stopping at the
//! first.

use std::collections::HashSet;
use std::fmt;

use usfm_editor_syntax::{StyleType, Taxonomy, format_attributes, parse_attributes};

use crate::models::{Block, Book, Chapter, Mark, TextRun};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Invariant {
    /// A block list starts with exactly one wrapper and holds no bare runs.
    LeadingBlock,
    /// No empty runs, no neighbours with identical marks.
    RunsMerged,
    /// Inline containers only lead a block list.
    InlineReconciled,
    /// Chapter numbers and verse labels are unique.
    UniqueNumbers,
    /// Marks name character styles only, at most once per run.
    MarksWellFormed,
    /// Each chapter starts with its only front verse.
    FrontVerse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub invariant: Invariant,
    pub location: String,
    pub detail: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} at {}: {}", self.invariant, self.location, self.detail)
    }
}

pub fn check(book: &Book, taxonomy: &Taxonomy) -> Vec<Violation> {
    let mut checker = Checker {
        taxonomy,
        violations: Vec::new(),
    };

    checker.blocks("headers", &book.headers, false);

    let mut numbers = HashSet::new();
    for chapter in &book.chapters {
        if !numbers.insert(chapter.number.text.as_str()) {
            checker.report(
                Invariant::UniqueNumbers,
                format!("chapter {}", chapter.number.text),
                "duplicate chapter number",
            );
        }
        checker.chapter(chapter);
    }
    checker.violations
}

struct Checker<'a> {
    taxonomy: &'a Taxonomy,
    violations: Vec<Violation>,
}

impl Checker<'_> {
    fn report(&mut self, invariant: Invariant, location: String, detail: impl Into<String>) {
        self.violations.push(Violation {
            invariant,
            location,
            detail: detail.into(),
        });
    }

    fn chapter(&mut self, chapter: &Chapter) {
        let number = &chapter.number.text;
        match chapter.verses.first() {
            Some(first) if first.label.is_front() => {}
            _ => self.report(
                Invariant::FrontVerse,
                format!("chapter {number}"),
                "first verse is not the front verse",
            ),
        }

        for (index, verse) in chapter.verses.iter().enumerate() {
            let location = format!("chapter {number}, verse {}", verse.label);
            if index > 0 && verse.label.is_front() {
                self.report(
                    Invariant::FrontVerse,
                    location.clone(),
                    "front verse after the start of the chapter",
                );
            }
            self.blocks(&location, &verse.children, true);
        }

        let mut labels: Vec<_> = chapter
            .verses
            .iter()
            .map(|verse| verse.label)
            .filter(|label| !label.is_front())
            .collect();
        labels.sort_by_key(|label| (label.start(), label.end()));
        for pair in labels.windows(2) {
            if pair[0].overlaps(&pair[1]) {
                self.report(
                    Invariant::UniqueNumbers,
                    format!("chapter {number}, verse {}", pair[1]),
                    format!("overlaps verse {}", pair[0]),
                );
            }
        }
    }

    fn blocks(&mut self, location: &str, blocks: &[Block], is_verse: bool) {
        match blocks.first() {
            None if is_verse => self.report(
                Invariant::LeadingBlock,
                location.to_string(),
                "verse has no blocks",
            ),
            Some(Block::Text(_)) => self.report(
                Invariant::LeadingBlock,
                location.to_string(),
                "starts with a bare run",
            ),
            Some(first) if first.is_inline() && first.runs().is_empty() && blocks.len() > 1 => {
                self.report(
                    Invariant::LeadingBlock,
                    location.to_string(),
                    "empty leading inline container before another block",
                )
            }
            _ => {}
        }

        for (index, block) in blocks.iter().enumerate() {
            let at = format!("{location}, block {index}");
            let invariant = match block {
                Block::Text(_) => Some(Invariant::LeadingBlock),
                Block::Inline(_) => Some(Invariant::InlineReconciled),
                Block::Paragraph(_) => None,
            };
            if let Some(invariant) = invariant.filter(|_| index > 0) {
                self.report(
                    invariant,
                    at.clone(),
                    format!("{:?} after the first block", block.kind()),
                );
            }
            self.runs(&at, block.runs());
        }
    }

    fn runs(&mut self, location: &str, runs: &[TextRun]) {
        for (index, run) in runs.iter().enumerate() {
            if run.text.is_empty() {
                self.report(
                    Invariant::RunsMerged,
                    format!("{location}, run {index}"),
                    "empty run",
                );
            }
            if index > 0 && runs[index - 1].marks == run.marks {
                self.report(
                    Invariant::RunsMerged,
                    format!("{location}, run {index}"),
                    "same marks as the previous run",
                );
            }

            let mut tags = HashSet::new();
            for mark in &run.marks {
                if !tags.insert(mark.tag.as_str()) {
                    self.report(
                        Invariant::MarksWellFormed,
                        format!("{location}, run {index}"),
                        format!("mark {} applied twice", mark.tag),
                    );
                }
                if let Some(problem) = mark_problem(mark, self.taxonomy) {
                    self.report(
                        Invariant::MarksWellFormed,
                        format!("{location}, run {index}"),
                        problem,
                    );
                }
            }
        }
    }
}

/// Why `mark` cannot be written as a character span, if it can't.
pub fn mark_problem(mark: &Mark, taxonomy: &Taxonomy) -> Option<String> {
    let tag = mark.tag.as_str();
    if !is_marker_name(tag) {
        return Some(format!("`{tag}` is not a marker name"));
    }

    if !attributes_survive(mark) {
        return Some(format!("attributes of `{tag}` cannot be written back"));
    }

    let Some(def) = taxonomy.get(tag) else {
        // Unknown spans are read back without attributes
        return (!mark.attributes.is_empty())
            .then(|| format!("unknown marker `{tag}` takes no attributes"));
    };
    if def.is_verse() || def.style_type != StyleType::Character || def.is_self_closing() {
        return Some(format!("`{tag}` is not a character style"));
    }
    if !mark.attributes.is_empty() && !def.accepts_attributes() {
        return Some(format!("`{tag}` takes no attributes"));
    }
    None
}

/// Whether the `|...` tail written for `mark` parses back to the same
/// attributes.
fn attributes_survive(mark: &Mark) -> bool {
    let written = format_attributes(&mark.attributes);
    let Some(source) = written.strip_prefix('|') else {
        return mark.attributes.is_empty();
    };
    !source.contains('\\') && parse_attributes(source) == mark.attributes
}

/// Whether `tag` can follow a backslash: a letter, then letters, digits,
/// `_` or `-`.
pub fn is_marker_name(tag: &str) -> bool {
    let mut chars = tag.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
