//! # Normalizer
//!
//! Restores the tree's structural invariants after parsing or any edit.
//!
//! Every block list (the headers and each verse) is run through a fixed
//! sequence of passes until a whole round changes nothing:
//!
//! 1. wrap bare runs in inline containers
//! 2. prune empty runs and merge neighbours with identical marks
//! 3. give an empty verse one empty inline container
//! 4. drop an empty leading inline container that precedes another block
//! 5. reconcile non-leading inline containers: remove empty ones, merge into
//!    a preceding block that takes verse text, otherwise demote to `\p`
//!
//! Each round strictly shrinks the list or converts a block, so it settles
//! within `2 × (blocks + runs) + 2` rounds. Running out of rounds is a bug in
//! a pass and panics.
//!
//! Finally every chapter gets its front verse back if an edit removed it.

use usfm_editor_syntax::{Taxonomy, VerseLabel};

use crate::models::{Block, Book, Chapter, TextRun, Verse};

const DEMOTED_PARAGRAPH: &str = "p";

pub fn normalize(book: &mut Book, taxonomy: &Taxonomy) {
    normalize_blocks(&mut book.headers, taxonomy, Container::Headers);
    for chapter in &mut book.chapters {
        normalize_chapter(chapter, taxonomy);
    }

    #[cfg(debug_assertions)]
    {
        use super::invariants::{self, Invariant};
        let violations: Vec<_> = invariants::check(book, taxonomy)
            .into_iter()
            .filter(|v| !matches!(v.invariant, Invariant::UniqueNumbers | Invariant::MarksWellFormed))
            .collect();
        assert!(
            violations.is_empty(),
            "normalizer left the tree inconsistent: {violations:#?}"
        );
    }
}

pub fn normalize_chapter(chapter: &mut Chapter, taxonomy: &Taxonomy) {
    ensure_front(chapter);
    for verse in &mut chapter.verses {
        normalize_blocks(&mut verse.children, taxonomy, Container::Verse);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Headers,
    Verse,
}

/// Run the passes over one block list until nothing changes.
pub fn normalize_blocks(blocks: &mut Vec<Block>, taxonomy: &Taxonomy, container: Container) {
    let runs: usize = blocks.iter().map(|block| block.runs().len()).sum();
    let bound = 2 * (blocks.len() + runs) + 2;

    for round in 0..bound {
        let mut changed = false;
        changed |= wrap_bare_runs(blocks);
        changed |= tidy_runs(blocks);
        if container == Container::Verse {
            changed |= fill_empty_verse(blocks);
        }
        changed |= drop_empty_leading(blocks, container);
        changed |= reconcile_inlines(blocks, taxonomy);

        log::trace!("normalize round {round}: changed={changed}");
        if !changed {
            return;
        }
    }
    panic!("normalizer did not settle within {bound} rounds");
}

fn ensure_front(chapter: &mut Chapter) {
    let has_front = chapter
        .verses
        .first()
        .is_some_and(|verse| verse.label == VerseLabel::Front);
    if !has_front {
        chapter.verses.insert(0, Verse::front());
    }
}

fn wrap_bare_runs(blocks: &mut [Block]) -> bool {
    let mut changed = false;
    for block in blocks.iter_mut() {
        if let Block::Text(run) = block {
            let run = std::mem::take(run);
            *block = Block::inline(vec![run]);
            changed = true;
        }
    }
    changed
}

fn tidy_runs(blocks: &mut [Block]) -> bool {
    let mut changed = false;
    for runs in blocks.iter_mut().filter_map(Block::runs_mut) {
        changed |= tidy_run_list(runs);
    }
    changed
}

/// Prune empty runs and merge adjacent runs with the same marks.
pub fn tidy_run_list(runs: &mut Vec<TextRun>) -> bool {
    let before = runs.len();
    let mut tidy: Vec<TextRun> = Vec::with_capacity(before);
    for run in runs.drain(..) {
        if run.text.is_empty() {
            continue;
        }
        match tidy.last_mut() {
            Some(last) if last.marks == run.marks => last.text.push_str(&run.text),
            _ => tidy.push(run),
        }
    }
    *runs = tidy;
    runs.len() != before
}

fn fill_empty_verse(blocks: &mut Vec<Block>) -> bool {
    if blocks.is_empty() {
        blocks.push(Block::inline(Vec::new()));
        return true;
    }
    false
}

fn drop_empty_leading(blocks: &mut Vec<Block>, container: Container) -> bool {
    let removable = match blocks.first() {
        Some(first) => {
            first.is_inline()
                && first.runs().is_empty()
                && (blocks.len() > 1 || container == Container::Headers)
        }
        None => false,
    };
    if removable {
        blocks.remove(0);
    }
    removable
}

fn reconcile_inlines(blocks: &mut Vec<Block>, taxonomy: &Taxonomy) -> bool {
    let mut changed = false;
    let mut index = 1;
    while index < blocks.len() {
        if !blocks[index].is_inline() {
            index += 1;
            continue;
        }
        changed = true;

        if blocks[index].runs().is_empty() {
            blocks.remove(index);
            continue;
        }

        let merges = match &blocks[index - 1] {
            Block::Inline(_) => true,
            Block::Paragraph(paragraph) => taxonomy.accepts_verse_text(&paragraph.marker),
            Block::Text(_) => false,
        };

        let Some(children) = blocks[index].runs_mut().map(std::mem::take) else {
            index += 1;
            continue;
        };
        if merges {
            blocks.remove(index);
            if let Some(previous) = blocks[index - 1].runs_mut() {
                previous.extend(children);
            }
        } else {
            blocks[index] = Block::paragraph(DEMOTED_PARAGRAPH, children);
            index += 1;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Mark, Marks};
    use pretty_assertions::assert_eq;

    fn verse_blocks(mut blocks: Vec<Block>) -> Vec<Block> {
        normalize_blocks(&mut blocks, Taxonomy::standard(), Container::Verse);
        blocks
    }

    fn nd() -> Marks {
        [Mark::new("nd")].into_iter().collect()
    }

    #[test]
    fn wraps_bare_runs() {
        assert_eq!(
            verse_blocks(vec![Block::Text(TextRun::plain("a"))]),
            vec![Block::inline(vec![TextRun::plain("a")])]
        );
    }

    #[test]
    fn merges_runs_with_identical_marks() {
        assert_eq!(
            verse_blocks(vec![Block::inline(vec![
                TextRun::marked("a", nd()),
                TextRun::plain(""),
                TextRun::marked("b", nd()),
                TextRun::plain("c"),
            ])]),
            vec![Block::inline(vec![
                TextRun::marked("ab", nd()),
                TextRun::plain("c")
            ])]
        );
    }

    #[test]
    fn empty_verse_gets_a_container() {
        assert_eq!(verse_blocks(vec![]), vec![Block::inline(vec![])]);
    }

    #[test]
    fn empty_leading_container_dropped_before_paragraph() {
        assert_eq!(
            verse_blocks(vec![
                Block::inline(vec![]),
                Block::paragraph("q1", vec![TextRun::plain("x")]),
            ]),
            vec![Block::paragraph("q1", vec![TextRun::plain("x")])]
        );
    }

    #[test]
    fn trailing_container_merges_into_verse_text_paragraph() {
        assert_eq!(
            verse_blocks(vec![
                Block::paragraph("q1", vec![TextRun::plain("a ")]),
                Block::inline(vec![TextRun::plain("b")]),
            ]),
            vec![Block::paragraph("q1", vec![TextRun::plain("a b")])]
        );
    }

    #[test]
    fn trailing_container_after_heading_is_demoted() {
        assert_eq!(
            verse_blocks(vec![
                Block::paragraph("s1", vec![TextRun::plain("Title")]),
                Block::inline(vec![TextRun::plain("text")]),
                Block::inline(vec![]),
            ]),
            vec![
                Block::paragraph("s1", vec![TextRun::plain("Title")]),
                Block::paragraph("p", vec![TextRun::plain("text")]),
            ]
        );
    }

    #[test]
    fn consecutive_containers_collapse() {
        assert_eq!(
            verse_blocks(vec![
                Block::inline(vec![TextRun::plain("a")]),
                Block::inline(vec![TextRun::plain("b")]),
                Block::Text(TextRun::plain("c")),
            ]),
            vec![Block::inline(vec![TextRun::plain("abc")])]
        );
    }

    #[test]
    fn headers_drop_empty_containers() {
        let mut blocks = vec![Block::inline(vec![])];
        normalize_blocks(&mut blocks, Taxonomy::standard(), Container::Headers);
        assert!(blocks.is_empty());
    }

    #[test]
    fn front_verse_restored() {
        let mut book = Book {
            headers: vec![],
            chapters: vec![Chapter {
                number: crate::models::ChapterNumber { text: "1".into() },
                verses: vec![],
            }],
        };
        normalize(&mut book, Taxonomy::standard());
        assert_eq!(book.chapters[0].verses, vec![Verse::front()]);
    }

    #[test]
    fn idempotent() {
        let mut book = crate::parsing::parse(
            "\\c 1\n\\s1 T\n\\p\n\\v 1 a \\wj b\\wj*\n\\q1 c\n\\v 2-3 d",
        )
        .unwrap();
        let once = book.clone();
        normalize(&mut book, Taxonomy::standard());
        assert_eq!(book, once);
    }
}
