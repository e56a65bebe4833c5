//! Read-only lookups by structural position.

use crate::models::{
    Block, BlockPath, Book, Chapter, Marks, RunPath, Selection, TextPoint, TextRun, Verse,
    VersePath,
};

pub fn chapter_at(book: &Book, index: usize) -> Option<&Chapter> {
    book.chapters.get(index)
}

pub fn verse_at(book: &Book, at: VersePath) -> Option<&Verse> {
    chapter_at(book, at.chapter)?.verses.get(at.verse)
}

pub fn block_at(book: &Book, at: BlockPath) -> Option<&Block> {
    verse_at(book, at.verse)?.children.get(at.block)
}

pub fn run_at(book: &Book, at: RunPath) -> Option<&TextRun> {
    block_at(book, at.block)?.runs().get(at.run)
}

/// The marks in effect at a point, `None` if the point is outside its run.
pub fn marks_at(book: &Book, at: TextPoint) -> Option<&Marks> {
    let run = run_at(book, at.run)?;
    (at.offset <= run.text.len()).then_some(&run.marks)
}

/// Distinct paragraph markers over the blocks a selection touches, in
/// document order.
///
/// An inline container reports the nearest paragraph marker before it in
/// the same chapter, and nothing if there is none.
pub fn paragraph_markers(book: &Book, selection: Selection) -> Vec<String> {
    let (start, end) = selection.ordered();
    let (first, last) = (start.run.block, end.run.block);

    let mut markers: Vec<String> = Vec::new();
    for (chapter_index, chapter) in book.chapters.iter().enumerate() {
        let mut current: Option<&str> = None;
        for (verse_index, verse) in chapter.verses.iter().enumerate() {
            for (block_index, block) in verse.children.iter().enumerate() {
                let path = VersePath::new(chapter_index, verse_index).block(block_index);
                if let Some(marker) = block.paragraph_marker() {
                    current = Some(marker);
                }
                if path < first || path > last {
                    continue;
                }
                if let Some(marker) = current
                    && !markers.iter().any(|m| m == marker)
                {
                    markers.push(marker.to_string());
                }
            }
        }
    }
    markers
}

/// Locate verse `verse` of chapter `chapter` by number, including verses
/// inside a joined range.
pub fn find_verse(book: &Book, chapter: u32, verse: u32) -> Option<VersePath> {
    book.chapters
        .iter()
        .enumerate()
        .filter(|(_, c)| c.number.value() == Some(chapter))
        .find_map(|(chapter_index, c)| {
            c.verses
                .iter()
                .position(|v| v.label.contains(verse))
                .map(|verse_index| VersePath::new(chapter_index, verse_index))
        })
}
