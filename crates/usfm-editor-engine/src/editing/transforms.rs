//! # Verse Transforms
//!
//! Join, unjoin, add and remove verses. Every transform checks all of its
//! preconditions before touching the tree, so a rejected transform leaves
//! the book exactly as it was. A successful one ends with a normalizer pass.
//!
//! | Transform | Before | After |
//! |-----------|--------|-------|
//! | join with previous | `\v 4 a` `\v 5 b` | `\v 4-5 ab` |
//! | unjoin | `\v 4-6 abc` | `\v 4 abc` `\v 5 ` `\v 6 ` |
//! | add verse | `\v 9 z` (last) | `\v 9 z` `\v 10 ` |
//! | remove and concatenate | `\v 4 a` `\v 5 b` | `\v 4 ab` |

use usfm_editor_syntax::{Taxonomy, VerseLabel};

use crate::error::{DuplicateNumber, EditError, TransformPrecondition};
use crate::models::{Book, Chapter, Verse, VersePath};

use super::normalize::normalize_chapter;

/// Longest range `unjoin_verses` will split.
pub const MAX_UNJOINED: u32 = 1000;

pub fn join_with_previous_verse(
    book: &mut Book,
    at: VersePath,
    taxonomy: &Taxonomy,
) -> Result<(), EditError> {
    let chapter = chapter_mut(book, at)?;
    let (previous, verse) = previous_pair(chapter, at)?;
    if previous.start() >= verse.start() {
        return Err(reject(TransformPrecondition::NotAscending, at));
    }
    let label = VerseLabel::span(previous.start(), verse.end())
        .map_err(|_| reject(TransformPrecondition::NotAscending, at))?;

    check_unused(chapter, label, |index| index == at.verse || index == at.verse - 1)?;

    let joined = chapter.verses.remove(at.verse);
    let previous = &mut chapter.verses[at.verse - 1];
    previous.label = label;
    previous.children.extend(joined.children);
    normalize_chapter(chapter, taxonomy);
    Ok(())
}

pub fn unjoin_verses(book: &mut Book, at: VersePath, taxonomy: &Taxonomy) -> Result<(), EditError> {
    let chapter = chapter_mut(book, at)?;
    let verse = verse_at(chapter, at)?;
    let VerseLabel::Range { start, end } = verse else {
        return Err(reject(TransformPrecondition::NotARange, at));
    };
    if end - start >= MAX_UNJOINED {
        return Err(reject(TransformPrecondition::RangeTooLong, at));
    }
    for number in start + 1..=end {
        check_unused(chapter, VerseLabel::Single(number), |index| index == at.verse)?;
    }

    chapter.verses[at.verse].label = VerseLabel::Single(start);
    for (offset, number) in (start + 1..=end).enumerate() {
        chapter
            .verses
            .insert(at.verse + 1 + offset, Verse::empty(VerseLabel::Single(number)));
    }
    normalize_chapter(chapter, taxonomy);
    Ok(())
}

pub fn add_verse(book: &mut Book, at: VersePath, taxonomy: &Taxonomy) -> Result<(), EditError> {
    let chapter = chapter_mut(book, at)?;
    let verse = verse_at(chapter, at)?;
    if at.verse + 1 != chapter.verses.len() {
        return Err(reject(TransformPrecondition::NotLastVerse, at));
    }

    let number = verse
        .end()
        .checked_add(1)
        .ok_or_else(|| reject(TransformPrecondition::NumberOverflow, at))?;
    let label = VerseLabel::Single(number);
    check_unused(chapter, label, |_| false)?;

    chapter.verses.push(Verse::empty(label));
    normalize_chapter(chapter, taxonomy);
    Ok(())
}

pub fn remove_verse_and_concatenate_with_previous(
    book: &mut Book,
    at: VersePath,
    taxonomy: &Taxonomy,
) -> Result<(), EditError> {
    let chapter = chapter_mut(book, at)?;
    previous_pair(chapter, at)?;

    let removed = chapter.verses.remove(at.verse);
    chapter.verses[at.verse - 1]
        .children
        .extend(removed.children);
    normalize_chapter(chapter, taxonomy);
    Ok(())
}

/// Fails if `label` shares a number with a verse not picked by `skip`.
fn check_unused(
    chapter: &Chapter,
    label: VerseLabel,
    skip: impl Fn(usize) -> bool,
) -> Result<(), EditError> {
    let clash = chapter
        .verses
        .iter()
        .enumerate()
        .any(|(index, other)| !skip(index) && other.label.overlaps(&label));
    if clash {
        log::warn!("verse {label} already exists in chapter {}", chapter.number.text);
        return Err(EditError::DuplicateNumber(DuplicateNumber::Verse {
            chapter: chapter.number.text.clone(),
            label,
        }));
    }
    Ok(())
}

fn chapter_mut(book: &mut Book, at: VersePath) -> Result<&mut Chapter, EditError> {
    book.chapters
        .get_mut(at.chapter)
        .ok_or_else(|| EditError::path(format!("no chapter at index {}", at.chapter)))
}

fn verse_at(chapter: &Chapter, at: VersePath) -> Result<VerseLabel, EditError> {
    chapter
        .verses
        .get(at.verse)
        .map(|verse| verse.label)
        .ok_or_else(|| EditError::path(format!("no verse at {at:?}")))
}

/// Labels of the verse before `at` and of `at` itself, both numbered.
fn previous_pair(chapter: &Chapter, at: VersePath) -> Result<(VerseLabel, VerseLabel), EditError> {
    let verse = verse_at(chapter, at)?;
    if verse.is_front() {
        return Err(reject(TransformPrecondition::FrontVerse, at));
    }
    let previous = at
        .verse
        .checked_sub(1)
        .and_then(|index| chapter.verses.get(index))
        .map(|verse| verse.label)
        .filter(|label| !label.is_front())
        .ok_or_else(|| reject(TransformPrecondition::NoPreviousVerse, at))?;
    Ok((previous, verse))
}

fn reject(precondition: TransformPrecondition, at: VersePath) -> EditError {
    log::warn!("transform at {at:?} rejected: {precondition}");
    EditError::InvalidTransformPrecondition(precondition)
}
