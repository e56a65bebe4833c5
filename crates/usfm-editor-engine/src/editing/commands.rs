use usfm_editor_syntax::{StyleType, Taxonomy, VerseLabel};

use crate::editing::invariants::{is_marker_name, mark_problem};
use crate::editing::transforms;
use crate::error::{DuplicateNumber, EditError, TransformPrecondition};
use crate::models::{
    Block, BlockPath, Book, Chapter, Marks, RunPath, TextPoint, TextRun, Verse, VersePath,
};

/// Commands that can be applied to the document
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    InsertText {
        at: TextPoint,
        text: String,
    },
    /// Delete bytes `from..to` of one run.
    DeleteText {
        run: RunPath,
        from: usize,
        to: usize,
    },
    InsertRun {
        at: RunPath,
        run: TextRun,
    },
    RemoveRun {
        at: RunPath,
    },
    InsertBlock {
        at: BlockPath,
        block: Block,
    },
    RemoveBlock {
        at: BlockPath,
    },
    /// Append a block's runs to the block before it.
    MergeBlock {
        at: BlockPath,
    },
    /// Move everything after `at` into a new paragraph.
    SplitBlock {
        at: TextPoint,
        marker: String,
    },
    /// Replace the marks on bytes `start..end` of a block's text.
    SetMarks {
        at: BlockPath,
        start: usize,
        end: usize,
        marks: Marks,
    },
    SetParagraphMarker {
        at: BlockPath,
        marker: String,
    },
    /// Insert an empty verse before position `at`.
    InsertVerse {
        at: VersePath,
        label: VerseLabel,
    },
    SetVerseLabel {
        at: VersePath,
        label: VerseLabel,
    },
    /// Remove a verse and its content.
    RemoveVerse {
        at: VersePath,
    },
    /// Insert an empty chapter before chapter index `at`.
    InsertChapter {
        at: usize,
        number: String,
    },
    JoinWithPreviousVerse {
        at: VersePath,
    },
    UnjoinVerses {
        at: VersePath,
    },
    AddVerse {
        at: VersePath,
    },
    RemoveVerseAndConcatenate {
        at: VersePath,
    },
}

impl Cmd {
    /// Index of the chapter the command edits.
    pub fn chapter(&self) -> usize {
        match self {
            Cmd::InsertText { at, .. } | Cmd::SplitBlock { at, .. } => at.run.block.verse.chapter,
            Cmd::DeleteText { run: at, .. } | Cmd::InsertRun { at, .. } | Cmd::RemoveRun { at } => {
                at.block.verse.chapter
            }
            Cmd::InsertBlock { at, .. }
            | Cmd::RemoveBlock { at }
            | Cmd::MergeBlock { at }
            | Cmd::SetMarks { at, .. }
            | Cmd::SetParagraphMarker { at, .. } => at.verse.chapter,
            Cmd::InsertVerse { at, .. }
            | Cmd::SetVerseLabel { at, .. }
            | Cmd::RemoveVerse { at }
            | Cmd::JoinWithPreviousVerse { at }
            | Cmd::UnjoinVerses { at }
            | Cmd::AddVerse { at }
            | Cmd::RemoveVerseAndConcatenate { at } => at.chapter,
            Cmd::InsertChapter { at, .. } => *at,
        }
    }
}

/// Validate and apply a command. On error the book is untouched.
///
/// The caller runs the normalizer afterwards.
pub(crate) fn apply_command(book: &mut Book, taxonomy: &Taxonomy, cmd: Cmd) -> Result<(), EditError> {
    match cmd {
        Cmd::InsertText { at, text } => {
            let run = run_mut(book, at.run)?;
            check_boundary(&run.text, at.offset)?;
            check_text(&text, &run.marks, taxonomy)?;
            if inside_marker(&run.text, at.offset) {
                return Err(marker_offset(at.offset));
            }
            run.text.insert_str(at.offset, &text);
        }
        Cmd::DeleteText { run, from, to } => {
            let run = run_mut(book, run)?;
            check_boundary(&run.text, from)?;
            check_boundary(&run.text, to)?;
            if from > to {
                return Err(EditError::InvalidOffset {
                    offset: from,
                    len: run.text.len(),
                });
            }
            if run.text[from..to].contains('\\') {
                return Err(EditError::InvalidText(format!(
                    "bytes {from}..{to} cut through an embedded marker"
                )));
            }
            run.text.replace_range(from..to, "");
        }
        Cmd::InsertRun { at, run } => {
            check_marks(&run.marks, taxonomy)?;
            check_text(&run.text, &run.marks, taxonomy)?;
            let runs = runs_mut(book, at.block)?;
            if at.run > runs.len() {
                return Err(EditError::path(format!("run {} past the end", at.run)));
            }
            runs.insert(at.run, run);
        }
        Cmd::RemoveRun { at } => {
            let runs = runs_mut(book, at.block)?;
            if at.run >= runs.len() {
                return Err(EditError::path(format!("no run at {at:?}")));
            }
            runs.remove(at.run);
        }
        Cmd::InsertBlock { at, block } => {
            check_block(&block, taxonomy)?;
            let blocks = blocks_mut(book, at.verse)?;
            if at.block > blocks.len() {
                return Err(EditError::path(format!("block {} past the end", at.block)));
            }
            blocks.insert(at.block, block);
        }
        Cmd::RemoveBlock { at } => {
            let blocks = blocks_mut(book, at.verse)?;
            if at.block >= blocks.len() {
                return Err(EditError::path(format!("no block at {at:?}")));
            }
            blocks.remove(at.block);
        }
        Cmd::MergeBlock { at } => merge_block(book, at)?,
        Cmd::SplitBlock { at, marker } => {
            check_paragraph_marker(&marker, taxonomy)?;
            split_block(book, at, marker)?;
        }
        Cmd::SetMarks {
            at,
            start,
            end,
            marks,
        } => {
            check_marks(&marks, taxonomy)?;
            set_marks(runs_mut(book, at)?, start, end, &marks, taxonomy)?;
        }
        Cmd::SetParagraphMarker { at, marker } => {
            check_paragraph_marker(&marker, taxonomy)?;
            match block_mut(book, at)? {
                Block::Paragraph(paragraph) => paragraph.marker = marker,
                _ => return Err(EditError::path(format!("{at:?} is not a paragraph"))),
            }
        }
        Cmd::InsertVerse { at, label } => {
            let chapter = numbered_label(book, at, label)?;
            if at.verse == 0 || at.verse > chapter.verses.len() {
                return Err(EditError::path(format!("cannot insert a verse at {at:?}")));
            }
            check_unique_label(chapter, label, None)?;
            chapter.verses.insert(at.verse, Verse::empty(label));
        }
        Cmd::SetVerseLabel { at, label } => {
            let chapter = numbered_label(book, at, label)?;
            existing_numbered_verse(chapter, at)?;
            check_unique_label(chapter, label, Some(at.verse))?;
            chapter.verses[at.verse].label = label;
        }
        Cmd::RemoveVerse { at } => {
            let chapter = chapter_mut(book, at.chapter)?;
            existing_numbered_verse(chapter, at)?;
            chapter.verses.remove(at.verse);
        }
        Cmd::InsertChapter { at, number } => {
            let number = number.trim().to_string();
            if number.is_empty() || !number.chars().all(|c| c.is_alphanumeric() || c == '-') {
                return Err(EditError::InvalidNumber(number));
            }
            if at > book.chapters.len() {
                return Err(EditError::path(format!("chapter {at} past the end")));
            }
            if book.chapters.iter().any(|c| c.number.text == number) {
                log::warn!("chapter {number} already exists");
                return Err(EditError::DuplicateNumber(DuplicateNumber::Chapter(number)));
            }
            book.chapters.insert(at, Chapter::new(number));
        }
        Cmd::JoinWithPreviousVerse { at } => {
            transforms::join_with_previous_verse(book, at, taxonomy)?
        }
        Cmd::UnjoinVerses { at } => transforms::unjoin_verses(book, at, taxonomy)?,
        Cmd::AddVerse { at } => transforms::add_verse(book, at, taxonomy)?,
        Cmd::RemoveVerseAndConcatenate { at } => {
            transforms::remove_verse_and_concatenate_with_previous(book, at, taxonomy)?
        }
    }
    Ok(())
}

fn merge_block(book: &mut Book, at: BlockPath) -> Result<(), EditError> {
    let blocks = blocks_mut(book, at.verse)?;
    if at.block == 0 || at.block >= blocks.len() {
        return Err(EditError::path(format!("no block before {at:?}")));
    }
    if blocks[at.block - 1].runs_mut().is_none() {
        return Err(EditError::path(format!("block before {at:?} holds no runs")));
    }

    let merged = blocks.remove(at.block);
    if let Some(previous) = blocks[at.block - 1].runs_mut() {
        previous.extend(merged.runs().iter().cloned());
    }
    Ok(())
}

fn split_block(book: &mut Book, at: TextPoint, marker: String) -> Result<(), EditError> {
    let blocks = blocks_mut(book, at.run.block.verse)?;
    let tail = {
        let runs = blocks
            .get_mut(at.run.block.block)
            .and_then(Block::runs_mut)
            .ok_or_else(|| EditError::path(format!("no block at {:?}", at.run.block)))?;
        let run = runs
            .get_mut(at.run.run)
            .ok_or_else(|| EditError::path(format!("no run at {:?}", at.run)))?;
        check_boundary(&run.text, at.offset)?;
        if inside_marker(&run.text, at.offset) {
            return Err(marker_offset(at.offset));
        }

        let split = TextRun::marked(run.text.split_off(at.offset), run.marks.clone());
        let mut tail = vec![split];
        tail.extend(runs.split_off(at.run.run + 1));
        tail
    };
    blocks.insert(at.run.block.block + 1, Block::paragraph(marker, tail));
    Ok(())
}

/// Rewrite `runs` so bytes `start..end` of their joined text carry `marks`.
fn set_marks(
    runs: &mut Vec<TextRun>,
    start: usize,
    end: usize,
    marks: &Marks,
    taxonomy: &Taxonomy,
) -> Result<(), EditError> {
    let text: String = runs.iter().map(|run| run.text.as_str()).collect();
    check_boundary(&text, start)?;
    check_boundary(&text, end)?;
    if start > end {
        return Err(EditError::InvalidOffset {
            offset: start,
            len: text.len(),
        });
    }
    check_attribute_text(&text[start..end], marks, taxonomy)?;

    let mut rebuilt = Vec::with_capacity(runs.len() + 2);
    let mut position = 0;
    for run in runs.drain(..) {
        let (run_start, run_end) = (position, position + run.text.len());
        position = run_end;

        let cut_start = start.clamp(run_start, run_end) - run_start;
        let cut_end = end.clamp(run_start, run_end) - run_start;
        let (before, rest) = run.text.split_at(cut_start);
        let (inside, after) = rest.split_at(cut_end - cut_start);

        rebuilt.push(TextRun::marked(before, run.marks.clone()));
        rebuilt.push(TextRun::marked(inside, marks.clone()));
        rebuilt.push(TextRun::marked(after, run.marks.clone()));
    }
    *runs = rebuilt;
    Ok(())
}

fn check_boundary(text: &str, offset: usize) -> Result<(), EditError> {
    if text.is_char_boundary(offset) {
        Ok(())
    } else {
        Err(EditError::InvalidOffset {
            offset,
            len: text.len(),
        })
    }
}

/// Text entering a run must read back as text: no markers, and no `|` where
/// it would start an attribute list.
fn check_text(text: &str, marks: &Marks, taxonomy: &Taxonomy) -> Result<(), EditError> {
    if text.contains('\\') {
        return Err(EditError::InvalidText(format!("{text:?} contains a backslash")));
    }
    check_attribute_text(text, marks, taxonomy)
}

fn check_attribute_text(text: &str, marks: &Marks, taxonomy: &Taxonomy) -> Result<(), EditError> {
    let attributed = marks.iter().any(|mark| {
        taxonomy
            .get(&mark.tag)
            .is_some_and(|def| def.accepts_attributes())
    });
    if attributed && text.contains('|') {
        return Err(EditError::InvalidText(format!(
            "{text:?} contains `|` inside a span that takes attributes"
        )));
    }
    Ok(())
}

/// Whether text inserted at `offset` would run into an embedded marker name,
/// as in `\f|t` or `\pb|`.
fn inside_marker(text: &str, offset: usize) -> bool {
    let before = &text[..offset];
    before.rfind('\\').is_some_and(|slash| {
        let name = &before[slash + 1..];
        !name.ends_with('*')
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+' | '*'))
    })
}

fn marker_offset(offset: usize) -> EditError {
    EditError::InvalidText(format!("offset {offset} splits an embedded marker"))
}

fn check_marks(marks: &Marks, taxonomy: &Taxonomy) -> Result<(), EditError> {
    match marks.iter().find_map(|mark| mark_problem(mark, taxonomy)) {
        Some(problem) => Err(EditError::InvalidMarker(problem)),
        None => Ok(()),
    }
}

fn check_paragraph_marker(marker: &str, taxonomy: &Taxonomy) -> Result<(), EditError> {
    if !is_marker_name(marker) {
        return Err(EditError::InvalidMarker(format!("`{marker}` is not a marker name")));
    }
    match taxonomy.get(marker) {
        Some(def) if def.style_type != StyleType::Paragraph || def.is_chapter() => Err(
            EditError::InvalidMarker(format!("`{marker}` is not a paragraph marker")),
        ),
        _ => Ok(()),
    }
}

fn check_block(block: &Block, taxonomy: &Taxonomy) -> Result<(), EditError> {
    if let Some(marker) = block.paragraph_marker() {
        check_paragraph_marker(marker, taxonomy)?;
    }
    block.runs().iter().try_for_each(|run| {
        check_marks(&run.marks, taxonomy)?;
        check_text(&run.text, &run.marks, taxonomy)
    })
}

/// The chapter at `at`, provided `label` is a numbered label.
fn numbered_label(book: &mut Book, at: VersePath, label: VerseLabel) -> Result<&mut Chapter, EditError> {
    if label.is_front() {
        log::warn!("refusing a second front verse at {at:?}");
        return Err(TransformPrecondition::FrontVerse.into());
    }
    chapter_mut(book, at.chapter)
}

fn existing_numbered_verse(chapter: &Chapter, at: VersePath) -> Result<(), EditError> {
    if at.verse >= chapter.verses.len() {
        return Err(EditError::path(format!("no verse at {at:?}")));
    }
    if chapter.verses[at.verse].label.is_front() {
        return Err(TransformPrecondition::FrontVerse.into());
    }
    Ok(())
}

fn check_unique_label(chapter: &Chapter, label: VerseLabel, skip: Option<usize>) -> Result<(), EditError> {
    let clash = chapter
        .verses
        .iter()
        .enumerate()
        .any(|(index, verse)| Some(index) != skip && verse.label.overlaps(&label));
    if clash {
        log::warn!("verse {label} already exists in chapter {}", chapter.number.text);
        return Err(EditError::DuplicateNumber(DuplicateNumber::Verse {
            chapter: chapter.number.text.clone(),
            label,
        }));
    }
    Ok(())
}

fn chapter_mut(book: &mut Book, index: usize) -> Result<&mut Chapter, EditError> {
    book.chapters
        .get_mut(index)
        .ok_or_else(|| EditError::path(format!("no chapter at index {index}")))
}

fn blocks_mut(book: &mut Book, at: VersePath) -> Result<&mut Vec<Block>, EditError> {
    chapter_mut(book, at.chapter)?
        .verses
        .get_mut(at.verse)
        .map(|verse| &mut verse.children)
        .ok_or_else(|| EditError::path(format!("no verse at {at:?}")))
}

fn block_mut(book: &mut Book, at: BlockPath) -> Result<&mut Block, EditError> {
    blocks_mut(book, at.verse)?
        .get_mut(at.block)
        .ok_or_else(|| EditError::path(format!("no block at {at:?}")))
}

fn runs_mut(book: &mut Book, at: BlockPath) -> Result<&mut Vec<TextRun>, EditError> {
    block_mut(book, at)?
        .runs_mut()
        .ok_or_else(|| EditError::path(format!("{at:?} holds no runs")))
}

fn run_mut(book: &mut Book, at: RunPath) -> Result<&mut TextRun, EditError> {
    runs_mut(book, at.block)?
        .get_mut(at.run)
        .ok_or_else(|| EditError::path(format!("no run at {at:?}")))
}
