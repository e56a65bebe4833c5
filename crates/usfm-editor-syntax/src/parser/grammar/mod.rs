//! # Grammar Rules
//!
//! Each rule takes a `&mut Parser` positioned on a token and consumes it
//! (and whatever belongs with it), emitting events along the way.
//!
//! ## Module Structure
//!
//! - [`line`] - Line-level markers (`\c`, `\v`, paragraph markers)
//! - [`inline`] - Character spans, end markers, attributes, notes,
//!   milestones and self-delimiting markers
//!
//! ## Marker Dispatch
//!
//! A marker's behaviour comes from its taxonomy entry. Markers missing from
//! the taxonomy are guessed: if their end marker appears before the next
//! line-level marker they are character spans, otherwise paragraphs.

mod inline;
mod line;

use crate::error::ParseError;
use crate::lexer::TokenKind;
use crate::parser::Parser;
use crate::taxonomy::StyleType;

/// How a marker is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkerClass {
    Chapter,
    Verse,
    Paragraph,
    Character { accepts_attributes: bool },
    SelfClosing,
    Note,
    Milestone,
}

/// Parse the whole document.
pub fn root(p: &mut Parser<'_, '_>) -> Result<(), ParseError> {
    while let Some(token) = p.current() {
        match token.kind {
            TokenKind::Marker => marker(p)?,
            TokenKind::EndMarker => inline::end_marker(p)?,
            TokenKind::MilestoneClose => {
                return Err(ParseError::UnmatchedEndMarker {
                    marker: token.text.to_string(),
                    offset: token.offset,
                });
            }
            TokenKind::Pipe => inline::pipe(p),
            TokenKind::Newline | TokenKind::Whitespace | TokenKind::Text => p.bump_text(),
        }
    }

    p.finish();
    Ok(())
}

fn marker(p: &mut Parser<'_, '_>) -> Result<(), ParseError> {
    let Some(token) = p.current() else {
        return Ok(());
    };
    let tag = token.tag();

    match classify(p, tag) {
        MarkerClass::Chapter => line::chapter(p),
        MarkerClass::Verse => line::verse(p),
        MarkerClass::Paragraph => {
            line::paragraph(p);
            Ok(())
        }
        MarkerClass::Character { accepts_attributes } => {
            inline::character(p, accepts_attributes);
            Ok(())
        }
        MarkerClass::SelfClosing => {
            inline::self_closing(p);
            Ok(())
        }
        MarkerClass::Note => inline::note(p),
        MarkerClass::Milestone => inline::milestone(p),
    }
}

fn classify(p: &Parser<'_, '_>, tag: &str) -> MarkerClass {
    let Some(def) = p.taxonomy().get(tag) else {
        return classify_unknown(p, tag);
    };

    if def.is_chapter() {
        return MarkerClass::Chapter;
    }
    if def.is_verse() {
        return MarkerClass::Verse;
    }
    match def.style_type {
        StyleType::Paragraph => MarkerClass::Paragraph,
        StyleType::Character if def.end_marker.is_none() => MarkerClass::SelfClosing,
        StyleType::Character => MarkerClass::Character {
            accepts_attributes: def.accepts_attributes(),
        },
        StyleType::Note => MarkerClass::Note,
        StyleType::Milestone => MarkerClass::Milestone,
    }
}

fn classify_unknown(p: &Parser<'_, '_>, tag: &str) -> MarkerClass {
    let closed = p
        .find_ahead(
            |t| t.kind == TokenKind::EndMarker && t.tag() == tag,
            |t| p.is_line_marker(t),
        )
        .is_some();

    if closed {
        log::debug!("unknown marker \\{tag} treated as a character span");
        MarkerClass::Character {
            accepts_attributes: false,
        }
    } else {
        log::debug!("unknown marker \\{tag} treated as a paragraph");
        MarkerClass::Paragraph
    }
}
