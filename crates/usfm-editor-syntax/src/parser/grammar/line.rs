//! # Line-Level Grammar
//!
//! Chapters, verses and paragraphs. Each finishes whatever line-level scope
//! was open and starts its own; the content that follows belongs to it until
//! the next line-level marker.
//!
//! | Source | Event |
//! |--------|-------|
//! | `\c 12` | `StartChapter("12")`, the line's newline dropped |
//! | `\v 5-7 ` | `StartVerse(5-7)` |
//! | `\v front` | `StartVerse(Front)`, only as a chapter's first verse |
//! | `\q1 ` | `StartParagraph("q1")` |

use crate::error::ParseError;
use crate::label::VerseLabel;
use crate::lexer::{Token, TokenKind};
use crate::parser::Parser;
use crate::parser::event::Event;

/// The marker token and the number token that follows it.
fn marker_and_number<'t, 'input>(
    p: &mut Parser<'t, 'input>,
) -> Result<(&'t Token<'input>, &'t Token<'input>), ParseError> {
    let Some(marker) = p.bump() else {
        unreachable!("line rules are only called on a marker token");
    };
    p.skip_whitespace();

    match p.current() {
        Some(number) if number.kind == TokenKind::Text => {
            p.bump();
            Ok((marker, number))
        }
        _ => Err(ParseError::MissingNumber {
            marker: marker.text.to_string(),
            offset: marker.offset,
        }),
    }
}

pub(super) fn chapter(p: &mut Parser<'_, '_>) -> Result<(), ParseError> {
    let (_, number) = marker_and_number(p)?;

    p.open_line(Event::StartChapter {
        number: number.text.to_string(),
    });
    p.chapter_seen = true;
    p.verse_in_chapter = false;

    p.eat_delimiter();
    if !p.has_pending_text() && p.at(TokenKind::Newline) {
        p.bump();
    }
    Ok(())
}

pub(super) fn verse(p: &mut Parser<'_, '_>) -> Result<(), ParseError> {
    let (marker, number) = marker_and_number(p)?;

    let label: VerseLabel = number
        .text
        .parse()
        .map_err(|source| ParseError::InvalidVerseLabel {
            label: number.text.to_string(),
            offset: number.offset,
            source,
        })?;

    if !p.chapter_seen {
        return Err(ParseError::VerseOutsideChapter {
            offset: marker.offset,
        });
    }
    if label.is_front() && p.verse_in_chapter {
        return Err(ParseError::MisplacedFront {
            offset: marker.offset,
        });
    }

    p.open_line(Event::StartVerse { label });
    p.verse_in_chapter = true;
    p.eat_delimiter();
    Ok(())
}

pub(super) fn paragraph(p: &mut Parser<'_, '_>) {
    let Some(marker) = p.bump() else {
        return;
    };

    p.open_line(Event::StartParagraph {
        marker: marker.tag().to_string(),
    });
    p.eat_delimiter();
}

#[cfg(test)]
mod tests {
    use crate::error::ParseError;
    use crate::label::VerseLabel;
    use crate::parser::parse_raw;
    use crate::raw::RawNode;
    use pretty_assertions::assert_eq;

    fn verse(label: VerseLabel, children: Vec<RawNode>) -> RawNode {
        RawNode::Verse { label, children }
    }

    fn paragraph(marker: &str, children: Vec<RawNode>) -> RawNode {
        RawNode::Paragraph {
            marker: marker.into(),
            children,
        }
    }

    #[test]
    fn chapter_line_newline_dropped() {
        assert_eq!(
            parse_raw("\\c 1\n\\v 1 a"),
            Ok(vec![
                RawNode::Chapter {
                    number: "1".into(),
                    children: vec![],
                },
                verse(VerseLabel::Single(1), vec![RawNode::text("a")]),
            ])
        );
    }

    #[test]
    fn newline_after_paragraph_marker_is_content() {
        assert_eq!(
            parse_raw("\\c 1\n\\q1\nword"),
            Ok(vec![
                RawNode::Chapter {
                    number: "1".into(),
                    children: vec![],
                },
                paragraph("q1", vec![RawNode::text("\nword")]),
            ])
        );
    }

    #[test]
    fn newlines_before_line_markers_dropped() {
        let nodes = parse_raw("\\c 1\n\\p\n\n\\v 1 one\r\n\\v 2 two\n").unwrap();
        assert_eq!(
            &nodes[1..],
            &[
                paragraph("p", vec![]),
                verse(VerseLabel::Single(1), vec![RawNode::text("one")]),
                verse(VerseLabel::Single(2), vec![RawNode::text("two\n")]),
            ]
        );
    }

    #[test]
    fn verse_range_and_front() {
        let nodes = parse_raw("\\c 1\n\\v front intro\n\\v 2-3 joined").unwrap();
        assert_eq!(
            &nodes[1..],
            &[
                verse(VerseLabel::Front, vec![RawNode::text("intro")]),
                verse(
                    VerseLabel::Range { start: 2, end: 3 },
                    vec![RawNode::text("joined")]
                ),
            ]
        );
    }

    #[test]
    fn missing_numbers() {
        assert_eq!(
            parse_raw("\\c\n\\p"),
            Err(ParseError::MissingNumber {
                marker: "\\c".into(),
                offset: 0
            })
        );
        assert!(matches!(
            parse_raw("\\c 1\n\\v \\w x\\w*"),
            Err(ParseError::MissingNumber { offset: 5, .. })
        ));
    }

    #[test]
    fn invalid_verse_label() {
        assert!(matches!(
            parse_raw("\\c 1\n\\v 4-2 text"),
            Err(ParseError::InvalidVerseLabel { offset: 8, .. })
        ));
    }

    #[test]
    fn verse_before_chapter() {
        assert_eq!(
            parse_raw("\\id GEN\n\\v 1 x"),
            Err(ParseError::VerseOutsideChapter { offset: 8 })
        );
    }

    #[test]
    fn front_after_numbered_verse() {
        assert_eq!(
            parse_raw("\\c 1\n\\v 1 a\n\\v front b"),
            Err(ParseError::MisplacedFront { offset: 12 })
        );
    }

    #[test]
    fn unknown_marker_without_end_is_a_paragraph() {
        let nodes = parse_raw("\\c 1\n\\zlabel Note\n\\v 1 a").unwrap();
        assert_eq!(nodes[1], paragraph("zlabel", vec![RawNode::text("Note")]));
    }
}
