//! # Inline Grammar
//!
//! Everything inside a line-level scope that isn't plain text.
//!
//! | Source | Result |
//! |--------|--------|
//! | `\nd Lord\nd*` | nested character span |
//! | `\w grace\|lemma="g"\w*` | span with attributes |
//! | `\f + \ft note\f*` | opaque note, inner markers untouched |
//! | `\qt-s \|who="Pilate"\*` | opaque milestone |
//! | `\tc1 ` | opaque self-delimiting marker, delimiter included |
//!
//! ## Attributes
//!
//! A `|` only starts attributes when the innermost open span's marker
//! declares attributes and its end marker follows on the same line-level
//! scope. Otherwise the pipe is plain text.

use crate::attributes::parse_attributes;
use crate::error::ParseError;
use crate::lexer::TokenKind;
use crate::parser::Parser;
use crate::parser::event::Event;
use crate::taxonomy::StyleType;

pub(super) fn character(p: &mut Parser<'_, '_>, accepts_attributes: bool) {
    let Some(marker) = p.bump() else {
        return;
    };
    p.open_span(marker.tag(), accepts_attributes, marker.offset);
    p.eat_delimiter();
}

pub(super) fn end_marker(p: &mut Parser<'_, '_>) -> Result<(), ParseError> {
    let Some(marker) = p.bump() else {
        return Ok(());
    };
    if p.close_span(marker.tag()) {
        Ok(())
    } else {
        Err(ParseError::UnmatchedEndMarker {
            marker: marker.text.to_string(),
            offset: marker.offset,
        })
    }
}

pub(super) fn pipe(p: &mut Parser<'_, '_>) {
    let end = p.attribute_span().and_then(|tag| {
        p.find_ahead(
            |t| t.kind == TokenKind::EndMarker && t.tag() == tag,
            |t| p.is_line_marker(t),
        )
    });

    match end {
        Some(end) => {
            let source = p.source(p.position() + 1, end);
            p.emit(Event::Attributes(parse_attributes(&source)));
            // Resume at the end marker, which closes the span
            p.seek(end);
        }
        None => p.bump_text(),
    }
}

/// A note: everything up to the matching end marker, verbatim.
pub(super) fn note(p: &mut Parser<'_, '_>) -> Result<(), ParseError> {
    let Some(marker) = p.current() else {
        return Ok(());
    };
    let tag = marker.tag();

    let end = p
        .find_ahead(
            |t| t.kind == TokenKind::EndMarker && t.tag() == tag,
            |t| p.is_line_marker(t),
        )
        .ok_or_else(|| ParseError::UnterminatedNote {
            marker: marker.text.to_string(),
            offset: marker.offset,
        })?;

    opaque(p, tag, StyleType::Note, end + 1);
    Ok(())
}

/// A milestone: the marker and its attributes, up to and including `\*`.
pub(super) fn milestone(p: &mut Parser<'_, '_>) -> Result<(), ParseError> {
    let Some(marker) = p.current() else {
        return Ok(());
    };

    let end = p
        .find_ahead(
            |t| t.kind == TokenKind::MilestoneClose,
            |t| matches!(t.kind, TokenKind::Marker | TokenKind::EndMarker),
        )
        .ok_or_else(|| ParseError::UnterminatedMilestone {
            marker: marker.text.to_string(),
            offset: marker.offset,
        })?;

    opaque(p, marker.tag(), StyleType::Milestone, end + 1);
    Ok(())
}

/// A self-delimiting marker such as a table cell. Its delimiter is part of
/// the opaque source so the content that follows is plain text.
pub(super) fn self_closing(p: &mut Parser<'_, '_>) {
    let Some(marker) = p.bump() else {
        return;
    };

    let mut source = marker.text.to_string();
    let mut rest = "";
    if let Some(ws) = p.current()
        && ws.kind == TokenKind::Whitespace
    {
        p.bump();
        source.push_str(&ws.text[..1]);
        rest = &ws.text[1..];
    }

    p.emit(Event::Opaque {
        marker: marker.tag().to_string(),
        style: StyleType::Character,
        source,
    });
    p.push_text(rest);
}

fn opaque(p: &mut Parser<'_, '_>, tag: &str, style: StyleType, end: usize) {
    let source = p.source(p.position(), end);
    p.emit(Event::Opaque {
        marker: tag.to_string(),
        style,
        source,
    });
    p.seek(end);
}

#[cfg(test)]
mod tests {
    use crate::attributes::Attribute;
    use crate::error::ParseError;
    use crate::parser::parse_raw;
    use crate::raw::RawNode;
    use crate::taxonomy::StyleType;
    use pretty_assertions::assert_eq;

    /// Children of the first verse in `\c 1\n\v 1 <content>`.
    fn verse_content(content: &str) -> Vec<RawNode> {
        let source = format!("\\c 1\n\\v 1 {content}");
        let nodes = parse_raw(&source).unwrap();
        nodes[1].children().to_vec()
    }

    fn span(marker: &str, children: Vec<RawNode>) -> RawNode {
        RawNode::Character {
            marker: marker.into(),
            attributes: vec![],
            children,
        }
    }

    #[test]
    fn character_span() {
        assert_eq!(
            verse_content("the \\nd Lord\\nd* said"),
            vec![
                RawNode::text("the "),
                span("nd", vec![RawNode::text("Lord")]),
                RawNode::text(" said"),
            ]
        );
    }

    #[test]
    fn nested_spans_with_and_without_plus() {
        let expected = vec![span(
            "wj",
            vec![
                RawNode::text("a "),
                span("nd", vec![RawNode::text("b")]),
                RawNode::text(" c"),
            ],
        )];
        assert_eq!(verse_content("\\wj a \\+nd b\\+nd* c\\wj*"), expected);
        assert_eq!(verse_content("\\wj a \\nd b\\nd* c\\wj*"), expected);
    }

    #[test]
    fn end_marker_closes_inner_spans() {
        assert_eq!(
            verse_content("\\wj a \\+nd b\\wj* c"),
            vec![
                span(
                    "wj",
                    vec![RawNode::text("a "), span("nd", vec![RawNode::text("b")])]
                ),
                RawNode::text(" c"),
            ]
        );
    }

    #[test]
    fn unclosed_span_ends_with_its_verse() {
        let nodes = parse_raw("\\c 1\n\\v 1 \\nd God\n\\v 2 x").unwrap();
        assert_eq!(
            nodes[1].children(),
            &[span("nd", vec![RawNode::text("God")])]
        );
        assert_eq!(nodes[2].children(), &[RawNode::text("x")]);
    }

    #[test]
    fn unmatched_end_marker() {
        assert_eq!(
            parse_raw("\\c 1\n\\v 1 a\\nd*"),
            Err(ParseError::UnmatchedEndMarker {
                marker: "\\nd*".into(),
                offset: 11
            })
        );
        assert!(matches!(
            parse_raw("\\p text\\p*"),
            Err(ParseError::UnmatchedEndMarker { .. })
        ));
        assert!(matches!(
            parse_raw("\\p text \\*"),
            Err(ParseError::UnmatchedEndMarker { .. })
        ));
    }

    #[test]
    fn word_attributes() {
        assert_eq!(
            verse_content("\\w gracious|lemma=\"grace\"\\w* one"),
            vec![
                RawNode::Character {
                    marker: "w".into(),
                    attributes: vec![Attribute::named("lemma", "grace")],
                    children: vec![RawNode::text("gracious")],
                },
                RawNode::text(" one"),
            ]
        );
    }

    #[test]
    fn pipe_outside_attribute_span_is_text() {
        assert_eq!(
            verse_content("a | b \\nd c|d\\nd*"),
            vec![
                RawNode::text("a | b "),
                span("nd", vec![RawNode::text("c|d")]),
            ]
        );
    }

    #[test]
    fn note_is_opaque() {
        assert_eq!(
            verse_content("text\\f + \\fr 1.1: \\ft A \\+nd note\\+nd*\\f* more"),
            vec![
                RawNode::text("text"),
                RawNode::Opaque {
                    marker: "f".into(),
                    style: StyleType::Note,
                    source: "\\f + \\fr 1.1: \\ft A \\+nd note\\+nd*\\f*".into(),
                },
                RawNode::text(" more"),
            ]
        );
    }

    #[test]
    fn unterminated_note() {
        assert_eq!(
            parse_raw("\\c 1\n\\v 1 a\\f + \\ft b\n\\v 2 c"),
            Err(ParseError::UnterminatedNote {
                marker: "\\f".into(),
                offset: 11
            })
        );
    }

    #[test]
    fn milestones() {
        assert_eq!(
            verse_content("a \\qt-s |who=\"Pilate\"\\*b\\qt-e\\*"),
            vec![
                RawNode::text("a "),
                RawNode::Opaque {
                    marker: "qt-s".into(),
                    style: StyleType::Milestone,
                    source: "\\qt-s |who=\"Pilate\"\\*".into(),
                },
                RawNode::text("b"),
                RawNode::Opaque {
                    marker: "qt-e".into(),
                    style: StyleType::Milestone,
                    source: "\\qt-e\\*".into(),
                },
            ]
        );
        assert!(matches!(
            parse_raw("\\c 1\n\\v 1 \\ts more"),
            Err(ParseError::UnterminatedMilestone { .. })
        ));
    }

    #[test]
    fn self_closing_marker_keeps_its_delimiter() {
        let nodes = parse_raw("\\c 1\n\\tr \\tc1  a\\tc2 b").unwrap();
        assert_eq!(
            nodes[1].children(),
            &[
                RawNode::Opaque {
                    marker: "tc1".into(),
                    style: StyleType::Character,
                    source: "\\tc1 ".into(),
                },
                RawNode::text(" a"),
                RawNode::Opaque {
                    marker: "tc2".into(),
                    style: StyleType::Character,
                    source: "\\tc2 ".into(),
                },
                RawNode::text("b"),
            ]
        );
    }

    #[test]
    fn unknown_character_marker() {
        assert_eq!(
            verse_content("\\zx odd\\zx*"),
            vec![span("zx", vec![RawNode::text("odd")])]
        );
    }
}
