//! Loader for `.sty` stylesheet files.
//!
//! A stylesheet is a sequence of records. Each record starts at a
//! `\Marker <tag>` line and is filled by the field lines that follow it:
//!
//! ```text
//! \Marker nd
//! \Endmarker nd*
//! \Name nd...nd* - Special Text - Name of God
//! \StyleType Character
//! \TextType VerseText
//! ```
//!
//! Lines starting with `#` and blank lines are ignored, as are fields the
//! editor has no use for (`\FontSize`, `\Color`, ...).

use thiserror::Error;

use super::{MarkerDef, StyleType, TextType};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StylesheetError {
    #[error("line {line}: `\\{field}` appears before any \\Marker")]
    FieldOutsideRecord { line: usize, field: String },
    #[error("line {line}: \\Marker without a tag")]
    EmptyMarker { line: usize },
    #[error("line {line}: unknown StyleType `{value}`")]
    UnknownStyleType { line: usize, value: String },
    #[error("line {line}: Rank `{value}` is not a number")]
    InvalidRank { line: usize, value: String },
    #[error("paragraph marker `{marker}` declares end marker `{end_marker}`")]
    ParagraphWithEndMarker { marker: String, end_marker: String },
}

/// Parse stylesheet source into marker definitions, in file order.
pub fn parse_stylesheet(source: &str) -> Result<Vec<MarkerDef>, StylesheetError> {
    let mut defs: Vec<MarkerDef> = Vec::new();

    for (index, raw_line) in source.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw_line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some(field_line) = trimmed.strip_prefix('\\') else {
            // Free text continuing a description field
            continue;
        };

        let (field, value) = match field_line.split_once(char::is_whitespace) {
            Some((field, value)) => (field, value.trim()),
            None => (field_line, ""),
        };

        if field.eq_ignore_ascii_case("Marker") {
            if value.is_empty() {
                return Err(StylesheetError::EmptyMarker { line });
            }
            if let Some(previous) = defs.last() {
                check_record(previous)?;
            }
            defs.push(MarkerDef::new(value));
            continue;
        }

        let Some(def) = defs.last_mut() else {
            return Err(StylesheetError::FieldOutsideRecord {
                line,
                field: field.to_string(),
            });
        };

        match field.to_ascii_lowercase().as_str() {
            "endmarker" => {
                def.end_marker = (!value.is_empty()).then(|| value.to_string());
            }
            "name" => def.name = value.to_string(),
            "styletype" => {
                def.style_type = parse_style_type(value).ok_or_else(|| {
                    StylesheetError::UnknownStyleType {
                        line,
                        value: value.to_string(),
                    }
                })?;
            }
            "texttype" => def.text_type = parse_text_type(value),
            "occursunder" => {
                def.occurs_under = value.split_whitespace().map(str::to_string).collect();
            }
            "rank" => {
                let rank = value.parse::<u8>().map_err(|_| StylesheetError::InvalidRank {
                    line,
                    value: value.to_string(),
                })?;
                def.rank = Some(rank);
            }
            "attributes" => {
                def.attributes = value
                    .split_whitespace()
                    .map(|attr| attr.trim_end_matches('?').to_string())
                    .collect();
            }
            _ => {}
        }
    }

    if let Some(last) = defs.last() {
        check_record(last)?;
    }

    Ok(defs)
}

fn check_record(def: &MarkerDef) -> Result<(), StylesheetError> {
    if def.style_type == StyleType::Paragraph
        && let Some(end_marker) = &def.end_marker
    {
        return Err(StylesheetError::ParagraphWithEndMarker {
            marker: def.marker.clone(),
            end_marker: end_marker.clone(),
        });
    }
    Ok(())
}

fn parse_style_type(value: &str) -> Option<StyleType> {
    match value.to_ascii_lowercase().as_str() {
        "paragraph" => Some(StyleType::Paragraph),
        "character" => Some(StyleType::Character),
        "note" => Some(StyleType::Note),
        "milestone" => Some(StyleType::Milestone),
        _ => None,
    }
}

fn parse_text_type(value: &str) -> TextType {
    match value.to_ascii_lowercase().as_str() {
        "versetext" => TextType::VerseText,
        "title" => TextType::Title,
        "section" => TextType::Section,
        "chapternumber" => TextType::ChapterNumber,
        "versenumber" => TextType::VerseNumber,
        "notetext" => TextType::NoteText,
        _ => TextType::Other,
    }
}
