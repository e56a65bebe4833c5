//! # Marker Taxonomy
//!
//! The static table of every marker the editor recognizes, loaded once from
//! a stylesheet and read-only afterwards.
//!
//! Each [`MarkerDef`] says how a marker behaves structurally:
//!
//! | StyleType | Behaviour | Examples |
//! |-----------|-----------|----------|
//! | Paragraph | starts a line-level block, never has an end marker | `\p`, `\q1`, `\s1`, `\c` |
//! | Character | inline span closed by its end marker, or self-delimiting | `\nd ...\nd*`, `\tc1` |
//! | Note | raw zone kept verbatim up to its end marker | `\f ...\f*` |
//! | Milestone | standalone marker closed by `\*` | `\qt-s\*` |
//!
//! `\c` and `\v` are recognized by their `TextType` (`ChapterNumber`,
//! `VerseNumber`) rather than by name, so a stylesheet may rename them.
//!
//! ## Numbered Variants
//!
//! `q1`, `q2`, `q3`... share one definition. [`Taxonomy::get`] falls back from
//! a numbered tag to its base (`q4` → `q`), and then to the first level
//! (`tc3` → `tc1`) when only numbered levels are defined.

mod stylesheet;

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

pub use stylesheet::{StylesheetError, parse_stylesheet};

/// The stylesheet bundled with the crate.
pub const STANDARD_STYLESHEET: &str = include_str!("../../assets/usfm.sty");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StyleType {
    Paragraph,
    Character,
    Note,
    Milestone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextType {
    VerseText,
    Title,
    Section,
    ChapterNumber,
    VerseNumber,
    NoteText,
    Other,
}

/// Definition of a single marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerDef {
    pub marker: String,
    pub name: String,
    pub end_marker: Option<String>,
    pub style_type: StyleType,
    pub text_type: TextType,
    pub occurs_under: Vec<String>,
    pub rank: Option<u8>,
    /// Attribute names, the first being the default attribute.
    pub attributes: Vec<String>,
}

impl MarkerDef {
    /// A paragraph marker with no other properties; records start like this.
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            name: String::new(),
            end_marker: None,
            style_type: StyleType::Paragraph,
            text_type: TextType::Other,
            occurs_under: Vec::new(),
            rank: None,
            attributes: Vec::new(),
        }
    }

    pub fn is_chapter(&self) -> bool {
        self.text_type == TextType::ChapterNumber && self.style_type == StyleType::Paragraph
    }

    pub fn is_verse(&self) -> bool {
        self.text_type == TextType::VerseNumber
    }

    /// Character markers that end at the next marker instead of an end tag.
    ///
    /// Table cells and note-internal markers (`\tc1`, `\ft`) work this way.
    pub fn is_self_closing(&self) -> bool {
        self.style_type == StyleType::Character && self.end_marker.is_none() && !self.is_verse()
    }

    pub fn accepts_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }

    /// Whether plain verse content may flow into a paragraph of this marker.
    pub fn accepts_verse_text(&self) -> bool {
        self.style_type == StyleType::Paragraph && self.text_type == TextType::VerseText
    }

    /// Whether this marker opens a line-level scope (chapter, verse, paragraph).
    pub fn is_line_level(&self) -> bool {
        self.is_verse() || self.style_type == StyleType::Paragraph
    }
}

/// Lookup table of marker definitions.
#[derive(Debug, Clone, Default)]
pub struct Taxonomy {
    defs: Vec<MarkerDef>,
    index: HashMap<String, usize>,
}

impl Taxonomy {
    /// Parse a stylesheet. Later records for the same tag replace earlier ones.
    pub fn parse(source: &str) -> Result<Self, StylesheetError> {
        Ok(Self::from_defs(parse_stylesheet(source)?))
    }

    pub fn from_defs(defs: impl IntoIterator<Item = MarkerDef>) -> Self {
        let mut taxonomy = Taxonomy::default();
        for def in defs {
            taxonomy.insert(def);
        }
        taxonomy
    }

    /// The bundled stylesheet, parsed on first use.
    pub fn standard() -> &'static Taxonomy {
        static STANDARD: OnceLock<Taxonomy> = OnceLock::new();
        STANDARD.get_or_init(|| {
            Taxonomy::parse(STANDARD_STYLESHEET).expect("Invalid bundled stylesheet")
        })
    }

    fn insert(&mut self, def: MarkerDef) {
        match self.index.get(&def.marker) {
            Some(&i) => self.defs[i] = def,
            None => {
                self.index.insert(def.marker.clone(), self.defs.len());
                self.defs.push(def);
            }
        }
    }

    /// Look up a marker by tag.
    ///
    /// A leading `+` is ignored. Numbered variants fall back to their base.
    pub fn get(&self, tag: &str) -> Option<&MarkerDef> {
        let tag = tag.strip_prefix('+').unwrap_or(tag);
        if let Some(def) = self.exact(tag) {
            return Some(def);
        }

        let base = tag.trim_end_matches(|c: char| c.is_ascii_digit());
        if base.is_empty() || base.len() == tag.len() {
            return None;
        }
        self.exact(base).or_else(|| self.exact(&format!("{base}1")))
    }

    fn exact(&self, tag: &str) -> Option<&MarkerDef> {
        self.index.get(tag).map(|&i| &self.defs[i])
    }

    /// Marker definitions in stylesheet order.
    pub fn markers(&self) -> impl Iterator<Item = &MarkerDef> {
        self.defs.iter()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Whether paragraphs tagged `marker` accept verse text.
    ///
    /// Unknown markers are assumed to.
    pub fn accepts_verse_text(&self, marker: &str) -> bool {
        self.get(marker).is_none_or(MarkerDef::accepts_verse_text)
    }
}
