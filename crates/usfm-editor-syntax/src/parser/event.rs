//! # Parser Events
//!
//! The parser doesn't build [`RawNode`](crate::raw::RawNode)s directly. It
//! emits a flat sequence of events that the [`Sink`](super::sink::Sink)
//! assembles into a tree:
//!
//! ```text
//! \p                      StartParagraph(p)
//! \v 1 the \nd Lord\nd*   Finish
//!                         StartVerse(1)
//!                           Text("the ")
//!                           StartCharacter(nd)
//!                             Text("Lord")
//!                           Finish
//!                         Finish
//! ```
//!
//! Line-level scopes never nest: the parser finishes the open chapter, verse
//! or paragraph before starting the next one. Character scopes nest freely.
//! `Attributes` applies to the innermost open character scope.

use crate::attributes::Attribute;
use crate::label::VerseLabel;
use crate::taxonomy::StyleType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    StartChapter { number: String },
    StartVerse { label: VerseLabel },
    StartParagraph { marker: String },
    StartCharacter { marker: String },
    Attributes(Vec<Attribute>),
    Text(String),
    Opaque {
        marker: String,
        style: StyleType,
        source: String,
    },
    /// Close the innermost open scope.
    Finish,
}

impl Event {
    pub fn text(text: impl Into<String>) -> Self {
        Event::Text(text.into())
    }
}
