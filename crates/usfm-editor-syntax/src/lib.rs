//! # usfm-editor-syntax
//!
//! Marker taxonomy, tokenizer and parser for USFM, the line-oriented
//! backslash-tag markup Scripture text is exchanged in.
//!
//! ## Architecture Overview
//!
//! ```text
//! Source Text → Lexer → Tokens → Parser → Events → Sink → Raw Tag Tree
//!               (Logos)          (Grammar + Taxonomy)
//! ```
//!
//! ### 1. Taxonomy ([`taxonomy`] module)
//!
//! Every marker's behaviour (paragraph, character span, note, milestone) is
//! data, loaded from a stylesheet. The bundled one is
//! [`Taxonomy::standard`].
//!
//! ### 2. Lexer ([`lexer`] module)
//!
//! A [Logos] tokenizer that splits source into markers, end markers, pipes,
//! whitespace and text without losing a byte.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ### 3. Parser ([`parser`] module)
//!
//! Consumes tokens, consults the taxonomy and emits events. Line-level
//! markers (`\c`, `\v`, `\p`...) become flat siblings; character spans nest.
//! Notes and milestones are kept verbatim as [`RawNode::Opaque`].
//!
//! ## Module Structure
//!
//! ```text
//! usfm-editor-syntax/
//! ├── lib.rs           # This file - public API and integration tests
//! ├── lexer.rs         # Logos-based tokenizer
//! ├── label.rs         # Verse labels (3, 5-7, front)
//! ├── attributes.rs    # |key="value" word attributes
//! ├── raw.rs           # RawNode tree and outline dump
//! ├── error.rs         # ParseError
//! ├── taxonomy/
//! │   ├── mod.rs       # MarkerDef, Taxonomy lookup
//! │   └── stylesheet.rs# .sty loader
//! └── parser/
//!     ├── mod.rs       # Parser state, scopes, parse_raw()
//!     ├── event.rs     # Event enum
//!     ├── sink.rs      # Events to RawNode
//!     └── grammar/
//!         ├── mod.rs   # Root loop and marker dispatch
//!         ├── line.rs  # Chapters, verses, paragraphs
//!         └── inline.rs# Spans, attributes, notes, milestones
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use usfm_editor_syntax::{RawNode, VerseLabel, parse_raw};
//!
//! let nodes = parse_raw("\\c 1\n\\v 1 In the beginning").unwrap();
//!
//! assert_eq!(
//!     nodes[1],
//!     RawNode::Verse {
//!         label: VerseLabel::Single(1),
//!         children: vec![RawNode::text("In the beginning")],
//!     }
//! );
//! ```

pub mod attributes;
pub mod error;
pub mod label;
pub mod lexer;
pub mod parser;
pub mod raw;
pub mod taxonomy;

pub use attributes::{Attribute, format_attributes, parse_attributes};
pub use error::ParseError;
pub use label::{LabelError, VerseLabel};
pub use parser::{parse_raw, parse_raw_with};
pub use raw::RawNode;
pub use taxonomy::{MarkerDef, StyleType, StylesheetError, Taxonomy, TextType};
