//! # Parsing
//!
//! Marker text to [`Book`]: the syntax crate produces the raw tag tree, the
//! [`builder`] shapes it into chapters and verses and normalizes the result.
//!
//! ```
//! use usfm_editor_engine::parsing::parse;
//!
//! let book = parse("\\id GEN\n\\c 1\n\\p\n\\v 1 In the beginning").unwrap();
//! assert_eq!(book.chapters[0].verses[1].plain_text(), "In the beginning");
//! ```

pub mod builder;
pub mod snapshot;

#[cfg(test)]
mod tests;

use usfm_editor_syntax::{ParseError, Taxonomy, parse_raw_with};

use crate::models::Book;

/// Parse marker text with the bundled stylesheet.
pub fn parse(text: &str) -> Result<Book, ParseError> {
    parse_with(text, Taxonomy::standard())
}

pub fn parse_with(text: &str, taxonomy: &Taxonomy) -> Result<Book, ParseError> {
    let nodes = parse_raw_with(text, taxonomy)?;
    Ok(builder::build(nodes, taxonomy))
}
