//! # Parser - Marker Text to Raw Tag Tree
//!
//! The parser walks the token stream and emits [`Event`]s; the [`Sink`]
//! turns those into [`RawNode`]s. Unlike a generic CST, the output is not
//! lossless: the parser drops exactly the bytes the serializer knows how to
//! reconstruct.
//!
//! ## Delimiters
//!
//! One space or tab after a marker is its delimiter and is consumed, as is
//! the one after a chapter or verse number. Any further whitespace is
//! content. A newline after a marker is content too, except the one ending a
//! `\c N` line.
//!
//! ## Structural Newlines
//!
//! The run of newlines immediately before a line-level marker (`\c`, `\v`,
//! paragraph markers) is dropped. Newlines at the end of the input are kept.
//!
//! ## Scopes
//!
//! The parser keeps two kinds of open scope:
//!
//! - at most one **line-level** scope (chapter, verse or paragraph), finished
//!   by the next line-level marker
//! - a stack of **character** spans, closed by their end markers or
//!   implicitly when the line-level scope ends
//!
//! An end marker closes the innermost span with the same tag, implicitly
//! closing any spans opened after it. An end marker with nothing to close is
//! an error; no partial tree is returned.
//!
//! ## Module Structure
//!
//! - [`event`] - The Event enum
//! - [`sink`] - Converts events to raw nodes
//! - `grammar` - Grammar rules (root, line-level, inline)
//!
//! ## Public API
//!
//! ```
//! use usfm_editor_syntax::{RawNode, parse_raw};
//!
//! let nodes = parse_raw("\\c 1\n\\p\n\\v 1 In the beginning").unwrap();
//! assert!(matches!(nodes[0], RawNode::Chapter { .. }));
//! assert_eq!(nodes.len(), 3);
//! ```

pub mod event;
pub mod sink;

mod grammar;

use crate::error::ParseError;
use crate::lexer::{Token, TokenKind, lex};
use crate::raw::RawNode;
use crate::taxonomy::Taxonomy;
use event::Event;
use sink::Sink;

/// A character span that has been opened but not yet closed.
#[derive(Debug, Clone)]
struct OpenSpan {
    tag: String,
    accepts_attributes: bool,
    offset: usize,
}

/// The parser state machine.
///
/// Grammar functions receive `&mut Parser` and use its methods to inspect
/// tokens (`current()`, `nth()`, `at()`), consume them (`bump()`,
/// `bump_text()`, `eat_delimiter()`) and manage scopes (`open_line()`,
/// `open_span()`, `close_span()`).
pub struct Parser<'t, 'input> {
    tokens: &'t [Token<'input>],
    taxonomy: &'t Taxonomy,
    pos: usize,
    events: Vec<Event>,
    pending: String,
    spans: Vec<OpenSpan>,
    line_open: bool,
    chapter_seen: bool,
    verse_in_chapter: bool,
}

impl<'t, 'input> Parser<'t, 'input> {
    pub fn new(tokens: &'t [Token<'input>], taxonomy: &'t Taxonomy) -> Self {
        Self {
            tokens,
            taxonomy,
            pos: 0,
            events: Vec::new(),
            pending: String::new(),
            spans: Vec::new(),
            line_open: false,
            chapter_seen: false,
            verse_in_chapter: false,
        }
    }

    /// Parse the tokens and return the raw tree.
    pub fn parse(mut self) -> Result<Vec<RawNode>, ParseError> {
        grammar::root(&mut self)?;
        Ok(Sink::new(self.events).finish())
    }

    pub fn taxonomy(&self) -> &'t Taxonomy {
        self.taxonomy
    }

    /// Current token, or `None` at end of input.
    pub fn current(&self) -> Option<&'t Token<'input>> {
        self.nth(0)
    }

    /// Look ahead n tokens.
    pub fn nth(&self, n: usize) -> Option<&'t Token<'input>> {
        self.tokens.get(self.pos + n)
    }

    pub fn at(&self, kind: TokenKind) -> bool {
        self.current().is_some_and(|t| t.kind == kind)
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Consume the current token without emitting anything.
    pub fn bump(&mut self) -> Option<&'t Token<'input>> {
        let token = self.current()?;
        self.pos += 1;
        Some(token)
    }

    /// Consume the current token as content.
    pub fn bump_text(&mut self) {
        if let Some(token) = self.bump() {
            self.pending.push_str(token.text);
        }
    }

    /// Jump to token index `pos`, discarding everything in between.
    fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.tokens.len());
    }

    fn position(&self) -> usize {
        self.pos
    }

    /// Consume the one-character delimiter after a marker or number.
    ///
    /// Whitespace beyond the first space or tab becomes content.
    pub fn eat_delimiter(&mut self) {
        if let Some(token) = self.current()
            && token.kind == TokenKind::Whitespace
        {
            self.pos += 1;
            // Whitespace tokens are spaces and tabs, one byte each
            self.pending.push_str(&token.text[1..]);
        }
    }

    /// Skip horizontal whitespace, e.g. between `\v` and its number.
    pub fn skip_whitespace(&mut self) {
        while self.at(TokenKind::Whitespace) {
            self.pos += 1;
        }
    }

    pub fn push_text(&mut self, text: &str) {
        self.pending.push_str(text);
    }

    pub fn has_pending_text(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Emit accumulated content as one text event.
    fn flush(&mut self) {
        if !self.pending.is_empty() {
            let text = std::mem::take(&mut self.pending);
            self.events.push(Event::Text(text));
        }
    }

    /// Flush pending content and emit `event`.
    pub fn emit(&mut self, event: Event) {
        self.flush();
        self.events.push(event);
    }

    /// Drop the newlines that separate the previous content from the next
    /// line-level marker.
    fn trim_structural_newlines(&mut self) {
        while self.pending.ends_with('\n') {
            self.pending.pop();
            if self.pending.ends_with('\r') {
                self.pending.pop();
            }
        }
    }

    /// Finish every open scope and start a new line-level one.
    pub fn open_line(&mut self, event: Event) {
        self.trim_structural_newlines();
        self.close_line();
        self.events.push(event);
        self.line_open = true;
    }

    /// Close any open spans and the line-level scope.
    fn close_line(&mut self) {
        self.flush();
        self.close_spans_from(0);
        if self.line_open {
            self.events.push(Event::Finish);
            self.line_open = false;
        }
    }

    fn close_spans_from(&mut self, depth: usize) {
        while self.spans.len() > depth {
            if let Some(span) = self.spans.pop() {
                log::debug!(
                    "implicitly closing \\{} opened at byte {}",
                    span.tag,
                    span.offset
                );
                self.events.push(Event::Finish);
            }
        }
    }

    pub fn open_span(&mut self, tag: &str, accepts_attributes: bool, offset: usize) {
        self.emit(Event::StartCharacter {
            marker: tag.to_string(),
        });
        self.spans.push(OpenSpan {
            tag: tag.to_string(),
            accepts_attributes,
            offset,
        });
    }

    /// Close the innermost span tagged `tag`, and everything opened after it.
    ///
    /// Returns `false` if no such span is open.
    pub fn close_span(&mut self, tag: &str) -> bool {
        let Some(depth) = self.spans.iter().rposition(|span| span.tag == tag) else {
            return false;
        };
        self.flush();
        self.close_spans_from(depth + 1);
        self.spans.pop();
        self.events.push(Event::Finish);
        true
    }

    /// Tag of the innermost open span, if it takes attributes.
    fn attribute_span(&self) -> Option<&str> {
        self.spans
            .last()
            .filter(|span| span.accepts_attributes)
            .map(|span| span.tag.as_str())
    }

    /// Index of the first token after the current one matching `found`,
    /// stopping with `None` at a token matching `stop`.
    fn find_ahead(
        &self,
        found: impl Fn(&Token<'input>) -> bool,
        stop: impl Fn(&Token<'input>) -> bool,
    ) -> Option<usize> {
        for (i, token) in self.tokens.iter().enumerate().skip(self.pos + 1) {
            if found(token) {
                return Some(i);
            }
            if stop(token) {
                return None;
            }
        }
        None
    }

    /// Whether `token` is a marker that starts a line-level scope.
    pub fn is_line_marker(&self, token: &Token<'_>) -> bool {
        token.kind == TokenKind::Marker
            && self
                .taxonomy
                .get(token.tag())
                .is_some_and(|def| def.is_line_level())
    }

    /// Source text of tokens `from..to`.
    fn source(&self, from: usize, to: usize) -> String {
        self.tokens[from..to].iter().map(|t| t.text).collect()
    }

    fn finish(&mut self) {
        self.close_line();
    }
}

/// Parse marker text with the bundled taxonomy.
pub fn parse_raw(source: &str) -> Result<Vec<RawNode>, ParseError> {
    parse_raw_with(source, Taxonomy::standard())
}

/// Parse marker text with a custom taxonomy.
pub fn parse_raw_with(source: &str, taxonomy: &Taxonomy) -> Result<Vec<RawNode>, ParseError> {
    let tokens = lex(source);
    Parser::new(&tokens, taxonomy).parse()
}
