//! # Lexer - Tokenizing Marker Text
//!
//! The first stage of parsing breaks USFM source into tokens using the
//! [Logos] lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! Every byte of the input appears in exactly one token. Nothing is skipped,
//! so the parser can always recover the exact source slice of a note or a
//! milestone:
//!
//! ```
//! use usfm_editor_syntax::lexer::lex;
//!
//! let input = "\\v 1 In the \\nd Lord\\nd*\n";
//! let tokens = lex(input);
//!
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## Token Design
//!
//! Tokens are context-free. The lexer doesn't know whether `\q1` opens a
//! poetry line or whether `\w` accepts attributes; that needs the
//! [`Taxonomy`](crate::taxonomy::Taxonomy) and is the parser's job.
//!
//! | Token | Example |
//! |-------|---------|
//! | `Marker` | `\p`, `\v`, `\+nd`, `\qt-s` |
//! | `EndMarker` | `\nd*`, `\+w*` |
//! | `MilestoneClose` | `\*` |
//! | `Pipe` | `\|` (attribute separator) |
//! | `Newline` | `\n`, `\r\n` |
//! | `Whitespace` | spaces and tabs |
//! | `Text` | everything else |
//!
//! A lone backslash that doesn't start a marker is a Logos error; it is kept
//! as `Text`.

use logos::Logos;

/// Token kinds produced by the Logos lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"")]
pub enum TokenKind {
    /// Opening marker, optionally nested with `+`
    #[regex(r"\\\+?[A-Za-z][A-Za-z0-9_\-]*")]
    Marker,

    /// Closing marker: the opening tag followed by `*`
    #[regex(r"\\\+?[A-Za-z][A-Za-z0-9_\-]*\*")]
    EndMarker,

    /// `\*` closing a milestone
    #[token(r"\*")]
    MilestoneClose,

    /// `|` separating a word from its attributes
    #[token("|")]
    Pipe,

    /// Line ending (LF or CRLF)
    #[regex(r"\r?\n")]
    Newline,

    /// Horizontal whitespace (spaces, tabs)
    #[regex(r"[ \t]+")]
    Whitespace,

    /// Plain text - anything not matched by other rules
    #[regex(r"[^\\|\s]+")]
    Text,
}

/// A lexed token with its kind, text slice and byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub offset: usize,
}

impl<'a> Token<'a> {
    /// The marker name without the backslash, `+` prefix or `*` suffix.
    ///
    /// Returns an empty string for tokens that are not markers.
    pub fn tag(&self) -> &'a str {
        match self.kind {
            TokenKind::Marker | TokenKind::EndMarker => marker_tag(self.text),
            _ => "",
        }
    }

    /// Whether the marker was written with the nesting `+` prefix.
    pub fn is_nested(&self) -> bool {
        matches!(self.kind, TokenKind::Marker | TokenKind::EndMarker)
            && self.text.starts_with(r"\+")
    }
}

/// Strip the backslash, nesting prefix and end-marker star from a marker.
pub fn marker_tag(text: &str) -> &str {
    let text = text.strip_prefix('\\').unwrap_or(text);
    let text = text.strip_prefix('+').unwrap_or(text);
    text.strip_suffix('*').unwrap_or(text)
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let kind = match result {
            Ok(kind) => kind,
            // Unrecognized character (a lone backslash) - treat as text
            Err(()) => TokenKind::Text,
        };
        tokens.push(Token {
            kind,
            text: lexer.slice(),
            offset: lexer.span().start,
        });
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(input: &str) -> Vec<(TokenKind, &str)> {
        lex(input).into_iter().map(|t| (t.kind, t.text)).collect()
    }

    #[test]
    fn lex_empty_input() {
        assert_eq!(lex(""), vec![]);
    }

    #[test]
    fn lex_verse_line() {
        assert_eq!(
            kinds("\\v 1 In the beginning"),
            vec![
                (TokenKind::Marker, "\\v"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Text, "1"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Text, "In"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Text, "the"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Text, "beginning"),
            ]
        );
    }

    #[test]
    fn lex_character_span() {
        assert_eq!(
            kinds("\\nd Lord\\nd*"),
            vec![
                (TokenKind::Marker, "\\nd"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Text, "Lord"),
                (TokenKind::EndMarker, "\\nd*"),
            ]
        );
    }

    #[test]
    fn lex_nested_markers() {
        let tokens = lex("\\+w x\\+w*");
        assert_eq!(tokens[0].kind, TokenKind::Marker);
        assert!(tokens[0].is_nested());
        assert_eq!(tokens[0].tag(), "w");
        assert_eq!(tokens[3].kind, TokenKind::EndMarker);
        assert_eq!(tokens[3].tag(), "w");
    }

    #[test]
    fn lex_attributes() {
        assert_eq!(
            kinds("\\w grace|lemma=\"g\"\\w*"),
            vec![
                (TokenKind::Marker, "\\w"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Text, "grace"),
                (TokenKind::Pipe, "|"),
                (TokenKind::Text, "lemma=\"g\""),
                (TokenKind::EndMarker, "\\w*"),
            ]
        );
    }

    #[test]
    fn lex_milestone() {
        assert_eq!(
            kinds("\\qt-s |sid=\"a\"\\*"),
            vec![
                (TokenKind::Marker, "\\qt-s"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Pipe, "|"),
                (TokenKind::Text, "sid=\"a\""),
                (TokenKind::MilestoneClose, "\\*"),
            ]
        );
    }

    #[test]
    fn lex_crlf_newline() {
        assert_eq!(
            kinds("\\p\r\n"),
            vec![(TokenKind::Marker, "\\p"), (TokenKind::Newline, "\r\n")]
        );
    }

    #[test]
    fn lone_backslash_is_text() {
        let tokens = lex("a \\ b");
        assert!(tokens.iter().all(|t| t.kind != TokenKind::Marker));
        assert_eq!(tokens[2].text, "\\");
        assert_eq!(tokens[2].kind, TokenKind::Text);
    }

    #[test]
    fn offsets_match_source() {
        let input = "\\c 1\n\\p\n\\v 1 text\\f + \\ft note\\f*";
        for token in lex(input) {
            assert_eq!(&input[token.offset..token.offset + token.text.len()], token.text);
        }
    }

    #[test]
    fn all_bytes_preserved() {
        let input = "\\id GEN\n\\c 1\n\\q1 \\wj a \\+nd b\\+nd*\\wj* | \\ts\\*\n";
        let reconstructed: String = lex(input).iter().map(|t| t.text).collect();
        assert_eq!(input, reconstructed);
    }
}
