//! Token stream over raw script bytes.
//!
//! The scanner only segments words; it knows nothing about shell grammar.
//! Keyword recognition happens in the graph builder by exact text comparison.

use std::borrow::Cow;
use std::path::Path;

use serde::Deserialize;

use crate::error::Error;
use crate::grammar;

/// A lexical token. `end` is the byte offset just past the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    /// Byte offset of the byte after the token.
    pub end: usize,
    /// Token classification.
    pub kind: TokenKind,
    /// Token text. Identifiers are always ASCII.
    pub text: Cow<'a, str>,
}

/// Token classification. End of input is the iterator running dry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `[A-Za-z_][A-Za-z0-9_]*`
    Identifier,
    /// Anything else: operators, numbers, quoted strings, escapes.
    Other,
}

/// Which backend segments the script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TokenizerKind {
    /// Tree-sitter-bash leaf nodes.
    TreeSitter,
    /// Byte-level word scanner.
    #[default]
    Words,
}

/// Byte-oriented word scanner. Single forward pass, not restartable.
pub struct WordScanner<'a> {
    /// Current byte offset.
    pos: usize,
    /// Raw script bytes.
    src: &'a [u8],
}

impl<'a> WordScanner<'a> {
    /// Step past one byte.
    fn advance(&mut self) {
        self.pos = self.pos.saturating_add(1);
    }

    /// Advance while `pred` holds for the current byte.
    fn advance_while(&mut self, pred: impl Fn(u8) -> bool) {
        while self.byte_at(self.pos).is_some_and(&pred) {
            self.advance();
        }
    }

    /// Byte at `pos`, if any.
    fn byte_at(&self, pos: usize) -> Option<u8> {
        return self.src.get(pos).copied();
    }

    /// Whether a `#` at the current position starts a comment.
    fn comment_starts_here(&self) -> bool {
        let Some(prev_pos) = self.pos.checked_sub(1) else {
            return true;
        };
        return self
            .byte_at(prev_pos)
            .is_none_or(|b| return b.is_ascii_whitespace() || matches!(b, b';' | b'&' | b'|' | b'(' | b')'));
    }

    /// Consume a quoted span starting at the opening quote. Unterminated
    /// quotes run to end of input.
    fn consume_quoted(&mut self, quote: u8) {
        self.advance();
        while let Some(b) = self.byte_at(self.pos) {
            self.advance();
            if b == quote {
                return;
            }
            if b == b'\\' && quote == b'"' {
                self.advance();
            }
        }
        self.pos = self.pos.min(self.src.len());
        return;
    }

    /// Build a token covering `start..self.pos`.
    fn emit(&self, start: usize, kind: TokenKind) -> Token<'a> {
        let bytes = self.src.get(start..self.pos).unwrap_or_default();
        return Token {
            end: self.pos,
            kind,
            text: String::from_utf8_lossy(bytes),
        };
    }

    /// Create a scanner positioned at the start of `src`.
    pub const fn new(src: &'a [u8]) -> Self {
        return Self { pos: 0, src };
    }

    /// Skip whitespace and comments.
    fn skip_trivia(&mut self) {
        loop {
            self.advance_while(|b| return b.is_ascii_whitespace());
            if self.byte_at(self.pos) == Some(b'#') && self.comment_starts_here() {
                self.advance_while(|b| return b != b'\n');
                continue;
            }
            return;
        }
    }
}

impl<'a> Iterator for WordScanner<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        self.skip_trivia();
        let start = self.pos;
        let first = self.byte_at(start)?;

        if is_ident_start(first) {
            self.advance_while(is_ident_continue);
            return Some(self.emit(start, TokenKind::Identifier));
        }

        match first {
            b'0'..=b'9' => self.advance_while(is_ident_continue),
            b'\'' | b'"' => self.consume_quoted(first),
            b'\\' => {
                self.advance();
                if self.pos < self.src.len() {
                    self.advance();
                }
            },
            _ => self.advance(),
        }
        return Some(self.emit(start, TokenKind::Other));
    }
}

/// `[A-Za-z0-9_]`
const fn is_ident_continue(b: u8) -> bool {
    return b.is_ascii_alphanumeric() || b == b'_';
}

/// `[A-Za-z_]`
const fn is_ident_start(b: u8) -> bool {
    return b.is_ascii_alphabetic() || b == b'_';
}

/// Whether `text` is a complete identifier.
pub fn is_identifier(text: &str) -> bool {
    let mut bytes = text.bytes();
    return bytes.next().is_some_and(is_ident_start) && bytes.all(is_ident_continue);
}

/// Tokenize `source` with the selected backend.
///
/// # Errors
///
/// Returns `Error::ParseFailed` if the tree-sitter backend cannot parse `file`.
pub fn tokens<'a>(
    kind: TokenizerKind,
    file: &Path,
    source: &'a [u8],
) -> Result<Box<dyn Iterator<Item = Token<'a>> + 'a>, Error> {
    let stream: Box<dyn Iterator<Item = Token<'a>> + 'a> = match kind {
        TokenizerKind::TreeSitter => Box::new(grammar::leaf_tokens(file, source)?.into_iter()),
        TokenizerKind::Words => Box::new(WordScanner::new(source)),
    };
    return Ok(stream);
}
