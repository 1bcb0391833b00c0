//! Token source for the parser.
//!
//! This module provides the `Source` struct that wraps a token stream
//! and provides lookahead and consumption operations.

use crate::lexer::{Token, TokenKind};

/// A token source that provides tokens to the parser.
pub(crate) struct Source<'t, 'src> {
    tokens: &'t [Token],
    source: &'src str,
    cursor: usize,
}

impl<'t, 'src> Source<'t, 'src> {
    /// Creates a new source positioned at token index `cursor`.
    pub(crate) fn new(tokens: &'t [Token], source: &'src str, cursor: usize) -> Self {
        Self {
            tokens,
            source,
            cursor,
        }
    }

    /// Returns the current token kind, or `Eof` if at end.
    pub(crate) fn current(&self) -> TokenKind {
        self.peek_kind_n(0)
    }

    /// Returns the current token, or `None` if at end.
    pub(crate) fn current_token(&self) -> Option<&Token> {
        self.peek_token_n(0)
    }

    /// Peeks at the nth non-trivia token ahead.
    pub(crate) fn peek_kind_n(&self, n: usize) -> TokenKind {
        self.peek_token_n(n).map_or(TokenKind::Eof, |token| token.kind)
    }

    /// Peeks at the nth non-trivia token ahead and returns the token.
    pub(crate) fn peek_token_n(&self, n: usize) -> Option<&Token> {
        self.tokens[self.cursor.min(self.tokens.len())..]
            .iter()
            .filter(|token| !token.kind.is_trivia())
            .nth(n)
    }

    /// Advances past the current token.
    pub(crate) fn bump(&mut self) {
        while let Some(token) = self.tokens.get(self.cursor) {
            self.cursor += 1;
            if !token.kind.is_trivia() {
                break;
            }
        }
    }

    /// Returns `true` if at end of input.
    pub(crate) fn at_end(&self) -> bool {
        self.peek_kind_n(0) == TokenKind::Eof
    }

    /// Returns the text of the current token.
    pub(crate) fn current_text(&self) -> &'src str {
        self.current_token()
            .map(|t| &self.source[usize::from(t.range.start())..usize::from(t.range.end())])
            .unwrap_or("")
    }

    /// Returns the index of the next non-trivia token, or the token count at end.
    pub(crate) fn position(&self) -> usize {
        self.tokens[self.cursor.min(self.tokens.len())..]
            .iter()
            .position(|token| !token.kind.is_trivia())
            .map_or(self.tokens.len(), |skipped| self.cursor + skipped)
    }
}
