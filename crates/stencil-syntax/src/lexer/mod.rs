//! Lexer for directive-based templates.
//!
//! Templates are lexed in two modes. In text mode the lexer scans markup for
//! the constructs that open code (`{{`, `{{{`, `@name(`) and emits everything
//! else as `Text`. In code mode the `logos`-generated [`TokenKind`] matcher
//! runs until the construct that opened it is closed again.

mod tokens;

pub use tokens::TokenKind;

use logos::Logos;
use std::collections::VecDeque;
use text_size::{TextRange, TextSize};

/// A token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The byte range of the token in the source text.
    pub range: TextRange,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub fn new(kind: TokenKind, range: TextRange) -> Self {
        Self { kind, range }
    }

    /// Returns the length of the token in bytes.
    #[must_use]
    pub fn len(&self) -> TextSize {
        self.range.len()
    }

    /// Returns true if the token has zero length.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Text,
    /// Inside `{{ ... }}` (`raw == false`) or `{{{ ... }}}` (`raw == true`).
    Interpolation {
        raw: bool,
    },
    /// Inside a directive argument list; `depth` counts open parentheses.
    Arguments {
        depth: u32,
    },
}

/// Lexer for template source text.
///
/// The lexer is an iterator over tokens. It handles all error recovery
/// internally - any unrecognized characters are returned as `TokenKind::Error`.
/// The source must be shorter than `u32::MAX` bytes.
pub struct Lexer<'src> {
    source: &'src str,
    offset: usize,
    mode: Mode,
    pending: VecDeque<Token>,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source text.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            offset: 0,
            mode: Mode::Text,
            pending: VecDeque::new(),
        }
    }

    /// Returns the source text being lexed.
    #[must_use]
    pub fn source(&self) -> &'src str {
        self.source
    }

    fn emit(&mut self, kind: TokenKind, len: usize) -> Token {
        let start = self.offset;
        self.offset += len;
        Token::new(kind, text_range(start, self.offset))
    }

    fn lex_text(&mut self) -> Token {
        let rest = &self.source[self.offset..];

        if let Some(body) = rest.strip_prefix("{{--") {
            let len = body.find("--}}").map_or(rest.len(), |end| end + 8);
            return self.emit(TokenKind::TemplateComment, len);
        }
        if rest.starts_with("{{{") {
            self.mode = Mode::Interpolation { raw: true };
            return self.emit(TokenKind::RawMustacheOpen, 3);
        }
        if rest.starts_with("{{") {
            self.mode = Mode::Interpolation { raw: false };
            return self.emit(TokenKind::MustacheOpen, 2);
        }
        if let Some(body) = rest.strip_prefix("@{{") {
            let len = body.find("}}").map_or(rest.len(), |end| end + 5);
            return self.emit(TokenKind::EscapedMustache, len);
        }
        if let Some(len) = directive_name_len(self.source, self.offset) {
            if arguments_follow(self.source, self.offset + len) {
                self.mode = Mode::Arguments { depth: 0 };
            }
            return self.emit(TokenKind::DirectiveName, len);
        }

        let bytes = self.source.as_bytes();
        let mut end = self.offset + 1;
        while end < bytes.len() && !starts_construct(self.source, end) {
            end += 1;
        }
        let len = end - self.offset;
        self.emit(TokenKind::Text, len)
    }

    fn lex_code(&mut self) -> Token {
        if directive_name_len(self.source, self.offset).is_some() {
            // A directive cannot live inside code; the enclosing construct is unterminated.
            self.mode = Mode::Text;
            return self.lex_text();
        }

        let mut inner = TokenKind::lexer(&self.source[self.offset..]);
        let kind = inner
            .next()
            .map_or(TokenKind::Error, |kind| kind.unwrap_or(TokenKind::Error));
        let mut len = inner.span().end.max(1);
        while !self.source.is_char_boundary(self.offset + len) {
            len += 1;
        }

        match (self.mode, kind) {
            (Mode::Interpolation { raw: false }, TokenKind::MustacheClose)
            | (Mode::Interpolation { raw: true }, TokenKind::RawMustacheClose) => {
                self.mode = Mode::Text;
                self.emit(kind, len)
            }
            (Mode::Interpolation { raw: false }, TokenKind::RawMustacheClose) => {
                self.mode = Mode::Text;
                self.emit(TokenKind::MustacheClose, 2)
            }
            (Mode::Interpolation { .. } | Mode::Arguments { .. }, TokenKind::MustacheClose)
            | (Mode::Arguments { .. }, TokenKind::RawMustacheClose) => self.split_braces(len),
            (Mode::Arguments { depth }, TokenKind::LParen) => {
                self.mode = Mode::Arguments { depth: depth + 1 };
                self.emit(kind, len)
            }
            (Mode::Arguments { depth }, TokenKind::RParen) => {
                let depth = depth.saturating_sub(1);
                self.mode = if depth == 0 {
                    Mode::Text
                } else {
                    Mode::Arguments { depth }
                };
                self.emit(kind, len)
            }
            _ => self.emit(kind, len),
        }
    }

    /// Splits a run of closing braces that does not close the current construct.
    fn split_braces(&mut self, count: usize) -> Token {
        for _ in 0..count {
            let token = self.emit(TokenKind::RBrace, 1);
            self.pending.push_back(token);
        }
        self.pending
            .pop_front()
            .unwrap_or_else(|| Token::new(TokenKind::Error, text_range(self.offset, self.offset)))
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(token) = self.pending.pop_front() {
            return Some(token);
        }
        if self.offset >= self.source.len() {
            return None;
        }

        Some(match self.mode {
            Mode::Text => self.lex_text(),
            Mode::Interpolation { .. } | Mode::Arguments { .. } => self.lex_code(),
        })
    }
}

/// Returns the byte length of the directive name starting at `offset`, if any.
///
/// A directive is `@` or `@!` followed by an ASCII identifier. An `@` preceded by
/// an identifier character (`user@example.com`) or by another `@` (`@@if`, the
/// escape for a literal `@if`) does not start a directive.
#[must_use]
pub fn directive_name_len(source: &str, offset: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    if bytes.get(offset) != Some(&b'@') {
        return None;
    }
    if offset > 0 && (is_ident_byte(bytes[offset - 1]) || bytes[offset - 1] == b'@') {
        return None;
    }

    let mut end = offset + 1;
    if bytes.get(end) == Some(&b'!') {
        end += 1;
    }
    match bytes.get(end) {
        Some(byte) if byte.is_ascii_alphabetic() || *byte == b'_' => end += 1,
        _ => return None,
    }
    while bytes.get(end).is_some_and(|byte| is_ident_byte(*byte)) {
        end += 1;
    }
    Some(end - offset)
}

fn is_ident_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// An argument list belongs to a directive only when `(` follows on the same line.
fn arguments_follow(source: &str, offset: usize) -> bool {
    source[offset..]
        .bytes()
        .find(|byte| !matches!(byte, b' ' | b'\t'))
        == Some(b'(')
}

fn starts_construct(source: &str, offset: usize) -> bool {
    let rest = &source.as_bytes()[offset..];
    match rest.first() {
        Some(b'{') => rest.get(1) == Some(&b'{'),
        Some(b'@') => rest.starts_with(b"@{{") || directive_name_len(source, offset).is_some(),
        _ => false,
    }
}

fn text_range(start: usize, end: usize) -> TextRange {
    TextRange::new(TextSize::from(start as u32), TextSize::from(end as u32))
}

/// Lex the entire source and return all tokens.
///
/// This is a convenience function for testing and simple use cases.
/// For the parser, use the `Lexer` iterator directly.
#[must_use]
pub fn lex(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}

/// Lex source and return tokens paired with their text.
///
/// Useful for debugging and testing.
#[must_use]
pub fn lex_with_text(source: &str) -> Vec<(Token, &str)> {
    Lexer::new(source)
        .map(|token| {
            let text = &source[usize::from(token.range.start())..usize::from(token.range.end())];
            (token, text)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).into_iter().map(|token| token.kind).collect()
    }

    #[test]
    fn test_lexer_basic() {
        let source = "<p>{{ name }}</p>";
        let tokens = lex_with_text(source);
        let texts: Vec<_> = tokens.iter().map(|(_, text)| *text).collect();
        assert_eq!(texts, vec!["<p>", "{{", " ", "name", " ", "}}", "</p>"]);
    }

    #[test]
    fn test_lexer_preserves_positions() {
        let tokens = lex("ab {{x}}");
        assert_eq!(tokens[0].range, TextRange::new(0.into(), 3.into()));
        assert_eq!(tokens[1].kind, TokenKind::MustacheOpen);
        assert_eq!(tokens[1].range, TextRange::new(3.into(), 5.into()));
    }

    #[test]
    fn test_at_after_identifier_is_text() {
        let tokens = lex("ab@if(x)");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Text);
    }

    #[test]
    fn test_directive_after_whitespace() {
        assert_eq!(
            kinds("a @if(x)"),
            vec![
                TokenKind::Text,
                TokenKind::DirectiveName,
                TokenKind::LParen,
                TokenKind::Ident,
                TokenKind::RParen
            ]
        );
    }

    #[test]
    fn test_email_is_text() {
        assert_eq!(kinds("mail user@example.com"), vec![TokenKind::Text]);
    }

    #[test]
    fn test_double_at_escapes_directive() {
        assert_eq!(kinds("@@if"), vec![TokenKind::Text]);
    }

    #[test]
    fn test_arguments_require_same_line() {
        assert_eq!(
            kinds("@else\n(x)"),
            vec![TokenKind::DirectiveName, TokenKind::Text]
        );
        assert_eq!(
            kinds("@if (x)"),
            vec![
                TokenKind::DirectiveName,
                TokenKind::Whitespace,
                TokenKind::LParen,
                TokenKind::Ident,
                TokenKind::RParen
            ]
        );
    }

    #[test]
    fn test_nested_parentheses_stay_in_arguments() {
        let tokens = lex_with_text("@if(f(a)) b");
        let last = tokens.last().map(|(token, text)| (token.kind, *text));
        assert_eq!(last, Some((TokenKind::Text, " b")));
    }

    #[test]
    fn test_raw_interpolation_splits_inner_braces() {
        assert_eq!(
            kinds("{{{ a }} }}}"),
            vec![
                TokenKind::RawMustacheOpen,
                TokenKind::Whitespace,
                TokenKind::Ident,
                TokenKind::Whitespace,
                TokenKind::RBrace,
                TokenKind::RBrace,
                TokenKind::Whitespace,
                TokenKind::RawMustacheClose
            ]
        );
    }

    #[test]
    fn test_escaped_interpolation_closes_on_triple_brace() {
        assert_eq!(
            kinds("{{ a }}}"),
            vec![
                TokenKind::MustacheOpen,
                TokenKind::Whitespace,
                TokenKind::Ident,
                TokenKind::Whitespace,
                TokenKind::MustacheClose,
                TokenKind::Text
            ]
        );
    }

    #[test]
    fn test_comment_and_escaped_mustache() {
        let tokens = lex_with_text("{{-- note --}}@{{ raw }}");
        let pairs: Vec<_> = tokens.iter().map(|(t, text)| (t.kind, *text)).collect();
        assert_eq!(
            pairs,
            vec![
                (TokenKind::TemplateComment, "{{-- note --}}"),
                (TokenKind::EscapedMustache, "@{{ raw }}")
            ]
        );
    }

    #[test]
    fn test_unterminated_comment_runs_to_end() {
        assert_eq!(kinds("{{-- open\n<p>"), vec![TokenKind::TemplateComment]);
    }

    #[test]
    fn test_directive_interrupts_unterminated_interpolation() {
        assert_eq!(
            kinds("{{ a @end"),
            vec![
                TokenKind::MustacheOpen,
                TokenKind::Whitespace,
                TokenKind::Ident,
                TokenKind::Whitespace,
                TokenKind::DirectiveName
            ]
        );
    }

    #[test]
    fn test_lexing_covers_source() {
        let source = "é {{ ü }} @each((k, v) in map) ß @end";
        let tokens = lex(source);
        let mut offset = TextSize::from(0);
        for token in &tokens {
            assert_eq!(token.range.start(), offset);
            offset = token.range.end();
        }
        assert_eq!(usize::from(offset), source.len());
    }
}
