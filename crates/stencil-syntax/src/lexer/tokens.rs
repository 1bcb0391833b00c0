//! Token definitions for directive-based templates.
//!
//! Token kinds fall into two groups. Text-mode kinds (`Text`, `DirectiveName`,
//! mustache openers, comments) are recognised by the mode-switching driver in
//! the parent module. Code-mode kinds are matched by `logos` inside
//! interpolations and directive argument lists.

use logos::Logos;

/// All token kinds in a template.
///
/// Token kinds are divided into categories:
/// - Text-mode tokens (markup, directive names, mustache openers, comments)
/// - Trivia (whitespace inside code)
/// - Code-mode tokens (identifiers, literals, punctuation, operators)
/// - Special tokens (errors, EOF)
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[derive(Default)]
pub enum TokenKind {
    // =========================================================================
    // TEXT MODE (produced by the lexer driver, never by logos)
    // =========================================================================
    /// A run of literal markup.
    Text,

    /// `@{{ ... }}` - a mustache emitted verbatim.
    EscapedMustache,

    /// `{{-- ... --}}`; runs to end of input when unterminated.
    TemplateComment,

    /// `@name` or `@!name`.
    DirectiveName,

    /// `{{`
    MustacheOpen,

    /// `{{{`
    RawMustacheOpen,

    // =========================================================================
    // CODE MODE
    // =========================================================================
    /// `}}`
    #[token("}}")]
    MustacheClose,

    /// `}}}`
    #[token("}}}")]
    RawMustacheClose,

    /// Whitespace (spaces, tabs, newlines)
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    /// Identifier, including the `$` and `_` characters JavaScript allows.
    #[regex(r"[\p{L}_$][\p{L}\p{N}_$]*")]
    Ident,

    /// `in`, as used by `@each(item in items)`.
    #[token("in")]
    KwIn,

    /// Digits with an optional alphanumeric suffix (`42`, `0x1f`, `1_000`).
    #[regex(r"[0-9][0-9A-Za-z_]*")]
    Number,

    /// A terminated string literal in single, double, or back quotes.
    #[regex(r#"'([^'\\\n]|\\.)*'"#)]
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r"`([^`\\]|\\(.|\n))*`")]
    Str,

    /// A string literal missing its closing quote.
    #[regex(r#"'([^'\\\n]|\\.)*"#)]
    #[regex(r#""([^"\\\n]|\\.)*"#)]
    #[regex(r"`([^`\\]|\\(.|\n))*")]
    UnterminatedStr,

    /// `(`
    #[token("(")]
    LParen,

    /// `)`
    #[token(")")]
    RParen,

    /// `[`
    #[token("[")]
    LBracket,

    /// `]`
    #[token("]")]
    RBracket,

    /// `{`
    #[token("{")]
    LBrace,

    /// `}`
    #[token("}")]
    RBrace,

    /// `,`
    #[token(",")]
    Comma,

    /// `.`
    #[token(".")]
    Dot,

    /// Any run of operator characters (`===`, `&&`, `?.`, `=>`, `!`).
    #[regex(r"[+\-*/%=!<>&|^~?:;#]+")]
    Operator,

    // =========================================================================
    // SPECIAL TOKENS
    // =========================================================================
    /// Lexer error - unrecognized character
    #[default]
    Error,

    /// End of file marker (not produced by lexer, added by parser)
    Eof,
}

impl TokenKind {
    /// Returns `true` if this token is trivia.
    #[inline]
    #[must_use]
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace)
    }

    /// Returns `true` if this token can only appear inside an interpolation
    /// or a directive argument list.
    #[must_use]
    pub fn is_code(self) -> bool {
        matches!(
            self,
            Self::Whitespace
                | Self::Ident
                | Self::KwIn
                | Self::Number
                | Self::Str
                | Self::UnterminatedStr
                | Self::LParen
                | Self::RParen
                | Self::LBracket
                | Self::RBracket
                | Self::LBrace
                | Self::RBrace
                | Self::Comma
                | Self::Dot
                | Self::Operator
                | Self::Error
        )
    }

    /// Returns `true` if this token starts a top-level template item.
    #[must_use]
    pub fn starts_item(self) -> bool {
        matches!(
            self,
            Self::Text
                | Self::EscapedMustache
                | Self::TemplateComment
                | Self::DirectiveName
                | Self::MustacheOpen
                | Self::RawMustacheOpen
        )
    }

    /// Returns `true` if this token is a string literal, terminated or not.
    #[must_use]
    pub fn is_string(self) -> bool {
        matches!(self, Self::Str | Self::UnterminatedStr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_kinds(source: &str) -> Vec<TokenKind> {
        TokenKind::lexer(source)
            .map(|kind| kind.unwrap_or(TokenKind::Error))
            .filter(|kind| !kind.is_trivia())
            .collect()
    }

    #[test]
    fn test_keyword_beats_identifier() {
        assert_eq!(
            code_kinds("item in items"),
            vec![TokenKind::Ident, TokenKind::KwIn, TokenKind::Ident]
        );
        assert_eq!(code_kinds("index"), vec![TokenKind::Ident]);
    }

    #[test]
    fn test_unicode_identifiers() {
        assert_eq!(code_kinds("größe $el _x"), vec![TokenKind::Ident; 3]);
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            code_kinds(r#"'a' "b\"c" `multi
line`"#),
            vec![TokenKind::Str, TokenKind::Str, TokenKind::Str]
        );
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(code_kinds("'abc"), vec![TokenKind::UnterminatedStr]);
    }

    #[test]
    fn test_mustache_closers_prefer_longest() {
        assert_eq!(code_kinds("}}}"), vec![TokenKind::RawMustacheClose]);
        assert_eq!(code_kinds("}}"), vec![TokenKind::MustacheClose]);
        assert_eq!(code_kinds("}"), vec![TokenKind::RBrace]);
    }

    #[test]
    fn test_operators_group() {
        assert_eq!(
            code_kinds("a === b && !c"),
            vec![
                TokenKind::Ident,
                TokenKind::Operator,
                TokenKind::Ident,
                TokenKind::Operator,
                TokenKind::Operator,
                TokenKind::Ident
            ]
        );
    }

    #[test]
    fn test_unknown_character_is_error() {
        assert_eq!(code_kinds("\\"), vec![TokenKind::Error]);
    }
}
