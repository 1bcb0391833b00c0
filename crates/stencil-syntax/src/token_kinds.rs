//! Single source of truth for the token kinds shared by `TokenKind` and `SyntaxKind`.
//!
//! `Eof` must stay last: `SyntaxKind::is_token` relies on it.

macro_rules! for_each_token_kind {
    ($macro:ident) => {
        $macro! {
            Text,
            EscapedMustache,
            TemplateComment,
            DirectiveName,
            MustacheOpen,
            RawMustacheOpen,
            MustacheClose,
            RawMustacheClose,
            Whitespace,
            Ident,
            KwIn,
            Number,
            Str,
            UnterminatedStr,
            LParen,
            RParen,
            LBracket,
            RBracket,
            LBrace,
            RBrace,
            Comma,
            Dot,
            Operator,
            Error,
            Eof,
        }
    };
}

pub(crate) use for_each_token_kind;
