//! Top-level template items.

use super::directives::directive;
use super::expressions::{expression, Terminator};
use crate::lexer::TokenKind;
use crate::parser::Parser;
use crate::syntax::SyntaxKind;

/// Parses one top-level item.
pub(crate) fn item(p: &mut Parser<'_, '_>) {
    match p.current() {
        TokenKind::Text | TokenKind::EscapedMustache => text_block(p),
        TokenKind::TemplateComment => comment(p),
        TokenKind::MustacheOpen => interpolation(p, SyntaxKind::Interpolation),
        TokenKind::RawMustacheOpen => interpolation(p, SyntaxKind::RawInterpolation),
        TokenKind::DirectiveName => directive(p),
        _ => {
            // Code tokens only appear after an opener; anything else is stray.
            let m = p.start();
            let range = p.current_range();
            p.error_at(range, "unexpected token");
            p.bump();
            m.complete(p, SyntaxKind::ErrorNode);
        }
    }
}

fn text_block(p: &mut Parser<'_, '_>) {
    let m = p.start();
    while p.at(TokenKind::Text) || p.at(TokenKind::EscapedMustache) {
        p.bump();
    }
    m.complete(p, SyntaxKind::TextBlock);
}

fn comment(p: &mut Parser<'_, '_>) {
    let m = p.start();
    let text = p.current_text();
    let range = p.current_range();
    p.bump();
    let comment = m.complete(p, SyntaxKind::Comment);

    if text.len() < 8 || !text.ends_with("--}}") {
        p.error_at(range, "unterminated comment, expected `--}}`");
        comment.precede(p).complete(p, SyntaxKind::ErrorNode);
    }
}

fn interpolation(p: &mut Parser<'_, '_>, kind: SyntaxKind) {
    let (close, message) = if kind == SyntaxKind::RawInterpolation {
        (TokenKind::RawMustacheClose, "expected `}}}`")
    } else {
        (TokenKind::MustacheClose, "expected `}}`")
    };

    let m = p.start();
    p.bump();
    expression(p, Terminator::Mustache);

    if p.at(close) {
        p.bump();
        m.complete(p, kind);
    } else {
        p.error_after_last(message);
        let node = m.complete(p, kind);
        node.precede(p).complete(p, SyntaxKind::ErrorNode);
    }
}
