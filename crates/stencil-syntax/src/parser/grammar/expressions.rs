//! Expression text inside interpolations and argument lists.
//!
//! Expressions are not parsed into a tree; only string literals and lexer
//! errors get their own nodes. The analysis layer reads the expression text.

use crate::lexer::TokenKind;
use crate::parser::Parser;
use crate::syntax::SyntaxKind;

/// What ends an expression besides leaving code mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Terminator {
    /// The closing mustache, which the lexer never emits as a code token.
    Mustache,
    /// A `)` that is not balanced by an earlier `(`.
    Arguments,
}

pub(crate) fn expression(p: &mut Parser<'_, '_>, terminator: Terminator) {
    let m = p.start();
    let mut depth = 0u32;

    loop {
        let kind = p.current();
        if !kind.is_code() {
            break;
        }
        if terminator == Terminator::Arguments {
            match kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen if depth == 0 => break,
                TokenKind::RParen => depth -= 1,
                _ => {}
            }
        }

        match kind {
            TokenKind::Str => string_literal(p),
            TokenKind::UnterminatedStr => unterminated_string(p),
            TokenKind::Error => error_token(p),
            _ => p.bump(),
        }
    }

    m.complete(p, SyntaxKind::Expression);
}

fn string_literal(p: &mut Parser<'_, '_>) {
    let m = p.start();
    p.bump();
    m.complete(p, SyntaxKind::StringLiteral);
}

fn unterminated_string(p: &mut Parser<'_, '_>) {
    let range = p.current_range();
    let m = p.start();
    p.bump();
    let literal = m.complete(p, SyntaxKind::StringLiteral);
    p.error_at(range, "unterminated string literal");
    literal.precede(p).complete(p, SyntaxKind::ErrorNode);
}

fn error_token(p: &mut Parser<'_, '_>) {
    let range = p.current_range();
    let m = p.start();
    p.error_at(range, "unexpected character");
    p.bump();
    m.complete(p, SyntaxKind::ErrorNode);
}
