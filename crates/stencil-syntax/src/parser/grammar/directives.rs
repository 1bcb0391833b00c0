//! Directives and their argument lists.

use super::expressions::{expression, Terminator};
use crate::lexer::TokenKind;
use crate::parser::Parser;
use crate::syntax::SyntaxKind;

pub(crate) fn directive(p: &mut Parser<'_, '_>) {
    let m = p.start();
    p.bump();

    let mut closed = true;
    if p.at(TokenKind::LParen) {
        closed = argument_list(p);
    }

    let node = m.complete(p, SyntaxKind::Directive);
    if !closed {
        node.precede(p).complete(p, SyntaxKind::ErrorNode);
    }
}

/// Parses `( ... )`, returning `false` when the closing parenthesis is missing.
///
/// Argument lists shaped like `binding in iterable` get a `LoopHeader` whatever
/// the directive; deciding whether a loop is expected is left to analysis.
fn argument_list(p: &mut Parser<'_, '_>) -> bool {
    let m = p.start();
    p.bump();

    if at_loop_header(p) {
        loop_header(p);
    } else {
        expression(p, Terminator::Arguments);
    }

    let closed = if p.at(TokenKind::RParen) {
        p.bump();
        true
    } else {
        p.error_after_last("expected `)`");
        false
    };
    m.complete(p, SyntaxKind::ArgumentList);
    closed
}

fn at_loop_header(p: &Parser<'_, '_>) -> bool {
    let binding_len = match (p.peek_kind_n(0), p.peek_kind_n(1)) {
        (TokenKind::Ident, TokenKind::KwIn) => 1,
        (TokenKind::Ident, TokenKind::Comma) if p.peek_kind_n(2) == TokenKind::Ident => 3,
        (TokenKind::LParen, TokenKind::Ident) => {
            let mut n = 2;
            while p.peek_kind_n(n) == TokenKind::Comma && p.peek_kind_n(n + 1) == TokenKind::Ident {
                n += 2;
            }
            if p.peek_kind_n(n) != TokenKind::RParen {
                return false;
            }
            n + 1
        }
        _ => return false,
    };

    let iterable = p.peek_kind_n(binding_len + 1);
    p.peek_kind_n(binding_len) == TokenKind::KwIn
        && iterable.is_code()
        && iterable != TokenKind::RParen
}

fn loop_header(p: &mut Parser<'_, '_>) {
    let m = p.start();

    let binding = p.start();
    if p.at(TokenKind::LParen) {
        p.bump();
        while p.at(TokenKind::Ident) || p.at(TokenKind::Comma) {
            p.bump();
        }
        p.bump();
    } else {
        p.bump();
        if p.at(TokenKind::Comma) {
            p.bump();
            p.bump();
        }
    }
    binding.complete(p, SyntaxKind::LoopBinding);

    p.bump();
    expression(p, Terminator::Arguments);
    m.complete(p, SyntaxKind::LoopHeader);
}
