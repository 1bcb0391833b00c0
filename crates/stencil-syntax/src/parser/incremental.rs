//! Incremental reparsing.
//!
//! A template is a flat sequence of top-level items, so an edit can only
//! change the items whose tokens it touches. [`reparse`] lexes the new text,
//! finds the longest runs of unchanged tokens at both ends, keeps the old items
//! lying inside those runs, and parses only the items in between. The result
//! is identical to a fresh [`parse`](super::parse) of the new text.

use crate::lexer::{lex, Token};
use crate::parser::parser::parse_tokens;
use crate::parser::{Parse, ParseError};
use crate::syntax::{SyntaxKind, SyntaxNode, SyntaxToken};
use rowan::{GreenNode, GreenToken, NodeOrToken};
use rustc_hash::FxHashMap;
use text_size::{TextRange, TextSize};

/// How much of the previous tree a reparse kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReuseStats {
    /// Items kept from the start of the previous tree.
    pub reused_prefix: usize,
    /// Items kept from the end of the previous tree.
    pub reused_suffix: usize,
    /// Items produced by parsing.
    pub reparsed: usize,
}

/// Reparses `text`, reusing the unchanged items of `previous`.
#[must_use]
pub fn reparse(previous: &Parse, text: &str) -> Parse {
    reparse_with_stats(previous, text).0
}

/// Like [`reparse`], also reporting how many items were reused.
#[must_use]
pub fn reparse_with_stats(previous: &Parse, text: &str) -> (Parse, ReuseStats) {
    let root = previous.syntax();
    let items: Vec<SyntaxNode> = root.children().collect();
    let old_text = root.text().to_string();
    let old_len = TextSize::of(old_text.as_str());

    if root.children_with_tokens().count() != items.len() {
        return fresh(text);
    }
    if old_text == text {
        let stats = ReuseStats {
            reused_prefix: items.len(),
            ..ReuseStats::default()
        };
        return (previous.clone(), stats);
    }

    let old_tokens: Vec<SyntaxToken> = root
        .descendants_with_tokens()
        .filter_map(NodeOrToken::into_token)
        .collect();
    let new_tokens = lex(text);

    let same = |old: &SyntaxToken, new: &Token| {
        SyntaxKind::from(new.kind) == old.kind() && old.text() == &text[token_span(new)]
    };
    let common = old_tokens.len().min(new_tokens.len());
    let prefix = old_tokens
        .iter()
        .zip(&new_tokens)
        .take_while(|(old, new)| same(old, new))
        .count();
    let suffix = old_tokens
        .iter()
        .rev()
        .zip(new_tokens.iter().rev())
        .take(common - prefix)
        .take_while(|(old, new)| same(old, new))
        .count();

    let mut item_starts = Vec::with_capacity(items.len());
    let mut cursor = 0;
    for item in &items {
        item_starts.push(cursor);
        cursor += item
            .descendants_with_tokens()
            .filter(|element| element.as_token().is_some())
            .count();
    }
    let item_end = |index: usize| {
        item_starts
            .get(index + 1)
            .copied()
            .unwrap_or(old_tokens.len())
    };

    // The last item inside the unchanged prefix is reparsed too: its end
    // depends on the token that follows it.
    let keep = (0..items.len())
        .take_while(|&index| item_end(index) <= prefix)
        .count()
        .saturating_sub(1);
    let start = item_starts.get(keep).copied().unwrap_or(0);

    let old_suffix_start = old_tokens.len() - suffix;
    let boundaries: FxHashMap<usize, usize> = item_starts
        .iter()
        .enumerate()
        .filter(|&(_, &token)| token >= old_suffix_start)
        .map(|(index, &token)| (token + new_tokens.len() - old_tokens.len(), index))
        .filter(|(token, _)| *token > start)
        .collect();

    let mut resume = None;
    let (middle, middle_errors) = parse_tokens(&new_tokens, text, start, |position| {
        match boundaries.get(&position) {
            Some(&index) => {
                resume = Some(index);
                true
            }
            None => false,
        }
    });

    let mut children: Vec<NodeOrToken<GreenNode, GreenToken>> = items[..keep]
        .iter()
        .map(|item| NodeOrToken::Node(item.green().into_owned()))
        .collect();
    let reparsed = middle.children().count();
    children.extend(middle.children().map(|child| match child {
        NodeOrToken::Node(node) => NodeOrToken::Node(node.to_owned()),
        NodeOrToken::Token(token) => NodeOrToken::Token(token.to_owned()),
    }));
    if let Some(index) = resume {
        children.extend(
            items[index..]
                .iter()
                .map(|item| NodeOrToken::Node(item.green().into_owned())),
        );
    }
    let green_node = GreenNode::new(SyntaxKind::SourceFile.into(), children);

    let prefix_end = old_tokens
        .get(start)
        .map_or(old_len, |token| token.text_range().start());
    let mut errors: Vec<ParseError> = previous
        .errors()
        .iter()
        .filter(|error| error.range.end() <= prefix_end)
        .cloned()
        .collect();
    errors.extend(middle_errors);
    if let Some(index) = resume {
        let suffix_start = items[index].text_range().start();
        let delta = i64::from(u32::from(TextSize::of(text))) - i64::from(u32::from(old_len));
        errors.extend(
            previous
                .errors()
                .iter()
                .filter(|error| {
                    if error.range.is_empty() {
                        error.range.start() > suffix_start
                    } else {
                        error.range.start() >= suffix_start
                    }
                })
                .map(|error| ParseError {
                    message: error.message.clone(),
                    range: shift(error.range, delta),
                }),
        );
    }

    let stats = ReuseStats {
        reused_prefix: keep,
        reused_suffix: resume.map_or(0, |index| items.len() - index),
        reparsed,
    };
    (Parse::new(green_node, errors), stats)
}

fn fresh(text: &str) -> (Parse, ReuseStats) {
    let parse = super::parse(text);
    let stats = ReuseStats {
        reparsed: parse.syntax().children().count(),
        ..ReuseStats::default()
    };
    (parse, stats)
}

fn token_span(token: &Token) -> std::ops::Range<usize> {
    usize::from(token.range.start())..usize::from(token.range.end())
}

fn shift(range: TextRange, delta: i64) -> TextRange {
    let move_by = |offset: TextSize| {
        let moved = i64::from(u32::from(offset)) + delta;
        TextSize::from(u32::try_from(moved).unwrap_or(0))
    };
    TextRange::new(move_by(range.start()), move_by(range.end()))
}
