//! Immutable parsed documents.

use crate::line_index::{LineIndex, Position, Range};
use stencil_syntax::parser::{Parse, ParseError};
use stencil_syntax::{SyntaxKind, SyntaxNode};
use std::sync::Arc;
use text_size::{TextRange, TextSize};

/// A parsed document: the tree, its parse errors, and the text it was parsed from.
///
/// Trees are never mutated. Cache entries share them through `Arc`.
#[derive(Debug)]
pub struct SyntaxTree {
    parse: Parse,
    text: Arc<str>,
    lines: LineIndex,
}

impl SyntaxTree {
    pub(crate) fn new(parse: Parse, text: &str) -> Self {
        Self {
            parse,
            lines: LineIndex::new(text),
            text: Arc::from(text),
        }
    }

    /// The root `SourceFile` node.
    #[must_use]
    pub fn root(&self) -> SyntaxNode {
        self.parse.syntax()
    }

    /// The underlying parse result.
    #[must_use]
    pub fn parse(&self) -> &Parse {
        &self.parse
    }

    /// The text this tree was parsed from.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Errors recorded while parsing.
    #[must_use]
    pub fn parse_errors(&self) -> &[ParseError] {
        self.parse.errors()
    }

    /// Returns `true` if any subtree is an error node.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.root()
            .descendants()
            .any(|node| node.kind() == SyntaxKind::ErrorNode)
    }

    /// Line/column mapping for the tree text.
    #[must_use]
    pub fn line_index(&self) -> &LineIndex {
        &self.lines
    }

    /// Converts a position to a byte offset, `None` when out of bounds.
    #[must_use]
    pub fn offset_at(&self, position: Position) -> Option<TextSize> {
        self.lines.offset(&self.text, position)
    }

    /// Converts a byte range to a line/column range.
    #[must_use]
    pub fn range_of(&self, range: TextRange) -> Range {
        self.lines.range(&self.text, range)
    }

    /// The deepest node covering `offset`.
    ///
    /// A position between two tokens belongs to the token on its right. At the
    /// end of the text it belongs to the last token. Positions on the outer
    /// edge of a construct are outside it and map to the root: right before a
    /// `{{` or `{{{`, and at the end of the text right after a `}}`, `}}}`, or
    /// an argument list's `)`.
    #[must_use]
    pub fn node_at_offset(&self, offset: TextSize) -> Option<SyntaxNode> {
        if offset > TextSize::of(&*self.text) {
            return None;
        }
        let root = self.root();
        match root.token_at_offset(offset) {
            rowan::TokenAtOffset::None => Some(root),
            rowan::TokenAtOffset::Single(token) => {
                let range = token.text_range();
                if (range.end() == offset && closes_construct(&token))
                    || (range.start() == offset && opens_construct(&token))
                {
                    Some(root)
                } else {
                    token.parent()
                }
            }
            rowan::TokenAtOffset::Between(_, right) if opens_construct(&right) => Some(root),
            rowan::TokenAtOffset::Between(_, right) => right.parent(),
        }
    }

    /// All nodes of `kind` in document order.
    #[must_use]
    pub fn nodes_of_kind(&self, kind: SyntaxKind) -> Vec<SyntaxNode> {
        self.root()
            .descendants()
            .filter(|node| node.kind() == kind)
            .collect()
    }
}

fn opens_construct(token: &stencil_syntax::SyntaxToken) -> bool {
    matches!(
        token.kind(),
        SyntaxKind::MustacheOpen | SyntaxKind::RawMustacheOpen
    )
}

fn closes_construct(token: &stencil_syntax::SyntaxToken) -> bool {
    match token.kind() {
        SyntaxKind::MustacheClose | SyntaxKind::RawMustacheClose => true,
        SyntaxKind::RParen => token
            .parent()
            .is_some_and(|parent| parent.kind() == SyntaxKind::ArgumentList),
        _ => false,
    }
}

/// Returns `true` if `node` or one of its ancestors is an error node.
#[must_use]
pub fn in_error_region(node: &SyntaxNode) -> bool {
    node.ancestors()
        .any(|ancestor| ancestor.kind() == SyntaxKind::ErrorNode)
}
