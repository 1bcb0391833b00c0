//! Typed views over directive and interpolation nodes.

use smol_str::SmolStr;
use stencil_syntax::{SyntaxKind, SyntaxNode, SyntaxToken};

/// A `Directive` node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirectiveNode(SyntaxNode);

impl DirectiveNode {
    /// Wraps `node` if it is a directive.
    #[must_use]
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        (node.kind() == SyntaxKind::Directive).then_some(Self(node))
    }

    /// The underlying node.
    #[must_use]
    pub fn syntax(&self) -> &SyntaxNode {
        &self.0
    }

    /// The `@name` / `@!name` token.
    #[must_use]
    pub fn name_token(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(rowan::NodeOrToken::into_token)
            .find(|token| token.kind() == SyntaxKind::DirectiveName)
    }

    /// The directive name without `@` or `@!`.
    #[must_use]
    pub fn name(&self) -> Option<SmolStr> {
        let token = self.name_token()?;
        let text = token.text();
        let name = text.strip_prefix("@!").or_else(|| text.strip_prefix('@'))?;
        Some(SmolStr::new(name))
    }

    /// Returns `true` for the `@!name` form.
    #[must_use]
    pub fn is_self_closing(&self) -> bool {
        self.name_token()
            .is_some_and(|token| token.text().starts_with("@!"))
    }

    /// The parenthesised argument list, if present.
    #[must_use]
    pub fn arguments(&self) -> Option<SyntaxNode> {
        child_of_kind(&self.0, SyntaxKind::ArgumentList)
    }

    /// The structured `binding in iterable` header, if the arguments have that form.
    #[must_use]
    pub fn loop_header(&self) -> Option<SyntaxNode> {
        child_of_kind(&self.arguments()?, SyntaxKind::LoopHeader)
    }

    /// The argument expression when the arguments are not a loop header.
    #[must_use]
    pub fn expression(&self) -> Option<SyntaxNode> {
        child_of_kind(&self.arguments()?, SyntaxKind::Expression)
    }

    /// Returns `true` if the arguments contain anything but whitespace.
    #[must_use]
    pub fn has_condition(&self) -> bool {
        self.loop_header().is_some()
            || self
                .expression()
                .is_some_and(|expression| !is_blank(&expression))
    }

    /// String literals written directly in the argument expression.
    #[must_use]
    pub fn string_literals(&self) -> Vec<SyntaxNode> {
        self.expression()
            .map(|expression| {
                expression
                    .children()
                    .filter(|child| child.kind() == SyntaxKind::StringLiteral)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// The expression of an `Interpolation` or `RawInterpolation` node.
#[must_use]
pub fn interpolation_expression(node: &SyntaxNode) -> Option<SyntaxNode> {
    child_of_kind(node, SyntaxKind::Expression)
}

/// The contents of a terminated string literal, without its quotes.
#[must_use]
pub fn string_value(literal: &SyntaxNode) -> Option<String> {
    let text = literal.text().to_string();
    let quote = text.chars().next()?;
    if text.len() < 2 || !text.ends_with(quote) {
        return None;
    }
    Some(text[1..text.len() - 1].to_string())
}

/// Returns `true` if the node holds only whitespace.
#[must_use]
pub fn is_blank(node: &SyntaxNode) -> bool {
    node.descendants_with_tokens()
        .filter_map(rowan::NodeOrToken::into_token)
        .all(|token| token.kind().is_trivia())
}

fn child_of_kind(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxNode> {
    node.children().find(|child| child.kind() == kind)
}
