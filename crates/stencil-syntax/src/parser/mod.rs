//! Template parser.
//!
//! Tokens from [`crate::lexer`] are fed to a recursive descent grammar that
//! records a flat step log; `tree_builder` replays that log into a lossless
//! `rowan` tree. Malformed input never aborts a parse: it ends up inside an
//! `ErrorNode` and a [`ParseError`] is recorded next to the tree.
//!
//! [`reparse`] reruns the grammar only over the top-level items an edit
//! touched and splices them into the previous tree.

#![allow(clippy::module_inception)]

mod grammar;
mod incremental;
mod parser;
mod source;
mod tree_builder;

pub use incremental::{reparse, reparse_with_stats, ReuseStats};
pub use parser::parse;
pub(crate) use parser::Parser;

use crate::syntax::SyntaxNode;
use text_size::TextRange;

/// A green tree together with the errors found while building it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    green: rowan::GreenNode,
    errors: Vec<ParseError>,
}

impl Parse {
    pub(crate) fn new(green: rowan::GreenNode, errors: Vec<ParseError>) -> Self {
        Self { green, errors }
    }

    /// A fresh red tree rooted at the `SourceFile` node.
    #[must_use]
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    /// The green tree, shared cheaply between versions of a document.
    #[must_use]
    pub fn green(&self) -> &rowan::GreenNode {
        &self.green
    }

    /// Errors recorded while parsing.
    #[must_use]
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// No errors were recorded.
    #[must_use]
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A syntax error; `range` is empty when something expected is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Human-readable description.
    pub message: String,
    /// Byte range in the source.
    pub range: TextRange,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let start = u32::from(self.range.start());
        let end = u32::from(self.range.end());
        write!(f, "{} at {start}..{end}", self.message)
    }
}

impl std::error::Error for ParseError {}
