//! The only entry point from analysis into the syntax crate.

use crate::error::ParseFailure;
use crate::grammar::Grammar;
use crate::line_index::Position;
use crate::tree::SyntaxTree;
use stencil_syntax::parser::{parse, reparse_with_stats};
use stencil_syntax::{SyntaxKind, SyntaxNode};
use std::sync::Arc;
use tracing::debug;

/// Largest document the tree can address.
pub const MAX_DOCUMENT_LEN: usize = u32::MAX as usize;

/// Parses documents and answers position queries for a loaded grammar.
#[derive(Debug, Clone)]
pub struct ParserAdapter {
    grammar: Arc<Grammar>,
}

impl ParserAdapter {
    /// Creates an adapter for a grammar handle returned by `GrammarLoader::initialize`.
    #[must_use]
    pub fn new(grammar: Arc<Grammar>) -> Self {
        Self { grammar }
    }

    /// The grammar handle.
    #[must_use]
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Parses `text` from scratch. Identical input yields an identical tree.
    pub fn parse(&self, text: &str) -> Result<SyntaxTree, ParseFailure> {
        check_len(text)?;
        Ok(SyntaxTree::new(parse(text), text))
    }

    /// Parses `text`, reusing the items of `previous` that the edit left intact.
    ///
    /// The result is identical to [`ParserAdapter::parse`], errors included.
    pub fn parse_incremental(
        &self,
        text: &str,
        previous: &SyntaxTree,
    ) -> Result<SyntaxTree, ParseFailure> {
        check_len(text)?;
        let (parse, stats) = reparse_with_stats(previous.parse(), text);
        debug!(
            reused_prefix = stats.reused_prefix,
            reused_suffix = stats.reused_suffix,
            reparsed = stats.reparsed,
            "incremental parse"
        );
        Ok(SyntaxTree::new(parse, text))
    }

    /// The deepest node containing the zero-based `line`/`column`, or `None`
    /// when the position lies outside the document.
    #[must_use]
    pub fn node_at_position(&self, tree: &SyntaxTree, line: u32, column: u32) -> Option<SyntaxNode> {
        let offset = tree.offset_at(Position::new(line, column))?;
        tree.node_at_offset(offset)
    }

    /// All nodes of `kind` in document order.
    #[must_use]
    pub fn nodes_of_type(&self, tree: &SyntaxTree, kind: SyntaxKind) -> Vec<SyntaxNode> {
        tree.nodes_of_kind(kind)
    }
}

fn check_len(text: &str) -> Result<(), ParseFailure> {
    if text.len() > MAX_DOCUMENT_LEN {
        return Err(ParseFailure::TooLarge {
            len: text.len(),
            max: MAX_DOCUMENT_LEN,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarLoader;

    fn adapter() -> ParserAdapter {
        let grammar = GrammarLoader::default().initialize().expect("grammar loads");
        ParserAdapter::new(grammar)
    }

    #[test]
    fn test_parse_is_deterministic() {
        let adapter = adapter();
        let text = "@if(a)\n{{ b }}\n@end";
        let first = adapter.parse(text).expect("parse");
        let second = adapter.parse(text).expect("parse");
        assert_eq!(first.parse(), second.parse());
    }

    #[test]
    fn test_incremental_matches_full() {
        let adapter = adapter();
        let before = adapter.parse("<p>{{ a }}</p>\n@if(x)\n@end").expect("parse");
        let text = "<p>{{ a.b }}</p>\n@if(x)\n@end";
        let incremental = adapter.parse_incremental(text, &before).expect("parse");
        let full = adapter.parse(text).expect("parse");
        assert_eq!(incremental.parse(), full.parse());
        assert_eq!(incremental.text(), text);
    }

    #[test]
    fn test_node_at_position() {
        let adapter = adapter();
        let tree = adapter.parse("Hi\n{{ name }}").expect("parse");
        let node = adapter.node_at_position(&tree, 1, 4).expect("in bounds");
        assert_eq!(node.kind(), SyntaxKind::Expression);
        assert!(adapter.node_at_position(&tree, 1, 11).is_none());
        assert!(adapter.node_at_position(&tree, 5, 0).is_none());
    }

    #[test]
    fn test_nodes_of_type_in_document_order() {
        let adapter = adapter();
        let tree = adapter.parse("@if(a)\n@each(x in y)\n@end\n@end").expect("parse");
        let names: Vec<_> = adapter
            .nodes_of_type(&tree, SyntaxKind::Directive)
            .iter()
            .map(|node| node.text().to_string())
            .collect();
        assert_eq!(names, vec!["@if(a)", "@each(x in y)", "@end", "@end"]);
    }
}
