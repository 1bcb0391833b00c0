//! Shared helpers for parser tests.
#![allow(dead_code, unused_imports)]

pub use stencil_syntax::parser::{parse, reparse, Parse};
pub use stencil_syntax::syntax::{SyntaxKind, SyntaxNode};

/// Renders a parse result as an indented tree followed by its errors.
pub fn dump_parse(source: &str) -> String {
    dump(&parse(source))
}

/// Renders an existing parse.
pub fn dump(parsed: &Parse) -> String {
    let mut output = String::new();
    format_node(&parsed.syntax(), &mut output, 0);

    if !parsed.ok() {
        output.push_str("errors:\n");
        for err in parsed.errors() {
            output.push_str(&format!("  {err}\n"));
        }
    }

    output
}

fn format_node(node: &SyntaxNode, out: &mut String, depth: usize) {
    let indent = "  ".repeat(depth);
    out.push_str(&format!("{indent}{:?}@{:?}\n", node.kind(), node.text_range()));

    for child in node.children_with_tokens() {
        match child {
            rowan::NodeOrToken::Node(n) => format_node(&n, out, depth + 1),
            rowan::NodeOrToken::Token(t) => {
                if !t.kind().is_trivia() {
                    out.push_str(&format!(
                        "{}{:?}@{:?} {:?}\n",
                        "  ".repeat(depth + 1),
                        t.kind(),
                        t.text_range(),
                        t.text()
                    ));
                }
            }
        }
    }
}

/// Kinds of the top-level items.
pub fn item_kinds(source: &str) -> Vec<SyntaxKind> {
    parse(source).syntax().children().map(|node| node.kind()).collect()
}
