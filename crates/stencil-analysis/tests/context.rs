mod common;
use common::*;
use stencil_analysis::{classify, classify_text, ClassificationSource};
use stencil_syntax::SyntaxKind;

fn both(text: &str, line: u32, column: u32) -> (ContextKind, ContextKind) {
    let tree = adapter().parse(text).expect("parse");
    let position = Position::new(line, column);
    let from_tree = classify(Some(&tree), text, position);
    let from_text = classify_text(text, position);
    assert_eq!(from_text.source, ClassificationSource::Text);
    (from_tree.kind, from_text.kind)
}

fn assert_both(text: &str, line: u32, column: u32, expected: ContextKind) {
    assert_eq!(
        both(text, line, column),
        (expected, expected),
        "at {line}:{column} in {text:?}"
    );
}

#[test]
fn test_inside_interpolation() {
    let text = "Hello {{ name }} world";
    assert_both(text, 0, 9, ContextKind::Interpolation);
    assert_both(text, 0, 11, ContextKind::Interpolation);
    assert_both("{{{ html }}}", 0, 5, ContextKind::Interpolation);
}

#[test]
fn test_close_inside_string_keeps_interpolation_open() {
    assert_both("{{ '}}' + name }}", 0, 11, ContextKind::Interpolation);
    assert_both("{{ \"}}\" + name }}", 0, 5, ContextKind::StringLiteral);
}

#[test]
fn test_position_before_opener_is_plain_text() {
    assert_both("{{ a }}", 0, 0, ContextKind::PlainText);
    assert_both("x{{ a }}", 0, 1, ContextKind::PlainText);
    assert_both("{{ a }}{{ b }}", 0, 7, ContextKind::PlainText);
    assert_both("a {{{ b }}}", 0, 2, ContextKind::PlainText);
}

#[test]
fn test_inside_directive() {
    let text = "@if(user.admin)\n  Hi\n@end";
    assert_both(text, 0, 1, ContextKind::Directive);
    assert_both(text, 0, 6, ContextKind::Directive);
    assert_both(text, 2, 2, ContextKind::Directive);
    assert_both("@each(item in items)\n@end", 0, 15, ContextKind::Directive);
}

#[test]
fn test_inside_string_literal() {
    assert_both("@include('partials/nav')", 0, 12, ContextKind::StringLiteral);
    assert_both("{{ greet('world') }}", 0, 12, ContextKind::StringLiteral);
}

#[test]
fn test_plain_text() {
    let text = "Hello {{ name }} world\n<p>@if(a) x @end</p>";
    assert_both(text, 0, 2, ContextKind::PlainText);
    assert_both(text, 0, 19, ContextKind::PlainText);
    assert_both(text, 1, 11, ContextKind::PlainText);
    assert_both("{{-- {{ note --}} after", 0, 9, ContextKind::PlainText);
    assert_both("@{{ raw }}", 0, 5, ContextKind::PlainText);
    assert_both("contact user@example.com", 0, 15, ContextKind::PlainText);
}

#[test]
fn test_tree_path_reports_node() {
    let text = "Hello {{ name }}";
    let tree = adapter().parse(text).expect("parse");
    let classification = classify(Some(&tree), text, Position::new(0, 10));
    assert_eq!(classification.source, ClassificationSource::Tree);
    let node = classification.node.expect("node at position");
    assert_eq!(node.kind(), SyntaxKind::Expression);
}

#[test]
fn test_error_region_uses_text_scan() {
    let text = "<p>\n{{ user.";
    let tree = adapter().parse(text).expect("parse");
    let classification = classify(Some(&tree), text, Position::new(1, 8));
    assert_eq!(classification.kind, ContextKind::Interpolation);
    assert_eq!(classification.source, ClassificationSource::Text);
    assert!(classification.node.is_some());
}

#[test]
fn test_unclosed_directive_on_current_line() {
    let text = "<div>\n@if(user.isAdmin && ";
    let tree = adapter().parse(text).expect("parse");
    let classification = classify(Some(&tree), text, Position::new(1, 20));
    assert_eq!(classification.kind, ContextKind::Directive);
    assert_eq!(classification.source, ClassificationSource::Text);
}

#[test]
fn test_no_tree_uses_text_scan() {
    let classification = classify(None, "{{ a", Position::new(0, 3));
    assert_eq!(classification.kind, ContextKind::Interpolation);
    assert_eq!(classification.source, ClassificationSource::Text);
    assert!(classification.node.is_none());
}

#[test]
fn test_out_of_bounds_position() {
    let text = "{{ a }}";
    let tree = adapter().parse(text).expect("parse");
    let classification = classify(Some(&tree), text, Position::new(4, 0));
    assert_eq!(classification.kind, ContextKind::PlainText);
    assert!(classification.node.is_none());
    assert_eq!(
        classify_text(text, Position::new(0, 40)).kind,
        ContextKind::PlainText
    );
}
