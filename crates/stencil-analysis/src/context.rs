//! Cursor-context classification.
//!
//! The tree path walks up from the deepest node at the cursor. When no tree is
//! available, or the cursor sits inside an error node, a textual scan of the
//! document stands in for it.

use crate::line_index::{LineIndex, Position};
use crate::tree::{in_error_region, SyntaxTree};
use stencil_syntax::lexer::directive_name_len;
use stencil_syntax::{Lexer, SyntaxKind, SyntaxNode, TokenKind};

/// What kind of construct surrounds the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKind {
    /// Inside a `@directive` or its argument list.
    Directive,
    /// Inside `{{ }}` or `{{{ }}}`.
    Interpolation,
    /// Inside a quoted string in code.
    StringLiteral,
    /// Anywhere else.
    PlainText,
}

impl ContextKind {
    /// Lowercase name used in rendered output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Directive => "directive",
            Self::Interpolation => "interpolation",
            Self::StringLiteral => "string-literal",
            Self::PlainText => "plain-text",
        }
    }
}

impl std::fmt::Display for ContextKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which path produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassificationSource {
    /// Ancestor walk over a well-formed tree.
    Tree,
    /// Textual scan.
    Text,
}

/// Result of classifying a cursor position. Never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextClassification {
    /// The construct kind.
    pub kind: ContextKind,
    /// Deepest node at the position, when a tree was available.
    pub node: Option<SyntaxNode>,
    /// Path that decided `kind`.
    pub source: ClassificationSource,
}

impl ContextClassification {
    fn plain(source: ClassificationSource) -> Self {
        Self {
            kind: ContextKind::PlainText,
            node: None,
            source,
        }
    }
}

/// Classifies `position` using `tree`, or the textual fallback when the tree is
/// missing or the position lies in an error region.
#[must_use]
pub fn classify(tree: Option<&SyntaxTree>, text: &str, position: Position) -> ContextClassification {
    match tree {
        Some(tree) => classify_tree(tree, position),
        None => classify_text(text, position),
    }
}

/// Tree path. Falls back to [`classify_text`] on the tree's own text inside
/// error regions.
#[must_use]
pub fn classify_tree(tree: &SyntaxTree, position: Position) -> ContextClassification {
    let Some(node) = tree
        .offset_at(position)
        .and_then(|offset| tree.node_at_offset(offset))
    else {
        return ContextClassification::plain(ClassificationSource::Tree);
    };

    if in_error_region(&node) {
        let mut classification = classify_text(tree.text(), position);
        classification.node = Some(node);
        return classification;
    }

    let kind = node
        .ancestors()
        .find_map(|ancestor| match ancestor.kind() {
            SyntaxKind::Interpolation | SyntaxKind::RawInterpolation => {
                Some(ContextKind::Interpolation)
            }
            SyntaxKind::Directive => Some(ContextKind::Directive),
            SyntaxKind::StringLiteral => Some(ContextKind::StringLiteral),
            _ => None,
        })
        .unwrap_or(ContextKind::PlainText);

    ContextClassification {
        kind,
        node: Some(node),
        source: ClassificationSource::Tree,
    }
}

/// Textual fallback.
///
/// In order: a `{{--` comment still open before the cursor (plain text), an
/// unclosed `{{` before the cursor, an unclosed directive on the current line,
/// an open quote on the current line. Inside an interpolation or directive a
/// quote opened after the construct start makes the result a string literal.
#[must_use]
pub fn classify_text(text: &str, position: Position) -> ContextClassification {
    let Some(offset) = LineIndex::new(text).offset(text, position) else {
        return ContextClassification::plain(ClassificationSource::Text);
    };
    let offset = usize::from(offset);
    let before = &text[..offset];

    let kind = if inside_comment(before) {
        ContextKind::PlainText
    } else if let Some(code_start) = open_interpolation(before) {
        if in_open_quote(&before[code_start..]) {
            ContextKind::StringLiteral
        } else {
            ContextKind::Interpolation
        }
    } else if let Some(code_start) = open_directive(text, offset) {
        if in_open_quote(&before[code_start..]) {
            ContextKind::StringLiteral
        } else {
            ContextKind::Directive
        }
    } else if in_open_quote(current_line(before)) {
        ContextKind::StringLiteral
    } else {
        ContextKind::PlainText
    };

    ContextClassification {
        kind,
        node: None,
        source: ClassificationSource::Text,
    }
}

fn current_line(before: &str) -> &str {
    before.rfind('\n').map_or(before, |newline| &before[newline + 1..])
}

fn inside_comment(before: &str) -> bool {
    before
        .rfind("{{--")
        .is_some_and(|open| !before[open + 4..].contains("--}}"))
}

/// Byte offset where the code of an interpolation still open at the end of
/// `before` starts. A `}}` inside a string literal does not close it.
fn open_interpolation(before: &str) -> Option<usize> {
    Lexer::new(before).fold(None, |open, token| match token.kind {
        TokenKind::MustacheOpen | TokenKind::RawMustacheOpen => {
            Some(usize::from(token.range.end()))
        }
        TokenKind::MustacheClose | TokenKind::RawMustacheClose | TokenKind::DirectiveName => None,
        _ => open,
    })
}

/// Byte offset where the code of the last directive on the cursor's line
/// starts, if the cursor is still inside that directive.
fn open_directive(text: &str, offset: usize) -> Option<usize> {
    let line_start = text[..offset].rfind('\n').map_or(0, |newline| newline + 1);
    let (start, name_len) = text[line_start..offset]
        .match_indices('@')
        .chain(
            // A directive starting exactly at the cursor.
            text[offset..].starts_with('@').then_some((offset - line_start, "@")),
        )
        .filter_map(|(index, _)| {
            let start = line_start + index;
            directive_name_len(text, start).map(|len| (start, len))
        })
        .last()?;
    let name_end = start + name_len;

    if offset < name_end || (offset == name_end && offset == text.len()) {
        return Some(start);
    }

    let rest = &text[name_end..];
    let gap = rest.len() - rest.trim_start_matches([' ', '\t']).len();
    let paren = name_end + gap;
    if text.as_bytes().get(paren) != Some(&b'(') {
        return None;
    }
    if offset <= paren {
        return Some(start);
    }
    let args = &text[paren..offset];
    (args_depth(args) > 0).then_some(paren + 1)
}

/// Parenthesis depth at the end of `args`, ignoring parentheses in strings.
fn args_depth(args: &str) -> usize {
    let mut depth = 0usize;
    let mut quote = None;
    let mut chars = args.chars();
    while let Some(ch) = chars.next() {
        match (quote, ch) {
            (Some(_), '\\') => {
                chars.next();
            }
            (Some(open), ch) if ch == open => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"' | '`') => quote = Some(ch),
            (None, '(') => depth += 1,
            (None, ')') => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return 0;
                }
            }
            (None, _) => {}
        }
    }
    depth
}

/// Returns `true` if a quote opened in `segment` is still open at its end.
fn in_open_quote(segment: &str) -> bool {
    let mut quote = None;
    let mut chars = segment.chars();
    while let Some(ch) = chars.next() {
        match (quote, ch) {
            (Some(_), '\\') => {
                chars.next();
            }
            (Some(open), ch) if ch == open => quote = None,
            (None, '\'' | '"' | '`') => quote = Some(ch),
            _ => {}
        }
    }
    quote.is_some()
}
