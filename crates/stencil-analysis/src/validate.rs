//! Structural validation of a parsed template.
//!
//! One pre-order walk over the tree with a stack of open blocks. `@end` pops
//! whatever block is innermost; `@end<name>` removes the nearest open
//! `@<name>` and leaves the frames above it in place. Blocks still open when
//! the walk ends are reported after every other diagnostic, in the order they
//! were opened.

use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::grammar::{DirectiveCatalog, DirectiveRole, DirectiveShape, DirectiveSpec};
use crate::nodes::{interpolation_expression, is_blank, string_value, DirectiveNode};
use crate::tree::SyntaxTree;
use smol_str::SmolStr;
use stencil_syntax::{SyntaxKind, SyntaxNode};
use tracing::trace;

/// An open block directive.
#[derive(Debug, Clone)]
struct BlockFrame {
    name: SmolStr,
    node: SyntaxNode,
}

/// Checks block structure and directive arguments against a catalog.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    catalog: &'a DirectiveCatalog,
}

impl<'a> Validator<'a> {
    /// Creates a validator for `catalog`.
    #[must_use]
    pub fn new(catalog: &'a DirectiveCatalog) -> Self {
        Self { catalog }
    }

    /// Returns every diagnostic for `tree` in document order, followed by the
    /// missing-end errors for blocks left open.
    #[must_use]
    pub fn validate(&self, tree: &SyntaxTree) -> Vec<Diagnostic> {
        let mut pass = Pass {
            tree,
            catalog: self.catalog,
            stack: Vec::new(),
            diagnostics: Vec::new(),
        };
        for node in tree.root().descendants() {
            pass.visit(&node);
        }
        pass.finish()
    }
}

struct Pass<'a> {
    tree: &'a SyntaxTree,
    catalog: &'a DirectiveCatalog,
    stack: Vec<BlockFrame>,
    diagnostics: Vec<Diagnostic>,
}

impl Pass<'_> {
    fn visit(&mut self, node: &SyntaxNode) {
        match node.kind() {
            SyntaxKind::ErrorNode => self.report(node, DiagnosticCode::SyntaxError, "Syntax error"),
            SyntaxKind::Directive => {
                if let Some(directive) = DirectiveNode::cast(node.clone()) {
                    self.visit_directive(&directive);
                }
            }
            SyntaxKind::Interpolation | SyntaxKind::RawInterpolation => {
                let empty = interpolation_expression(node).map_or(true, |expr| is_blank(&expr));
                if empty {
                    self.report(
                        node,
                        DiagnosticCode::EmptyInterpolation,
                        "Empty interpolation",
                    );
                }
            }
            _ => {}
        }
    }

    fn visit_directive(&mut self, directive: &DirectiveNode) {
        let Some(name) = directive.name() else {
            return;
        };
        let node = directive.syntax();
        let catalog = self.catalog;
        match catalog.role(&name) {
            DirectiveRole::Opener(spec) => {
                if !directive.is_self_closing() {
                    self.stack.push(BlockFrame {
                        name: name.clone(),
                        node: node.clone(),
                    });
                }
                self.check_shape(spec, directive);
            }
            DirectiveRole::Inline(spec) => self.check_shape(spec, directive),
            DirectiveRole::GenericEnd => {
                if self.stack.pop().is_none() {
                    self.report(
                        node,
                        DiagnosticCode::UnmatchedEnd,
                        "`@end` without matching block directive",
                    );
                }
            }
            DirectiveRole::TypedEnd(spec) => {
                let nearest = self
                    .stack
                    .iter()
                    .rposition(|frame| frame.name == spec.name);
                match nearest {
                    Some(index) => {
                        self.stack.remove(index);
                    }
                    None => self.report(
                        node,
                        DiagnosticCode::UnmatchedTypedEnd,
                        format!(
                            "`@{name}` without matching `@{}` directive",
                            spec.name
                        ),
                    ),
                }
            }
            DirectiveRole::Unknown => {}
        }
    }

    fn check_shape(&mut self, spec: &DirectiveSpec, directive: &DirectiveNode) {
        let node = directive.syntax();
        match spec.shape {
            DirectiveShape::Plain => {}
            DirectiveShape::Condition => {
                if !directive.has_condition() {
                    self.report_missing_condition(spec, node);
                }
            }
            DirectiveShape::Loop => {
                if !directive.has_condition() {
                    self.report_missing_condition(spec, node);
                } else if !has_in_keyword(directive) {
                    self.report(
                        node,
                        DiagnosticCode::MissingInKeyword,
                        format!("`@{}` directive missing `in` keyword", spec.name),
                    );
                }
            }
            DirectiveShape::Named | DirectiveShape::NamedDotted => {
                let allow_dots = spec.shape == DirectiveShape::NamedDotted;
                let name = directive
                    .string_literals()
                    .first()
                    .and_then(string_value);
                if let Some(name) = name {
                    if !is_valid_name(&name, allow_dots) {
                        self.report(
                            node,
                            DiagnosticCode::InvalidName,
                            format!(
                                "`@{}` name `{name}` is not a valid identifier",
                                spec.name
                            ),
                        );
                    }
                }
            }
            DirectiveShape::Include => {
                let relative = directive
                    .string_literals()
                    .iter()
                    .filter_map(string_value)
                    .any(|path| path.contains(".."));
                if relative {
                    self.report(
                        node,
                        DiagnosticCode::RelativeInclude,
                        "Avoid relative paths in includes",
                    );
                }
            }
        }
    }

    fn report_missing_condition(&mut self, spec: &DirectiveSpec, node: &SyntaxNode) {
        self.report(
            node,
            DiagnosticCode::MissingCondition,
            format!("`@{}` directive missing condition", spec.name),
        );
    }

    fn report(&mut self, node: &SyntaxNode, code: DiagnosticCode, message: impl Into<String>) {
        let offsets = node.text_range();
        let range = self.tree.range_of(offsets);
        self.diagnostics
            .push(Diagnostic::new(code, range, offsets, message));
    }

    fn finish(mut self) -> Vec<Diagnostic> {
        let open = std::mem::take(&mut self.stack);
        for frame in &open {
            self.report(
                &frame.node,
                DiagnosticCode::MissingEnd,
                format!("`@{}` directive missing its matching `@end`", frame.name),
            );
        }
        trace!(
            diagnostics = self.diagnostics.len(),
            unclosed = open.len(),
            "validated template"
        );
        self.diagnostics
    }
}

fn has_in_keyword(directive: &DirectiveNode) -> bool {
    directive.loop_header().is_some()
        || directive.arguments().is_some_and(|arguments| {
            arguments
                .descendants_with_tokens()
                .any(|element| element.kind() == SyntaxKind::KwIn)
        })
}

/// `^[A-Za-z][A-Za-z0-9._-]*$`, with `.` only when `allow_dots` is set.
fn is_valid_name(name: &str, allow_dots: bool) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|first| first.is_ascii_alphabetic())
        && chars.all(|ch| {
            ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' || (allow_dots && ch == '.')
        })
}
