//! Replays the parser's step log into a `rowan` green tree.

use crate::lexer::Token;
use crate::syntax::SyntaxKind;

/// One entry of the parser's step log.
///
/// The log stays flat while parsing so a node can be wrapped after it was
/// completed: the wrapper is pushed at the end and linked from the wrapped
/// node's `Open` step through `wrapper`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Open {
        kind: SyntaxKind,
        /// Distance to the `Open` step of the node that wraps this one.
        wrapper: Option<usize>,
    },
    Leaf(SyntaxKind),
    Close,
    /// Reserved by an open marker, or consumed while replaying a wrapper chain.
    Vacant,
}

/// Builds the green tree for `steps`, reading token text from `tokens`
/// starting at index `first_token`.
///
/// Trivia is attached lazily: before each leaf and before each close, so
/// trailing whitespace lands in the innermost node still open.
pub(crate) fn build(
    tokens: &[Token],
    source: &str,
    first_token: usize,
    mut steps: Vec<Step>,
) -> rowan::GreenNode {
    let mut leaves = Leaves {
        tokens,
        source,
        next: first_token,
    };
    let mut builder = rowan::GreenNodeBuilder::new();
    let mut chain = Vec::new();

    for index in 0..steps.len() {
        match std::mem::replace(&mut steps[index], Step::Vacant) {
            Step::Open { kind, wrapper } => {
                chain.push(kind);
                let mut at = index;
                let mut link = wrapper;
                while let Some(distance) = link {
                    at += distance;
                    match std::mem::replace(&mut steps[at], Step::Vacant) {
                        Step::Open { kind, wrapper } => {
                            chain.push(kind);
                            link = wrapper;
                        }
                        _ => break,
                    }
                }
                // Outermost wrapper first.
                for kind in chain.drain(..).rev() {
                    builder.start_node(kind.into());
                }
            }
            Step::Leaf(kind) => {
                leaves.trivia(&mut builder);
                leaves.push(&mut builder, kind);
            }
            Step::Close => {
                leaves.trivia(&mut builder);
                builder.finish_node();
            }
            Step::Vacant => {}
        }
    }

    builder.finish()
}

struct Leaves<'a> {
    tokens: &'a [Token],
    source: &'a str,
    next: usize,
}

impl Leaves<'_> {
    fn trivia(&mut self, builder: &mut rowan::GreenNodeBuilder<'static>) {
        while let Some(kind) = self
            .tokens
            .get(self.next)
            .map(|token| token.kind)
            .filter(|kind| kind.is_trivia())
        {
            self.push(builder, SyntaxKind::from(kind));
        }
    }

    fn push(&mut self, builder: &mut rowan::GreenNodeBuilder<'static>, kind: SyntaxKind) {
        let Some(token) = self.tokens.get(self.next) else {
            return;
        };
        builder.token(kind.into(), &self.source[token.range]);
        self.next += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::syntax::SyntaxNode;

    #[test]
    fn test_wrapper_opens_before_wrapped_node() {
        let source = "{{ a";
        let tokens = lex(source);
        let steps = vec![
            Step::Open {
                kind: SyntaxKind::SourceFile,
                wrapper: None,
            },
            Step::Open {
                kind: SyntaxKind::Interpolation,
                wrapper: Some(4),
            },
            Step::Leaf(SyntaxKind::from(tokens[0].kind)),
            Step::Leaf(SyntaxKind::from(tokens[2].kind)),
            Step::Close,
            Step::Open {
                kind: SyntaxKind::ErrorNode,
                wrapper: None,
            },
            Step::Close,
            Step::Close,
        ];
        let root = SyntaxNode::new_root(build(&tokens, source, 0, steps));
        let error = root.first_child().map(|node| node.kind());
        let inner = root
            .first_child()
            .and_then(|node| node.first_child())
            .map(|node| node.kind());
        assert_eq!(error, Some(SyntaxKind::ErrorNode));
        assert_eq!(inner, Some(SyntaxKind::Interpolation));
        assert_eq!(root.text().to_string(), source);
    }
}
