//! Main parser implementation.

use crate::lexer::{lex, Token, TokenKind};
use crate::parser::grammar;
use crate::parser::source::Source;
use crate::parser::tree_builder::{self, Step};
use crate::parser::{Parse, ParseError};
use crate::syntax::SyntaxKind;
use drop_bomb::DropBomb;
use text_size::{TextRange, TextSize};

/// Parses source text into a syntax tree.
///
/// Parsing never fails: malformed constructs are wrapped in `ErrorNode`
/// subtrees and reported through [`Parse::errors`].
#[must_use]
pub fn parse(source: &str) -> Parse {
    let tokens = lex(source);
    let (green, errors) = parse_tokens(&tokens, source, 0, |_| false);
    Parse::new(green, errors)
}

/// Parses top-level items starting at token index `start` until the input ends
/// or `stop` accepts the index of the next item's first token.
///
/// The returned green node is a `SourceFile` holding only the parsed items.
pub(crate) fn parse_tokens(
    tokens: &[Token],
    source: &str,
    start: usize,
    stop: impl FnMut(usize) -> bool,
) -> (rowan::GreenNode, Vec<ParseError>) {
    let mut parser = Parser::new(tokens, source, start);
    parser.start_node(SyntaxKind::SourceFile);
    parser.items(stop);
    parser.finish_node();
    let Parser { steps, errors, .. } = parser;
    (tree_builder::build(tokens, source, start, steps), errors)
}

/// The parser state.
pub(crate) struct Parser<'t, 'src> {
    pub(crate) source: Source<'t, 'src>,
    steps: Vec<Step>,
    errors: Vec<ParseError>,
    last_end: TextSize,
}

/// A node whose kind is decided when it completes.
pub(crate) struct Marker {
    slot: usize,
    bomb: DropBomb,
}

impl Marker {
    fn new(slot: usize) -> Self {
        Self {
            slot,
            bomb: DropBomb::new("marker dropped without completing"),
        }
    }

    pub(crate) fn complete(
        mut self,
        parser: &mut Parser<'_, '_>,
        kind: SyntaxKind,
    ) -> CompletedMarker {
        self.bomb.defuse();
        parser.steps[self.slot] = Step::Open {
            kind,
            wrapper: None,
        };
        parser.steps.push(Step::Close);
        CompletedMarker { slot: self.slot }
    }
}

#[derive(Clone, Copy)]
pub(crate) struct CompletedMarker {
    slot: usize,
}

impl CompletedMarker {
    /// Starts a node that will become the parent of this one.
    pub(crate) fn precede(self, parser: &mut Parser<'_, '_>) -> Marker {
        let slot = parser.steps.len();
        parser.steps.push(Step::Vacant);
        // Walk to the outermost wrapper already recorded for this node.
        let mut at = self.slot;
        while let Step::Open {
            wrapper: Some(distance),
            ..
        } = parser.steps[at]
        {
            at += distance;
        }
        if let Step::Open { wrapper, .. } = &mut parser.steps[at] {
            *wrapper = Some(slot - at);
        }
        Marker::new(slot)
    }
}

impl<'t, 'src> Parser<'t, 'src> {
    fn new(tokens: &'t [Token], source: &'src str, start: usize) -> Self {
        let last_end = tokens
            .get(start)
            .map_or_else(|| TextSize::of(source), |token| token.range.start());
        Self {
            source: Source::new(tokens, source, start),
            steps: Vec::new(),
            errors: Vec::new(),
            last_end,
        }
    }

    fn items(&mut self, mut stop: impl FnMut(usize) -> bool) {
        while !self.at_end() {
            grammar::item(self);
            if stop(self.source.position()) {
                break;
            }
        }
    }

    // =========================================================================
    // Helper Methods
    // =========================================================================

    pub(crate) fn current(&self) -> TokenKind {
        self.source.current()
    }

    pub(crate) fn current_text(&self) -> &'src str {
        self.source.current_text()
    }

    pub(crate) fn current_range(&self) -> TextRange {
        self.source
            .current_token()
            .map_or_else(|| TextRange::empty(self.last_end), |token| token.range)
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.source.current() == kind
    }

    pub(crate) fn at_end(&self) -> bool {
        self.source.at_end()
    }

    pub(crate) fn peek_kind_n(&self, n: usize) -> TokenKind {
        self.source.peek_kind_n(n)
    }

    pub(crate) fn bump(&mut self) {
        let Some(token) = self.source.current_token() else {
            return;
        };
        self.last_end = token.range.end();
        let kind = token.kind;
        self.steps.push(Step::Leaf(SyntaxKind::from(kind)));
        self.source.bump();
    }

    pub(crate) fn start(&mut self) -> Marker {
        self.steps.push(Step::Vacant);
        Marker::new(self.steps.len() - 1)
    }

    pub(crate) fn start_node(&mut self, kind: SyntaxKind) {
        self.steps.push(Step::Open {
            kind,
            wrapper: None,
        });
    }

    pub(crate) fn finish_node(&mut self) {
        self.steps.push(Step::Close);
    }

    /// Records an error spanning `range`.
    pub(crate) fn error_at(&mut self, range: TextRange, message: &str) {
        self.errors.push(ParseError {
            message: message.to_string(),
            range,
        });
    }

    /// Records a zero-width error right after the last consumed token.
    pub(crate) fn error_after_last(&mut self, message: &str) {
        self.error_at(TextRange::empty(self.last_end), message);
    }
}
