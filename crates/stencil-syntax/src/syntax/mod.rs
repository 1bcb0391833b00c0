//! Syntax tree types for directive-based templates.
//!
//! This module provides the `rowan`-based syntax tree implementation,
//! including the `SyntaxKind` enum that covers both tokens and composite nodes.

use crate::lexer::TokenKind;
use crate::token_kinds::for_each_token_kind;

macro_rules! define_syntax_kind {
    ($($token:ident),* $(,)?) => {
        /// All syntax node and token kinds in a template.
        ///
        /// This enum includes both token kinds (from the lexer) and composite
        /// node kinds (produced by the parser).
        // Variants mirror lexer/token names; documenting each would be noisy.
        #[allow(missing_docs)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(u16)]
        pub enum SyntaxKind {
            // =========================================================================
            // TOKEN KINDS (mirrors TokenKind)
            // =========================================================================
            $($token,)*

            // COMPOSITE NODE KINDS (produced by parser)
            // =========================================================================
            /// Root node of a template
            SourceFile,

            /// A run of literal markup and escaped mustaches
            TextBlock,

            /// `{{-- ... --}}`
            Comment,

            /// `{{ expression }}`
            Interpolation,

            /// `{{{ expression }}}`
            RawInterpolation,

            /// `@name` with an optional argument list
            Directive,

            /// `( ... )` after a directive name
            ArgumentList,

            /// `binding in iterable` inside `@each(...)`
            LoopHeader,

            /// The names bound by a loop header: `item`, `item, index`, or `(key, value)`
            LoopBinding,

            /// Expression text inside an interpolation or argument list
            Expression,

            /// A quoted string inside an expression
            StringLiteral,

            /// A region the parser could not make sense of
            ErrorNode,
        }
    };
}

for_each_token_kind!(define_syntax_kind);

impl SyntaxKind {
    /// Returns `true` if this is a trivia kind.
    #[must_use]
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace)
    }

    /// Returns `true` if this is a token kind (not a composite node).
    #[must_use]
    pub fn is_token(self) -> bool {
        (self as u16) <= (Self::Eof as u16)
    }

    /// Returns `true` if this is a composite node kind.
    #[must_use]
    pub fn is_node(self) -> bool {
        !self.is_token()
    }

    /// Returns `true` for the node kinds that can appear directly under `SourceFile`.
    #[must_use]
    pub fn is_item(self) -> bool {
        matches!(
            self,
            Self::TextBlock
                | Self::Comment
                | Self::Interpolation
                | Self::RawInterpolation
                | Self::Directive
                | Self::ErrorNode
        )
    }
}

macro_rules! map_token_kinds {
    ($($name:ident),* $(,)?) => {
        impl From<TokenKind> for SyntaxKind {
            fn from(kind: TokenKind) -> Self {
                match kind {
                    $(TokenKind::$name => SyntaxKind::$name,)*
                }
            }
        }
    };
}

for_each_token_kind!(map_token_kinds);

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// The language type for templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TemplateLanguage {}

macro_rules! define_syntax_kinds {
    ($($token:ident),* $(,)?) => {
        const SYNTAX_KINDS: &[SyntaxKind] = &[
            $(SyntaxKind::$token,)*
            SyntaxKind::SourceFile,
            SyntaxKind::TextBlock,
            SyntaxKind::Comment,
            SyntaxKind::Interpolation,
            SyntaxKind::RawInterpolation,
            SyntaxKind::Directive,
            SyntaxKind::ArgumentList,
            SyntaxKind::LoopHeader,
            SyntaxKind::LoopBinding,
            SyntaxKind::Expression,
            SyntaxKind::StringLiteral,
            SyntaxKind::ErrorNode,
        ];
    };
}

for_each_token_kind!(define_syntax_kinds);

impl rowan::Language for TemplateLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        SYNTAX_KINDS
            .get(raw.0 as usize)
            .copied()
            .unwrap_or(SyntaxKind::ErrorNode)
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// A syntax node in the template syntax tree.
pub type SyntaxNode = rowan::SyntaxNode<TemplateLanguage>;

/// A syntax token in the template syntax tree.
pub type SyntaxToken = rowan::SyntaxToken<TemplateLanguage>;

/// A syntax element (either node or token) in the template syntax tree.
pub type SyntaxElement = rowan::SyntaxElement<TemplateLanguage>;
