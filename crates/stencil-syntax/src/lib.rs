//! `stencil-syntax` - Lexer, parser, and lossless syntax tree for directive-based HTML templates.
//!
//! Templates mix literal markup with three kinds of embedded constructs:
//!
//! - **Interpolations**: `{{ expression }}` (escaped) and `{{{ expression }}}` (raw)
//! - **Directives**: `@name` or `@name(arguments)`, with `@!name` marking a self-closing block
//! - **Comments**: `{{-- ... --}}`
//!
//! Everything else is text. `@{{ ... }}` escapes a mustache so it is emitted verbatim,
//! and `@@name` escapes a directive.
//!
//! # Design Principles
//!
//! The crate follows `rust-analyzer` and builds `rowan` trees:
//!
//! - **Lossless**: the tree text is always byte-identical to the input
//! - **Error-tolerant**: malformed constructs become `ErrorNode` subtrees and parsing continues
//! - **Incremental**: [`parser::reparse`] reuses unchanged top-level items of a previous parse
//!
//! # Example
//!
//! ```
//! use stencil_syntax::lexer::{lex, TokenKind};
//!
//! let tokens = lex("Hi {{ user.name }}");
//! let kinds: Vec<_> = tokens
//!     .iter()
//!     .filter(|t| !t.kind.is_trivia())
//!     .map(|t| t.kind)
//!     .collect();
//!
//! assert_eq!(
//!     kinds,
//!     vec![
//!         TokenKind::Text,
//!         TokenKind::MustacheOpen,
//!         TokenKind::Ident,
//!         TokenKind::Dot,
//!         TokenKind::Ident,
//!         TokenKind::MustacheClose,
//!     ]
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod lexer;
pub mod parser;
pub mod syntax;
mod token_kinds;

pub use lexer::{lex, Lexer, Token, TokenKind};
pub use parser::{parse, reparse, Parse, ParseError};
pub use syntax::{SyntaxKind, SyntaxNode, SyntaxToken, TemplateLanguage};
