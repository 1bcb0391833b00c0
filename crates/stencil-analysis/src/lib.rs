//! Structural analysis for directive-based templates.
//!
//! The pipeline has four parts:
//!
//! - [`ParserAdapter`]: the only door into `stencil-syntax`. Parses documents
//!   fully or incrementally and answers position queries.
//! - [`DocumentCache`]: one tree per document, reused while version and text
//!   match and the entry is younger than the TTL.
//! - [`Validator`]: block matching, directive argument checks, and syntax
//!   error reporting in a single walk.
//! - [`classify`]: what construct surrounds a cursor, with a textual fallback.
//!
//! [`Analyzer`] bundles them behind the calls an editor integration makes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod adapter;
pub mod analyzer;
pub mod cache;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod grammar;
pub mod line_index;
pub mod nodes;
pub mod tree;
pub mod validate;

pub use adapter::ParserAdapter;
pub use analyzer::Analyzer;
pub use cache::{CacheConfig, Clock, DocumentCache, DocumentId, SystemClock};
pub use config::AnalysisConfig;
pub use context::{classify, classify_text, ClassificationSource, ContextClassification, ContextKind};
pub use diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSeverity, DIAGNOSTIC_SOURCE};
pub use error::{ConfigError, ParseFailure, StartupError};
pub use grammar::{DirectiveConfig, DirectiveShape, Grammar, GrammarLoader};
pub use line_index::{LineIndex, Position, Range};
pub use tree::SyntaxTree;
pub use validate::Validator;
