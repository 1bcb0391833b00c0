//! The surface an editor-protocol layer talks to.

use crate::adapter::ParserAdapter;
use crate::cache::{CacheConfig, Clock, DocumentCache, DocumentId, SystemClock};
use crate::config::AnalysisConfig;
use crate::context::{classify, classify_text, ContextClassification};
use crate::diagnostics::Diagnostic;
use crate::error::StartupError;
use crate::grammar::{Grammar, GrammarLoader};
use crate::line_index::Position;
use crate::validate::Validator;
use std::sync::Arc;
use tracing::debug;

/// Cached parsing, validation, and classification for a set of documents.
#[derive(Debug)]
pub struct Analyzer<C: Clock = SystemClock> {
    cache: DocumentCache<C>,
}

impl Analyzer<SystemClock> {
    /// Creates an analyzer for a loaded grammar.
    #[must_use]
    pub fn new(grammar: Arc<Grammar>, cache: CacheConfig) -> Self {
        Self::with_clock(grammar, cache, SystemClock)
    }

    /// Loads the grammar described by `config` and creates an analyzer for it.
    pub fn from_config(config: &AnalysisConfig) -> Result<Self, StartupError> {
        let grammar = GrammarLoader::new(config.directives.clone()).initialize()?;
        Ok(Self::new(grammar, config.cache))
    }
}

impl<C: Clock> Analyzer<C> {
    /// Creates an analyzer whose cache ages entries with `clock`.
    #[must_use]
    pub fn with_clock(grammar: Arc<Grammar>, cache: CacheConfig, clock: C) -> Self {
        Self {
            cache: DocumentCache::with_clock(ParserAdapter::new(grammar), cache, clock),
        }
    }

    /// Returns the full replacement diagnostic list for a document.
    ///
    /// A document that cannot be parsed at all yields a single document-wide
    /// error.
    pub fn analyze(&mut self, id: &DocumentId, version: i32, text: &str) -> Vec<Diagnostic> {
        let tree = match self.cache.get_or_parse(id, version, text) {
            Ok(tree) => tree,
            Err(failure) => {
                debug!(document = %id, "parse failed: {failure}");
                return vec![Diagnostic::parse_failure(&failure, text)];
            }
        };
        Validator::new(self.cache.adapter().grammar().catalog()).validate(&tree)
    }

    /// Drops the cached tree for a closed or externally changed document.
    pub fn invalidate(&mut self, id: &DocumentId) {
        self.cache.invalidate(id);
    }

    /// Drops every cached tree.
    pub fn invalidate_all(&mut self) {
        self.cache.invalidate_all();
    }

    /// Classifies the cursor at `position`.
    ///
    /// The cached tree is used only when it was parsed from exactly `text`;
    /// otherwise the textual fallback runs.
    #[must_use]
    pub fn classify(&self, id: &DocumentId, text: &str, position: Position) -> ContextClassification {
        let tree = self.cache.peek(id, text);
        classify(tree.as_deref(), text, position)
    }

    /// Classifies with the textual fallback only.
    #[must_use]
    pub fn classify_text(&self, text: &str, position: Position) -> ContextClassification {
        classify_text(text, position)
    }

    /// Applies new cache limits.
    pub fn set_cache_config(&mut self, config: CacheConfig) {
        self.cache.set_config(config);
    }

    /// The document cache.
    #[must_use]
    pub fn cache(&self) -> &DocumentCache<C> {
        &self.cache
    }

    /// The parser adapter.
    #[must_use]
    pub fn adapter(&self) -> &ParserAdapter {
        self.cache.adapter()
    }
}
