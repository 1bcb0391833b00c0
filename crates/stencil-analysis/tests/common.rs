//! Shared helpers for analysis tests.
#![allow(dead_code, unused_imports)]

pub use stencil_analysis::{
    Analyzer, CacheConfig, Clock, ContextKind, Diagnostic, DiagnosticCode, DiagnosticSeverity,
    DocumentCache, DocumentId, GrammarLoader, ParserAdapter, Position, Validator,
};
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock(Rc<Cell<Instant>>);

impl ManualClock {
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(Instant::now())))
    }

    pub fn advance(&self, by: Duration) {
        self.0.set(self.0.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.0.get()
    }
}

pub fn adapter() -> ParserAdapter {
    let grammar = GrammarLoader::default()
        .initialize()
        .expect("built-in grammar loads");
    ParserAdapter::new(grammar)
}

/// Diagnostics for `source` with the built-in catalog.
pub fn diagnostics(source: &str) -> Vec<Diagnostic> {
    let adapter = adapter();
    let tree = adapter.parse(source).expect("parse");
    Validator::new(adapter.grammar().catalog()).validate(&tree)
}

pub fn codes(source: &str) -> Vec<DiagnosticCode> {
    diagnostics(source).iter().map(|d| d.code).collect()
}

/// One diagnostic per line, as rendered by `Display`.
pub fn render(source: &str) -> String {
    diagnostics(source)
        .iter()
        .map(|d| format!("{d}\n"))
        .collect()
}

pub fn check_clean(source: &str) {
    let diagnostics = diagnostics(source);
    assert!(
        diagnostics.is_empty(),
        "Expected no diagnostics, got: {:?}",
        diagnostics
    );
}
