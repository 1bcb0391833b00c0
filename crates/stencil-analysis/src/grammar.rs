//! The grammar handle and its directive catalog.
//!
//! The syntax crate parses every `@name` the same way. What a name means
//! (whether it opens a block, what its arguments must look like) lives in
//! the [`DirectiveCatalog`] carried by the [`Grammar`] handle.

use crate::error::StartupError;
use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use smol_str::SmolStr;
use std::sync::Arc;
use tracing::info;

/// What a directive's arguments must contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DirectiveShape {
    /// No requirement.
    #[default]
    Plain,
    /// A non-blank condition.
    Condition,
    /// A condition containing the `in` keyword.
    Loop,
    /// A string literal name without dots.
    Named,
    /// A string literal name, dots allowed.
    NamedDotted,
    /// One or more string literal paths.
    Include,
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirectiveSpec {
    /// Name without the leading `@`.
    pub name: SmolStr,
    /// Whether the directive opens a block that needs a closer.
    pub block: bool,
    /// Argument requirements.
    pub shape: DirectiveShape,
}

impl DirectiveSpec {
    /// Creates a catalog entry.
    #[must_use]
    pub fn new(name: impl Into<SmolStr>, block: bool, shape: DirectiveShape) -> Self {
        Self {
            name: name.into(),
            block,
            shape,
        }
    }
}

/// A directive as declared in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DirectiveConfig {
    /// Name without the leading `@`.
    pub name: String,
    /// Whether the directive opens a block.
    #[serde(default)]
    pub block: bool,
    /// Argument requirements.
    #[serde(default)]
    pub shape: DirectiveShape,
}

/// How a directive name relates to block structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveRole<'a> {
    /// Opens a block.
    Opener(&'a DirectiveSpec),
    /// Stands alone.
    Inline(&'a DirectiveSpec),
    /// `@end`, closes whatever block is innermost.
    GenericEnd,
    /// `@end<name>`, closes the nearest open `@<name>`.
    TypedEnd(&'a DirectiveSpec),
    /// Not in the catalog.
    Unknown,
}

const BUILTIN_DIRECTIVES: &[(&str, bool, DirectiveShape)] = &[
    ("if", true, DirectiveShape::Condition),
    ("unless", true, DirectiveShape::Condition),
    ("elseif", false, DirectiveShape::Condition),
    ("else", false, DirectiveShape::Plain),
    ("each", true, DirectiveShape::Loop),
    ("component", true, DirectiveShape::NamedDotted),
    ("slot", true, DirectiveShape::Named),
    ("section", true, DirectiveShape::Named),
    ("block", true, DirectiveShape::Named),
    ("include", false, DirectiveShape::Include),
    ("includeIf", false, DirectiveShape::Include),
    ("layout", false, DirectiveShape::Include),
    ("set", false, DirectiveShape::Plain),
    ("debugger", false, DirectiveShape::Plain),
    ("super", false, DirectiveShape::Plain),
];

/// Known directives, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveCatalog {
    specs: IndexMap<SmolStr, DirectiveSpec>,
}

impl DirectiveCatalog {
    /// The built-in directives.
    #[must_use]
    pub fn builtin() -> Self {
        let specs = BUILTIN_DIRECTIVES
            .iter()
            .map(|(name, block, shape)| {
                let spec = DirectiveSpec::new(*name, *block, *shape);
                (spec.name.clone(), spec)
            })
            .collect();
        Self { specs }
    }

    /// Adds configured directives, rejecting invalid or conflicting entries.
    pub fn extend(&mut self, directives: &[DirectiveConfig]) -> Result<(), StartupError> {
        for directive in directives {
            let name = SmolStr::new(&directive.name);
            if !is_directive_identifier(&name) {
                return Err(StartupError::InvalidDirectiveName(name));
            }
            if name.starts_with("end") {
                return Err(StartupError::ReservedDirectiveName(name));
            }

            let spec = DirectiveSpec::new(name.clone(), directive.block, directive.shape);
            match self.specs.get(&name) {
                Some(existing) if *existing != spec => {
                    return Err(StartupError::ConflictingDirective(name));
                }
                Some(_) => {}
                None => {
                    self.specs.insert(name, spec);
                }
            }
        }
        Ok(())
    }

    /// Looks up a directive by name (without `@`).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DirectiveSpec> {
        self.specs.get(name)
    }

    /// Iterates over all entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &DirectiveSpec> {
        self.specs.values()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Returns `true` if the catalog has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Classifies a directive name (without `@`).
    #[must_use]
    pub fn role(&self, name: &str) -> DirectiveRole<'_> {
        if let Some(spec) = self.specs.get(name) {
            return if spec.block {
                DirectiveRole::Opener(spec)
            } else {
                DirectiveRole::Inline(spec)
            };
        }
        if name == "end" {
            return DirectiveRole::GenericEnd;
        }
        match name.strip_prefix("end").and_then(|opened| self.specs.get(opened)) {
            Some(spec) if spec.block => DirectiveRole::TypedEnd(spec),
            _ => DirectiveRole::Unknown,
        }
    }
}

fn is_directive_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

/// The loaded grammar: the template language plus its directive catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    catalog: DirectiveCatalog,
}

impl Grammar {
    /// Builds a grammar from the built-in catalog extended by `directives`.
    pub fn load(directives: &[DirectiveConfig]) -> Result<Self, StartupError> {
        let mut catalog = DirectiveCatalog::builtin();
        catalog.extend(directives)?;
        Ok(Self { catalog })
    }

    /// The directive catalog.
    #[must_use]
    pub fn catalog(&self) -> &DirectiveCatalog {
        &self.catalog
    }
}

/// Loads the grammar once and hands out the same handle afterwards.
#[derive(Debug, Default)]
pub struct GrammarLoader {
    directives: Vec<DirectiveConfig>,
    grammar: OnceCell<Arc<Grammar>>,
}

impl GrammarLoader {
    /// Creates a loader that extends the built-in catalog with `directives`.
    #[must_use]
    pub fn new(directives: Vec<DirectiveConfig>) -> Self {
        Self {
            directives,
            grammar: OnceCell::new(),
        }
    }

    /// Loads the grammar on first call; later calls return the same handle.
    pub fn initialize(&self) -> Result<Arc<Grammar>, StartupError> {
        self.grammar
            .get_or_try_init(|| {
                let grammar = Grammar::load(&self.directives)?;
                info!(
                    directives = grammar.catalog().len(),
                    "loaded template grammar"
                );
                Ok(Arc::new(grammar))
            })
            .cloned()
    }
}
