//! Error types for grammar loading, parsing, and configuration.

#![allow(missing_docs)]

use smol_str::SmolStr;
use std::path::PathBuf;
use thiserror::Error;

/// The grammar could not be loaded. Unrecoverable for the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartupError {
    /// A configured directive name is empty or not an identifier.
    #[error("invalid directive name '{0}'")]
    InvalidDirectiveName(SmolStr),

    /// A configured directive name would be read as a closer.
    #[error("directive name '{0}' is reserved for closers")]
    ReservedDirectiveName(SmolStr),

    /// A configured directive redefines an existing one differently.
    #[error("directive '{0}' conflicts with an existing definition")]
    ConflictingDirective(SmolStr),
}

/// A parse call failed outright.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    /// The syntax tree addresses text with 32-bit offsets.
    #[error("document of {len} bytes exceeds the {max} byte limit")]
    TooLarge { len: usize, max: usize },
}

/// An explicitly requested configuration file could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid configuration.
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
