//! Diagnostic types for structural errors and warnings.
//!
//! Every analysis returns the complete replacement list of diagnostics for a
//! document. Codes are stable so editors and the CLI can filter on them.

use crate::error::ParseFailure;
use crate::line_index::{LineIndex, Range};
use text_size::{TextRange, TextSize};

/// Source tag attached to every diagnostic.
pub const DIAGNOSTIC_SOURCE: &str = "stencil";

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticSeverity {
    /// Error - the template is malformed.
    Error,
    /// Warning - likely mistake.
    Warning,
}

impl DiagnosticSeverity {
    /// Lowercase name used in rendered output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

/// A diagnostic code identifying the type of diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    /// The document could not be parsed at all.
    ParseFailure,

    // Syntax errors (E001-E099)
    /// Error node in the tree.
    SyntaxError,

    // Structural errors (E100-E199)
    /// Conditional or loop directive without a condition.
    MissingCondition,
    /// Textual loop header without `in`.
    MissingInKeyword,
    /// `@end` with no open block.
    UnmatchedEnd,
    /// `@end<name>` with no open `@<name>`.
    UnmatchedTypedEnd,
    /// Block directive never closed.
    MissingEnd,

    // Warnings (W100-W199)
    /// Component/slot/section/block name is not a valid identifier.
    InvalidName,
    /// `{{ }}` with nothing inside.
    EmptyInterpolation,
    /// Include path containing `..`.
    RelativeInclude,
}

impl DiagnosticCode {
    /// Returns the string code (e.g., "E101").
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ParseFailure => "E000",
            Self::SyntaxError => "E001",
            Self::MissingCondition => "E101",
            Self::MissingInKeyword => "E102",
            Self::UnmatchedEnd => "E103",
            Self::UnmatchedTypedEnd => "E104",
            Self::MissingEnd => "E105",
            Self::InvalidName => "W101",
            Self::EmptyInterpolation => "W102",
            Self::RelativeInclude => "W103",
        }
    }

    /// Returns the severity for this diagnostic code.
    #[must_use]
    pub fn severity(&self) -> DiagnosticSeverity {
        match self {
            Self::ParseFailure
            | Self::SyntaxError
            | Self::MissingCondition
            | Self::MissingInKeyword
            | Self::UnmatchedEnd
            | Self::UnmatchedTypedEnd
            | Self::MissingEnd => DiagnosticSeverity::Error,

            Self::InvalidName | Self::EmptyInterpolation | Self::RelativeInclude => {
                DiagnosticSeverity::Warning
            }
        }
    }
}

/// A diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The diagnostic code.
    pub code: DiagnosticCode,
    /// The severity level.
    pub severity: DiagnosticSeverity,
    /// Line/column range where the diagnostic applies.
    pub range: Range,
    /// Byte range where the diagnostic applies.
    pub offsets: TextRange,
    /// The diagnostic message.
    pub message: String,
    /// Always [`DIAGNOSTIC_SOURCE`].
    pub source: &'static str,
}

impl Diagnostic {
    /// Creates a new diagnostic with the code's severity.
    pub fn new(
        code: DiagnosticCode,
        range: Range,
        offsets: TextRange,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: code.severity(),
            code,
            range,
            offsets,
            message: message.into(),
            source: DIAGNOSTIC_SOURCE,
        }
    }

    /// Builds the single document-wide error published when parsing fails outright.
    #[must_use]
    pub fn parse_failure(failure: &ParseFailure, text: &str) -> Self {
        // The text may be too large for `TextSize`; cover what is addressable.
        let len = TextSize::from(u32::try_from(text.len()).unwrap_or(u32::MAX));
        let offsets = TextRange::up_to(len);
        let range = if u32::try_from(text.len()).is_ok() {
            LineIndex::new(text).range(text, offsets)
        } else {
            Range::default()
        };
        Self::new(
            DiagnosticCode::ParseFailure,
            range,
            offsets,
            format!("Failed to parse document: {failure}"),
        )
    }

    /// Returns true if this is an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{} {}[{}]: {}",
            self.range.start,
            self.range.end,
            self.severity.as_str(),
            self.code.code(),
            self.message
        )
    }
}
