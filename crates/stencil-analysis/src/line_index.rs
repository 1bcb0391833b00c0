//! Line/column positions.
//!
//! Lines are split on `\n` and columns count characters, so a `\r` before a
//! line break is an ordinary character at the end of its line.

use text_size::{TextRange, TextSize};

/// A zero-based line/column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    /// Zero-based line.
    pub line: u32,
    /// Zero-based column, in characters.
    pub column: u32,
}

impl Position {
    /// Creates a position.
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// A start/end position pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Range {
    /// Inclusive start.
    pub start: Position,
    /// Exclusive end.
    pub end: Position,
}

impl Range {
    /// Creates a range.
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// Maps between byte offsets and line/column positions for one text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<TextSize>,
}

impl LineIndex {
    /// Builds the index for `text`.
    #[must_use]
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::from(0)];
        line_starts.extend(
            text.match_indices('\n')
                .map(|(offset, _)| TextSize::from(offset as u32 + 1)),
        );
        Self { line_starts }
    }

    /// Number of lines; an empty text has one.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Converts a position to a byte offset.
    ///
    /// Returns `None` when the line does not exist or the column lies past the
    /// end of the line. The column just after the last character is valid.
    #[must_use]
    pub fn offset(&self, text: &str, position: Position) -> Option<TextSize> {
        let line = position.line as usize;
        let start = usize::from(*self.line_starts.get(line)?);
        let end = self
            .line_starts
            .get(line + 1)
            .map_or(text.len(), |next| usize::from(*next) - 1);
        let line_text = &text[start..end];

        let column = position.column as usize;
        let byte = if column == 0 {
            0
        } else {
            let (index, ch) = line_text.char_indices().nth(column - 1)?;
            index + ch.len_utf8()
        };
        Some(TextSize::from((start + byte) as u32))
    }

    /// Converts a byte offset to a position, clamping to the end of the text.
    #[must_use]
    pub fn position(&self, text: &str, offset: TextSize) -> Position {
        let offset = offset.min(TextSize::of(text));
        let line = self
            .line_starts
            .partition_point(|start| *start <= offset)
            .saturating_sub(1);
        let start = usize::from(self.line_starts[line]);
        let mut end = usize::from(offset);
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        let column = text[start..end].chars().count();
        Position::new(line as u32, column as u32)
    }

    /// Converts a byte range to a position range.
    #[must_use]
    pub fn range(&self, text: &str, range: TextRange) -> Range {
        Range::new(
            self.position(text, range.start()),
            self.position(text, range.end()),
        )
    }
}
