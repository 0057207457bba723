//! Offset to line/column mapping.

use std::fmt;

/// A position in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Byte offset from the start of the source.
    pub offset: usize,
    /// 1-indexed line number.
    pub line: usize,
    /// 1-indexed column number, counted in characters.
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open range of source text: `start` inclusive, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Whether `offset` lies within the range, both ends included.
    #[must_use]
    pub const fn contains_offset(&self, offset: usize) -> bool {
        self.start.offset <= offset && offset <= self.end.offset
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Content bounds of one line, excluding its terminator.
#[derive(Debug, Clone, Copy)]
struct LineBounds {
    start: usize,
    end: usize,
}

/// Precomputed line boundaries for a source text.
#[derive(Debug, Clone)]
pub struct PositionIndex<'a> {
    source: &'a str,
    lines: Vec<LineBounds>,
}

impl<'a> PositionIndex<'a> {
    /// Build the index. Lines end at `\r\n` or `\n`.
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        let bytes = source.as_bytes();
        let mut lines = Vec::new();
        let mut start = 0;

        for (i, &byte) in bytes.iter().enumerate() {
            if byte == b'\n' {
                let end = if i > start && bytes[i - 1] == b'\r' {
                    i - 1
                } else {
                    i
                };
                lines.push(LineBounds { start, end });
                start = i + 1;
            }
        }
        lines.push(LineBounds {
            start,
            end: source.len(),
        });

        Self { source, lines }
    }

    /// Map a byte offset to its position.
    ///
    /// An offset inside a line terminator maps to the end of that line.
    ///
    /// # Panics
    ///
    /// Panics if `offset` is past the end of the source.
    #[must_use]
    pub fn position(&self, offset: usize) -> Position {
        assert!(
            offset <= self.source.len(),
            "offset {offset} is out of bounds for source of length {}",
            self.source.len()
        );

        let index = self.lines.partition_point(|line| line.start <= offset) - 1;
        let line = self.lines[index];
        let column_end = offset.min(line.end);
        let column = self.source[line.start..column_end].chars().count() + 1;

        Position {
            offset,
            line: index + 1,
            column,
        }
    }

    /// Map a byte range to a [`Range`].
    ///
    /// # Panics
    ///
    /// Panics if either offset is past the end of the source.
    #[must_use]
    pub fn range(&self, start: usize, end: usize) -> Range {
        Range {
            start: self.position(start),
            end: self.position(end),
        }
    }

    /// Map a 1-indexed line and column back to a byte offset.
    ///
    /// Columns past the end of the line clamp to the line end. Returns `None`
    /// for line or column zero and for lines past the end of the source.
    #[must_use]
    pub fn offset(&self, line: usize, column: usize) -> Option<usize> {
        if column == 0 {
            return None;
        }
        let bounds = self.lines.get(line.checked_sub(1)?)?;
        let text = &self.source[bounds.start..bounds.end];
        let within = text
            .char_indices()
            .nth(column - 1)
            .map_or(text.len(), |(i, _)| i);
        Some(bounds.start + within)
    }

    /// The text of a 1-indexed line, without its terminator.
    #[must_use]
    pub fn line_text(&self, line: usize) -> Option<&'a str> {
        let bounds = self.lines.get(line.checked_sub(1)?)?;
        Some(&self.source[bounds.start..bounds.end])
    }

    /// Length of the indexed source in bytes.
    #[must_use]
    pub const fn source_len(&self) -> usize {
        self.source.len()
    }
}
