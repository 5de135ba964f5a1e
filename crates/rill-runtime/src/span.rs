//! Source location tracking
//!
//! Every token and AST node carries a `Span` so diagnostics can point at
//! the offending source text.

use serde::{Deserialize, Serialize};

/// A half-open byte range into the source, plus the line it starts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    /// Line number (1-indexed)
    pub line: u32,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize, line: u32) -> Self {
        Self { start, end, line }
    }

    /// Placeholder span for synthesized nodes and errors without a location
    pub fn dummy() -> Self {
        Self {
            start: 0,
            end: 0,
            line: 1,
        }
    }

    /// Merge two spans into one covering both
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            line: self.line.min(other.line),
        }
    }

    /// Length of the span in bytes
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// True if the span covers no text
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
