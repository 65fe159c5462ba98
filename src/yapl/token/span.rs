//! Source spans
//!
//!     A span records both absolute byte offsets and line/column coordinates, so that
//!     tooling never has to re-scan the source to report a location. Lines are 1-based,
//!     columns are 0-based byte offsets from the start of the line.
//!
//!     Spans that cover no text (the result of an epsilon production, or any span when
//!     location capture is disabled) are represented as `Option::None` by the callers,
//!     never as a zero-width span.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start_offset: usize,
    pub end_offset: usize,
    pub start_line: usize,
    pub end_line: usize,
    pub start_column: usize,
    pub end_column: usize,
}

impl Span {
    pub fn new(
        start_offset: usize,
        end_offset: usize,
        start_line: usize,
        end_line: usize,
        start_column: usize,
        end_column: usize,
    ) -> Self {
        debug_assert!(start_offset <= end_offset);
        Self {
            start_offset,
            end_offset,
            start_line,
            end_line,
            start_column,
            end_column,
        }
    }

    /// A zero-width span at the given position.
    pub fn point(offset: usize, line: usize, column: usize) -> Self {
        Self::new(offset, offset, line, line, column, column)
    }

    /// Merge two spans into one covering both: earliest start, latest end.
    ///
    /// An absent side yields the other side unchanged.
    pub fn merge(a: Option<Span>, b: Option<Span>) -> Option<Span> {
        match (a, b) {
            (None, other) | (other, None) => other,
            (Some(a), Some(b)) => {
                let start = if a.start_offset <= b.start_offset { a } else { b };
                let end = if a.end_offset >= b.end_offset { a } else { b };
                Some(Span {
                    start_offset: start.start_offset,
                    start_line: start.start_line,
                    start_column: start.start_column,
                    end_offset: end.end_offset,
                    end_line: end.end_line,
                    end_column: end.end_column,
                })
            }
        }
    }

    pub fn len(&self) -> usize {
        self.end_offset - self.start_offset
    }

    pub fn is_empty(&self) -> bool {
        self.start_offset == self.end_offset
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}..{}:{}",
            self.start_line, self.start_column, self.end_line, self.end_column
        )
    }
}
