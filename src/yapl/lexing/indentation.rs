//! Indentation state machine
//!
//!     Tracks the indentation width of the innermost open block and the indentation unit
//!     of the file. The unit is learned from the first block that opens and is fixed for
//!     the rest of the parse: every later block must open exactly one unit deeper than the
//!     block that encloses it, so the number of open blocks is always `current / unit`.
//!
//!     The tracker only decides. Turning its decisions into INDENT / DEDENT / NL tokens is
//!     the lexer's job, see [`super::lexer`].

use crate::yapl::error::{IndentationError, ParseError};

/// What a line break at a given indentation width means for the token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineBreak {
    /// Same level: one line separator.
    Continue,
    /// Shallower: this many block-closes, then one line separator.
    Dedent(usize),
    /// Deeper, inside a block: consumed without producing anything.
    Ignore,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndentationTracker {
    current: usize,
    unit: Option<usize>,
}

impl IndentationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Width of the innermost open block, 0 at the top level.
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn unit(&self) -> Option<usize> {
        self.unit
    }

    /// Number of blocks currently open.
    pub fn depth(&self) -> usize {
        match self.unit {
            Some(unit) => self.current / unit,
            None => 0,
        }
    }

    /// A block-opening marker followed by a line indented `width` columns.
    pub fn open_block(&mut self, width: usize, line: usize) -> Result<(), IndentationError> {
        if width <= self.current {
            return Err(IndentationError::NotDeeper {
                found: width,
                enclosing: self.current,
                line,
            });
        }
        match self.unit {
            None => self.unit = Some(width),
            Some(unit) => {
                if width % unit != 0 {
                    return Err(IndentationError::NotAMultiple {
                        found: width,
                        unit,
                        line,
                    });
                }
                if width != self.current + unit {
                    return Err(IndentationError::SkippedLevel {
                        found: width,
                        expected: self.current + unit,
                        line,
                    });
                }
            }
        }
        self.current = width;
        Ok(())
    }

    /// A plain line break followed by a line indented `width` columns.
    pub fn line_break(&mut self, width: usize, line: usize) -> Result<LineBreak, ParseError> {
        use std::cmp::Ordering;

        match width.cmp(&self.current) {
            Ordering::Equal => Ok(LineBreak::Continue),
            Ordering::Less => {
                let delta = self.current - width;
                let unit = self.unit.filter(|unit| delta % unit == 0).ok_or_else(|| {
                    ParseError::InvariantViolation(format!(
                        "dedent from {} to {} is not a whole number of {:?}-column levels",
                        self.current, width, self.unit
                    ))
                })?;
                self.current = width;
                Ok(LineBreak::Dedent(delta / unit))
            }
            Ordering::Greater if self.current == 0 => {
                Err(IndentationError::MissingBlockOpener {
                    found: width,
                    current: self.current,
                    line,
                }
                .into())
            }
            Ordering::Greater => Ok(LineBreak::Ignore),
        }
    }

    /// Close every open block, returning how many were open.
    pub fn close_all(&mut self) -> usize {
        let depth = self.depth();
        self.current = 0;
        depth
    }
}
