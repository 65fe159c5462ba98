//! Error types
//!
//!     Every failure aborts the parse that raised it; nothing is recovered or retried.
//!     User-facing failures fall into three classes (lexical, indentation, syntax), each
//!     carrying enough location data to point at the offending text. A fourth class flags
//!     bookkeeping faults inside the lexer itself and is never meant to be shown to users
//!     as a diagnosis of their input.
//!
//!     Loading malformed grammar tables or lexical rules is reported separately through
//!     [`GrammarError`], before any parse begins.

use std::fmt;
use thiserror::Error;

/// A source line with a caret under the faulting column.
///
/// Renders as `\n\n<line>\n<padding>^\n`, so it can prefix a one-line message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Excerpt {
    pub source_line: String,
    pub column: usize,
}

impl Excerpt {
    /// Build the excerpt for 1-based `line` of `source`. Missing or empty lines yield `None`.
    pub fn from_source(source: &str, line: usize, column: usize) -> Option<Self> {
        let index = line.checked_sub(1)?;
        let source_line = source.split('\n').nth(index)?;
        if source_line.is_empty() {
            return None;
        }
        Some(Self {
            source_line: source_line.to_string(),
            column,
        })
    }
}

impl fmt::Display for Excerpt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\n\n{}\n{}^\n",
            self.source_line,
            " ".repeat(self.column)
        )
    }
}

fn prefix(excerpt: &Option<Excerpt>) -> String {
    excerpt.as_ref().map(ToString::to_string).unwrap_or_default()
}

fn expected_suffix(expected: &[String]) -> String {
    if expected.is_empty() {
        String::new()
    } else {
        format!(" Expected one of: {}.", expected.join(", "))
    }
}

/// Broad category of a [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    Indentation,
    Syntax,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndentationError {
    /// A block opened at or above the indentation of its enclosing block.
    #[error("Bad indent at line {line}: got {found}, expected > {enclosing}")]
    NotDeeper {
        found: usize,
        enclosing: usize,
        line: usize,
    },
    /// A block opened at a width that is not a multiple of the established unit.
    #[error("Bad indent at line {line}: got {found}, expected a multiple of {unit}")]
    NotAMultiple { found: usize, unit: usize, line: usize },
    /// A block opened more than one indentation unit deeper than its enclosing block.
    #[error("Bad indent at line {line}: got {found}, expected {expected}")]
    SkippedLevel {
        found: usize,
        expected: usize,
        line: usize,
    },
    /// Indentation increased at the top level without a block-opening `:`.
    #[error(
        "Blocks should start with \":\", cannot increase indent not in block at line {line}, \
         matched indent: {found}, current indent: {current}"
    )]
    MissingBlockOpener {
        found: usize,
        current: usize,
        line: usize,
    },
}

impl IndentationError {
    pub fn line(&self) -> usize {
        match self {
            IndentationError::NotDeeper { line, .. }
            | IndentationError::NotAMultiple { line, .. }
            | IndentationError::SkippedLevel { line, .. }
            | IndentationError::MissingBlockOpener { line, .. } => *line,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No lexical rule matches the input at the cursor.
    #[error(
        "{}Unexpected token: \"{}\" at {line}:{column}.",
        prefix(.excerpt),
        .character.escape_debug()
    )]
    UnexpectedCharacter {
        character: char,
        line: usize,
        column: usize,
        excerpt: Option<Excerpt>,
    },

    #[error("Indentation error: {0}")]
    Indentation(#[from] IndentationError),

    /// The action table has no entry for the current state and lookahead.
    #[error(
        "{}Unexpected token: \"{}\" at {line}:{column}.{}",
        prefix(.excerpt),
        .text.escape_debug(),
        expected_suffix(.expected)
    )]
    UnexpectedToken {
        text: String,
        line: usize,
        column: usize,
        expected: Vec<String>,
        excerpt: Option<Excerpt>,
    },

    #[error("Unexpected end of input.")]
    UnexpectedEndOfInput,

    /// The lexer's or the engine's own bookkeeping is inconsistent.
    #[error("Internal invariant violated: {0}")]
    InvariantViolation(String),
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::UnexpectedCharacter { .. } => ErrorKind::Lexical,
            ParseError::Indentation(_) => ErrorKind::Indentation,
            ParseError::UnexpectedToken { .. } | ParseError::UnexpectedEndOfInput => {
                ErrorKind::Syntax
            }
            ParseError::InvariantViolation(_) => ErrorKind::Internal,
        }
    }

    /// Line and column of the fault, when the error points at one.
    pub fn location(&self) -> Option<(usize, usize)> {
        match self {
            ParseError::UnexpectedCharacter { line, column, .. }
            | ParseError::UnexpectedToken { line, column, .. } => Some((*line, *column)),
            ParseError::Indentation(err) => Some((err.line(), 0)),
            ParseError::UnexpectedEndOfInput | ParseError::InvariantViolation(_) => None,
        }
    }

    pub fn is_internal(&self) -> bool {
        self.kind() == ErrorKind::Internal
    }
}

/// Errors raised while loading grammar tables or compiling lexical rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("Invalid grammar tables: {0}")]
    Json(String),
    #[error("Grammar tables have no states")]
    EmptyTable,
    #[error("Grammar tables do not declare the end-of-input symbol \"$\"")]
    MissingEndSymbol,
    #[error("Invalid symbol id \"{0}\"")]
    InvalidSymbol(String),
    #[error("Invalid column \"{column}\" in state {state}")]
    InvalidColumn { state: usize, column: String },
    #[error("Invalid action \"{cell}\" in state {state}, column {column}")]
    InvalidCell {
        state: usize,
        column: usize,
        cell: String,
    },
    #[error("State {target} referenced from state {state}, column {column} does not exist ({states} states)")]
    StateOutOfRange {
        state: usize,
        column: usize,
        target: usize,
        states: usize,
    },
    #[error("Production {production} referenced from state {state}, column {column} does not exist ({productions} productions)")]
    ProductionOutOfRange {
        state: usize,
        column: usize,
        production: usize,
        productions: usize,
    },
    #[error("Production {index} has an invalid left-hand side {lhs}")]
    InvalidProduction { index: usize, lhs: i64 },
    #[error("Unknown terminal \"{0}\"")]
    UnknownTerminal(String),
    #[error("Invalid lexical pattern /{pattern}/: {message}")]
    InvalidPattern { pattern: String, message: String },
    #[error("Indentation rule /{pattern}/ must capture the indentation in group 1")]
    MissingIndentGroup { pattern: String },
}
