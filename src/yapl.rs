//! Main module for yapl library functionality
//!
//!     source text -> lexing::Lexer -> tokens -> parsing::Driver (grammar tables) -> ast::Program
//!
//!     The lexer is pulled on demand by the driver; both live for a single parse and are
//!     discarded afterwards. Grammar tables and lexical rules are immutable and shared, so
//!     any number of parses can run at once, from any number of threads.

pub mod ast;
pub mod config;
pub mod error;
pub mod grammar;
pub mod lexing;
pub mod parsing;
pub mod source;
pub mod token;

pub use ast::{Block, Module, Program, Statement};
pub use error::{ErrorKind, GrammarError, IndentationError, ParseError};
pub use grammar::Grammar;
pub use parsing::ParseOptions;

/// Parse a source ending with the default end-of-input marker, capturing locations.
pub fn parse(source: &str) -> Result<Program, ParseError> {
    parse_with(source, ParseOptions::default())
}

pub fn parse_with(source: &str, options: ParseOptions) -> Result<Program, ParseError> {
    Grammar::yapl().parse(source, options)
}
