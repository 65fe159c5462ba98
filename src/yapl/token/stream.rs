//! Token sources
//!
//!     The parsing engine pulls tokens on demand through [`TokenSource`]. The lexer is the
//!     production implementation; [`TokenStream`] replays an already materialized token
//!     sequence, which lets the engine run against hand-built inputs and alternate
//!     front-ends.

use super::Token;
use crate::yapl::error::{Excerpt, ParseError};
use std::collections::VecDeque;

pub trait TokenSource {
    /// Produce the next token, or `None` once the stream is exhausted.
    fn next_token(&mut self) -> Result<Option<Token>, ParseError>;

    /// Whether a later call to [`next_token`](Self::next_token) can still yield a token.
    fn has_more_tokens(&self) -> bool;

    /// Render the source line at `line` with a caret under `column`, if the source text
    /// is available.
    fn excerpt(&self, _line: usize, _column: usize) -> Option<Excerpt> {
        None
    }
}

/// A token source replaying a fixed token sequence.
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    tokens: VecDeque<Token>,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl From<Vec<Token>> for TokenStream {
    fn from(tokens: Vec<Token>) -> Self {
        Self::new(tokens)
    }
}

impl TokenSource for TokenStream {
    fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        Ok(self.tokens.pop_front())
    }

    fn has_more_tokens(&self) -> bool {
        !self.tokens.is_empty()
    }
}
