//! Tokens shared by the lexer and the parsing engine.
//!
//!     A token is an immutable value: the grammar symbol it stands for, the text it was
//!     matched from (possibly rewritten by its lexical rule, e.g. a comment without its
//!     marker) and the span it covers in the source.
//!
//!     Token kinds are plain symbol ids. The lexer resolves its terminal names against the
//!     grammar tables once, when the lexical grammar is compiled, so the engine never
//!     deals with names in its hot loop.
//!
//! Synthetic Tokens
//!
//!     Block-open, block-close and line-separator tokens are synthesized from indentation.
//!     A block-open token carries the indentation it was matched from, block-close and
//!     line-separator tokens carry empty text. All tokens emitted from one physical match
//!     share that match's span.

pub mod span;
pub mod stream;

pub use span::Span;
pub use stream::{TokenSource, TokenStream};

use serde::Serialize;

/// Column of a grammar symbol (terminal or nonterminal) in the action table.
pub type SymbolId = usize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: SymbolId,
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: SymbolId, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }
}
