//! Lexing
//!
//!     Turns source text into the token stream the parser consumes. Besides the tokens
//!     the text spells out, the lexer synthesizes the structural tokens of an
//!     indentation-structured language:
//!
//!     - INDENT when a `:` line opens a deeper block
//!     - DEDENT for every block closed by a shallower line (or by the end of input)
//!     - NL between statements of the same block
//!
//!     Rule order is significant and lives in [`rules::LexicalGrammar`]; the indentation
//!     bookkeeping lives in [`indentation::IndentationTracker`]; [`lexer::Lexer`] ties them
//!     together and is what the parser pulls from.

pub mod indentation;
pub mod lexer;
pub mod rules;

pub use indentation::{IndentationTracker, LineBreak};
pub use lexer::Lexer;
pub use rules::{
    LexRule, LexicalGrammar, LexicalGrammarBuilder, RuleAction, StructuralTerminals, INITIAL,
};

use crate::yapl::error::ParseError;
use crate::yapl::token::Token;

/// Lex `source` to completion, including the final end-of-input token.
pub fn tokenize(grammar: &LexicalGrammar, source: &str) -> Result<Vec<Token>, ParseError> {
    let mut lexer = Lexer::new(grammar, source);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}
