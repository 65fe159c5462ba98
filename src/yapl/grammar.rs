//! The yapl grammar
//!
//!     Bundles everything that is specific to yapl: the precomputed tables in
//!     `grammar/yapl.tables.json`, the ordered lexical rules and the reducers that build
//!     the AST. The engine in [`crate::yapl::parsing`] and the lexer in
//!     [`crate::yapl::lexing`] only ever see these as data.
//!
//!     Grammar (production index, lhs -> rhs):
//!
//!         0  $accept       -> Program
//!         1  Program       -> Statements EOF_MARKER
//!         2  Statements    -> Statement
//!         3  Statements    -> Statements NL Statement
//!         4  Statements    -> Statements NL
//!         5  Statement     -> Module
//!         6  OptionalBlock -> Block
//!         7  OptionalBlock -> (empty)
//!         8  Block         -> INDENT SEMANTIC_COMMENT DEDENT
//!         9  Block         -> INDENT SEMANTIC_COMMENT NL Statements DEDENT
//!         10 Block         -> INDENT Statements DEDENT
//!         11 Module        -> KEYWORD_MODULE DOT_DELIMITED_IDENTIFIER OptionalBlock
//!
//!     Lexical rules, in priority order:
//!
//!         ;[ a-zA-Z]*                          SEMANTIC_COMMENT (without the `;`)
//!         module                               KEYWORD_MODULE
//!         [a-zA-Z0-9_]+(\.[a-zA-Z0-9_]+)+      DOT_DELIMITED_IDENTIFIER
//!         [a-zA-Z0-9_]+                        IDENTIFIER
//!         \n@@EOF@@                            EOF_MARKER (closes open blocks)
//!         :\n((    )*)                         block-open
//!         \n((    )*)                          line break
//!         whitespace other than newlines       skipped

pub mod builder;

use once_cell::sync::Lazy;

use crate::yapl::ast::Program;
use crate::yapl::error::{GrammarError, ParseError};
use crate::yapl::lexing::{self, Lexer, LexicalGrammar, LexicalGrammarBuilder, RuleAction};
use crate::yapl::parsing::{Driver, GrammarTables, ParseOptions};
use crate::yapl::token::Token;

pub use builder::{AstBuilder, Value};

/// The end-of-input marker callers append to the source.
pub const DEFAULT_EOF_MARKER: &str = "@@EOF@@";

const TABLES: &str = include_str!("../../grammar/yapl.tables.json");

static YAPL: Lazy<Grammar> = Lazy::new(|| {
    Grammar::with_eof_marker(DEFAULT_EOF_MARKER).expect("bundled yapl grammar is valid")
});

fn lexical_rules(eof_marker: &str) -> LexicalGrammarBuilder {
    let sentinel = format!(r"\n{}", regex::escape(eof_marker));
    LexicalGrammar::builder()
        .rule(
            r";[ a-zA-Z]*",
            RuleAction::EmitStripped {
                kind: "SEMANTIC_COMMENT",
                prefix: 1,
            },
        )
        .rule("module", RuleAction::Emit("KEYWORD_MODULE"))
        .rule(
            r"[a-zA-Z0-9_]+(\.[a-zA-Z0-9_]+)+",
            RuleAction::Emit("DOT_DELIMITED_IDENTIFIER"),
        )
        .rule("[a-zA-Z0-9_]+", RuleAction::Emit("IDENTIFIER"))
        .rule(&sentinel, RuleAction::EndOfInput("EOF_MARKER"))
        .rule(r":\n((    )*)", RuleAction::BlockOpen)
        .rule(r"\n((    )*)", RuleAction::LineBreak)
        .rule(r"[^\S\n]+", RuleAction::Skip)
        .structural("INDENT", "DEDENT", "NL")
}

/// Tables plus lexical rules. Immutable, so one instance serves any number of parses.
#[derive(Debug, Clone)]
pub struct Grammar {
    tables: GrammarTables,
    lexical: LexicalGrammar,
    eof_marker: String,
}

impl Grammar {
    /// The shared yapl grammar, loaded on first use.
    pub fn yapl() -> &'static Grammar {
        &YAPL
    }

    /// The yapl grammar with a different end-of-input marker.
    pub fn with_eof_marker(eof_marker: &str) -> Result<Self, GrammarError> {
        let tables = GrammarTables::from_json(TABLES)?;
        let lexical = lexical_rules(eof_marker).compile(&tables)?;
        Ok(Self {
            tables,
            lexical,
            eof_marker: eof_marker.to_string(),
        })
    }

    pub fn tables(&self) -> &GrammarTables {
        &self.tables
    }

    pub fn lexical(&self) -> &LexicalGrammar {
        &self.lexical
    }

    pub fn eof_marker(&self) -> &str {
        &self.eof_marker
    }

    /// A fresh lexer over `source`.
    pub fn lexer<'s>(&self, source: &'s str) -> Lexer<'_, 's> {
        Lexer::new(&self.lexical, source)
    }

    pub fn tokenize(&self, source: &str) -> Result<Vec<Token>, ParseError> {
        lexing::tokenize(&self.lexical, source)
    }

    /// Parse a source that already ends with the end-of-input marker.
    pub fn parse(&self, source: &str, options: ParseOptions) -> Result<Program, ParseError> {
        let mut lexer = self.lexer(source);
        let value = Driver::new(&self.tables, options).parse(&mut lexer, &mut AstBuilder::new())?;
        match value {
            Value::Program(program) => Ok(program),
            other => Err(ParseError::InvariantViolation(format!(
                "parse accepted {:?} instead of a program",
                other
            ))),
        }
    }
}
