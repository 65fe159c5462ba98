//! AST construction
//!
//!     One reducer per yapl production. Values on the parse stack are [`Value`]s; each
//!     reducer destructures the values of its right-hand side and builds the node for
//!     its left-hand side. A value of the wrong shape means the tables and the reducers
//!     disagree, which is reported as an invariant violation.

use crate::yapl::ast::{Block, Module, Program, Statement};
use crate::yapl::error::ParseError;
use crate::yapl::parsing::{Reduction, Reductions};
use crate::yapl::token::{Span, Token};

/// Production indices of the bundled tables.
pub mod production {
    pub const PROGRAM: usize = 1;
    pub const STATEMENTS_FIRST: usize = 2;
    pub const STATEMENTS_NEXT: usize = 3;
    pub const STATEMENTS_TRAILING_NL: usize = 4;
    pub const STATEMENT_MODULE: usize = 5;
    pub const OPTIONAL_BLOCK: usize = 6;
    pub const NO_BLOCK: usize = 7;
    pub const BLOCK_COMMENT: usize = 8;
    pub const BLOCK_COMMENT_STATEMENTS: usize = 9;
    pub const BLOCK_STATEMENTS: usize = 10;
    pub const MODULE: usize = 11;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Token(Token),
    Program(Program),
    Statements(Vec<Statement>),
    Statement(Statement),
    OptionalBlock(Option<Block>),
    Block(Block),
    Module(Module),
}

#[derive(Debug, Default)]
pub struct AstBuilder;

impl AstBuilder {
    pub fn new() -> Self {
        Self
    }
}

fn mismatch(production: usize, expected: &str, found: &Value) -> ParseError {
    ParseError::InvariantViolation(format!(
        "production {} expected {} but found {:?}",
        production, expected, found
    ))
}

fn token(production: usize, value: Value) -> Result<Token, ParseError> {
    match value {
        Value::Token(token) => Ok(token),
        other => Err(mismatch(production, "a token", &other)),
    }
}

fn statements(production: usize, value: Value) -> Result<Vec<Statement>, ParseError> {
    match value {
        Value::Statements(statements) => Ok(statements),
        other => Err(mismatch(production, "statements", &other)),
    }
}

fn statement(production: usize, value: Value) -> Result<Statement, ParseError> {
    match value {
        Value::Statement(statement) => Ok(statement),
        other => Err(mismatch(production, "a statement", &other)),
    }
}

fn block(production: usize, value: Value) -> Result<Block, ParseError> {
    match value {
        Value::Block(block) => Ok(block),
        other => Err(mismatch(production, "a block", &other)),
    }
}

fn optional_block(production: usize, value: Value) -> Result<Option<Block>, ParseError> {
    match value {
        Value::OptionalBlock(block) => Ok(block),
        other => Err(mismatch(production, "an optional block", &other)),
    }
}

fn module(production: usize, value: Value) -> Result<Module, ParseError> {
    match value {
        Value::Module(module) => Ok(module),
        other => Err(mismatch(production, "a module", &other)),
    }
}

/// Take exactly `N` right-hand side values.
fn take<const N: usize>(production: usize, values: Vec<Value>) -> Result<[Value; N], ParseError> {
    let found = values.len();
    values.try_into().map_err(|_| {
        ParseError::InvariantViolation(format!(
            "production {} expected {} values, found {}",
            production, N, found
        ))
    })
}

impl Reductions for AstBuilder {
    type Value = Value;

    fn shift(&mut self, token: Token) -> Value {
        Value::Token(token)
    }

    fn reduce(&mut self, p: usize, reduction: Reduction<Value>) -> Result<Value, ParseError> {
        use self::production::*;

        let location: Option<Span> = reduction.span;
        let values = reduction.values;

        let value = match p {
            PROGRAM => {
                let [body, _eof] = take::<2>(p, values)?;
                Value::Program(Program {
                    statements: statements(p, body)?,
                    location,
                })
            }
            STATEMENTS_FIRST => {
                let [first] = take::<1>(p, values)?;
                Value::Statements(vec![statement(p, first)?])
            }
            STATEMENTS_NEXT => {
                let [list, _nl, next] = take::<3>(p, values)?;
                let mut list = statements(p, list)?;
                list.push(statement(p, next)?);
                Value::Statements(list)
            }
            STATEMENTS_TRAILING_NL => {
                let [list, _nl] = take::<2>(p, values)?;
                Value::Statements(statements(p, list)?)
            }
            STATEMENT_MODULE => {
                let [inner] = take::<1>(p, values)?;
                Value::Statement(Statement::Module(module(p, inner)?))
            }
            OPTIONAL_BLOCK => {
                let [inner] = take::<1>(p, values)?;
                Value::OptionalBlock(Some(block(p, inner)?))
            }
            NO_BLOCK => {
                let [] = take::<0>(p, values)?;
                Value::OptionalBlock(None)
            }
            BLOCK_COMMENT => {
                let [_indent, comment, _dedent] = take::<3>(p, values)?;
                Value::Block(Block {
                    comment: Some(token(p, comment)?.text),
                    statements: Vec::new(),
                    location,
                })
            }
            BLOCK_COMMENT_STATEMENTS => {
                let [_indent, comment, _nl, body, _dedent] = take::<5>(p, values)?;
                Value::Block(Block {
                    comment: Some(token(p, comment)?.text),
                    statements: statements(p, body)?,
                    location,
                })
            }
            BLOCK_STATEMENTS => {
                let [_indent, body, _dedent] = take::<3>(p, values)?;
                Value::Block(Block {
                    comment: None,
                    statements: statements(p, body)?,
                    location,
                })
            }
            MODULE => {
                let [_keyword, name, body] = take::<3>(p, values)?;
                Value::Module(Module {
                    name: token(p, name)?.text,
                    body: optional_block(p, body)?,
                    location,
                })
            }
            other => {
                return Err(ParseError::InvariantViolation(format!(
                    "no reducer for production {}",
                    other
                )))
            }
        };
        Ok(value)
    }
}
