//! Shift/reduce driver
//!
//!     Executes a precomputed LR automaton over a token source. The driver knows nothing
//!     about the language: the tables say what to do next and a [`Reductions`]
//!     implementation builds values, one callback per shifted token and one per reduced
//!     production.
//!
//!     The loop, until accept or error:
//!
//!         shift  s   wrap the lookahead in a frame, push it with state s, fetch the next token
//!         reduce p   pop |p| frames (left to right), merge the first and last span, call the reducer,
//!                    push the result with goto[exposed state][lhs of p]
//!         accept     pop the final frame; valid only if the stack is back to the initial
//!                    state and the source has nothing left
//!         error      fail with the lookahead's text and location
//!
//!     Location capture can be switched off. Frames then carry no span and no merging is
//!     done; tokens keep their spans, so errors still point at the right place.

use super::stack::{Frame, ParseStack};
use super::tables::{Action, GrammarTables};
use crate::yapl::error::ParseError;
use crate::yapl::token::{Span, Token, TokenSource};

/// Values and spans popped for one reduction, in source order.
#[derive(Debug)]
pub struct Reduction<V> {
    pub values: Vec<V>,
    pub spans: Vec<Option<Span>>,
    /// Merge of the first and the last popped span. An absent side leaves the other one
    /// as is; `None` for an empty production or when locations are not captured.
    pub span: Option<Span>,
}

/// Semantic actions, indexed by production.
pub trait Reductions {
    type Value;

    /// Wrap a shifted token.
    fn shift(&mut self, token: Token) -> Self::Value;

    /// Build the value for `production` from its right-hand side.
    fn reduce(
        &mut self,
        production: usize,
        reduction: Reduction<Self::Value>,
    ) -> Result<Self::Value, ParseError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub capture_locations: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            capture_locations: true,
        }
    }
}

pub struct Driver<'t> {
    tables: &'t GrammarTables,
    options: ParseOptions,
}

impl<'t> Driver<'t> {
    pub fn new(tables: &'t GrammarTables, options: ParseOptions) -> Self {
        Self { tables, options }
    }

    /// Run the automaton over `source` to acceptance.
    pub fn parse<S, R>(&self, source: &mut S, reductions: &mut R) -> Result<R::Value, ParseError>
    where
        S: TokenSource + ?Sized,
        R: Reductions + ?Sized,
    {
        tracing::debug!(
            capture_locations = self.options.capture_locations,
            "parse begin"
        );

        let mut stack: ParseStack<R::Value> = ParseStack::new();
        let mut lookahead = source.next_token()?;

        loop {
            let state = stack.top();
            let Some(token) = lookahead.as_ref() else {
                return Err(ParseError::UnexpectedEndOfInput);
            };

            match self.tables.action(state, token.kind) {
                Action::Shift(next) => {
                    let Some(token) = lookahead.take() else {
                        return Err(ParseError::UnexpectedEndOfInput);
                    };
                    tracing::trace!(
                        state,
                        next,
                        kind = token.kind,
                        text = %token.text.escape_debug(),
                        "shift"
                    );
                    let span = self.options.capture_locations.then_some(token.span);
                    let value = reductions.shift(token);
                    stack.push(Frame { value, span }, next);
                    lookahead = source.next_token()?;
                }
                Action::Reduce(index) => {
                    self.reduce(&mut stack, index, reductions)?;
                }
                Action::Accept => {
                    let mut popped = stack.pop(1)?;
                    if stack.is_initial() && !source.has_more_tokens() {
                        if let Some(frame) = popped.pop() {
                            tracing::debug!("parse accepted");
                            return Ok(frame.value);
                        }
                    }
                    // report whatever follows the accepted input
                    return match source.next_token()? {
                        Some(extra) => Err(self.unexpected(&*source, state, &extra)),
                        None => Err(self.unexpected(&*source, state, token)),
                    };
                }
                Action::Goto(_) | Action::Error => {
                    return Err(self.unexpected(&*source, state, token));
                }
            }
        }
    }

    fn reduce<R>(
        &self,
        stack: &mut ParseStack<R::Value>,
        index: usize,
        reductions: &mut R,
    ) -> Result<(), ParseError>
    where
        R: Reductions + ?Sized,
    {
        let production = self.tables.production(index).ok_or_else(|| {
            ParseError::InvariantViolation(format!("reduce by unknown production {}", index))
        })?;
        let lhs = production.lhs.ok_or_else(|| {
            ParseError::InvariantViolation("reduce by the augmented start production".into())
        })?;

        let frames = stack.pop(production.len)?;
        let mut values = Vec::with_capacity(frames.len());
        let mut spans = Vec::with_capacity(frames.len());
        for frame in frames {
            values.push(frame.value);
            spans.push(frame.span);
        }
        let span = if self.options.capture_locations {
            Span::merge(
                spans.first().copied().flatten(),
                spans.last().copied().flatten(),
            )
        } else {
            None
        };

        tracing::trace!(production = index, lhs, len = production.len, "reduce");
        let value = reductions.reduce(index, Reduction { values, spans, span })?;

        let exposed = stack.top();
        match self.tables.action(exposed, lhs) {
            Action::Goto(next) => {
                stack.push(Frame { value, span }, next);
                Ok(())
            }
            other => Err(ParseError::InvariantViolation(format!(
                "no goto from state {} on symbol {} (found {:?})",
                exposed, lhs, other
            ))),
        }
    }

    fn unexpected<S>(&self, source: &S, state: usize, token: &Token) -> ParseError
    where
        S: TokenSource + ?Sized,
    {
        if token.kind == self.tables.end_symbol() {
            return ParseError::UnexpectedEndOfInput;
        }
        let line = token.span.start_line;
        let column = token.span.start_column;
        ParseError::UnexpectedToken {
            text: token.text.clone(),
            line,
            column,
            expected: self.tables.expected(state),
            excerpt: source.excerpt(line, column),
        }
    }
}
