//! Stateful lexer
//!
//!     The lexer is pulled one token at a time by the parser. It owns everything that
//!     changes while scanning: the cursor, line accounting, the mode stack, the
//!     indentation tracker and a queue of tokens that were recognized together but are
//!     handed out one by one.
//!
//!     A single physical match can stand for several grammar tokens. Dedenting `k` levels
//!     yields `k` block-closes followed by one line separator, and the end-of-input
//!     sentinel yields one block-close per open block followed by the sentinel itself.
//!     These batches are queued in order and drained before the source is scanned again.
//!
//!     Once the cursor reaches the end of the text the lexer returns a single token of the
//!     grammar's end symbol, then `None` forever after.

use std::collections::VecDeque;

use super::indentation::{IndentationTracker, LineBreak};
use super::rules::{LexicalGrammar, RuleAction, StructuralTerminals, INITIAL};
use crate::yapl::error::{Excerpt, ParseError};
use crate::yapl::token::{Span, SymbolId, Token, TokenSource};

pub struct Lexer<'g, 's> {
    grammar: &'g LexicalGrammar,
    source: &'s str,
    cursor: usize,
    line: usize,
    line_begin: usize,
    modes: Vec<String>,
    pending: VecDeque<Token>,
    indentation: IndentationTracker,
}

impl<'g, 's> Lexer<'g, 's> {
    pub fn new(grammar: &'g LexicalGrammar, source: &'s str) -> Self {
        Self {
            grammar,
            source,
            cursor: 0,
            line: 1,
            line_begin: 0,
            modes: vec![INITIAL.to_string()],
            pending: VecDeque::new(),
            indentation: IndentationTracker::new(),
        }
    }

    pub fn source(&self) -> &'s str {
        self.source
    }

    pub fn indentation(&self) -> &IndentationTracker {
        &self.indentation
    }

    pub fn current_mode(&self) -> &str {
        self.modes.last().map(String::as_str).unwrap_or(INITIAL)
    }

    pub fn push_mode(&mut self, mode: impl Into<String>) {
        self.modes.push(mode.into());
    }

    /// Leave the current mode. The bottom mode is never popped.
    pub fn pop_mode(&mut self) -> Option<String> {
        if self.modes.len() > 1 {
            self.modes.pop()
        } else {
            None
        }
    }

    pub fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        if let Some(token) = self.pending.pop_front() {
            return Ok(Some(token));
        }

        loop {
            if self.cursor > self.source.len() {
                return Ok(None);
            }
            if self.cursor == self.source.len() {
                self.cursor += 1;
                let column = self.source.len() - self.line_begin;
                let span = Span::point(self.source.len(), self.line, column);
                return Ok(Some(Token::new(self.grammar.end_symbol(), "", span)));
            }

            let source = self.source;
            let rest = &source[self.cursor..];
            let mode = self.current_mode();
            let matched = self.grammar.rules_for(mode).find_map(|rule| {
                rule.regex()
                    .captures(rest)
                    .filter(|caps| caps.get(0).map_or(false, |m| !m.is_empty()))
                    .map(|caps| {
                        let width = caps.get(1).map_or(0, |group| group.len());
                        (rule.action().clone(), caps[0].len(), width)
                    })
            });

            let Some((action, length, width)) = matched else {
                return Err(self.unexpected_character());
            };

            let text = &source[self.cursor..self.cursor + length];
            let span = self.advance(length);
            let token = match action {
                RuleAction::Emit(kind) => Token::new(kind, text, span),
                RuleAction::EmitStripped { kind, prefix } => {
                    Token::new(kind, text.get(prefix..).unwrap_or(""), span)
                }
                RuleAction::EndOfInput(kind) => {
                    let open = self.indentation.close_all();
                    self.queue_closes(open, span)?;
                    self.pending.push_back(Token::new(kind, text, span));
                    self.drain_pending()?
                }
                RuleAction::BlockOpen => {
                    let indent = self.structural()?.indent;
                    self.indentation.open_block(width, self.line)?;
                    Token::new(indent, text, span)
                }
                RuleAction::LineBreak => {
                    let newline = self.structural()?.newline;
                    match self.indentation.line_break(width, self.line)? {
                        LineBreak::Continue => Token::new(newline, "", span),
                        LineBreak::Dedent(levels) => {
                            self.queue_closes(levels, span)?;
                            self.pending.push_back(Token::new(newline, "", span));
                            self.drain_pending()?
                        }
                        LineBreak::Ignore => continue,
                    }
                }
                RuleAction::Skip => continue,
            };

            tracing::trace!(
                kind = token.kind,
                text = %token.text.escape_debug(),
                line = token.span.start_line,
                column = token.span.start_column,
                "lexed token"
            );
            return Ok(Some(token));
        }
    }

    /// Move the cursor over `length` bytes and return the span they cover.
    ///
    /// Each newline inside the match bumps the line and moves the line start to just
    /// after it, so columns of the next match are relative to the right line.
    fn advance(&mut self, length: usize) -> Span {
        let start = self.cursor;
        let end = start + length;
        let start_line = self.line;
        let start_column = start - self.line_begin;

        for (index, _) in self.source[start..end].match_indices('\n') {
            self.line += 1;
            self.line_begin = start + index + 1;
        }

        self.cursor = end;
        Span::new(
            start,
            end,
            start_line,
            self.line,
            start_column,
            end - self.line_begin,
        )
    }

    fn structural(&self) -> Result<StructuralTerminals, ParseError> {
        self.grammar.structural().ok_or_else(|| {
            ParseError::InvariantViolation("lexical grammar has no structural terminals".into())
        })
    }

    fn queue_closes(&mut self, count: usize, span: Span) -> Result<(), ParseError> {
        if count == 0 {
            return Ok(());
        }
        let dedent: SymbolId = self.structural()?.dedent;
        self.pending
            .extend((0..count).map(|_| Token::new(dedent, "", span)));
        Ok(())
    }

    fn drain_pending(&mut self) -> Result<Token, ParseError> {
        self.pending.pop_front().ok_or_else(|| {
            ParseError::InvariantViolation("token batch was queued empty".to_string())
        })
    }

    fn unexpected_character(&self) -> ParseError {
        let character = self.source[self.cursor..].chars().next().unwrap_or('\0');
        let column = self.cursor - self.line_begin;
        ParseError::UnexpectedCharacter {
            character,
            line: self.line,
            column,
            excerpt: Excerpt::from_source(self.source, self.line, column),
        }
    }
}

impl TokenSource for Lexer<'_, '_> {
    fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        Lexer::next_token(self)
    }

    fn has_more_tokens(&self) -> bool {
        !self.pending.is_empty() || self.cursor <= self.source.len()
    }

    fn excerpt(&self, line: usize, column: usize) -> Option<Excerpt> {
        Excerpt::from_source(self.source, line, column)
    }
}
