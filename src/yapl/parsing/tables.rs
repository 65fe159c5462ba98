//! Grammar tables
//!
//!     The automaton the driver executes: an action table indexed by (state, symbol) and
//!     the production list. Tables are produced by an external grammar compiler and read
//!     here from its JSON output:
//!
//!         {
//!           "tokens":       {"NL": 6, "$": 14, ...},          terminal name -> column
//!           "nonterminals": {"Program": 0, ...},              optional, for diagnostics
//!           "productions":  [[-1, 1], [0, 2], ...],           [lhs, rhs length]
//!           "table":        [{"0": 1, "10": "s5"}, ...]       one object per state
//!         }
//!
//!     A cell is `"sN"` (shift to state N), `"rN"` (reduce by production N), `"acc"`
//!     (accept) or a bare number (goto state N, nonterminal columns only). An lhs of `-1`
//!     marks the augmented start production.
//!
//!     Every cell is validated on load and stored densely, with [`Action::Error`] standing
//!     for an empty cell, so a lookup is a single index and the syntax-error path is one
//!     branch. Tables are immutable once loaded and can be shared between threads.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

use crate::yapl::error::GrammarError;
use crate::yapl::token::SymbolId;

/// Name of the end-of-input terminal every table must declare.
pub const END_SYMBOL: &str = "$";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Shift(usize),
    Reduce(usize),
    Accept,
    Goto(usize),
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Production {
    /// `None` for the augmented start production.
    pub lhs: Option<SymbolId>,
    pub len: usize,
}

#[derive(Debug, Clone)]
pub struct GrammarTables {
    actions: Vec<Action>,
    columns: usize,
    states: usize,
    productions: Vec<Production>,
    names: Vec<Option<String>>,
    terminals: BTreeMap<String, SymbolId>,
    end: SymbolId,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(usize),
    Text(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCell {
    Goto(usize),
    Action(String),
}

#[derive(Debug, Deserialize)]
struct RawTables {
    tokens: BTreeMap<String, RawId>,
    #[serde(default)]
    nonterminals: BTreeMap<String, RawId>,
    productions: Vec<(i64, usize)>,
    table: Vec<BTreeMap<String, RawCell>>,
}

fn symbol_id(raw: RawId) -> Result<SymbolId, GrammarError> {
    match raw {
        RawId::Number(id) => Ok(id),
        RawId::Text(text) => text.parse().map_err(|_| GrammarError::InvalidSymbol(text)),
    }
}

impl GrammarTables {
    pub fn from_json(json: &str) -> Result<Self, GrammarError> {
        let raw: RawTables =
            serde_json::from_str(json).map_err(|err| GrammarError::Json(err.to_string()))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawTables) -> Result<Self, GrammarError> {
        if raw.table.is_empty() {
            return Err(GrammarError::EmptyTable);
        }

        let mut terminals = BTreeMap::new();
        for (name, id) in raw.tokens {
            terminals.insert(name, symbol_id(id)?);
        }
        let mut nonterminals = BTreeMap::new();
        for (name, id) in raw.nonterminals {
            nonterminals.insert(name, symbol_id(id)?);
        }
        let end = *terminals
            .get(END_SYMBOL)
            .ok_or(GrammarError::MissingEndSymbol)?;

        let mut productions = Vec::with_capacity(raw.productions.len());
        for (index, (lhs, len)) in raw.productions.into_iter().enumerate() {
            let lhs = match lhs {
                -1 => None,
                id if id >= 0 => Some(id as SymbolId),
                id => return Err(GrammarError::InvalidProduction { index, lhs: id }),
            };
            productions.push(Production { lhs, len });
        }

        // cells may only sit in columns of declared symbols
        let declared: BTreeSet<SymbolId> = terminals
            .values()
            .chain(nonterminals.values())
            .chain(productions.iter().filter_map(|p| p.lhs.as_ref()))
            .copied()
            .collect();
        // symbol ids index the dense table, so they must stay compact (column 0 may go
        // unused when the nonterminals are not listed)
        if let Some(&widest) = declared.iter().find(|id| **id > declared.len()) {
            return Err(GrammarError::InvalidSymbol(widest.to_string()));
        }
        let columns = declared.last().map_or(0, |id| id + 1);

        let mut rows = Vec::with_capacity(raw.table.len());
        for (state, row) in raw.table.into_iter().enumerate() {
            let mut cells = Vec::with_capacity(row.len());
            for (key, cell) in row {
                let column = match key.parse::<SymbolId>() {
                    Ok(column) if declared.contains(&column) => column,
                    _ => return Err(GrammarError::InvalidColumn { state, column: key }),
                };
                cells.push((column, cell));
            }
            rows.push(cells);
        }

        let states = rows.len();
        let mut actions = vec![Action::Error; states * columns];
        for (state, cells) in rows.into_iter().enumerate() {
            for (column, cell) in cells {
                let action = Self::decode(state, column, cell)?;
                match action {
                    Action::Shift(target) | Action::Goto(target) if target >= states => {
                        return Err(GrammarError::StateOutOfRange {
                            state,
                            column,
                            target,
                            states,
                        });
                    }
                    Action::Reduce(production) if production >= productions.len() => {
                        return Err(GrammarError::ProductionOutOfRange {
                            state,
                            column,
                            production,
                            productions: productions.len(),
                        });
                    }
                    _ => {}
                }
                actions[state * columns + column] = action;
            }
        }

        let mut names = vec![None; columns];
        for (name, id) in terminals.iter().chain(nonterminals.iter()) {
            names[*id] = Some(name.clone());
        }

        Ok(Self {
            actions,
            columns,
            states,
            productions,
            names,
            terminals,
            end,
        })
    }

    fn decode(state: usize, column: usize, cell: RawCell) -> Result<Action, GrammarError> {
        let invalid = |cell: &str| GrammarError::InvalidCell {
            state,
            column,
            cell: cell.to_string(),
        };
        match cell {
            RawCell::Goto(target) => Ok(Action::Goto(target)),
            RawCell::Action(text) => {
                if text == "acc" {
                    return Ok(Action::Accept);
                }
                let parse = |number: &str| number.parse::<usize>().map_err(|_| invalid(&text));
                if let Some(target) = text.strip_prefix('s') {
                    Ok(Action::Shift(parse(target)?))
                } else if let Some(production) = text.strip_prefix('r') {
                    Ok(Action::Reduce(parse(production)?))
                } else {
                    Err(invalid(&text))
                }
            }
        }
    }

    /// The action for `symbol` in `state`. Unknown states and symbols are errors.
    pub fn action(&self, state: usize, symbol: SymbolId) -> Action {
        if state >= self.states || symbol >= self.columns {
            return Action::Error;
        }
        self.actions[state * self.columns + symbol]
    }

    pub fn production(&self, index: usize) -> Option<Production> {
        self.productions.get(index).copied()
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn state_count(&self) -> usize {
        self.states
    }

    /// Symbol id of a terminal by name.
    pub fn terminal(&self, name: &str) -> Option<SymbolId> {
        self.terminals.get(name).copied()
    }

    pub fn is_terminal(&self, symbol: SymbolId) -> bool {
        self.terminals.values().any(|id| *id == symbol)
    }

    pub fn symbol_name(&self, symbol: SymbolId) -> Option<&str> {
        self.names.get(symbol)?.as_deref()
    }

    pub fn end_symbol(&self) -> SymbolId {
        self.end
    }

    /// Names of the terminals `state` has an action for, in symbol order.
    pub fn expected(&self, state: usize) -> Vec<String> {
        let mut expected: Vec<(SymbolId, &str)> = self
            .terminals
            .iter()
            .filter(|(_, id)| self.action(state, **id) != Action::Error)
            .map(|(name, id)| (*id, name.as_str()))
            .collect();
        expected.sort_unstable();
        expected.into_iter().map(|(_, name)| name.to_string()).collect()
    }
}
