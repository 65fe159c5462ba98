//! Abstract syntax tree
//!
//!     The tree a yapl file parses into. A program is a sequence of module declarations;
//!     a module may carry an indented block, which holds an optional semantic comment
//!     (the `;` line that opens it) and nested declarations.
//!
//!     Every node records the source it covers in `location` when location capture is on.
//!     With capture off the field is `None` and is left out of serialized output.

use serde::Serialize;

use crate::yapl::token::Span;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Program {
    pub statements: Vec<Statement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Statement {
    Module(Module),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Module {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Block>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub statements: Vec<Statement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Span>,
}

impl Program {
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.statements.iter().map(|statement| match statement {
            Statement::Module(module) => module,
        })
    }

    /// Clear every location in the tree.
    pub fn without_locations(mut self) -> Self {
        self.location = None;
        self.statements.iter_mut().for_each(Statement::clear_locations);
        self
    }
}

impl Statement {
    fn clear_locations(&mut self) {
        match self {
            Statement::Module(module) => {
                module.location = None;
                if let Some(block) = module.body.as_mut() {
                    block.location = None;
                    block.statements.iter_mut().for_each(Statement::clear_locations);
                }
            }
        }
    }
}
