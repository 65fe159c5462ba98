//! Parsing
//!
//!     A generic table-driven shift/reduce engine. Nothing here is specific to yapl: the
//!     automaton comes from [`tables::GrammarTables`], tokens come from any
//!     [`TokenSource`](crate::yapl::token::TokenSource), and values are built by a
//!     [`driver::Reductions`] implementation.

pub mod driver;
pub mod stack;
pub mod tables;

pub use driver::{Driver, ParseOptions, Reduction, Reductions};
pub use stack::{Frame, ParseStack};
pub use tables::{Action, GrammarTables, Production, END_SYMBOL};
