//! # yapl
//!
//! An indentation-sensitive lexer and a table-driven shift/reduce parser for the yapl
//! language.
//!
//! ## Usage
//!
//! Sources must end with the end-of-input marker; [`yapl::source::prepare_source`] adds it
//! for text read from disk. See the [yapl module](yapl) for the pipeline.

pub mod yapl;
