//! Grammar driven backtracking parser.
//!
//! A `Grammar` maps non-terminals to ordered alternatives. `parse` walks a
//! `LexemeStream` against it, trying alternatives in order and rewinding the
//! stream whenever one fails, and produces an `AstNode` tree.

mod ast;
mod grammar;
mod processor;
mod stream;

pub use ast::{AstNode, DfsIter};
pub use grammar::{single, Grammar, Repetition, Rule, Symbol, REPETITION};
pub use processor::{parse, GrammarProcessor, ParseError};
pub use stream::{Checkpoint, Lexeme, LexemeStream, END_OF_STREAM};
