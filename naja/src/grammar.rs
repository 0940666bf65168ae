//! The Naja grammar, loaded from `naja.ebnf`.

use anyhow::{Context, Result};
use parsegen::Grammar;

const NAJA_EBNF: &str = include_str!("naja.ebnf");

pub const PROGRAM: &str = "program";
pub const FUNCTION: &str = "function";
pub const STATEMENT: &str = "statement";
pub const EXPRESSION: &str = "expression";
pub const TERM: &str = "term";
pub const FACTOR: &str = "factor";
pub const UNARY: &str = "unary";
pub const ADDITIVE: &str = "additive";
pub const MULTIPLICATIVE: &str = "multiplicative";

pub fn grammar() -> Result<Grammar> {
    let ebnf: ebnf::Grammar = NAJA_EBNF.parse().context("parse naja.ebnf")?;
    Grammar::from_ebnf(&ebnf, PROGRAM)
}
