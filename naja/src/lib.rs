//! Compiler for Naja, a tiny language of one function returning an integer
//! expression:
//!
//! ```text
//! def main() as int:
//!     return 2 * (3 + 4)
//! ```
//!
//! Source is lexed by `lexer`, parsed against the grammar in `naja.ebnf` and
//! turned into flat assembler source by `codegen`.

pub mod codegen;
mod error;
pub mod grammar;
pub mod lexer;

pub use error::{CompileError, Result};

use parsegen::{AstNode, Grammar};
use tracing::{debug, info};

use crate::codegen::Generator;

pub struct Compiler {
    grammar: Grammar,
}

impl Compiler {
    pub fn new() -> Result<Self> {
        let grammar = grammar::grammar().map_err(CompileError::Grammar)?;
        Ok(Compiler { grammar })
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn generator(&self) -> Generator<'_> {
        codegen::fasm::generator(&self.grammar)
    }

    /// Lex and parse `source`. Leading and trailing whitespace is ignored.
    pub fn parse(&self, source: &str) -> Result<AstNode> {
        let mut stream = lexer::tokenize(source.trim())?;
        let tree = parsegen::parse(&mut stream, &self.grammar)?;
        debug!(nodes = tree.iter().count(), "parsed");
        Ok(tree)
    }

    /// Compile `source` to assembly. Nothing is generated unless the whole
    /// source parses.
    pub fn compile(&self, source: &str) -> Result<String> {
        let tree = self.parse(source)?;
        let code = self.generator().generate(&tree)?;
        info!(bytes = code.len(), "generated assembly");
        Ok(code)
    }
}

/// Compile `source` with a fresh `Compiler`.
pub fn compile(source: &str) -> Result<String> {
    Compiler::new()?.compile(source)
}
