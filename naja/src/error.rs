use std::error;
use std::fmt::{self, Display};

use parsegen::ParseError;

use crate::codegen::GenerateError;

pub type Result<T> = std::result::Result<T, CompileError>;

#[derive(Debug)]
pub enum CompileError {
    /// The source contains a character no lexeme starts with.
    Lex {
        line: usize,
        column: usize,
        found: char,
    },
    /// An integer literal that doesn't fit in 32 bits.
    Literal {
        line: usize,
        column: usize,
        literal: String,
    },
    /// The lexemes don't form a program. Holds the parser's diagnostics.
    Parse(Vec<String>),
    Generate(GenerateError),
    Grammar(anyhow::Error),
}

impl Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CompileError::Lex {
                line,
                column,
                found,
            } => write!(
                f,
                "unexpected character '{}' at line {}, column {}",
                found.escape_debug(),
                line,
                column
            ),
            CompileError::Literal {
                line,
                column,
                ref literal,
            } => write!(
                f,
                "integer literal {} out of range at line {}, column {}",
                literal, line, column
            ),
            CompileError::Parse(ref diagnostics) => {
                write!(f, "failed to parse:\n{}", diagnostics.join("\n"))
            }
            CompileError::Generate(ref e) => write!(f, "{}", e),
            CompileError::Grammar(ref e) => write!(f, "invalid grammar: {:#}", e),
        }
    }
}

impl error::Error for CompileError {}

impl From<ParseError> for CompileError {
    fn from(e: ParseError) -> CompileError {
        CompileError::Parse(e.into_diagnostics())
    }
}

impl From<GenerateError> for CompileError {
    fn from(e: GenerateError) -> CompileError {
        CompileError::Generate(e)
    }
}
