use std::error;
use std::fmt::{self, Display};

#[derive(Debug)]
pub enum Error {
    ParseError(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::ParseError(ref s) => write!(f, "failed to parse ebnf: {}", s),
        }
    }
}

impl error::Error for Error {}

impl From<nom::Err<nom::error::Error<&str>>> for Error {
    fn from(err: nom::Err<nom::error::Error<&str>>) -> Error {
        match err {
            nom::Err::Error(e) | nom::Err::Failure(e) => {
                let near: String = e.input.chars().take(24).collect();
                Error::ParseError(format!("{:?} near '{}'", e.code, near))
            }
            nom::Err::Incomplete(needed) => Error::ParseError(format!("{:?}", needed)),
        }
    }
}
