//! EBNF notation used to describe Naja-style grammars.
//!
//! Quoted strings are terminals, bare words are identifiers referring to other
//! productions. Supported operators are concatenation (`,`), alternation (`|`)
//! and repetition (`{ ... }`). Comments are written `(* ... *)`.

use std::fmt::{self, Display};
use std::str::FromStr;

mod error;
pub use error::Error;
mod parser;

/// A constant identifying production rules.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Identifier(pub String);

impl Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A quoted string. What it matches is up to the consumer of the grammar.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Terminal(pub String);

impl Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\"{}\"", self.0)
    }
}

impl From<&str> for Terminal {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// The lhs of a production rule.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Lhs(pub Identifier);

impl From<&str> for Lhs {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl Display for Lhs {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The rhs of a production rule.
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum Rhs {
    Identifier(Identifier),
    Terminal(Terminal),
    Repeat(Box<Rhs>),
    Alternation(Vec<Rhs>),
    Concatenation(Vec<Rhs>),
}

impl Rhs {
    /// The alternatives of this rhs. Anything that isn't an alternation is a
    /// single alternative.
    pub fn alternatives(&self) -> Vec<&Rhs> {
        match self {
            Rhs::Alternation(alts) => alts.iter().collect(),
            other => vec![other],
        }
    }

    /// The items of this rhs when read as a sequence.
    pub fn sequence(&self) -> Vec<&Rhs> {
        match self {
            Rhs::Concatenation(items) => items.iter().collect(),
            other => vec![other],
        }
    }
}

fn write_joined(f: &mut fmt::Formatter, items: &[Rhs], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", sep)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl Display for Rhs {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Rhs::Identifier(iden) => write!(f, "{}", iden),
            Rhs::Terminal(term) => write!(f, "{}", term),
            Rhs::Repeat(rhs) => write!(f, "{{ {} }}", rhs),
            Rhs::Alternation(alts) => write_joined(f, alts, " | "),
            Rhs::Concatenation(items) => write_joined(f, items, " , "),
        }
    }
}

impl FromStr for Rhs {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (_, rhs) = parser::complete_rhs(s)?;
        Ok(rhs)
    }
}

/// A production rule.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Production {
    pub lhs: Lhs,
    pub rhs: Rhs,
}

impl Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} = {} ;", self.lhs, self.rhs)
    }
}

impl FromStr for Production {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (_, rule) = parser::complete_production(s)?;
        Ok(rule)
    }
}

/// A set of rules.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Grammar {
    pub rules: Vec<Production>,
}

impl Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rule in &self.rules {
            writeln!(f, "{}", rule)?;
        }
        Ok(())
    }
}

impl FromStr for Grammar {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (_, grammar) = parser::grammar(s)?;
        Ok(grammar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Debug;
    use std::string::ToString;

    fn assert_lossless_conversion<T, E>(t: T)
    where
        T: ToString + FromStr<Err = E> + Eq + Debug,
        E: std::error::Error,
    {
        let s = t.to_string();
        let t_parse = T::from_str(&s).unwrap();
        assert_eq!(t, t_parse, "To string:\n{}\n", s);
    }

    #[test]
    fn lossless_rhs() {
        let tests = vec![
            Rhs::Alternation(vec![
                Rhs::Identifier("a".into()),
                Rhs::Concatenation(vec![
                    Rhs::Terminal("c".into()),
                    Rhs::Repeat(Box::new(Rhs::Concatenation(vec![
                        Rhs::Identifier("op".into()),
                        Rhs::Terminal("d".into()),
                    ]))),
                ]),
            ]),
            Rhs::Repeat(Box::new(Rhs::Alternation(vec![
                Rhs::Terminal("x".into()),
                Rhs::Terminal("y".into()),
            ]))),
        ];

        for test in tests {
            assert_lossless_conversion(test);
        }
    }

    #[test]
    fn lossless_rule() {
        let rule = Production {
            lhs: Lhs("a".into()),
            rhs: Rhs::Identifier("b".into()),
        };

        assert_lossless_conversion(rule)
    }

    #[test]
    fn lossless_grammar() {
        let g = Grammar {
            rules: vec![
                Production {
                    lhs: Lhs("a".into()),
                    rhs: Rhs::Identifier("b".into()),
                },
                Production {
                    lhs: Lhs("c".into()),
                    rhs: Rhs::Concatenation(vec![
                        Rhs::Terminal("d".into()),
                        Rhs::Identifier("e".into()),
                    ]),
                },
            ],
        };

        assert_lossless_conversion(g);
    }

    #[test]
    fn trailing_input_is_an_error() {
        let err = "a = b ; junk".parse::<Grammar>().unwrap_err();
        assert!(err.to_string().starts_with("failed to parse ebnf"), "{}", err);
    }

    #[test]
    fn rhs_views() {
        let rhs: Rhs = "a , b | c".parse().unwrap();
        let alts = rhs.alternatives();
        assert_eq!(alts.len(), 2);
        assert_eq!(alts[0].sequence().len(), 2);
        assert_eq!(alts[1].sequence(), vec![&Rhs::Identifier("c".into())]);
    }
}
