use anyhow::{anyhow, bail, Result};
use std::collections::HashMap;
use std::fmt::{self, Display};

/// Node kind given to matched repetitions.
pub const REPETITION: &str = "<kleene-star>";

/// A grammar element. Symbols are identified by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    /// Matches one lexeme of the named category.
    Terminal(String),
    /// Expands through the rules registered under the name.
    NonTerminal(String),
    /// Zero or more repetitions of a fixed sequence.
    Repetition(Repetition),
}

impl Symbol {
    pub fn terminal(name: impl Into<String>) -> Self {
        Symbol::Terminal(name.into())
    }

    pub fn non_terminal(name: impl Into<String>) -> Self {
        Symbol::NonTerminal(name.into())
    }

    pub fn repeat(symbols: Vec<Symbol>) -> Self {
        Symbol::Repetition(Repetition { symbols })
    }

    pub fn name(&self) -> &str {
        match self {
            Symbol::Terminal(name) | Symbol::NonTerminal(name) => name,
            Symbol::Repetition(_) => REPETITION,
        }
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Symbol::Terminal(name) => write!(f, "\"{}\"", name),
            Symbol::NonTerminal(name) => write!(f, "{}", name),
            Symbol::Repetition(rep) => write!(f, "{}", rep),
        }
    }
}

/// The sequence repeated by a `Symbol::Repetition`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repetition {
    symbols: Vec<Symbol>,
}

impl Repetition {
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// A repetition has exactly one rule: attempt the sequence once. Looping
    /// is up to the processor.
    pub fn rules(&self) -> Vec<Rule> {
        single(Rule::Repetition(self.clone()))
    }
}

impl Display for Repetition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{ ")?;
        write_sequence(f, &self.symbols)?;
        write!(f, " }}")
    }
}

/// One alternative of a non-terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// All symbols must match, in order.
    Sequence(Vec<Symbol>),
    /// The sequence is matched as many times as possible, zero included.
    Repetition(Repetition),
}

impl Rule {
    pub fn sequence(symbols: Vec<Symbol>) -> Self {
        Rule::Sequence(symbols)
    }

    pub fn symbols(&self) -> &[Symbol] {
        match self {
            Rule::Sequence(symbols) => symbols,
            Rule::Repetition(rep) => rep.symbols(),
        }
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Rule::Sequence(symbols) => write_sequence(f, symbols),
            Rule::Repetition(rep) => write!(f, "{}", rep),
        }
    }
}

fn write_sequence(f: &mut fmt::Formatter, symbols: &[Symbol]) -> fmt::Result {
    for (i, symbol) in symbols.iter().enumerate() {
        if i > 0 {
            write!(f, " , ")?;
        }
        write!(f, "{}", symbol)?;
    }
    Ok(())
}

/// The rule list for a non-terminal with a single alternative.
pub fn single(rule: Rule) -> Vec<Rule> {
    vec![rule]
}

/// Registry of non-terminals and their alternatives, tried in declaration
/// order.
#[derive(Debug, Clone)]
pub struct Grammar {
    start: String,
    order: Vec<String>,
    productions: HashMap<String, Vec<Rule>>,
}

impl Grammar {
    pub fn new(start: impl Into<String>) -> Self {
        Grammar {
            start: start.into(),
            order: Vec::new(),
            productions: HashMap::new(),
        }
    }

    /// Lower an EBNF grammar. Quoted terminals name lexeme categories,
    /// identifiers name non-terminals. Productions sharing a lhs add
    /// alternatives.
    pub fn from_ebnf(ebnf: &ebnf::Grammar, start: &str) -> Result<Self> {
        let mut grammar = Grammar::new(start);
        for production in &ebnf.rules {
            let name = production.lhs.to_string();
            let rules = production
                .rhs
                .alternatives()
                .into_iter()
                .map(|alt| lower_sequence(&name, alt).map(Rule::sequence))
                .collect::<Result<Vec<_>>>()?;
            grammar.define(name, rules);
        }
        grammar.validate()?;
        Ok(grammar)
    }

    /// Register alternatives for a non-terminal, after any it already has.
    pub fn define(&mut self, name: impl Into<String>, rules: Vec<Rule>) -> &mut Self {
        let name = name.into();
        if !self.productions.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.productions.entry(name).or_default().extend(rules);
        self
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn rules(&self, name: &str) -> Option<&[Rule]> {
        self.productions.get(name).map(|rules| rules.as_slice())
    }

    pub fn is_non_terminal(&self, name: &str) -> bool {
        self.productions.contains_key(name)
    }

    /// Non-terminal names in the order they were first defined.
    pub fn non_terminals(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|name| name.as_str())
    }

    /// Check the grammar can be handed to the processor.
    pub fn validate(&self) -> Result<()> {
        match self.rules(&self.start) {
            None => bail!("start symbol `{}` is not defined", self.start),
            Some(rules) if rules.len() != 1 => bail!(
                "start symbol `{}` must have exactly one rule, found {}",
                self.start,
                rules.len()
            ),
            _ => {}
        }

        for name in &self.order {
            if self.productions[name].is_empty() {
                bail!("`{}` has no rules", name);
            }
            for rule in &self.productions[name] {
                if rule.symbols().is_empty() {
                    bail!("`{}` has an empty rule", name);
                }
                self.validate_symbols(name, rule.symbols())?;
            }
        }
        Ok(())
    }

    fn validate_symbols(&self, owner: &str, symbols: &[Symbol]) -> Result<()> {
        for symbol in symbols {
            match symbol {
                Symbol::Terminal(_) => {}
                Symbol::NonTerminal(name) => {
                    if !self.is_non_terminal(name) {
                        return Err(anyhow!(
                            "`{}` refers to undefined non-terminal `{}`",
                            owner,
                            name
                        ));
                    }
                }
                Symbol::Repetition(rep) => {
                    if rep.symbols().is_empty() {
                        bail!("`{}` has a repetition without sub-symbols", owner);
                    }
                    self.validate_symbols(owner, rep.symbols())?;
                }
            }
        }
        Ok(())
    }
}

impl Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for name in &self.order {
            write!(f, "{} = ", name)?;
            for (i, rule) in self.productions[name].iter().enumerate() {
                if i > 0 {
                    write!(f, " | ")?;
                }
                write!(f, "{}", rule)?;
            }
            writeln!(f, " ;")?;
        }
        Ok(())
    }
}

fn lower_sequence(owner: &str, rhs: &ebnf::Rhs) -> Result<Vec<Symbol>> {
    let mut symbols = Vec::new();
    for item in rhs.sequence() {
        match item {
            ebnf::Rhs::Identifier(id) => symbols.push(Symbol::non_terminal(id.0.as_str())),
            ebnf::Rhs::Terminal(term) => symbols.push(Symbol::terminal(term.0.as_str())),
            ebnf::Rhs::Repeat(inner) => {
                if let ebnf::Rhs::Alternation(_) = **inner {
                    bail!(
                        "`{}`: alternation inside a repetition, move it into its own rule",
                        owner
                    );
                }
                symbols.push(Symbol::repeat(lower_sequence(owner, inner)?));
            }
            ebnf::Rhs::Concatenation(_) => symbols.extend(lower_sequence(owner, item)?),
            ebnf::Rhs::Alternation(_) => bail!(
                "`{}`: nested alternation, move it into its own rule",
                owner
            ),
        }
    }
    Ok(symbols)
}
