use std::error;
use std::fmt::{self, Display};

use tracing::{debug, trace};

use crate::ast::AstNode;
use crate::grammar::{Grammar, Repetition, Rule, Symbol, REPETITION};
use crate::stream::{Lexeme, LexemeStream};

const END_OF_FILE: &str = "Unexpected end of file occurred.";

/// Outcome of one attempt: the produced fragments, or the diagnostics
/// explaining why the attempt failed.
type Attempt<T> = Result<T, Vec<String>>;

/// A failed parse. There is no partial tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    diagnostics: Vec<String>,
}

impl ParseError {
    fn new(diagnostics: Vec<String>) -> Self {
        ParseError { diagnostics }
    }

    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<String> {
        self.diagnostics
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.diagnostics.join("\n"))
    }
}

impl error::Error for ParseError {}

/// Parse `stream` against `grammar`, starting from the grammar's start
/// symbol. The whole stream must be consumed, trailing insignificant lexemes
/// aside.
pub fn parse(stream: &mut LexemeStream, grammar: &Grammar) -> Result<AstNode, ParseError> {
    GrammarProcessor::new(grammar).parse(stream)
}

/// Backtracking recursive descent over a `Grammar`.
///
/// Alternatives are tried in order and the first one that matches wins. A
/// failed attempt rewinds the stream to where it started, and since children
/// are collected in a working list that is only handed back on success,
/// nothing of a failed alternative ends up in the tree.
#[derive(Debug, Clone, Copy)]
pub struct GrammarProcessor<'g> {
    grammar: &'g Grammar,
}

impl<'g> GrammarProcessor<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        GrammarProcessor { grammar }
    }

    pub fn parse(&self, stream: &mut LexemeStream) -> Result<AstNode, ParseError> {
        let start = self.grammar.start();
        let rule = match self.grammar.rules(start) {
            Some([rule]) => rule,
            Some(rules) => {
                return Err(ParseError::new(vec![format!(
                    "start symbol `{}` must have exactly one rule, found {}",
                    start,
                    rules.len()
                )]))
            }
            None => {
                return Err(ParseError::new(vec![format!(
                    "start symbol `{}` is not defined",
                    start
                )]))
            }
        };

        let mut root = AstNode::new(start);
        match self.apply_rule(stream, rule, start) {
            Ok(children) => root.extend(children),
            Err(mut diagnostics) => {
                if diagnostics.is_empty() {
                    diagnostics.push(format!("Unable to parse {}", start));
                }
                return Err(ParseError::new(diagnostics));
            }
        }

        let trailing = stream.peek_significant();
        if !trailing.is_none() {
            return Err(ParseError::new(vec![format!(
                "Unexpected {} after the end of {}{}",
                trailing,
                start,
                location(trailing)
            )]));
        }

        debug!(start, lexemes = stream.position(), "parse complete");
        Ok(root)
    }

    /// Apply one rule, returning the children it produced.
    fn apply_rule(&self, stream: &mut LexemeStream, rule: &Rule, rule_name: &str) -> Attempt<Vec<AstNode>> {
        match rule {
            Rule::Sequence(symbols) => self.apply_sequence(stream, symbols, rule_name),
            Rule::Repetition(rep) => Ok(self.repeat(stream, rep)),
        }
    }

    fn apply_sequence(
        &self,
        stream: &mut LexemeStream,
        symbols: &[Symbol],
        rule_name: &str,
    ) -> Attempt<Vec<AstNode>> {
        let checkpoint = stream.checkpoint();
        trace!(rule = rule_name, position = stream.position(), "trying rule");

        let mut working = Vec::new();
        for symbol in symbols {
            let step = match symbol {
                Symbol::Terminal(kind) => self.match_terminal(stream, kind, rule_name, &mut working),
                Symbol::NonTerminal(name) => self.resolve_non_terminal(stream, name, &mut working),
                Symbol::Repetition(rep) => self.resolve_repetition(stream, rep, &mut working),
            };
            if let Err(diagnostics) = step {
                trace!(rule = rule_name, from = stream.position(), "rewinding");
                stream.rewind(checkpoint);
                return Err(diagnostics);
            }
        }
        Ok(working)
    }

    fn match_terminal(
        &self,
        stream: &mut LexemeStream,
        kind: &str,
        rule_name: &str,
        working: &mut Vec<AstNode>,
    ) -> Attempt<()> {
        let lexeme = stream.next_significant();
        if lexeme.kind == kind {
            working.push(AstNode::leaf(&lexeme));
            Ok(())
        } else {
            Err(vec![format!(
                "Error parsing at rule {} for token '{}', got lexeme '{}'{}",
                rule_name,
                kind,
                lexeme,
                location(&lexeme)
            )])
        }
    }

    fn resolve_non_terminal(
        &self,
        stream: &mut LexemeStream,
        name: &str,
        parent: &mut Vec<AstNode>,
    ) -> Attempt<()> {
        match self.grammar.rules(name) {
            Some(rules) => self.resolve(stream, AstNode::new(name), rules, parent),
            None => Err(vec![format!("No production rules for `{}`", name)]),
        }
    }

    fn resolve_repetition(
        &self,
        stream: &mut LexemeStream,
        rep: &Repetition,
        parent: &mut Vec<AstNode>,
    ) -> Attempt<()> {
        let node = AstNode::with_text(REPETITION, rep.to_string());
        self.resolve(stream, node, &rep.rules(), parent)
    }

    /// Try each alternative in order, attaching `node` to `parent` on the
    /// first match. Repetitions that matched nothing are left out of the tree.
    fn resolve(
        &self,
        stream: &mut LexemeStream,
        mut node: AstNode,
        rules: &[Rule],
        parent: &mut Vec<AstNode>,
    ) -> Attempt<()> {
        let mut last_diagnostics = Vec::new();
        for rule in rules {
            match self.apply_rule(stream, rule, node.kind()) {
                Ok(children) => {
                    node.extend(children);
                    debug!(symbol = node.kind(), children = node.children().len(), "resolved");
                    if node.kind() != REPETITION || !node.is_leaf() {
                        parent.push(node);
                    }
                    return Ok(());
                }
                Err(diagnostics) => last_diagnostics = diagnostics,
            }
        }
        Err(self.exhausted(stream, node.kind(), rules.len(), last_diagnostics))
    }

    /// Diagnostics for a non-terminal none of whose alternatives matched.
    ///
    /// With a single alternative its own failure is the most specific thing to
    /// say. With several, their failures are mostly noise from exploring the
    /// wrong ones, so only report where we got stuck.
    fn exhausted(
        &self,
        stream: &LexemeStream,
        name: &str,
        alternatives: usize,
        diagnostics: Vec<String>,
    ) -> Vec<String> {
        if alternatives == 1 {
            return diagnostics;
        }

        let current = stream.peek_significant();
        if current.is_none() {
            vec![format!("{} Expected a {}.", END_OF_FILE, name)]
        } else {
            vec![format!(
                "Unable to find syntax that matches {} at {}{}",
                name,
                current,
                location(current)
            )]
        }
    }

    /// Match the repetition's sequence as many times as possible. Never fails.
    fn repeat(&self, stream: &mut LexemeStream, rep: &Repetition) -> Vec<AstNode> {
        let label = rep.to_string();
        let mut children = Vec::new();
        loop {
            let before = stream.position();
            match self.apply_sequence(stream, rep.symbols(), &label) {
                // A match that consumed nothing would match forever.
                Ok(_) if stream.position() == before => break,
                Ok(matched) => children.extend(matched),
                Err(_) => break,
            }
        }
        children
    }
}

fn location(lexeme: &Lexeme) -> String {
    if lexeme.line == 0 {
        String::new()
    } else {
        format!(" at line {}, column {}", lexeme.line, lexeme.column)
    }
}
