//! Code generation by placeholder substitution.
//!
//! Generators are looked up by node kind. Each one may append a template to
//! the output, fill placeholders left by its ancestors, and recurse into its
//! children. Nodes without a registered generator are skipped; leaves are
//! read by the generator of their parent.

use std::collections::HashMap;
use std::error;
use std::fmt::{self, Display};

use parsegen::{AstNode, Grammar};
use tracing::{debug, warn};

pub mod fasm;

/// Generates code for one node into the output buffer.
pub type NodeGenerator = fn(&Generator<'_>, &AstNode, &mut String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    /// The root is not a non-terminal of the grammar.
    UnknownRoot(String),
}

impl Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            GenerateError::UnknownRoot(ref kind) => write!(
                f,
                "unable to generate code, `{}` is not a non-terminal of the grammar",
                kind
            ),
        }
    }
}

impl error::Error for GenerateError {}

/// Dispatch table from node kind to generator.
pub struct Generator<'g> {
    grammar: &'g Grammar,
    generators: HashMap<String, NodeGenerator>,
}

impl<'g> Generator<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Generator {
            grammar,
            generators: HashMap::new(),
        }
    }

    pub fn register(&mut self, kind: impl Into<String>, generator: NodeGenerator) -> &mut Self {
        self.generators.insert(kind.into(), generator);
        self
    }

    /// Generate code for a whole tree. The tree is only read, so generating
    /// twice gives the same output.
    pub fn generate(&self, root: &AstNode) -> Result<String, GenerateError> {
        if !self.grammar.is_non_terminal(root.kind()) {
            warn!(kind = root.kind(), "refusing to generate code");
            return Err(GenerateError::UnknownRoot(root.kind().to_owned()));
        }

        let mut out = String::new();
        self.dispatch(root, &mut out);
        Ok(out)
    }

    /// Run the generators of `node`'s children, in order, after skipping the
    /// first `skip` of them.
    pub fn apply_to_children(&self, node: &AstNode, out: &mut String, skip: usize) {
        for child in node.children().iter().skip(skip) {
            self.dispatch(child, out);
        }
    }

    fn dispatch(&self, node: &AstNode, out: &mut String) {
        if let Some(generator) = self.generators.get(node.kind()) {
            debug!(kind = node.kind(), "generating");
            generator(self, node, out);
        }
    }
}

/// Replace every occurrence of `placeholder`.
pub fn fill_all(out: &mut String, placeholder: &str, value: &str) {
    if out.contains(placeholder) {
        *out = out.replace(placeholder, value);
    }
}

/// Replace the first occurrence of `placeholder`.
///
/// Generation is depth first and every subtree fills all the slots it opens,
/// so the first open slot always belongs to the node being generated.
///
/// # Panics
///
/// When there is no such placeholder, which means the generators and the
/// grammar disagree about the shape of the tree.
pub fn fill_first(out: &mut String, placeholder: &str, value: &str) {
    match out.find(placeholder) {
        Some(idx) => out.replace_range(idx..idx + placeholder.len(), value),
        None => panic!("no `{}` placeholder left to fill", placeholder),
    }
}
