use std::fmt::{self, Display};

use crate::stream::Lexeme;

/// A node in the tree produced by the grammar processor.
///
/// Leaves are matched lexemes, their kind is the lexeme category. Inner nodes
/// are non-terminals (or repetitions), their kind is the symbol name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AstNode {
    kind: String,
    text: String,
    children: Vec<AstNode>,
}

impl AstNode {
    /// An inner node labelled with its own kind.
    pub fn new(kind: impl Into<String>) -> Self {
        let kind = kind.into();
        AstNode {
            text: kind.clone(),
            kind,
            children: Vec::new(),
        }
    }

    pub fn with_text(kind: impl Into<String>, text: impl Into<String>) -> Self {
        AstNode {
            kind: kind.into(),
            text: text.into(),
            children: Vec::new(),
        }
    }

    pub fn leaf(lexeme: &Lexeme) -> Self {
        AstNode::with_text(lexeme.kind.clone(), lexeme.text.clone())
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn children(&self) -> &[AstNode] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Append a child, for building trees by hand.
    pub fn push(&mut self, child: AstNode) {
        self.children.push(child);
    }

    pub(crate) fn extend(&mut self, children: Vec<AstNode>) {
        self.children.extend(children);
    }

    /// First direct child of the given kind.
    pub fn child(&self, kind: &str) -> Option<&AstNode> {
        self.children.iter().find(|c| c.kind == kind)
    }

    pub fn has_child(&self, kind: &str) -> bool {
        self.child(kind).is_some()
    }

    /// Iterate over this node and all its descendants, depth first, parents
    /// before children.
    pub fn iter(&self) -> DfsIter<'_> {
        DfsIter { stack: vec![self] }
    }

    /// First node of the given kind anywhere in this subtree, this node
    /// included.
    pub fn find(&self, kind: &str) -> Option<&AstNode> {
        self.iter().find(|n| n.kind == kind)
    }

    /// All nodes of the given kind in this subtree, in depth first order.
    pub fn find_all(&self, kind: &str) -> Vec<&AstNode> {
        self.iter().filter(|n| n.kind == kind).collect()
    }

    /// Indented multi-line rendering of the tree.
    pub fn prettify(&self) -> String {
        let mut out = String::new();
        self.prettify_into(0, &mut out);
        out
    }

    fn prettify_into(&self, depth: usize, out: &mut String) {
        out.push_str(&"\t".repeat(depth));
        if self.kind == self.text {
            out.push_str(&self.kind);
        } else {
            out.push_str(&format!("{}<{}>", self.kind, self.text.trim()));
        }
        out.push('\n');
        for child in &self.children {
            child.prettify_into(depth + 1, out);
        }
    }
}

impl Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.prettify())
    }
}

/// Depth first, pre-order iterator over a tree.
pub struct DfsIter<'a> {
    stack: Vec<&'a AstNode>,
}

impl<'a> Iterator for DfsIter<'a> {
    type Item = &'a AstNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
