//! Node representation for the heading tree of a parsed document.
//!
//! A node is one heading together with the free text directly beneath it. Children are kept in
//! document order, which is also the order in which they are materialized on disk and read back,
//! so the sequence of `children` is significant and must survive a round trip.

use std::fmt::Write;

/// Name given to the synthetic node that holds the top-level headings.
pub const ROOT_NAME: &str = "Selected Root";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// A heading with its body text and nested subsections.
pub struct Node {
    /// Heading text without markup, or a placeholder label for a skipped level.
    pub name: String,
    /// Subsections in document order.
    pub children: Vec<Node>,
    /// Text between this heading and the next heading of any level.
    pub body: String,
}

impl Node {
    #[must_use]
    /// Create a node with an empty body and no children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            body: String::new(),
        }
    }

    #[must_use]
    /// Create the synthetic root that a parse attaches top-level headings to.
    pub fn root() -> Self {
        Self::new(ROOT_NAME)
    }

    #[must_use]
    /// Create the stand-in ancestor for a heading level the document skipped.
    pub fn placeholder(level: usize) -> Self {
        Self::new(format!("Placeholder Level {level}"))
    }

    #[must_use]
    /// Builder-style body setter, handy when assembling trees by hand.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    #[must_use]
    /// Builder-style child append.
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Append a subsection after the existing ones.
    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    #[must_use]
    /// Whether the node carries text that needs a leaf artifact.
    pub fn has_content(&self) -> bool {
        !self.body.trim().is_empty()
    }

    #[must_use]
    /// Total number of nodes in this subtree, this node included.
    pub fn count_nodes(&self) -> usize {
        1 + self.children.iter().map(Node::count_nodes).sum::<usize>()
    }

    #[must_use]
    /// Draw the subtree with box-drawing connectors, listing the leaf artifact of every
    /// content-bearing node beneath it.
    pub fn render_tree(&self, extension: &str) -> String {
        let mut out = String::new();
        self.render_into(&mut out, "", true, extension);
        out
    }

    fn render_into(&self, out: &mut String, prefix: &str, is_last: bool, extension: &str) {
        let _ = writeln!(out, "{prefix}{}{}", connector(is_last), self.name);

        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        if self.has_content() {
            let leaf_is_last = self.children.is_empty();
            let _ = writeln!(
                out,
                "{child_prefix}{}{}.{extension}",
                connector(leaf_is_last),
                self.name
            );
        }
        for (i, child) in self.children.iter().enumerate() {
            child.render_into(out, &child_prefix, i + 1 == self.children.len(), extension);
        }
    }
}

fn connector(is_last: bool) -> &'static str {
    if is_last {
        "└── "
    } else {
        "├── "
    }
}

#[cfg(test)]
#[path = "tests/node.rs"]
mod tests;
