//! Heading parser turning ATX-style markdown into a [`Node`] tree.
//!
//! The parser is line based: a line of one to six `#` markers followed by whitespace opens a new
//! section, anything else is body text for the deepest section still open. Skipped levels are
//! bridged with placeholder nodes so every heading has an unbroken parent chain.

use crate::node::Node;
use regex::Regex;
use std::sync::LazyLock;

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").expect("heading pattern is valid"));

#[must_use]
/// Parse a markdown document into a tree rooted at a synthetic [`Node::root`].
///
/// Body lines keep their leading whitespace and lose trailing whitespace; each body is trimmed
/// once the section closes. Text before the first heading becomes the root's body.
pub fn parse(text: &str) -> Node {
    let mut open = OpenSections::new();

    for line in text.lines() {
        match heading(line) {
            Some((level, title)) => open.open(level, Node::new(title)),
            None => open.append(line.trim_end()),
        }
    }

    open.finish()
}

/// Split a heading line into its level and trimmed title.
fn heading(line: &str) -> Option<(usize, &str)> {
    let caps = HEADING.captures(line)?;
    let level = caps.get(1)?.as_str().len();
    let title = caps.get(2).map_or("", |m| m.as_str().trim());
    Some((level, title))
}

/// The chain of sections currently open, one per level; index 0 is the root.
///
/// Local to a single parse so that concurrent parses never share level state.
struct OpenSections {
    stack: Vec<Node>,
}

impl OpenSections {
    fn new() -> Self {
        Self {
            stack: vec![Node::root()],
        }
    }

    fn open(&mut self, level: usize, node: Node) {
        self.close_from(level);
        while self.stack.len() < level {
            let missing = self.stack.len();
            self.stack.push(Node::placeholder(missing));
        }
        self.stack.push(node);
    }

    fn append(&mut self, line: &str) {
        if let Some(deepest) = self.stack.last_mut() {
            deepest.body.push_str(line);
            deepest.body.push('\n');
        }
    }

    /// Close every open section at `level` or deeper, attaching each to its parent.
    fn close_from(&mut self, level: usize) {
        while self.stack.len() > level.max(1) {
            let Some(mut node) = self.stack.pop() else {
                break;
            };
            node.body = node.body.trim().to_string();
            if let Some(parent) = self.stack.last_mut() {
                parent.add_child(node);
            }
        }
    }

    fn finish(mut self) -> Node {
        self.close_from(1);
        let mut root = self.stack.pop().unwrap_or_else(Node::root);
        root.body = root.body.trim().to_string();
        root
    }
}

#[cfg(test)]
#[path = "tests/parser.rs"]
mod tests;
