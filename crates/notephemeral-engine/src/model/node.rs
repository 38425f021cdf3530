use std::fmt;

use serde::{Deserialize, Serialize};

use super::{inline, mark::Mark};

/// A heading level, always within `1..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 6;

    /// Returns `None` when `level` is outside `1..=6`.
    pub fn new(level: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX)
            .contains(&level)
            .then_some(Self(level))
    }

    /// Clamps any hash count into the valid range.
    pub fn clamped(count: usize) -> Self {
        Self(count.clamp(Self::MIN as usize, Self::MAX as usize) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// The Markdown prefix for this level without the trailing space, e.g. `"##"`.
    pub fn hashes(self) -> String {
        "#".repeat(self.0 as usize)
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        HeadingLevel::new(level).ok_or_else(|| format!("heading level {level} is outside 1..=6"))
    }
}

impl From<HeadingLevel> for u8 {
    fn from(level: HeadingLevel) -> Self {
        level.0
    }
}

/// The kind of a [`Node`], without its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Doc,
    Heading,
    Paragraph,
    Text,
    HardBreak,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Doc => "doc",
            NodeKind::Heading => "heading",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Text => "text",
            NodeKind::HardBreak => "hard_break",
        };
        f.write_str(name)
    }
}

/// Target type for a block conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockType {
    Paragraph,
    Heading(HeadingLevel),
}

/// A node of the document tree.
///
/// `Doc` holds blocks (`Heading`, `Paragraph`); blocks hold inline nodes
/// (`Text`, `HardBreak`). Nodes are values: every edit produces a new tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Doc {
        content: Vec<Node>,
    },
    /// A heading. Entering it gives the caret heading semantics (the node is
    /// "defining"), so Enter inside it never splits it.
    Heading {
        level: HeadingLevel,
        content: Vec<Node>,
    },
    Paragraph {
        content: Vec<Node>,
    },
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        marks: Vec<Mark>,
    },
    /// A line break inside a block. Not selectable on its own.
    HardBreak,
}

impl Node {
    pub fn doc(content: Vec<Node>) -> Self {
        Node::Doc { content }
    }

    /// Creates a paragraph; its inline content is made canonical.
    pub fn paragraph(content: Vec<Node>) -> Self {
        Node::Paragraph {
            content: inline::normalize_inline(content),
        }
    }

    /// Creates a heading; its inline content is made canonical.
    pub fn heading(level: HeadingLevel, content: Vec<Node>) -> Self {
        Node::Heading {
            level,
            content: inline::normalize_inline(content),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text {
            text: text.into(),
            marks: Vec::new(),
        }
    }

    /// Creates a text node carrying a single link mark.
    pub fn linked_text(text: impl Into<String>, href: impl Into<String>) -> Self {
        Node::Text {
            text: text.into(),
            marks: vec![Mark::link(href)],
        }
    }

    pub fn hard_break() -> Self {
        Node::HardBreak
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Doc { .. } => NodeKind::Doc,
            Node::Heading { .. } => NodeKind::Heading,
            Node::Paragraph { .. } => NodeKind::Paragraph,
            Node::Text { .. } => NodeKind::Text,
            Node::HardBreak => NodeKind::HardBreak,
        }
    }

    /// Child nodes; empty for leaves.
    pub fn content(&self) -> &[Node] {
        match self {
            Node::Doc { content } | Node::Heading { content, .. } | Node::Paragraph { content } => {
                content
            }
            Node::Text { .. } | Node::HardBreak => &[],
        }
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.content().get(index)
    }

    pub fn child_count(&self) -> usize {
        self.content().len()
    }

    /// Blocks that hold inline content directly.
    pub fn is_textblock(&self) -> bool {
        matches!(self, Node::Heading { .. } | Node::Paragraph { .. })
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, Node::Text { .. } | Node::HardBreak)
    }

    pub fn marks(&self) -> &[Mark] {
        match self {
            Node::Text { marks, .. } => marks,
            _ => &[],
        }
    }

    pub fn block_type(&self) -> Option<BlockType> {
        match self {
            Node::Paragraph { .. } => Some(BlockType::Paragraph),
            Node::Heading { level, .. } => Some(BlockType::Heading(*level)),
            _ => None,
        }
    }

    /// Size of the node in the flat position space.
    pub fn node_size(&self) -> usize {
        match self {
            Node::Text { text, .. } => text.chars().count(),
            Node::HardBreak => 1,
            Node::Doc { .. } => self.content_size(),
            Node::Heading { .. } | Node::Paragraph { .. } => self.content_size() + 2,
        }
    }

    /// Sum of the sizes of the node's children.
    pub fn content_size(&self) -> usize {
        self.content().iter().map(Node::node_size).sum()
    }

    /// Concatenated text of all descendant text nodes. Hard breaks contribute nothing.
    pub fn text_content(&self) -> String {
        match self {
            Node::Text { text, .. } => text.clone(),
            Node::HardBreak => String::new(),
            _ => self.content().iter().map(Node::text_content).collect(),
        }
    }

    /// Text of the first inline child when it is a text node.
    pub fn leading_text(&self) -> Option<&str> {
        match self.content().first() {
            Some(Node::Text { text, .. }) => Some(text),
            _ => None,
        }
    }

    /// A node of the same kind and attributes holding `content` instead.
    pub fn with_content(&self, content: Vec<Node>) -> Node {
        match self {
            Node::Doc { .. } => Node::doc(content),
            Node::Heading { level, .. } => Node::heading(*level, content),
            Node::Paragraph { .. } => Node::paragraph(content),
            Node::Text { .. } | Node::HardBreak => self.clone(),
        }
    }
}

impl BlockType {
    /// Builds a block of this type around `content`.
    ///
    /// Headings admit no marks, so converting into one strips them.
    pub fn make(self, content: Vec<Node>) -> Node {
        match self {
            BlockType::Paragraph => Node::paragraph(content),
            BlockType::Heading(level) => Node::heading(level, inline::strip_marks(content)),
        }
    }
}

/// Indented outline of the tree, one node per line.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_outline(self, 0, f)
    }
}

fn write_outline(node: &Node, depth: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let indent = "  ".repeat(depth);
    match node {
        Node::Heading { level, .. } => writeln!(f, "{indent}heading({})", level.get())?,
        Node::Text { text, marks } => {
            write!(f, "{indent}text {text:?}")?;
            for mark in marks {
                match mark {
                    Mark::Link { href, title } => {
                        write!(f, " [link {href}")?;
                        if let Some(title) = title {
                            write!(f, " {title:?}")?;
                        }
                        write!(f, "]")?;
                    }
                }
            }
            writeln!(f)?;
        }
        other => writeln!(f, "{indent}{}", other.kind())?,
    }
    for child in node.content() {
        write_outline(child, depth + 1, f)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn heading_level_bounds() {
        assert!(HeadingLevel::new(0).is_none());
        assert!(HeadingLevel::new(7).is_none());
        assert_eq!(HeadingLevel::new(3).map(HeadingLevel::get), Some(3));
        assert_eq!(HeadingLevel::clamped(0).get(), 1);
        assert_eq!(HeadingLevel::clamped(9).get(), 6);
        assert_eq!(HeadingLevel::clamped(2).hashes(), "##");
    }

    #[test]
    fn sizes_follow_the_flat_position_space() {
        let para = Node::paragraph(vec![
            Node::text("Hé"),
            Node::hard_break(),
            Node::text("yo"),
        ]);
        assert_eq!(para.content_size(), 5);
        assert_eq!(para.node_size(), 7);

        let doc = Node::doc(vec![para, Node::paragraph(vec![])]);
        assert_eq!(doc.content_size(), 9);
    }

    #[test]
    fn text_content_skips_hard_breaks() {
        let para = Node::paragraph(vec![
            Node::text("Hello"),
            Node::hard_break(),
            Node::linked_text("https://a.io", "https://a.io"),
        ]);
        assert_eq!(para.text_content(), "Hellohttps://a.io");
        assert_eq!(para.leading_text(), Some("Hello"));
    }

    #[test]
    fn converting_to_heading_strips_marks() {
        let level = HeadingLevel::clamped(1);
        let heading = BlockType::Heading(level).make(vec![
            Node::text("# see "),
            Node::linked_text("https://a.io", "https://a.io"),
        ]);
        assert_eq!(
            heading,
            Node::Heading {
                level,
                content: vec![Node::text("# see https://a.io")],
            }
        );
    }

    #[test]
    fn outline_lists_every_node() {
        let doc = Node::doc(vec![
            Node::heading(HeadingLevel::clamped(2), vec![Node::text("## Hello")]),
            Node::paragraph(vec![
                Node::text("Go to "),
                Node::linked_text("https://example.com", "https://example.com"),
                Node::hard_break(),
                Node::text("now"),
            ]),
        ]);
        assert_snapshot!(doc.to_string(), @r###"
        doc
          heading(2)
            text "## Hello"
          paragraph
            text "Go to "
            text "https://example.com" [link https://example.com]
            hard_break
            text "now"
        "###);
    }
}
