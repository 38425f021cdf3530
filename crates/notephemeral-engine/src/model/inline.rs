//! Operations over the inline content of a block.
//!
//! Offsets here are relative to the start of the block's content and count
//! chars, with a hard break counting as one.

use std::ops::Range;

use super::{
    mark::{Mark, MarkKind},
    node::Node,
};

/// Merges adjacent text nodes with equal marks and drops empty text nodes.
pub fn normalize_inline(nodes: Vec<Node>) -> Vec<Node> {
    let mut out: Vec<Node> = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Text { text, .. } if text.is_empty() => {}
            Node::Text { text, marks } => match out.last_mut() {
                Some(Node::Text {
                    text: prev,
                    marks: prev_marks,
                }) if *prev_marks == marks => prev.push_str(&text),
                _ => out.push(Node::Text { text, marks }),
            },
            other => out.push(other),
        }
    }
    out
}

pub fn inline_size(nodes: &[Node]) -> usize {
    nodes.iter().map(Node::node_size).sum()
}

/// Byte index of the `chars`-th char of `s` (or `s.len()` past the end).
pub(crate) fn char_to_byte(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map_or(s.len(), |(i, _)| i)
}

/// Splits inline content at `offset`, cutting a text node in two when needed.
pub fn split_inline(nodes: &[Node], offset: usize) -> (Vec<Node>, Vec<Node>) {
    let mut head = Vec::new();
    let mut tail = Vec::new();
    let mut pos = 0;
    for node in nodes {
        let size = node.node_size();
        if pos + size <= offset {
            head.push(node.clone());
        } else if pos >= offset {
            tail.push(node.clone());
        } else if let Node::Text { text, marks } = node {
            let cut = char_to_byte(text, offset - pos);
            head.push(Node::Text {
                text: text[..cut].to_string(),
                marks: marks.clone(),
            });
            tail.push(Node::Text {
                text: text[cut..].to_string(),
                marks: marks.clone(),
            });
        }
        pos += size;
    }
    (head, tail)
}

/// The inline node that ends at or contains the char just before `offset`.
pub fn node_before(nodes: &[Node], offset: usize) -> Option<&Node> {
    if offset == 0 {
        return None;
    }
    let mut pos = 0;
    for node in nodes {
        pos += node.node_size();
        if pos >= offset {
            return Some(node);
        }
    }
    None
}

/// Text of the inline content in its own coordinate space: one char per
/// position, hard breaks rendered as `'\n'`.
pub fn flatten(nodes: &[Node]) -> String {
    nodes
        .iter()
        .map(|node| match node {
            Node::Text { text, .. } => text.as_str(),
            Node::HardBreak => "\n",
            _ => "",
        })
        .collect()
}

/// Rewrites the marks of every text run between `from` and `to`.
pub fn map_marks(
    nodes: &[Node],
    from: usize,
    to: usize,
    f: impl Fn(&[Mark]) -> Vec<Mark>,
) -> Vec<Node> {
    let (head, rest) = split_inline(nodes, from);
    let (mid, tail) = split_inline(&rest, to.saturating_sub(from));
    let mid = mid.into_iter().map(|node| match node {
        Node::Text { text, marks } => Node::Text {
            marks: f(&marks),
            text,
        },
        other => other,
    });
    normalize_inline(head.into_iter().chain(mid).chain(tail).collect())
}

/// Removes every mark from the content.
pub fn strip_marks(nodes: Vec<Node>) -> Vec<Node> {
    normalize_inline(
        nodes
            .into_iter()
            .map(|node| match node {
                Node::Text { text, .. } => Node::text(text),
                other => other,
            })
            .collect(),
    )
}

pub fn has_marks(nodes: &[Node]) -> bool {
    nodes.iter().any(|n| !n.marks().is_empty())
}

/// Maximal runs carrying the same link mark, as offset ranges.
pub fn link_spans(nodes: &[Node]) -> Vec<(Range<usize>, Mark)> {
    let mut spans: Vec<(Range<usize>, Mark)> = Vec::new();
    let mut pos = 0;
    for node in nodes {
        let size = node.node_size();
        let link = node
            .marks()
            .iter()
            .find(|m| m.kind() == MarkKind::Link);
        if let Some(link) = link {
            match spans.last_mut() {
                Some((range, prev)) if range.end == pos && *prev == *link => range.end = pos + size,
                _ => spans.push((pos..pos + size, link.clone())),
            }
        }
        pos += size;
    }
    spans
}
