//! Paste sanitizer.
//!
//! Externally sourced fragments are rewritten before insertion so the tree
//! invariants hold the moment they land: headings carry their hash prefix,
//! hash-prefixed text is already a heading, and incoming link marks are
//! either dropped or made re-derivable from the visible text.

use serde::{Deserialize, Serialize};

use crate::{
    model::{
        HeadingLevel, MarkKind, Node,
        mark::{link_href, remove_kind},
    },
    parsing::patterns::heading_prefix_level,
};

/// What happens to link marks on pasted text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkPolicy {
    /// Drop incoming links; autolinking recomputes them from the text.
    #[default]
    Strip,
    /// Keep links but show their `href` as the text.
    Expand,
}

/// Rewrites a pasted fragment. Top-level nodes of the result are blocks or
/// inline nodes, never `Doc`.
pub fn sanitize_fragment(fragment: &[Node], policy: LinkPolicy) -> Vec<Node> {
    let mut out = Vec::new();
    sanitize_into(fragment, policy, true, &mut out);
    out
}

fn sanitize_into(nodes: &[Node], policy: LinkPolicy, top_level: bool, out: &mut Vec<Node>) {
    for node in nodes {
        match node {
            Node::Doc { content } => sanitize_into(content, policy, top_level, out),
            Node::Heading { level, content } => {
                let mut inline = Vec::new();
                sanitize_into(content, policy, false, &mut inline);
                let start = inline.iter().take_while(|n| **n == Node::HardBreak).count();
                let (first, rest) = first_line(&inline[start..]);
                out.push(prefixed_heading(*level, line_text(first)));
                if !rest.is_empty() {
                    promote_lines(rest.to_vec(), out);
                }
            }
            Node::Paragraph { content } => {
                let mut inline = Vec::new();
                sanitize_into(content, policy, false, &mut inline);
                promote_lines(inline, out);
            }
            Node::Text { text, .. } if top_level && heading_prefix_level(text).is_some() => {
                promote_lines(vec![Node::text(text.as_str())], out);
            }
            Node::Text { .. } => out.push(apply_policy(node, policy)),
            Node::HardBreak => {
                if out.last() != Some(&Node::HardBreak) {
                    out.push(Node::hard_break());
                }
            }
        }
    }
}

/// A heading whose text starts with a hash prefix, adding one if missing.
fn prefixed_heading(level: HeadingLevel, text: String) -> Node {
    let text = if heading_prefix_level(&text).is_some() {
        text
    } else {
        format!("{} {text}", level.hashes())
    };
    Node::heading(level, vec![Node::text(text)])
}

/// Emits `inline` as blocks: every hash-prefixed line becomes a heading
/// and the lines between them stay together as paragraphs.
fn promote_lines(inline: Vec<Node>, out: &mut Vec<Node>) {
    let (first, rest) = first_line(&inline);
    let line = line_text(first);
    if let Some(level) = heading_prefix_level(&line) {
        out.push(Node::heading(level, vec![Node::text(line)]));
        if !rest.is_empty() {
            promote_lines(rest.to_vec(), out);
        }
        return;
    }
    match prefixed_line_break(&inline) {
        Some(at) => {
            out.push(Node::paragraph(inline[..at].to_vec()));
            promote_lines(inline[at + 1..].to_vec(), out);
        }
        None => out.push(Node::paragraph(inline)),
    }
}

/// Index of the first hard break followed by a hash-prefixed line.
fn prefixed_line_break(inline: &[Node]) -> Option<usize> {
    inline.windows(2).position(|w| {
        matches!(w, [Node::HardBreak, Node::Text { text, .. }] if heading_prefix_level(text).is_some())
    })
}

/// Splits inline content at its first hard break, dropping the break.
fn first_line(inline: &[Node]) -> (&[Node], &[Node]) {
    match inline.iter().position(|n| *n == Node::HardBreak) {
        Some(at) => (&inline[..at], &inline[at + 1..]),
        None => (inline, &[]),
    }
}

fn line_text(line: &[Node]) -> String {
    line.iter().map(Node::text_content).collect()
}

fn apply_policy(node: &Node, policy: LinkPolicy) -> Node {
    let Node::Text { text, marks } = node else {
        return node.clone();
    };
    match (policy, link_href(marks)) {
        (LinkPolicy::Strip, _) => Node::Text {
            text: text.clone(),
            marks: remove_kind(marks, MarkKind::Link),
        },
        (LinkPolicy::Expand, Some(href)) => Node::Text {
            text: href.to_string(),
            marks: marks.clone(),
        },
        (LinkPolicy::Expand, None) => node.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Mark;
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    fn outline(nodes: &[Node]) -> String {
        nodes.iter().map(Node::to_string).collect()
    }

    #[test]
    fn headings_gain_their_prefix() {
        let level = HeadingLevel::clamped(2);
        let out = sanitize_fragment(
            &[
                Node::heading(level, vec![Node::text("Title")]),
                Node::heading(level, vec![Node::text("## Kept")]),
            ],
            LinkPolicy::Strip,
        );
        assert_snapshot!(outline(&out), @r###"
        heading(2)
          text "## Title"
        heading(2)
          text "## Kept"
        "###);
    }

    #[test]
    fn hash_prefixed_paragraph_becomes_a_heading() {
        let out = sanitize_fragment(
            &[Node::paragraph(vec![
                Node::text("# Title"),
                Node::hard_break(),
                Node::hard_break(),
                Node::text("body"),
            ])],
            LinkPolicy::Strip,
        );
        assert_eq!(
            out,
            vec![
                Node::heading(HeadingLevel::clamped(1), vec![Node::text("# Title")]),
                Node::paragraph(vec![Node::text("body")]),
            ]
        );
    }

    #[test]
    fn bare_text_is_promoted_only_at_the_top_level() {
        let out = sanitize_fragment(&[Node::text("### Three")], LinkPolicy::Strip);
        assert_eq!(
            out,
            vec![Node::heading(HeadingLevel::clamped(3), vec![Node::text("### Three")])]
        );
    }

    #[test]
    fn links_are_stripped_by_default() {
        let out = sanitize_fragment(
            &[Node::Doc {
                content: vec![Node::paragraph(vec![Node::linked_text("click", "https://a.io")])],
            }],
            LinkPolicy::default(),
        );
        assert_eq!(out, vec![Node::paragraph(vec![Node::text("click")])]);
    }

    #[test]
    fn expand_shows_the_href() {
        let out = sanitize_fragment(
            &[Node::linked_text("click", "https://a.io"), Node::text(" ok")],
            LinkPolicy::Expand,
        );
        assert_eq!(
            out,
            vec![
                Node::Text {
                    text: "https://a.io".into(),
                    marks: vec![Mark::link("https://a.io")],
                },
                Node::text(" ok"),
            ]
        );
    }

    #[test]
    fn consecutive_breaks_collapse() {
        let out = sanitize_fragment(
            &[Node::text("a"), Node::hard_break(), Node::hard_break(), Node::text("b")],
            LinkPolicy::Strip,
        );
        assert_eq!(out, vec![Node::text("a"), Node::hard_break(), Node::text("b")]);
    }

    #[test]
    fn heading_with_breaks_keeps_only_its_first_line_as_heading() {
        let level = HeadingLevel::clamped(2);
        let out = sanitize_fragment(
            &[Node::heading(
                level,
                vec![
                    Node::hard_break(),
                    Node::text("Alpha"),
                    Node::hard_break(),
                    Node::text("Beta"),
                    Node::hard_break(),
                    Node::text("# Gamma"),
                ],
            )],
            LinkPolicy::Strip,
        );
        assert_eq!(
            out,
            vec![
                Node::heading(level, vec![Node::text("## Alpha")]),
                Node::paragraph(vec![Node::text("Beta")]),
                Node::heading(HeadingLevel::clamped(1), vec![Node::text("# Gamma")]),
            ]
        );
    }
}
