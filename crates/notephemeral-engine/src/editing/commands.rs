use std::ops::Range;

use crate::{
    error::EngineError,
    model::{
        Node,
        inline::{inline_size, node_before, normalize_inline},
    },
    parsing::{parse_markdown, patterns::heading_prefix_level},
    paste::{LinkPolicy, sanitize_fragment},
};

use super::{
    position::{ResolvedPos, resolve},
    step::Step,
    transaction::Transaction,
};

/// Edit intents, already decoded from whatever input produced them.
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    /// Inserts text; each run of `\n` becomes one hard break.
    InsertText { at: usize, text: String },
    DeleteRange { range: Range<usize> },
    /// The Enter key, acting on the current selection.
    Enter,
    /// Pastes an external tree fragment. The fragment is sanitized first.
    Paste { at: usize, fragment: Vec<Node> },
    /// Pastes plain clipboard text, read as Markdown.
    PasteText { at: usize, text: String },
}

/// Compiles `cmd` into a transaction over `doc`.
pub fn compile_command(
    doc: &Node,
    selection: Range<usize>,
    cmd: &Cmd,
    policy: LinkPolicy,
) -> Result<Transaction, EngineError> {
    match cmd {
        Cmd::InsertText { at, text } => insert_text(doc, *at, text),
        Cmd::DeleteRange { range } => delete_range(doc, range.clone()),
        Cmd::Enter => insert_newline(doc, selection),
        Cmd::Paste { at, fragment } => paste(doc, *at, fragment, policy),
        Cmd::PasteText { at, text } => paste_text(doc, *at, text, policy),
    }
}

/// Inline nodes for `text`: one hard break per run of newlines.
pub fn text_to_inline(text: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut lines = text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l)).peekable();
    while let Some(line) = lines.next() {
        if !line.is_empty() {
            nodes.push(Node::text(line));
        }
        if lines.peek().is_some() && nodes.last() != Some(&Node::HardBreak) {
            nodes.push(Node::hard_break());
        }
    }
    normalize_inline(nodes)
}

/// Groups runs of inline nodes into paragraphs, leaving blocks as they are.
pub fn wrap_inline_runs(nodes: Vec<Node>) -> Vec<Node> {
    let mut out = Vec::new();
    let mut run = Vec::new();
    for node in nodes {
        if node.is_inline() {
            run.push(node);
            continue;
        }
        if !run.is_empty() {
            out.push(Node::paragraph(std::mem::take(&mut run)));
        }
        out.push(node);
    }
    if !run.is_empty() {
        out.push(Node::paragraph(run));
    }
    out
}

pub fn insert_text(doc: &Node, at: usize, text: &str) -> Result<Transaction, EngineError> {
    let mut tr = Transaction::new(doc, at..at);
    insert_inline(&mut tr, at, text_to_inline(text))?;
    Ok(tr)
}

pub fn delete_range(doc: &Node, range: Range<usize>) -> Result<Transaction, EngineError> {
    let mut tr = Transaction::new(doc, range.start..range.start);
    tr.delete(range.start, range.end)?;
    tr.set_selection(range.start..range.start);
    Ok(tr)
}

/// The custom Enter command.
///
/// Inside a paragraph a first Enter inserts a hard break; a second one
/// right after a break removes it and splits the paragraph instead. Outside
/// a paragraph a new empty paragraph is opened after the enclosing block.
/// Every case counts as handled.
pub fn insert_newline(doc: &Node, selection: Range<usize>) -> Result<Transaction, EngineError> {
    let mut tr = Transaction::new(doc, selection.clone());
    if selection.start < selection.end {
        tr.delete(selection.start, selection.end)?;
        tr.set_selection(selection.start..selection.start);
    }
    let caret = tr.selection().start;
    let caret = match resolve(tr.doc(), caret)? {
        ResolvedPos::Inline {
            index,
            start,
            offset,
            ..
        } => {
            let block = &tr.doc().content()[index];
            let in_paragraph = matches!(block, Node::Paragraph { .. });
            let after_break = matches!(node_before(block.content(), offset), Some(Node::HardBreak));
            let block_end = start + block.node_size();
            if in_paragraph && after_break {
                tr.step(Step::Delete {
                    from: caret - 1,
                    to: caret,
                })?;
                tr.step(Step::Split { at: caret - 1 })?;
                caret + 1
            } else if in_paragraph {
                tr.step(Step::InsertInline {
                    at: caret,
                    content: vec![Node::hard_break()],
                })?;
                caret + 1
            } else {
                tr.step(Step::InsertBlocks {
                    at: block_end,
                    blocks: vec![Node::paragraph(vec![])],
                })?;
                block_end + 1
            }
        }
        ResolvedPos::Between { pos, .. } => {
            tr.step(Step::InsertBlocks {
                at: pos,
                blocks: vec![Node::paragraph(vec![])],
            })?;
            pos + 1
        }
    };
    tr.set_selection(caret..caret);
    Ok(tr)
}

/// Pastes a fragment at `at`.
///
/// Inline-only fragments go in place. Block fragments replace an empty
/// block, or go in at the enclosing block boundary, splitting the block
/// when `at` is mid-block.
/// The caret ends after the pasted content.
pub fn paste(
    doc: &Node,
    at: usize,
    fragment: &[Node],
    policy: LinkPolicy,
) -> Result<Transaction, EngineError> {
    let nodes = sanitize_fragment(fragment, policy);
    let mut tr = Transaction::new(doc, at..at);
    if nodes.iter().all(Node::is_inline) {
        insert_inline(&mut tr, at, nodes)?;
        return Ok(tr);
    }

    let blocks = wrap_inline_runs(nodes);
    let insert_at = match resolve(doc, at)? {
        ResolvedPos::Between { pos, .. } => pos,
        ResolvedPos::Inline {
            index,
            start,
            offset,
            ..
        } => {
            let block = &doc.content()[index];
            if block.content_size() == 0 {
                tr.step(Step::Delete {
                    from: start,
                    to: start + block.node_size(),
                })?;
                start
            } else if offset == 0 {
                start
            } else if offset == block.content_size() {
                start + block.node_size()
            } else {
                tr.step(Step::Split { at })?;
                at + 1
            }
        }
    };
    let size = inline_size(&blocks);
    tr.step(Step::InsertBlocks {
        at: insert_at,
        blocks,
    })?;
    let caret = insert_at + size - 1;
    tr.set_selection(caret..caret);
    Ok(tr)
}

/// Pastes plain text. A single resulting paragraph is pasted inline.
pub fn paste_text(
    doc: &Node,
    at: usize,
    text: &str,
    policy: LinkPolicy,
) -> Result<Transaction, EngineError> {
    let parsed = parse_fragment(text);
    match parsed.as_slice() {
        [Node::Paragraph { content }] => paste(doc, at, content, policy),
        _ => paste(doc, at, &parsed, policy),
    }
}

/// Reads clipboard text into blocks.
///
/// The scanner marks every `#`-led line as a heading; lines without a real
/// hash prefix (`#tag`) are read back as paragraphs so the sanitizer does
/// not turn them into headings.
pub fn parse_fragment(text: &str) -> Vec<Node> {
    let Node::Doc { content } = parse_markdown(text) else {
        return vec![];
    };
    content
        .into_iter()
        .map(|block| match block {
            Node::Heading { content, .. }
                if content
                    .first()
                    .and_then(|n| match n {
                        Node::Text { text, .. } => heading_prefix_level(text),
                        _ => None,
                    })
                    .is_none() =>
            {
                Node::paragraph(content)
            }
            other => other,
        })
        .collect()
}

fn insert_inline(tr: &mut Transaction, at: usize, content: Vec<Node>) -> Result<(), EngineError> {
    if content.is_empty() {
        return Ok(());
    }
    let size = inline_size(&content);
    let caret = match resolve(tr.doc(), at)? {
        ResolvedPos::Inline { .. } => {
            tr.step(Step::InsertInline { at, content })?;
            at + size
        }
        ResolvedPos::Between { .. } => {
            tr.step(Step::InsertBlocks {
                at,
                blocks: vec![Node::paragraph(content)],
            })?;
            at + 1 + size
        }
    };
    tr.set_selection(caret..caret);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HeadingLevel;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("", vec![])]
    #[case("ab", vec![Node::text("ab")])]
    #[case("a\nb", vec![Node::text("a"), Node::hard_break(), Node::text("b")])]
    #[case("a\n\n\nb", vec![Node::text("a"), Node::hard_break(), Node::text("b")])]
    #[case("a\r\nb\n", vec![Node::text("a"), Node::hard_break(), Node::text("b"), Node::hard_break()])]
    fn text_becomes_inline_nodes(#[case] text: &str, #[case] expected: Vec<Node>) {
        assert_eq!(text_to_inline(text), expected);
    }

    #[test]
    fn inline_runs_are_wrapped() {
        let level = HeadingLevel::clamped(1);
        let wrapped = wrap_inline_runs(vec![
            Node::text("a"),
            Node::heading(level, vec![Node::text("# b")]),
            Node::text("c"),
        ]);
        assert_eq!(
            wrapped,
            vec![
                Node::paragraph(vec![Node::text("a")]),
                Node::heading(level, vec![Node::text("# b")]),
                Node::paragraph(vec![Node::text("c")]),
            ]
        );
    }

    #[test]
    fn typing_between_blocks_opens_a_paragraph() {
        let tr = insert_text(&Node::doc(vec![]), 0, "hi").unwrap();
        assert_eq!(tr.doc(), &Node::doc(vec![Node::paragraph(vec![Node::text("hi")])]));
        assert_eq!(tr.selection(), 3..3);
    }

    #[test]
    fn enter_in_a_paragraph_inserts_a_break() {
        let doc = Node::doc(vec![Node::paragraph(vec![Node::text("Hello")])]);
        let tr = insert_newline(&doc, 6..6).unwrap();
        assert_eq!(
            tr.doc(),
            &Node::doc(vec![Node::paragraph(vec![Node::text("Hello"), Node::hard_break()])])
        );
        assert_eq!(tr.selection(), 7..7);
    }

    #[test]
    fn second_enter_splits_instead_of_doubling_the_break() {
        let doc = Node::doc(vec![Node::paragraph(vec![
            Node::text("Hello"),
            Node::hard_break(),
            Node::text("world"),
        ])]);
        let tr = insert_newline(&doc, 7..7).unwrap();
        assert_eq!(
            tr.doc(),
            &Node::doc(vec![
                Node::paragraph(vec![Node::text("Hello")]),
                Node::paragraph(vec![Node::text("world")]),
            ])
        );
        assert_eq!(tr.selection(), 8..8);
    }

    #[test]
    fn enter_in_a_heading_opens_a_paragraph_after_it() {
        let level = HeadingLevel::clamped(1);
        let doc = Node::doc(vec![Node::heading(level, vec![Node::text("# Title")])]);
        let tr = insert_newline(&doc, 3..3).unwrap();
        assert_eq!(
            tr.doc(),
            &Node::doc(vec![
                Node::heading(level, vec![Node::text("# Title")]),
                Node::paragraph(vec![]),
            ])
        );
        assert_eq!(tr.selection(), 10..10);
    }

    #[test]
    fn enter_replaces_the_selection() {
        let doc = Node::doc(vec![Node::paragraph(vec![Node::text("abcd")])]);
        let tr = insert_newline(&doc, 2..4).unwrap();
        assert_eq!(
            tr.doc(),
            &Node::doc(vec![Node::paragraph(vec![
                Node::text("a"),
                Node::hard_break(),
                Node::text("d"),
            ])])
        );
        assert_eq!(tr.selection(), 3..3);
    }

    #[test]
    fn enter_past_the_end_fails() {
        let doc = Node::doc(vec![Node::paragraph(vec![])]);
        assert!(matches!(
            insert_newline(&doc, 5..5),
            Err(EngineError::UnresolvablePosition { pos: 5, .. })
        ));
    }

    #[test]
    fn pasting_blocks_mid_paragraph_splits_it() {
        let doc = Node::doc(vec![Node::paragraph(vec![Node::text("abcd")])]);
        let level = HeadingLevel::clamped(2);
        let fragment = vec![Node::heading(level, vec![Node::text("Title")])];
        let tr = paste(&doc, 3, &fragment, LinkPolicy::Strip).unwrap();
        assert_eq!(
            tr.doc(),
            &Node::doc(vec![
                Node::paragraph(vec![Node::text("ab")]),
                Node::heading(level, vec![Node::text("## Title")]),
                Node::paragraph(vec![Node::text("cd")]),
            ])
        );
        assert_eq!(tr.selection(), 13..13);
    }

    #[test]
    fn pasting_plain_text_goes_inline() {
        let doc = Node::doc(vec![Node::paragraph(vec![Node::text("ab")])]);
        let tr = paste_text(&doc, 2, "x https://a.io", LinkPolicy::Strip).unwrap();
        assert_eq!(
            tr.doc(),
            &Node::doc(vec![Node::paragraph(vec![Node::text("ax https://a.iob")])])
        );
        assert_eq!(tr.selection(), 16..16);
    }

    #[test]
    fn hashtag_lines_are_not_headings() {
        assert_eq!(
            parse_fragment("#tag\n\n## Real"),
            vec![
                Node::paragraph(vec![Node::text("#tag")]),
                Node::heading(HeadingLevel::clamped(2), vec![Node::text("## Real")]),
            ]
        );
    }
}
