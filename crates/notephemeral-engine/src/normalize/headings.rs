//! Heading/paragraph reclassification.
//!
//! Every line of a block is classifying text: its leading text run and each
//! text run right after a hard break. A block whose first line carries a
//! `#`-prefix becomes a heading of that level; a heading keeps its level in
//! step with its prefix and is demoted once the prefix is gone. A heading
//! only ever spans one line, so a heading block is cut at its first hard
//! break, and any block is cut before a later line that carries a prefix.
//! The break at a cut is removed and the tail is classified in turn.

use crate::{
    editing::{Step, Transaction},
    error::EngineError,
    model::{BlockType, MarkKind, Node, inline::has_marks},
    parsing::patterns::heading_prefix_level,
};

pub fn reclassify(tr: &mut Transaction) -> Result<(), EngineError> {
    let mut index = 0;
    let mut start = 0;
    while index < tr.doc().child_count() {
        let block = &tr.doc().content()[index];
        let prefix = block.leading_text().and_then(heading_prefix_level);
        let cut = match prefix {
            Some(_) => first_break(block.content()),
            None => prefixed_line(block.content()),
        };
        let cut_at = cut.map(|offset| start + 1 + offset);
        let head_end = cut_at.unwrap_or(start + 1 + block.content_size());
        let marked = has_marks(block.content());
        let block_type = block.block_type();

        if let Some(at) = cut_at {
            tr.step(Step::Delete { from: at, to: at + 1 })?;
            tr.step(Step::Split { at })?;
        }
        match (block_type, prefix) {
            (Some(current), Some(level)) => {
                if current != BlockType::Heading(level) {
                    tr.step(Step::SetBlockType {
                        at: start,
                        block: BlockType::Heading(level),
                    })?;
                } else if marked {
                    tr.step(Step::RemoveMark {
                        from: start + 1,
                        to: head_end,
                        kind: MarkKind::Link,
                    })?;
                }
            }
            (Some(BlockType::Heading(_)), None) => {
                if marked {
                    tr.step(Step::RemoveMark {
                        from: start + 1,
                        to: head_end,
                        kind: MarkKind::Link,
                    })?;
                }
                tr.step(Step::SetBlockType {
                    at: start,
                    block: BlockType::Paragraph,
                })?;
            }
            _ => {}
        }
        start += tr.doc().content()[index].node_size();
        index += 1;
    }
    Ok(())
}

/// Content offset of the first hard break.
fn first_break(content: &[Node]) -> Option<usize> {
    let i = content.iter().position(|n| *n == Node::HardBreak)?;
    Some(content[..i].iter().map(Node::node_size).sum())
}

/// Content offset of the first hard break followed by a hash-prefixed line.
fn prefixed_line(content: &[Node]) -> Option<usize> {
    let mut offset = 0;
    for (i, node) in content.iter().enumerate() {
        if *node == Node::HardBreak
            && let Some(Node::Text { text, .. }) = content.get(i + 1)
            && heading_prefix_level(text).is_some()
        {
            return Some(offset);
        }
        offset += node.node_size();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HeadingLevel;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn run(doc: Node, caret: usize) -> Transaction {
        let mut tr = Transaction::new(&doc, caret..caret);
        reclassify(&mut tr).unwrap();
        tr
    }

    fn h(level: usize, text: &str) -> Node {
        Node::heading(HeadingLevel::clamped(level), vec![Node::text(text)])
    }

    fn p(text: &str) -> Node {
        Node::paragraph(vec![Node::text(text)])
    }

    #[rstest]
    #[case(p("## Hello"), h(2, "## Hello"))]
    #[case(p("###### Six"), h(6, "###### Six"))]
    #[case(p("####### Seven"), p("####### Seven"))]
    #[case(p("#tag"), p("#tag"))]
    #[case(h(1, "### Three"), h(3, "### Three"))]
    #[case(h(2, "Hello"), p("Hello"))]
    #[case(h(2, "## Hello"), h(2, "## Hello"))]
    fn classifies_by_hash_prefix(#[case] block: Node, #[case] expected: Node) {
        let tr = run(Node::doc(vec![block]), 0);
        assert_eq!(tr.doc(), &Node::doc(vec![expected]));
    }

    #[test]
    fn promotion_splits_at_the_first_break() {
        let doc = Node::doc(vec![Node::paragraph(vec![
            Node::text("# Title"),
            Node::hard_break(),
            Node::text("body"),
        ])]);
        // caret right after "bo"
        let tr = run(doc, 11);
        assert_eq!(tr.doc(), &Node::doc(vec![h(1, "# Title"), p("body")]));
        assert_eq!(tr.selection(), 12..12);
    }

    #[test]
    fn demotion_keeps_the_caret_offset() {
        // "Hello" was "## Hello"; caret after "Hel"
        let tr = run(Node::doc(vec![h(2, "Hello")]), 4);
        assert_eq!(tr.doc(), &Node::doc(vec![p("Hello")]));
        assert_eq!(tr.selection(), 4..4);
    }

    #[test]
    fn marks_on_headings_are_removed() {
        let doc = Node::doc(vec![Node::Heading {
            level: HeadingLevel::clamped(1),
            content: vec![
                Node::text("# "),
                Node::linked_text("https://a.io", "https://a.io"),
            ],
        }]);
        let tr = run(doc, 0);
        assert_eq!(tr.doc(), &Node::doc(vec![h(1, "# https://a.io")]));
    }

    #[test]
    fn normalized_blocks_produce_no_steps() {
        let tr = run(Node::doc(vec![h(1, "# A"), p("b"), h(3, "### c")]), 0);
        assert!(!tr.doc_changed());
    }

    #[test]
    fn prefixed_line_after_a_break_is_split_off() {
        let doc = Node::doc(vec![Node::paragraph(vec![
            Node::text("Hello"),
            Node::hard_break(),
            Node::text("# World"),
        ])]);
        // caret after "# Wo"
        let tr = run(doc, 11);
        assert_eq!(tr.doc(), &Node::doc(vec![p("Hello"), h(1, "# World")]));
        assert_eq!(tr.selection(), 12..12);
    }

    #[test]
    fn every_prefixed_line_gets_its_own_heading() {
        let doc = Node::doc(vec![Node::paragraph(vec![
            Node::text("intro"),
            Node::hard_break(),
            Node::text("## Two"),
            Node::hard_break(),
            Node::text("body"),
            Node::hard_break(),
            Node::text("### Three"),
        ])]);
        let tr = run(doc, 0);
        assert_eq!(
            tr.doc(),
            &Node::doc(vec![p("intro"), h(2, "## Two"), p("body"), h(3, "### Three")])
        );
    }

    #[test]
    fn demoted_heading_is_cut_before_a_prefixed_line() {
        let doc = Node::doc(vec![Node::heading(
            HeadingLevel::clamped(1),
            vec![Node::text("Title"), Node::hard_break(), Node::text("# Next")],
        )]);
        let tr = run(doc, 0);
        assert_eq!(tr.doc(), &Node::doc(vec![p("Title"), h(1, "# Next")]));
    }

    #[test]
    fn unprefixed_lines_stay_in_the_paragraph() {
        let doc = Node::doc(vec![Node::paragraph(vec![
            Node::text("a"),
            Node::hard_break(),
            Node::text("#tag"),
            Node::hard_break(),
            Node::text(" # indented"),
        ])]);
        assert!(!run(doc, 0).doc_changed());
    }
}
