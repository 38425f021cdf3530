//! Link marks follow paragraph text.
//!
//! A paragraph's coordinate space is its inline content with each hard
//! break read as `'\n'`, so char offsets in the flattened text are offsets
//! into the content. Headings are never linked.

use crate::{
    editing::{Step, Transaction},
    error::EngineError,
    model::{
        Mark, MarkKind, Node,
        inline::{flatten, link_spans},
    },
    parsing::patterns::url_spans,
};

pub fn relink(tr: &mut Transaction) -> Result<(), EngineError> {
    let mut steps = Vec::new();
    let mut start = 0;
    for block in tr.doc().content() {
        if let Node::Paragraph { content } = block {
            let base = start + 1;
            let wanted: Vec<_> = url_spans(&flatten(content))
                .into_iter()
                .map(|(range, href)| (range, Mark::link(href)))
                .collect();
            if link_spans(content) != wanted {
                steps.push(Step::RemoveMark {
                    from: base,
                    to: base + block.content_size(),
                    kind: MarkKind::Link,
                });
                steps.extend(wanted.into_iter().map(|(range, mark)| Step::AddMark {
                    from: base + range.start,
                    to: base + range.end,
                    mark,
                }));
            }
        }
        start += block.node_size();
    }
    // Mark steps never move positions.
    for step in steps {
        tr.step(step)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HeadingLevel;
    use pretty_assertions::assert_eq;

    fn run(doc: Node) -> Transaction {
        let mut tr = Transaction::new(&doc, 0..0);
        relink(&mut tr).unwrap();
        tr
    }

    #[test]
    fn url_in_text_gets_a_link() {
        let tr = run(Node::doc(vec![Node::paragraph(vec![Node::text(
            "Hello, https://example.com!",
        )])]));
        assert_eq!(
            tr.doc(),
            &Node::doc(vec![Node::paragraph(vec![
                Node::text("Hello, "),
                Node::linked_text("https://example.com", "https://example.com"),
                Node::text("!"),
            ])])
        );
    }

    #[test]
    fn adjacent_urls_stay_separate() {
        let tr = run(Node::doc(vec![Node::paragraph(vec![Node::text(
            "https://google.com https://bing.com",
        )])]));
        assert_eq!(
            tr.doc(),
            &Node::doc(vec![Node::paragraph(vec![
                Node::linked_text("https://google.com", "https://google.com"),
                Node::text(" "),
                Node::linked_text("https://bing.com", "https://bing.com"),
            ])])
        );
    }

    #[test]
    fn offsets_count_hard_breaks() {
        let tr = run(Node::doc(vec![Node::paragraph(vec![
            Node::text("a"),
            Node::hard_break(),
            Node::text("b https://c.io"),
        ])]));
        assert_eq!(
            tr.doc().child(0),
            Some(&Node::paragraph(vec![
                Node::text("a"),
                Node::hard_break(),
                Node::text("b "),
                Node::linked_text("https://c.io", "https://c.io"),
            ]))
        );
    }

    #[test]
    fn stale_links_are_replaced() {
        let tr = run(Node::doc(vec![Node::paragraph(vec![
            Node::linked_text("https://example.co", "https://example.co"),
            Node::text("m and more"),
        ])]));
        assert_eq!(
            tr.doc().child(0),
            Some(&Node::paragraph(vec![
                Node::linked_text("https://example.com", "https://example.com"),
                Node::text(" and more"),
            ]))
        );
    }

    #[test]
    fn headings_and_linked_paragraphs_are_left_alone() {
        let tr = run(Node::doc(vec![
            Node::heading(HeadingLevel::clamped(1), vec![Node::text("# https://a.io")]),
            Node::paragraph(vec![Node::linked_text("https://a.io", "https://a.io")]),
        ]));
        assert!(!tr.doc_changed());
    }
}
