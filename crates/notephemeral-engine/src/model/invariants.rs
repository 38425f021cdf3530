use crate::parsing::patterns::{heading_prefix_level, url_spans};

use super::{
    inline::{flatten, has_marks, link_spans, normalize_inline},
    mark::Mark,
    node::Node,
};

/// Asserts that `doc` is a normalized document tree.
///
/// Panics with a description of the first violation found.
pub fn check(doc: &Node) {
    let Node::Doc { content } = doc else {
        panic!("root is not a doc: {}", doc.kind());
    };
    for (index, block) in content.iter().enumerate() {
        assert!(
            block.is_textblock(),
            "block {index} is a {} node",
            block.kind()
        );
        let inline = block.content();
        for node in inline {
            assert!(
                node.is_inline(),
                "block {index} holds a {} node",
                node.kind()
            );
        }
        assert_eq!(
            normalize_inline(inline.to_vec()),
            inline,
            "block {index} has non-canonical inline content"
        );
        assert!(
            !inline
                .windows(2)
                .any(|w| matches!(w, [Node::HardBreak, Node::HardBreak])),
            "block {index} has consecutive hard breaks"
        );

        let prefix = block.leading_text().and_then(heading_prefix_level);
        match block {
            Node::Heading { level, .. } => {
                assert_eq!(
                    prefix,
                    Some(*level),
                    "heading {index} text {:?} does not justify level {}",
                    block.leading_text(),
                    level.get()
                );
                assert!(!has_marks(inline), "heading {index} carries marks");
                assert!(
                    !inline.contains(&Node::HardBreak),
                    "heading {index} holds a hard break"
                );
            }
            Node::Paragraph { .. } => {
                assert_eq!(
                    prefix, None,
                    "paragraph {index} starts with a heading prefix"
                );
                assert!(
                    !inline.windows(2).any(|w| matches!(
                        w,
                        [Node::HardBreak, Node::Text { text, .. }] if heading_prefix_level(text).is_some()
                    )),
                    "paragraph {index} has a line with a heading prefix"
                );
                let wanted: Vec<_> = url_spans(&flatten(inline))
                    .into_iter()
                    .map(|(range, href)| (range, Mark::link(href)))
                    .collect();
                assert_eq!(
                    link_spans(inline),
                    wanted,
                    "paragraph {index} link marks do not track its URLs"
                );
            }
            _ => {}
        }
    }
}
