use crate::{error::EngineError, model::Node, model::mark::link_href};

/// Canonical Markdown for `doc`.
///
/// Headings emit their text (which carries the hash prefix). Paragraphs
/// emit a `\n` per hard break and the `href` of linked runs. Every block
/// ends with a blank line.
pub fn generate_markdown(doc: &Node) -> Result<String, EngineError> {
    let mut out = String::new();
    for block in doc.content() {
        match block {
            Node::Heading { .. } => out.push_str(&block.text_content()),
            Node::Paragraph { content } => {
                for node in content {
                    match node {
                        Node::HardBreak => out.push('\n'),
                        Node::Text { text, marks } => {
                            out.push_str(link_href(marks).unwrap_or(text));
                        }
                        other => out.push_str(&other.text_content()),
                    }
                }
            }
            other => return Err(EngineError::UnknownNodeKind(other.kind())),
        }
        out.push_str("\n\n");
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeadingLevel, NodeKind};
    use pretty_assertions::assert_eq;

    #[test]
    fn blocks_end_with_a_blank_line() {
        let doc = Node::doc(vec![
            Node::heading(HeadingLevel::clamped(2), vec![Node::text("## Hello")]),
            Node::paragraph(vec![Node::text("Hello"), Node::hard_break(), Node::text("world")]),
        ]);
        assert_eq!(generate_markdown(&doc).unwrap(), "## Hello\n\nHello\nworld\n\n");
    }

    #[test]
    fn linked_runs_emit_their_href() {
        let doc = Node::doc(vec![Node::paragraph(vec![
            Node::text("see "),
            Node::linked_text("here", "https://example.com"),
        ])]);
        assert_eq!(generate_markdown(&doc).unwrap(), "see https://example.com\n\n");
    }

    #[test]
    fn empty_document_is_empty_text() {
        assert_eq!(generate_markdown(&Node::doc(vec![])).unwrap(), "");
    }

    #[test]
    fn stray_top_level_nodes_are_fatal() {
        let doc = Node::doc(vec![Node::paragraph(vec![]), Node::hard_break()]);
        assert_eq!(
            generate_markdown(&doc),
            Err(EngineError::UnknownNodeKind(NodeKind::HardBreak))
        );
    }
}
