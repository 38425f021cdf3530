use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::{error::EngineError, model::Mark, model::Node};

/// Renders `doc` as HTML, one element per block.
pub fn render_html(doc: &Node) -> Result<String, EngineError> {
    let mut out = String::new();
    for block in doc.content() {
        let tag = match block {
            Node::Heading { level, .. } => format!("h{}", level.get()),
            Node::Paragraph { .. } => "p".to_string(),
            other => return Err(EngineError::UnknownNodeKind(other.kind())),
        };
        out.push_str(&format!("<{tag}>"));
        for node in block.content() {
            render_inline(node, &mut out);
        }
        out.push_str(&format!("</{tag}>\n"));
    }
    Ok(out)
}

fn render_inline(node: &Node, out: &mut String) {
    match node {
        Node::HardBreak => out.push_str("<br>"),
        Node::Text { text, marks } => {
            let link = marks.iter().find_map(|m| match m {
                Mark::Link { href, title } => Some((href, title)),
            });
            match link {
                Some((href, title)) => {
                    out.push_str(&format!("<a href=\"{}\"", encode_double_quoted_attribute(href)));
                    if let Some(title) = title {
                        out.push_str(&format!(
                            " title=\"{}\"",
                            encode_double_quoted_attribute(title)
                        ));
                    }
                    out.push_str(&format!(">{}</a>", encode_text(text)));
                }
                None => out.push_str(&encode_text(text)),
            }
        }
        other => out.push_str(&encode_text(&other.text_content())),
    }
}
