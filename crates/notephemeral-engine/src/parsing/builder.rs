use crate::model::{HeadingLevel, Node};

use super::scanner::{Token, TokenBlock};

/// Groups scanner tokens into a document tree.
///
/// Paragraph content accumulates in a buffer that is flushed into a
/// `Paragraph` whenever a heading interrupts it and at the end of each
/// block. A line break directly next to a heading line is dropped: the
/// heading already ends the line.
pub struct DocBuilder {
    paragraph: Vec<Node>,
    after_heading: bool,
    out: Vec<Node>,
}

impl DocBuilder {
    pub fn new() -> Self {
        Self {
            paragraph: vec![],
            after_heading: false,
            out: vec![],
        }
    }

    pub fn push_block(&mut self, block: &[Token]) {
        for token in block {
            self.push(token);
        }
        self.flush_paragraph();
        self.after_heading = false;
    }

    pub fn push(&mut self, token: &Token) {
        match token {
            Token::Heading { level, content } => {
                if matches!(self.paragraph.last(), Some(Node::HardBreak)) {
                    self.paragraph.pop();
                }
                self.flush_paragraph();
                self.out.push(Node::heading(
                    HeadingLevel::clamped(*level),
                    vec![Node::text(content.trim())],
                ));
                self.after_heading = true;
                return;
            }
            Token::Text { content } => {
                if !content.is_empty() {
                    self.paragraph.push(Node::text(content.as_str()));
                }
            }
            Token::LineBreak => {
                if !self.after_heading {
                    self.paragraph.push(Node::hard_break());
                }
            }
            Token::Url { content } => {
                self.paragraph
                    .push(Node::linked_text(content.as_str(), content.as_str()));
            }
        }
        self.after_heading = false;
    }

    pub fn finish(mut self) -> Node {
        self.flush_paragraph();
        Node::doc(self.out)
    }

    fn flush_paragraph(&mut self) {
        if !self.paragraph.is_empty() {
            let content = std::mem::take(&mut self.paragraph);
            self.out.push(Node::paragraph(content));
        }
    }
}

impl Default for DocBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the document tree for scanner output. Total over any token sequence.
pub fn build(blocks: &[TokenBlock]) -> Node {
    let mut builder = DocBuilder::new();
    for block in blocks {
        builder.push_block(block);
    }
    builder.finish()
}
