//! # Markdown Parsing
//!
//! Two phases turn note text into a document tree:
//!
//! 1. **Scanning** (`scanner`): each `\n`-separated line becomes a heading
//!    token or a run of text and URL tokens; consecutive non-blank lines
//!    share a block and are joined by line-break tokens.
//! 2. **Building** (`builder`): a `DocBuilder` groups the tokens of each
//!    block into paragraphs and headings.
//!
//! Both phases are total: any string scans, any token sequence builds.
//! `patterns` holds the URL and heading-prefix patterns shared with the
//! normalization passes.

pub mod builder;
pub mod patterns;
pub mod scanner;

pub use builder::{DocBuilder, build};
pub use scanner::{Token, TokenBlock, scan};

use crate::model::Node;

/// Scans and builds in one go.
pub fn parse_markdown(text: &str) -> Node {
    build(&scan(text))
}
