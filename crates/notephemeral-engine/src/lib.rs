//! Engine behind the notephemeral note editor.
//!
//! Keeps a typed document tree (headings, paragraphs, text runs, links,
//! hard breaks) in step with Markdown typing conventions, and turns it back
//! into canonical Markdown on demand.
//!
//! Data flow: text → [`parsing::scan`] → tokens → [`parsing::build`] →
//! tree. Each edit is a [`editing::Cmd`] compiled into a transaction; the
//! [`normalize`] passes add a corrective transaction before the edit is
//! committed. [`serialize`] reads the tree at any time.

pub mod editing;
pub mod error;
pub mod model;
pub mod normalize;
pub mod parsing;
pub mod paste;
pub mod serialize;

// Re-export key types for easier usage
pub use editing::{Cmd, Document, Patch, Step, Transaction};
pub use error::EngineError;
pub use model::{HeadingLevel, Mark, Node, NodeKind};
pub use normalize::{Normalization, normalize};
pub use parsing::{Token, TokenBlock, build, parse_markdown, scan};
pub use paste::{LinkPolicy, sanitize_fragment};
pub use serialize::{generate_markdown, render_html};
