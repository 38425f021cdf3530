//! Read-only renderings of a document tree. Both walk the root's blocks and
//! fail with `UnknownNodeKind` on anything that is not a heading or a
//! paragraph.

pub mod html;
pub mod markdown;

pub use html::render_html;
pub use markdown::generate_markdown;
