//! # Document Tree Model
//!
//! A closed set of node and mark kinds replaces a runtime schema registry.
//! Every tree is a plain value: edits never mutate a node in place, they
//! build a new tree (see [`crate::editing::Step`]).
//!
//! ## Modules
//!
//! - **`node`**: `Node`, `NodeKind`, `HeadingLevel`, `BlockType`
//! - **`mark`**: the `Link` mark and mark-set helpers
//! - **`inline`**: operations over inline content (split, slice, flatten, link spans)
//! - **`invariants`**: panicking checks for the normalized-tree invariants, used by tests
//!
//! ## Position Space
//!
//! Positions are flat integers, counted in chars. A text node is as large
//! as its char count, a hard break counts 1, and a block counts its content
//! plus one open and one close token. Position 0 is the start of the
//! document content.

pub mod inline;
pub mod invariants;
pub mod mark;
pub mod node;

pub use mark::{Mark, MarkKind};
pub use node::{BlockType, HeadingLevel, Node, NodeKind};
