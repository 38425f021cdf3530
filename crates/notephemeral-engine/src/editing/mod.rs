//! # Editing Core
//!
//! The tree is an immutable value; edits are explicit [`Step`]s that each
//! return a new tree together with a [`StepMap`] describing how positions
//! shift. A [`Transaction`] bundles steps with the selection they leave
//! behind, and the [`Document`] session commits one transaction per
//! command after normalization has had its say.
//!
//! ## Module Structure
//!
//! - **`position`**: resolving flat positions to blocks and inline offsets
//! - **`mapping`**: `StepMap`, `Mapping` and `Assoc`
//! - **`step`**: the `Step` enum and its pure `apply`
//! - **`transaction`**: step batches with selection tracking
//! - **`commands`**: `Cmd` and its compilation, including the Enter command
//! - **`document`**: the editing session
//! - **`patch`**: edit result metadata
//!
//! ## Usage Pattern
//!
//! ```rust
//! use notephemeral_engine::editing::*;
//!
//! let mut doc = Document::from_markdown("Hello");
//! let end = doc.selection().end;
//! doc.apply(Cmd::InsertText { at: end, text: " https://example.com".into() });
//! doc.apply(Cmd::Enter);
//! doc.apply(Cmd::Enter);
//! doc.apply(Cmd::InsertText { at: doc.selection().end, text: "next".into() });
//!
//! assert_eq!(
//!     doc.to_markdown().unwrap(),
//!     "Hello https://example.com\n\nnext\n\n"
//! );
//! ```

pub mod commands;
pub mod document;
pub mod mapping;
pub mod patch;
pub mod position;
pub mod step;
pub mod transaction;

pub use commands::{Cmd, insert_newline};
pub use document::Document;
pub use mapping::{Assoc, Mapping, StepMap};
pub use patch::Patch;
pub use position::{ResolvedPos, resolve};
pub use step::Step;
pub use transaction::Transaction;
