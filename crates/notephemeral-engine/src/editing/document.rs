use std::ops::Range;

use crate::{
    error::EngineError,
    model::{Node, NodeKind},
    normalize::{Normalization, normalize},
    parsing::parse_markdown,
    paste::LinkPolicy,
    serialize::{generate_markdown, render_html},
};

use super::{
    Cmd, Patch, Transaction,
    commands::compile_command,
    position::{ResolvedPos, end_of_content, resolve},
};

/// The editing session.
///
/// Owns the tree exclusively. Every command is compiled into a transaction,
/// normalized, and committed as one atomic edit; readers only ever see
/// normalized trees.
///
/// ```rust
/// # use notephemeral_engine::editing::{Cmd, Document};
/// let mut doc = Document::from_markdown("Hello");
/// let patch = doc.apply(Cmd::InsertText { at: 1, text: "## ".into() });
/// assert!(patch.corrected);
/// assert_eq!(doc.to_markdown().unwrap(), "## Hello\n\n");
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) tree: Node,
    /// Current selection as document positions
    pub(crate) selection: Range<usize>,
    /// Incremented on each edit that changes the tree
    pub(crate) version: u64,
    pub(crate) link_policy: LinkPolicy,
}

impl Document {
    /// Loads Markdown text. Loading never fails; the text is normalized once
    /// and the caret placed at the end of the last block.
    pub fn from_markdown(text: &str) -> Self {
        Self::settle(parse_markdown(text))
    }

    /// Starts a session from an existing tree. A single block or inline
    /// node is wrapped into a document.
    pub fn from_tree(tree: Node) -> Result<Self, EngineError> {
        let tree = if matches!(tree, Node::Doc { .. }) {
            tree
        } else if tree.is_textblock() {
            Node::doc(vec![tree])
        } else {
            Node::doc(vec![Node::paragraph(vec![tree])])
        };
        check_content(&tree)?;
        Ok(Self::settle(tree))
    }

    fn settle(tree: Node) -> Self {
        let tree = match normalize(&tree, 0..0) {
            Ok(Normalization::Correction(tr)) => tr.into_parts().0,
            Ok(Normalization::NoChange) => tree,
            Err(err) => {
                log::debug!("loaded tree left uncorrected: {err}");
                tree
            }
        };
        let end = end_of_content(&tree);
        Self {
            tree,
            selection: end..end,
            version: 0,
            link_policy: LinkPolicy::default(),
        }
    }

    pub fn with_link_policy(mut self, policy: LinkPolicy) -> Self {
        self.link_policy = policy;
        self
    }

    /// Applies a command (the edit loop)
    ///
    /// 1. compile the command into a transaction against the current tree
    /// 2. run normalization on the result and append its correction
    /// 3. commit the tree and the selection, bump the version
    ///
    /// A command that cannot be compiled changes nothing. A correction that
    /// fails is dropped and the base edit is committed without it.
    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        let mut tr = match compile_command(&self.tree, self.selection(), &cmd, self.link_policy) {
            Ok(tr) => tr,
            Err(err) => {
                log::debug!("skipping {cmd:?}: {err}");
                return self.unchanged();
            }
        };

        let mut corrected = false;
        if tr.doc_changed() {
            match normalize(tr.doc(), tr.selection()) {
                Ok(Normalization::NoChange) => {}
                Ok(Normalization::Correction(fix)) => {
                    let mut merged = tr.clone();
                    match merged.append(fix).map(|_| ()) {
                        Ok(_) => {
                            tr = merged;
                            corrected = true;
                        }
                        Err(err) => log::debug!("dropping correction for {cmd:?}: {err}"),
                    }
                }
                Err(err) => log::debug!("dropping correction for {cmd:?}: {err}"),
            }
        }

        self.commit(tr, corrected)
    }

    fn commit(&mut self, tr: Transaction, corrected: bool) -> Patch {
        let changed_doc = tr.doc_changed();
        let steps = tr.steps().len();
        let (tree, selection, changed) = tr.into_parts();
        self.tree = tree;
        self.selection = selection.clone();
        if changed_doc {
            self.version += 1;
            log::trace!("committed {steps} steps at version {}", self.version);
        }
        Patch {
            changed,
            new_selection: selection,
            version: self.version,
            corrected,
        }
    }

    fn unchanged(&self) -> Patch {
        Patch {
            changed: Vec::new(),
            new_selection: self.selection(),
            version: self.version,
            corrected: false,
        }
    }

    pub fn tree(&self) -> &Node {
        &self.tree
    }

    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    pub fn set_selection(&mut self, selection: Range<usize>) {
        self.selection = selection;
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn link_policy(&self) -> LinkPolicy {
        self.link_policy
    }

    pub fn resolve(&self, pos: usize) -> Result<ResolvedPos, EngineError> {
        resolve(&self.tree, pos)
    }

    pub fn to_markdown(&self) -> Result<String, EngineError> {
        generate_markdown(&self.tree)
    }

    pub fn to_html(&self) -> Result<String, EngineError> {
        render_html(&self.tree)
    }
}

/// Checks that blocks sit only at the root and inline nodes only in blocks.
fn check_content(doc: &Node) -> Result<(), EngineError> {
    for block in doc.content() {
        if !block.is_textblock() {
            return Err(EngineError::InvalidContent {
                parent: NodeKind::Doc,
                found: block.kind(),
            });
        }
        if let Some(bad) = block.content().iter().find(|n| !n.is_inline()) {
            return Err(EngineError::InvalidContent {
                parent: block.kind(),
                found: bad.kind(),
            });
        }
    }
    Ok(())
}
