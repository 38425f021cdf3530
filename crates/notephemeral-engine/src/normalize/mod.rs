//! # Normalization Engine
//!
//! Re-derives document structure from text after every edit. `normalize`
//! is called synchronously by the commit path with the post-edit tree and
//! returns either [`Normalization::NoChange`] or a corrective
//! [`Transaction`] built against that tree.
//!
//! Passes run once, in order, each reading the tree left by the previous:
//!
//! 1. `ensure_block`: an empty document gets an empty paragraph
//! 2. `breaks::coalesce`: drops a hard break that follows another
//! 3. `headings::reclassify`: paragraph/heading classification from the hash prefix
//! 4. `autolink::relink`: link marks from URL matches in paragraph text
//!
//! None of the passes can re-trigger an earlier one, so a normalized tree
//! normalizes to `NoChange`.

pub mod autolink;
pub mod breaks;
pub mod headings;

use std::ops::Range;

use crate::{
    editing::{Step, Transaction, resolve},
    error::EngineError,
    model::Node,
};

/// Outcome of a normalization run.
#[derive(Debug, Clone)]
pub enum Normalization {
    NoChange,
    Correction(Transaction),
}

impl Normalization {
    pub fn is_change(&self) -> bool {
        matches!(self, Normalization::Correction(_))
    }
}

pub fn normalize(doc: &Node, selection: Range<usize>) -> Result<Normalization, EngineError> {
    let mut tr = Transaction::new(doc, selection);
    ensure_block(&mut tr)?;
    breaks::coalesce(&mut tr)?;
    headings::reclassify(&mut tr)?;
    autolink::relink(&mut tr)?;

    let selection = tr.selection();
    resolve(tr.doc(), selection.start)?;
    resolve(tr.doc(), selection.end)?;

    if tr.doc_changed() {
        Ok(Normalization::Correction(tr))
    } else {
        Ok(Normalization::NoChange)
    }
}

/// A document holds at least one block.
pub fn ensure_block(tr: &mut Transaction) -> Result<(), EngineError> {
    if tr.doc().child_count() == 0 {
        tr.step(Step::InsertBlocks {
            at: 0,
            blocks: vec![Node::paragraph(vec![])],
        })?;
        tr.set_selection(1..1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeadingLevel, invariants};
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_document_gets_a_paragraph() {
        let Normalization::Correction(tr) = normalize(&Node::doc(vec![]), 0..0).unwrap() else {
            panic!("expected a correction");
        };
        assert_eq!(tr.doc(), &Node::doc(vec![Node::paragraph(vec![])]));
        assert_eq!(tr.selection(), 1..1);
    }

    #[test]
    fn passes_compose_in_one_run() {
        let doc = Node::doc(vec![Node::paragraph(vec![
            Node::text("## see https://a.io"),
            Node::hard_break(),
            Node::hard_break(),
            Node::text("at https://b.io now"),
        ])]);
        let Normalization::Correction(tr) = normalize(&doc, 0..0).unwrap() else {
            panic!("expected a correction");
        };
        invariants::check(tr.doc());
        assert_eq!(
            tr.doc(),
            &Node::doc(vec![
                Node::heading(HeadingLevel::clamped(2), vec![Node::text("## see https://a.io")]),
                Node::paragraph(vec![
                    Node::text("at "),
                    Node::linked_text("https://b.io", "https://b.io"),
                    Node::text(" now"),
                ]),
            ])
        );
        assert!(!normalize(tr.doc(), 0..0).unwrap().is_change());
    }

    #[test]
    fn unresolvable_selection_fails() {
        let doc = Node::doc(vec![Node::paragraph(vec![Node::text("ok")])]);
        assert_eq!(
            normalize(&doc, 9..9).unwrap_err(),
            EngineError::UnresolvablePosition { pos: 9, size: 4 }
        );
    }
}
