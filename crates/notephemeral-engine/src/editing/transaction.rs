use std::ops::Range;

use crate::{error::EngineError, model::Node};

use super::{
    mapping::{Assoc, Mapping},
    position::{ResolvedPos, resolve},
    step::Step,
};

/// An atomic batch of steps plus the selection they leave behind.
///
/// The selection and the changed ranges are remapped through every step,
/// so they always refer to positions in [`Transaction::doc`].
#[derive(Debug, Clone)]
pub struct Transaction {
    doc: Node,
    steps: Vec<Step>,
    mapping: Mapping,
    selection: Range<usize>,
    changed: Vec<Range<usize>>,
}

impl Transaction {
    pub fn new(doc: &Node, selection: Range<usize>) -> Self {
        Self {
            doc: doc.clone(),
            steps: Vec::new(),
            mapping: Mapping::new(),
            selection,
            changed: Vec::new(),
        }
    }

    /// The tree with every step applied.
    pub fn doc(&self) -> &Node {
        &self.doc
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    pub fn set_selection(&mut self, selection: Range<usize>) {
        self.selection = selection;
    }

    pub fn changed(&self) -> &[Range<usize>] {
        &self.changed
    }

    pub fn doc_changed(&self) -> bool {
        !self.steps.is_empty()
    }

    pub fn into_parts(self) -> (Node, Range<usize>, Vec<Range<usize>>) {
        (self.doc, self.selection, self.changed)
    }

    /// Applies `step`. Steps that leave the tree as it was are not recorded.
    pub fn step(&mut self, step: Step) -> Result<&mut Self, EngineError> {
        if !step.apply_in_place(&mut self.doc)? {
            return Ok(self);
        }
        let map = step.get_map();
        self.selection = map.map(self.selection.start, Assoc::After)
            ..map.map(self.selection.end, Assoc::After);
        for range in &mut self.changed {
            *range = map.map(range.start, Assoc::Before)..map.map(range.end, Assoc::After);
        }
        self.changed.push(step.changed_range(&self.doc));
        self.mapping.push(map);
        self.steps.push(step);
        Ok(self)
    }

    /// Deletes `from..to`, splitting a range with one inline end and one
    /// end between blocks into steps that each keep the tree well formed.
    pub fn delete(&mut self, from: usize, to: usize) -> Result<&mut Self, EngineError> {
        if from >= to {
            return Ok(self);
        }
        match (resolve(&self.doc, from)?, resolve(&self.doc, to)?) {
            (ResolvedPos::Between { .. }, ResolvedPos::Inline { start, .. }) => {
                self.step(Step::Delete {
                    from: start + 1,
                    to,
                })?;
                self.step(Step::Delete { from, to: start })
            }
            (ResolvedPos::Inline { index, start, .. }, ResolvedPos::Between { .. }) => {
                let end = start + self.doc.content()[index].node_size();
                self.step(Step::Delete { from: end, to })?;
                self.step(Step::Delete { from, to: end - 1 })
            }
            _ => self.step(Step::Delete { from, to }),
        }
    }

    /// Replays `other`, which was built against this transaction's current
    /// tree, and adopts its selection.
    pub fn append(&mut self, other: Transaction) -> Result<&mut Self, EngineError> {
        let selection = other.selection.clone();
        for step in other.steps {
            self.step(step)?;
        }
        self.selection = selection;
        Ok(self)
    }
}
