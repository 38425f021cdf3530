use crate::{error::EngineError, model::Node};

/// A document position resolved against a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedPos {
    /// Between two blocks; `index` is the block that follows.
    Between { pos: usize, index: usize },
    /// Inside block `index`, which starts at `start`, at char `offset` of
    /// its inline content.
    Inline {
        pos: usize,
        index: usize,
        start: usize,
        offset: usize,
    },
}

impl ResolvedPos {
    pub fn pos(&self) -> usize {
        match *self {
            ResolvedPos::Between { pos, .. } | ResolvedPos::Inline { pos, .. } => pos,
        }
    }

    pub fn index(&self) -> usize {
        match *self {
            ResolvedPos::Between { index, .. } | ResolvedPos::Inline { index, .. } => index,
        }
    }
}

/// Resolves `pos` against the blocks of `doc`.
pub fn resolve(doc: &Node, pos: usize) -> Result<ResolvedPos, EngineError> {
    let mut start = 0;
    for (index, block) in doc.content().iter().enumerate() {
        if pos == start {
            return Ok(ResolvedPos::Between { pos, index });
        }
        let end = start + block.node_size();
        if pos < end {
            return Ok(ResolvedPos::Inline {
                pos,
                index,
                start,
                offset: pos - start - 1,
            });
        }
        start = end;
    }
    if pos == start {
        Ok(ResolvedPos::Between {
            pos,
            index: doc.child_count(),
        })
    } else {
        Err(EngineError::unresolvable(pos, doc.content_size()))
    }
}

/// Position at the end of the last block's content, or 0 for an empty document.
pub fn end_of_content(doc: &Node) -> usize {
    match doc.content().len() {
        0 => 0,
        _ => doc.content_size() - 1,
    }
}
