use std::ops::Range;

use crate::{
    error::EngineError,
    model::{
        BlockType, Mark, MarkKind, Node, NodeKind,
        inline::{inline_size, map_marks, split_inline},
        mark::remove_kind,
    },
};

use super::{
    mapping::StepMap,
    position::{ResolvedPos, resolve},
};

/// One position-indexed edit. Applying a step never mutates the input
/// tree; it returns the edited copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Inserts inline nodes at an inline position.
    InsertInline { at: usize, content: Vec<Node> },
    /// Inserts whole blocks at a position between blocks.
    InsertBlocks { at: usize, blocks: Vec<Node> },
    /// Deletes `from..to`. Both ends must be inline (joining the blocks they
    /// fall in) or both between blocks (removing whole blocks).
    Delete { from: usize, to: usize },
    /// Splits the enclosing block at an inline position.
    Split { at: usize },
    /// Converts the block starting at `at`.
    SetBlockType { at: usize, block: BlockType },
    AddMark { from: usize, to: usize, mark: Mark },
    RemoveMark { from: usize, to: usize, kind: MarkKind },
}

impl Step {
    /// Returns the edited copy of `doc`.
    pub fn apply(&self, doc: &Node) -> Result<Node, EngineError> {
        let mut doc = doc.clone();
        self.apply_in_place(&mut doc)?;
        Ok(doc)
    }

    /// Edits `doc` directly and reports whether it changed. Only the
    /// touched blocks are rebuilt. On error `doc` is left as it was.
    pub fn apply_in_place(&self, doc: &mut Node) -> Result<bool, EngineError> {
        let size = doc.content_size();
        match self {
            Step::InsertInline { at, content } => {
                let (index, offset) = inline_target(doc, *at)?;
                let blocks = blocks_mut(doc)?;
                let block = &blocks[index];
                if let Some(bad) = content.iter().find(|n| !n.is_inline()) {
                    return Err(EngineError::InvalidContent {
                        parent: block.kind(),
                        found: bad.kind(),
                    });
                }
                let (head, tail) = split_inline(block.content(), offset);
                let joined = head.into_iter().chain(content.iter().cloned()).chain(tail);
                let edited = block.with_content(joined.collect());
                Ok(replace_block(blocks, index, edited))
            }
            Step::InsertBlocks { at, blocks: new } => {
                let index = match resolve(doc, *at)? {
                    ResolvedPos::Between { index, .. } => index,
                    ResolvedPos::Inline { index, .. } => {
                        return Err(EngineError::InvalidContent {
                            parent: doc.content()[index].kind(),
                            found: new.first().map_or(NodeKind::Paragraph, Node::kind),
                        });
                    }
                };
                if let Some(bad) = new.iter().find(|n| !n.is_textblock()) {
                    return Err(EngineError::InvalidContent {
                        parent: NodeKind::Doc,
                        found: bad.kind(),
                    });
                }
                blocks_mut(doc)?.splice(index..index, new.iter().cloned());
                Ok(!new.is_empty())
            }
            Step::Delete { from, to } => {
                if from > to {
                    return Err(EngineError::unresolvable(*from, size));
                }
                if from == to {
                    return Ok(false);
                }
                match (resolve(doc, *from)?, resolve(doc, *to)?) {
                    (
                        ResolvedPos::Inline {
                            index: a,
                            offset: head_end,
                            ..
                        },
                        ResolvedPos::Inline {
                            index: b,
                            offset: tail_start,
                            ..
                        },
                    ) => {
                        let blocks = blocks_mut(doc)?;
                        let (head, _) = split_inline(blocks[a].content(), head_end);
                        let (_, tail) = split_inline(blocks[b].content(), tail_start);
                        blocks[a] = blocks[a].with_content(head.into_iter().chain(tail).collect());
                        blocks.drain(a + 1..=b);
                    }
                    (ResolvedPos::Between { index: a, .. }, ResolvedPos::Between { index: b, .. }) => {
                        blocks_mut(doc)?.drain(a..b);
                    }
                    _ => return Err(EngineError::unresolvable(*to, size)),
                }
                Ok(true)
            }
            Step::Split { at } => {
                let (index, offset) = inline_target(doc, *at)?;
                let blocks = blocks_mut(doc)?;
                let block = &blocks[index];
                let (head, tail) = split_inline(block.content(), offset);
                let second = block.with_content(tail);
                blocks[index] = block.with_content(head);
                blocks.insert(index + 1, second);
                Ok(true)
            }
            Step::SetBlockType { at, block } => {
                let index = resolve(doc, *at)?.index();
                let blocks = blocks_mut(doc)?;
                let Some(target) = blocks.get(index) else {
                    return Err(EngineError::unresolvable(*at, size));
                };
                let converted = block.make(target.content().to_vec());
                Ok(replace_block(blocks, index, converted))
            }
            Step::AddMark { from, to, mark } => {
                remark(doc, *from..*to, |set| mark.add_to_set(set))
            }
            Step::RemoveMark { from, to, kind } => {
                remark(doc, *from..*to, |set| remove_kind(set, *kind))
            }
        }
    }

    /// How this step shifts positions.
    pub fn get_map(&self) -> StepMap {
        match self {
            Step::InsertInline { at, content } => StepMap::replace(*at, 0, inline_size(content)),
            Step::InsertBlocks { at, blocks } => StepMap::replace(*at, 0, inline_size(blocks)),
            Step::Delete { from, to } => StepMap::replace(*from, to.saturating_sub(*from), 0),
            Step::Split { at } => StepMap::replace(*at, 0, 2),
            Step::SetBlockType { .. } | Step::AddMark { .. } | Step::RemoveMark { .. } => {
                StepMap::empty()
            }
        }
    }

    /// The range this step touched, in the coordinates of `doc_after`.
    pub fn changed_range(&self, doc_after: &Node) -> Range<usize> {
        match self {
            Step::InsertInline { at, content } => *at..*at + inline_size(content),
            Step::InsertBlocks { at, blocks } => *at..*at + inline_size(blocks),
            Step::Delete { from, .. } => *from..*from,
            Step::Split { at } => *at..*at + 2,
            Step::SetBlockType { at, .. } => {
                let size = resolve(doc_after, *at)
                    .ok()
                    .and_then(|r| doc_after.child(r.index()))
                    .map_or(0, Node::node_size);
                *at..*at + size
            }
            Step::AddMark { from, to, .. } | Step::RemoveMark { from, to, .. } => *from..*to,
        }
    }
}

fn inline_target(doc: &Node, at: usize) -> Result<(usize, usize), EngineError> {
    match resolve(doc, at)? {
        ResolvedPos::Inline { index, offset, .. } => Ok((index, offset)),
        ResolvedPos::Between { .. } => Err(EngineError::InvalidContent {
            parent: NodeKind::Doc,
            found: NodeKind::Text,
        }),
    }
}

fn blocks_mut(doc: &mut Node) -> Result<&mut Vec<Node>, EngineError> {
    match doc {
        Node::Doc { content } => Ok(content),
        other => Err(EngineError::InvalidContent {
            parent: other.kind(),
            found: NodeKind::Paragraph,
        }),
    }
}

/// Swaps in `block` at `index`, reporting whether it differs.
fn replace_block(blocks: &mut [Node], index: usize, block: Node) -> bool {
    let changed = blocks[index] != block;
    blocks[index] = block;
    changed
}

/// Rewrites marks on every text run of every block overlapping `range`.
fn remark(
    doc: &mut Node,
    range: Range<usize>,
    f: impl Fn(&[Mark]) -> Vec<Mark>,
) -> Result<bool, EngineError> {
    let size = doc.content_size();
    if range.start > range.end || range.end > size {
        return Err(EngineError::unresolvable(range.end, size));
    }
    let mut changed = false;
    let mut start = 0;
    for block in blocks_mut(doc)?.iter_mut() {
        let content_start = start + 1;
        if content_start > range.end {
            break;
        }
        let content_end = content_start + block.content_size();
        start += block.node_size();
        let from = range.start.max(content_start);
        let to = range.end.min(content_end);
        if from < to {
            let content = map_marks(block.content(), from - content_start, to - content_start, &f);
            let remarked = block.with_content(content);
            changed |= *block != remarked;
            *block = remarked;
        }
    }
    Ok(changed)
}
