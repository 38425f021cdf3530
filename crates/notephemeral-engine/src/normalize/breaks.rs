use crate::{
    editing::{Step, Transaction},
    error::EngineError,
    model::Node,
};

/// Deletes every hard break that directly follows another one.
pub fn coalesce(tr: &mut Transaction) -> Result<(), EngineError> {
    let mut redundant = Vec::new();
    let mut start = 0;
    for block in tr.doc().content() {
        let mut pos = start + 1;
        let mut prev_break = false;
        for node in block.content() {
            let is_break = *node == Node::HardBreak;
            if is_break && prev_break {
                redundant.push(pos);
            }
            prev_break = is_break;
            pos += node.node_size();
        }
        start += block.node_size();
    }
    // Back to front so earlier positions stay valid.
    for at in redundant.into_iter().rev() {
        tr.step(Step::Delete { from: at, to: at + 1 })?;
    }
    Ok(())
}
