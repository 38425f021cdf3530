use crate::model::NodeKind;

/// Errors raised by the engine.
///
/// `UnknownNodeKind` is a defect signal: a correctly normalized tree never
/// produces it. `UnresolvablePosition` is recoverable; the editing session
/// drops the offending command or correction and keeps going.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("unexpected {0} node at the top level of the document")]
    UnknownNodeKind(NodeKind),
    #[error("position {pos} cannot be resolved in a document of content size {size}")]
    UnresolvablePosition { pos: usize, size: usize },
    #[error("{found} is not allowed inside {parent}")]
    InvalidContent { parent: NodeKind, found: NodeKind },
}

impl EngineError {
    pub(crate) fn unresolvable(pos: usize, size: usize) -> Self {
        EngineError::UnresolvablePosition { pos, size }
    }
}
