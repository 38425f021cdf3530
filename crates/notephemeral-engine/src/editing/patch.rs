use std::ops::Range;

/// Result of applying a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Ranges touched by the edit and its correction, in the new tree's positions
    pub changed: Vec<Range<usize>>,
    pub new_selection: Range<usize>,
    pub version: u64,
    /// Whether normalization added corrective steps
    pub corrected: bool,
}
