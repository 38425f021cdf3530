//! Position mapping through edits.
//!
//! Every step reports the ranges it replaced as a [`StepMap`]. Mapping a
//! position through it shifts positions after the change and decides, via
//! [`Assoc`], on which side of an insertion a position ends up.

/// Which side of an insertion a mapped position sticks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Before,
    After,
}

/// `old_size` positions starting at `start` were replaced by `new_size` positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapRange {
    pub start: usize,
    pub old_size: usize,
    pub new_size: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepMap {
    ranges: Vec<MapRange>,
}

impl StepMap {
    /// A map for a step that moves nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn replace(start: usize, old_size: usize, new_size: usize) -> Self {
        Self {
            ranges: vec![MapRange {
                start,
                old_size,
                new_size,
            }],
        }
    }

    pub fn ranges(&self) -> &[MapRange] {
        &self.ranges
    }

    pub fn map(&self, pos: usize, assoc: Assoc) -> usize {
        let mut diff: isize = 0;
        for range in &self.ranges {
            if range.start > pos {
                break;
            }
            let end = range.start + range.old_size;
            if pos <= end {
                let side = if range.old_size == 0 {
                    assoc
                } else if pos == range.start {
                    Assoc::Before
                } else if pos == end {
                    Assoc::After
                } else {
                    assoc
                };
                let base = range.start.saturating_add_signed(diff);
                return match side {
                    Assoc::Before => base,
                    Assoc::After => base + range.new_size,
                };
            }
            diff += range.new_size as isize - range.old_size as isize;
        }
        pos.saturating_add_signed(diff)
    }
}

/// A chain of step maps, applied in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
    maps: Vec<StepMap>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, map: StepMap) {
        self.maps.push(map);
    }

    pub fn maps(&self) -> &[StepMap] {
        &self.maps
    }

    pub fn map(&self, pos: usize, assoc: Assoc) -> usize {
        self.maps.iter().fold(pos, |pos, map| map.map(pos, assoc))
    }
}
