//! Lane windows.
//!
//! A window is the set of physical lanes taking part in one side's transfer in a cycle: `count`
//! lanes starting at `offset`, wrapping modulo `LANES`. Lanes at or above `offset` belong to the
//! cursor row; lanes below it have wrapped into the next row.

use arrayvec::ArrayVec;

use crate::utils::*;

/// Admitted lanes of one side in one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LaneWindow<const LANES: usize> {
    /// Physical lane of logical element 0.
    pub offset: usize,
    /// Number of admitted lanes.
    pub count: usize,
}

impl<const LANES: usize> LaneWindow<LANES> {
    /// Creates a new window.
    pub fn new(offset: usize, count: usize) -> Self {
        debug_assert!(offset < LANES && count <= LANES, "window ({}, {}) out of {} lanes", offset, count, LANES);
        Self { offset, count }
    }

    /// Logical index of the element carried by `lane`, counted from the window offset.
    #[inline]
    pub fn logical(&self, lane: usize) -> usize { sub_mod(lane, self.offset, LANES) }

    /// Returns whether `lane` takes part in the transfer.
    #[inline]
    pub fn contains(&self, lane: usize) -> bool { self.logical(lane) < self.count }

    /// Returns whether the lane cursor wraps, i.e. the row cursor advances.
    #[inline]
    pub fn wraps(&self) -> bool { self.offset + self.count >= LANES }

    /// Returns whether `lane` takes part in the transfer and lies in the row after the cursor row.
    #[inline]
    pub fn in_next_row(&self, lane: usize) -> bool { lane < self.offset && self.contains(lane) }

    /// Lane offset after the transfer.
    #[inline]
    pub fn next_offset(&self) -> usize { add_mod(self.offset, self.count, LANES) }

    /// Participating physical lanes, in logical order.
    pub fn lanes(&self) -> ArrayVec<usize, LANES> { (0..self.count).map(|i| add_mod(self.offset, i, LANES)).collect() }

    /// Per-lane participation.
    pub fn mask(&self) -> [bool; LANES] {
        let mut mask = [false; LANES];
        for lane in self.lanes() {
            mask[lane] = true;
        }
        mask
    }

    /// Gathers the participating values of physical lane data in logical order.
    pub fn gather<T: Copy>(&self, data: &[T; LANES]) -> ArrayVec<T, LANES> {
        self.lanes().into_iter().map(|lane| data[lane]).collect()
    }
}
