//! Row/lane cursors.

use crate::lane::LaneWindow;
use crate::utils::*;

/// Position of one side of a lane-positioned queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor<const LANES: usize, const ROWS: usize> {
    /// Row, in `[0, ROWS)`.
    pub row: usize,
    /// Lane, in `[0, LANES)`.
    pub lane: usize,
}

impl<const LANES: usize, const ROWS: usize> Cursor<LANES, ROWS> {
    /// Number of element positions.
    pub const CAPACITY: usize = LANES * ROWS;

    /// Linearized position `row * LANES + lane`.
    #[inline]
    pub fn linear(&self) -> usize { self.row * LANES + self.lane }

    /// Window of `count` lanes starting at this cursor.
    #[inline]
    pub fn window(&self, count: usize) -> LaneWindow<LANES> { LaneWindow::new(self.lane, count) }

    /// Advances by `count <= LANES` lanes. Returns the next cursor and whether the lane cursor wrapped.
    pub fn advance(&self, count: usize) -> (Self, bool) {
        let window = self.window(count);
        let wrap = window.wraps();
        let row = if wrap { add_mod(self.row, 1, ROWS) } else { self.row };
        (Self { row, lane: window.next_offset() }, wrap)
    }

    /// Circular distance in elements from `self` forward to `other`.
    ///
    /// A distance of 0 is ambiguous between an empty and a full queue.
    #[inline]
    pub fn distance_to(&self, other: &Self) -> usize { sub_mod(other.linear(), self.linear(), Self::CAPACITY) }
}
