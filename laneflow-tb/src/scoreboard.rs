//! Scoreboard of element ids.

use arrayvec::ArrayVec;
use itertools::izip;

use crate::error::TbError;

/// Tags offered elements with strictly increasing ids and checks that they leave in order.
#[derive(Debug, Clone, Default)]
pub struct Scoreboard {
    enqueued: u64,
    dequeued: u64,
}

impl Scoreboard {
    /// Ids of the next `count` elements to offer. Only admitted ones are consumed.
    pub fn offer<const LANES: usize>(&self, count: usize) -> ArrayVec<u64, LANES> {
        (self.enqueued..).take(count.min(LANES)).collect()
    }

    /// Records `count` admitted elements.
    pub fn admit(&mut self, count: usize) { self.enqueued += count as u64; }

    /// Checks dequeued ids, in logical order.
    pub fn retire(&mut self, cycle: usize, ids: impl IntoIterator<Item = u64>) -> Result<(), TbError> {
        for (expected, found) in izip!(self.dequeued.., ids) {
            if found != expected {
                return Err(TbError::Mismatch { cycle, expected, found });
            }
            self.dequeued = expected + 1;
        }
        Ok(())
    }

    /// Number of admitted elements.
    pub fn enqueued(&self) -> u64 { self.enqueued }

    /// Number of dequeued elements.
    pub fn dequeued(&self) -> u64 { self.dequeued }

    /// Number of elements inside the queue.
    pub fn outstanding(&self) -> u64 { self.enqueued - self.dequeued }
}
