//! Common interface of lane-positioned queues.

use crate::error::InvariantError;
use crate::tracker::Transfer;
use crate::utils::*;

/// Ingress signal of a lane-positioned queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct I<T, const LANES: usize> {
    /// Number of elements the producer offers.
    pub enq_valid: usize,
    /// Offered elements, logical element 0 on lane `enq_lane0`.
    pub enq_data: [T; LANES],
    /// Number of elements the consumer accepts.
    pub deq_ready: usize,
}

impl<T: Copy + Default, const LANES: usize> I<T, LANES> {
    /// No transfer on either side.
    pub fn idle() -> Self { Self { enq_valid: 0, enq_data: [T::default(); LANES], deq_ready: 0 } }

    /// Offers `items` packed from `enq_lane0` and accepts `deq_ready` elements.
    pub fn new(enq_lane0: usize, items: &[T], deq_ready: usize) -> Self {
        Self { enq_valid: items.len().min(LANES), enq_data: pack(enq_lane0, items), deq_ready }
    }
}

/// Egress signal of a lane-positioned queue. Depends on the pre-cycle state only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct E<T, const LANES: usize> {
    /// Number of elements the queue can admit.
    pub enq_ready: usize,
    /// Number of elements the queue can supply.
    pub deq_valid: usize,
    /// Physical lane where the producer places logical element 0.
    pub enq_lane0: usize,
    /// Physical lane holding logical dequeue element 0.
    pub deq_lane0: usize,
    /// Dequeue data. Lanes outside the `deq_valid` window carry no meaning.
    pub deq_data: [T; LANES],
}

/// Lane-positioned queue, evaluated once per cycle.
pub trait LaneQueue<T, const LANES: usize> {
    /// Returns the current-cycle egress signal.
    fn egress(&self) -> E<T, LANES>;

    /// Commits one cycle and returns the lanes transferred on both sides.
    fn step(&mut self, input: &I<T, LANES>) -> Transfer<LANES>;

    /// Number of occupied positions.
    fn used(&self) -> usize;

    /// Number of element positions.
    fn capacity(&self) -> usize;

    /// Checks the internal invariants.
    fn check(&self) -> Result<(), InvariantError>;
}
