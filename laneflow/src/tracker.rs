//! Index/flow-control engine of lane-positioned queues.
//!
//! The tracker owns the enqueue and dequeue cursors and the occupancy counters, but no payload.
//! Each cycle it admits `min(enq_valid, free, LANES)` elements and removes
//! `min(deq_ready, used, LANES)` elements. The `used` counter is authoritative: equal cursors are
//! ambiguous between an empty and a full queue.

use crate::cursor::Cursor;
use crate::error::*;
use crate::lane::LaneWindow;

/// Ingress signal of the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct I {
    /// Number of elements the producer offers.
    pub enq_valid: usize,
    /// Number of elements the consumer accepts.
    pub deq_ready: usize,
}

/// Egress signal of the tracker. Depends on the pre-cycle state only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct E {
    /// Number of elements the queue can admit, `min(free, LANES)`.
    pub enq_ready: usize,
    /// Number of elements the queue can supply, `min(used, LANES)`.
    pub deq_valid: usize,
    /// Physical lane where the producer places logical element 0.
    pub enq_lane0: usize,
    /// Physical lane holding logical dequeue element 0.
    pub deq_lane0: usize,
}

/// State of the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct S<const LANES: usize, const ROWS: usize> {
    /// Enqueue cursor.
    pub enq: Cursor<LANES, ROWS>,
    /// Dequeue cursor.
    pub deq: Cursor<LANES, ROWS>,
    /// Number of occupied positions.
    pub used: usize,
    /// Number of free positions.
    pub free: usize,
}

impl<const LANES: usize, const ROWS: usize> S<LANES, ROWS> {
    fn new() -> Self {
        Self { enq: Cursor::default(), deq: Cursor::default(), used: 0, free: Cursor::<LANES, ROWS>::CAPACITY }
    }

    /// Number of row boundaries between the dequeue row and the enqueue row, in `[0, ROWS]`.
    ///
    /// Derived from `used`, so a full queue yields `ROWS` rather than 0.
    #[inline]
    pub fn rows_ahead(&self) -> usize { (self.deq.lane + self.used) / LANES }
}

/// Lanes admitted on both sides in one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Transfer<const LANES: usize> {
    /// Enqueue window.
    pub enq: LaneWindow<LANES>,
    /// Dequeue window.
    pub deq: LaneWindow<LANES>,
}

impl<const LANES: usize> Transfer<LANES> {
    /// Signed change of occupancy.
    #[inline]
    pub fn delta(&self) -> isize { self.enq.count as isize - self.deq.count as isize }
}

/// Index/flow-control engine.
#[derive(Debug, Clone)]
pub struct Tracker<const LANES: usize, const ROWS: usize> {
    state: S<LANES, ROWS>,
}

impl<const LANES: usize, const ROWS: usize> Tracker<LANES, ROWS> {
    /// Number of element positions.
    pub const CAPACITY: usize = LANES * ROWS;

    /// Creates an empty tracker.
    pub fn new() -> Result<Self, ConfigError> {
        if LANES < 1 {
            return Err(ConfigError::ZeroLanes);
        }
        if ROWS < 1 {
            return Err(ConfigError::ZeroRows);
        }
        Ok(Self { state: S::new() })
    }

    #[cfg(test)]
    fn from_state(state: S<LANES, ROWS>) -> Self { Self { state } }

    /// Returns the current state.
    #[inline]
    pub fn state(&self) -> &S<LANES, ROWS> { &self.state }

    /// Returns the number of element positions.
    #[inline]
    pub fn capacity(&self) -> usize { Self::CAPACITY }

    /// Returns the ready/valid counts and lane offsets of this cycle.
    pub fn egress(&self) -> E {
        E {
            enq_ready: self.state.free.min(LANES),
            deq_valid: self.state.used.min(LANES),
            enq_lane0: self.state.enq.lane,
            deq_lane0: self.state.deq.lane,
        }
    }

    /// Returns the lanes admitted on both sides for `input`.
    pub fn transfer(&self, input: &I) -> Transfer<LANES> {
        let egress = self.egress();
        Transfer {
            enq: self.state.enq.window(input.enq_valid.min(egress.enq_ready)),
            deq: self.state.deq.window(input.deq_ready.min(egress.deq_valid)),
        }
    }

    /// Computes this cycle's transfer and the next state from the current state.
    pub fn comb(&self, input: &I) -> (Transfer<LANES>, S<LANES, ROWS>) {
        let transfer = self.transfer(input);
        let (enq, _) = self.state.enq.advance(transfer.enq.count);
        let (deq, _) = self.state.deq.advance(transfer.deq.count);

        // `deq.count <= used` and `enq.count <= free`, so neither counter leaves its range.
        let used = self.state.used + transfer.enq.count - transfer.deq.count;
        let free = self.state.free + transfer.deq.count - transfer.enq.count;

        (transfer, S { enq, deq, used, free })
    }

    /// Commits one cycle.
    pub fn step(&mut self, input: &I) -> Transfer<LANES> {
        let (transfer, state_next) = self.comb(input);
        self.state = state_next;
        debug_assert_eq!(self.check(), Ok(()));
        transfer
    }

    /// Checks the occupancy and positional invariants.
    pub fn check(&self) -> Result<(), InvariantError> {
        let S { enq, deq, used, free } = self.state;
        if used + free != Self::CAPACITY {
            return Err(InvariantError::Capacity { used, free, capacity: Self::CAPACITY });
        }

        let distance = deq.distance_to(&enq);
        if used != distance && !(distance == 0 && used == Self::CAPACITY) {
            return Err(InvariantError::Position { used, distance, capacity: Self::CAPACITY });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn io(enq_valid: usize, deq_ready: usize) -> I { I { enq_valid, deq_ready } }

    #[test]
    fn rejects_empty_geometry() {
        assert_eq!(Tracker::<0, 8>::new().unwrap_err(), ConfigError::ZeroLanes);
        assert_eq!(Tracker::<4, 0>::new().unwrap_err(), ConfigError::ZeroRows);
        assert!(Tracker::<1, 1>::new().is_ok());
    }

    #[test]
    fn first_row_admitted() {
        let mut tracker = Tracker::<4, 8>::new().unwrap();
        assert_eq!(tracker.egress(), E { enq_ready: 4, deq_valid: 0, enq_lane0: 0, deq_lane0: 0 });

        let transfer = tracker.step(&io(4, 0));
        assert_eq!(transfer.enq, LaneWindow::new(0, 4));
        assert_eq!(transfer.deq.count, 0);
        assert_eq!(tracker.state().used, 4);
        assert_eq!(tracker.state().free, 28);
        assert_eq!(tracker.state().enq, Cursor { row: 1, lane: 0 });
    }

    #[test]
    fn saturated_queue_refuses() {
        let mut tracker = Tracker::<3, 2>::new().unwrap();
        tracker.step(&io(2, 0));
        tracker.step(&io(3, 0));
        tracker.step(&io(3, 0));
        assert_eq!(tracker.state().used, 6);
        assert_eq!(tracker.egress().enq_ready, 0);
        assert_eq!(tracker.state().enq, tracker.state().deq);

        let transfer = tracker.step(&io(3, 0));
        assert_eq!(transfer.enq.count, 0);
        assert_eq!(tracker.state().used, 6);
        assert_eq!(tracker.check(), Ok(()));

        // Freeing space re-opens the enqueue side.
        tracker.step(&io(0, 2));
        assert_eq!(tracker.egress().enq_ready, 2);
        assert_eq!(tracker.egress().deq_valid, 3);
    }

    #[test]
    fn admission_is_clamped() {
        let mut tracker = Tracker::<4, 2>::new().unwrap();
        tracker.step(&io(3, 0));
        let transfer = tracker.transfer(&io(9, 9));
        assert_eq!(transfer.enq, LaneWindow::new(3, 4));
        assert_eq!(transfer.deq, LaneWindow::new(0, 3));
        assert_eq!(transfer.delta(), 1);
    }

    #[test]
    fn idle_cycles_change_nothing() {
        let mut tracker = Tracker::<5, 3>::new().unwrap();
        tracker.step(&io(4, 0));
        tracker.step(&io(5, 2));
        let before = *tracker.state();
        for _ in 0..100 {
            let transfer = tracker.step(&io(0, 0));
            assert_eq!(transfer, Transfer { enq: LaneWindow::new(before.enq.lane, 0), deq: LaneWindow::new(before.deq.lane, 0) });
        }
        assert_eq!(*tracker.state(), before);
    }

    #[test]
    fn comb_does_not_commit() {
        let tracker = Tracker::<4, 4>::new().unwrap();
        let (_, next) = tracker.comb(&io(4, 0));
        assert_eq!(next.used, 4);
        assert_eq!(tracker.state().used, 0);
    }

    #[test]
    fn rows_ahead_of_full_queue() {
        let mut tracker = Tracker::<2, 4>::new().unwrap();
        tracker.step(&io(1, 0));
        tracker.step(&io(0, 1));
        for _ in 0..4 {
            tracker.step(&io(2, 0));
        }
        assert_eq!(tracker.state().used, 8);
        assert_eq!(tracker.state().rows_ahead(), 4);
    }

    #[test]
    fn check_rejects_unbalanced_occupancy() {
        let state = S::<4, 8> { enq: Cursor { row: 3, lane: 1 }, deq: Cursor { row: 1, lane: 0 }, used: 9, free: 22 };
        assert_eq!(Tracker::from_state(state).check(), Err(InvariantError::Capacity { used: 9, free: 22, capacity: 32 }));
    }

    #[test]
    fn check_rejects_cursor_disagreement() {
        let cursor = Cursor { row: 5, lane: 2 };
        let state = S::<4, 8> { enq: cursor, deq: cursor, used: 12, free: 20 };
        assert_eq!(Tracker::from_state(state).check(), Err(InvariantError::Position { used: 12, distance: 0, capacity: 32 }));

        let state = S::<4, 8> { enq: Cursor { row: 6, lane: 0 }, deq: cursor, used: 5, free: 27 };
        assert_eq!(Tracker::from_state(state).check(), Err(InvariantError::Position { used: 5, distance: 2, capacity: 32 }));
    }

    #[test]
    fn check_accepts_equal_cursors_when_empty_or_full() {
        let cursor = Cursor { row: 5, lane: 2 };
        let full = S::<4, 8> { enq: cursor, deq: cursor, used: 32, free: 0 };
        assert_eq!(Tracker::from_state(full).check(), Ok(()));

        let empty = S::<4, 8> { enq: cursor, deq: cursor, used: 0, free: 32 };
        assert_eq!(Tracker::from_state(empty).check(), Ok(()));
    }

    #[test]
    fn random_traffic_keeps_invariants() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut tracker = Tracker::<5, 6>::new().unwrap();
        for _ in 0..10_000 {
            let before = *tracker.state();
            let egress = tracker.egress();
            let transfer = tracker.step(&io(rng.gen_range(0..=5), rng.gen_range(0..=5)));

            assert!(egress.enq_ready <= before.free.min(5));
            assert!(egress.deq_valid <= before.used.min(5));
            assert!(transfer.enq.count <= egress.enq_ready);
            assert!(transfer.deq.count <= egress.deq_valid);
            assert_eq!(tracker.state().used as isize, before.used as isize + transfer.delta());
            assert_eq!(tracker.check(), Ok(()));
        }
    }
}
