//! Lane-positioned queue on a single read/write memory port.
//!
//! Rows are grouped into pairs: the memory has `ROWS / 2` words, each holding the even and the odd
//! row of a pair side by side. Two sets of [`SIDE_ROWS`] row slots sit around the memory:
//!
//! - enqueue rows, written directly by the producer. A pair is written to memory once its odd row
//!   is complete.
//! - dequeue rows, read directly by the consumer. They hold the current and the next dequeue pair.
//!   Each time the consumer leaves a pair, the pair after the next one is fetched into the freed
//!   slots, from memory if it is far enough behind the producer and from the enqueue rows
//!   otherwise.
//!
//! Enqueued lanes whose pair is already held by the dequeue rows are mirrored there in the same
//! cycle, so a freshly enqueued element can leave before it ever reaches the memory.
//!
//! Both slot sets are indexed by free-running slot counters that advance with their row cursors,
//! so the same row occupies the same slot index on both sides.

use itertools::izip;
use static_assertions::*;
use tracing::debug;

use crate::error::*;
use crate::memory::*;
use crate::queue::{self, LaneQueue};
use crate::tracker::{self, Tracker, Transfer};
use crate::utils::*;

/// Row slots of each side buffer.
pub const SIDE_ROWS: usize = 4;

/// Minimum number of rows. With fewer than `2 * SIDE_ROWS` rows the pair being fetched and the pair
/// being written could share a memory word.
pub const MIN_ROWS: usize = 8;

const_assert!(SIDE_ROWS.is_power_of_two());
const_assert!(MIN_ROWS >= 2 * SIDE_ROWS);

/// One memory word: the even and the odd row of a pair.
pub type Word<T, const LANES: usize> = [[T; LANES]; 2];

/// Side buffer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct S<T, const LANES: usize> {
    /// Enqueue row slots.
    pub enq_rows: [[T; LANES]; SIDE_ROWS],
    /// Dequeue row slots.
    pub deq_rows: [[T; LANES]; SIDE_ROWS],
    /// Slot of the enqueue row cursor.
    pub enq_slot: usize,
    /// Slot of the dequeue row cursor.
    pub deq_slot: usize,
    /// Completed row pair waiting for the memory port.
    pub pending_write: Option<usize>,
}

impl<T: Copy + Default, const LANES: usize> S<T, LANES> {
    fn new() -> Self {
        Self {
            enq_rows: [[T::default(); LANES]; SIDE_ROWS],
            deq_rows: [[T::default(); LANES]; SIDE_ROWS],
            enq_slot: 0,
            deq_slot: 0,
            pending_write: None,
        }
    }
}

/// Lane-positioned queue on a single read/write memory port.
#[derive(Debug, Clone)]
pub struct OneRwQueue<T, const LANES: usize, const ROWS: usize> {
    tracker: Tracker<LANES, ROWS>,
    state: S<T, LANES>,
    ram: OnePortRam<Word<T, LANES>>,
}

assert_impl_all!(OneRwQueue<u64, 4, 8>: Clone, Send, Sync);

impl<T: Copy + Default, const LANES: usize, const ROWS: usize> OneRwQueue<T, LANES, ROWS> {
    /// Number of element positions.
    pub const CAPACITY: usize = LANES * ROWS;

    /// Number of row pairs, i.e. memory words.
    pub const PAIRS: usize = ROWS / 2;

    /// Creates an empty queue.
    pub fn new() -> Result<Self, ConfigError> {
        let tracker = Tracker::new()?;
        if ROWS < MIN_ROWS {
            return Err(ConfigError::TooFewRows { rows: ROWS, min: MIN_ROWS });
        }
        if ROWS % 2 != 0 {
            return Err(ConfigError::OddRows { rows: ROWS });
        }

        debug!(lanes = LANES, rows = ROWS, words = Self::PAIRS, used_bits = clog2(Self::CAPACITY + 1), "one-port queue");
        Ok(Self { tracker, state: S::new(), ram: OnePortRam::new(Self::PAIRS, [[T::default(); LANES]; 2]) })
    }

    /// Returns the index/flow-control engine.
    #[inline]
    pub fn tracker(&self) -> &Tracker<LANES, ROWS> { &self.tracker }

    /// Returns the side buffer state.
    #[inline]
    pub fn state(&self) -> &S<T, LANES> { &self.state }

    /// Returns the backing memory.
    #[inline]
    pub fn ram(&self) -> &OnePortRam<Word<T, LANES>> { &self.ram }

    /// Returns the memory port activity counters.
    #[inline]
    pub fn port_stats(&self) -> &PortStats { self.ram.stats() }

    /// Returns the completed row pair waiting for the memory port.
    #[inline]
    pub fn pending_write(&self) -> Option<usize> { self.state.pending_write }

    /// Returns the current-cycle egress signal.
    pub fn egress(&self) -> queue::E<T, LANES> {
        let egress = self.tracker.egress();
        let row = &self.state.deq_rows[self.state.deq_slot];
        let row_next = &self.state.deq_rows[add_mod(self.state.deq_slot, 1, SIDE_ROWS)];

        // Lanes below the dequeue offset have wrapped into the next row.
        let mut deq_data = [T::default(); LANES];
        for (lane, (data, current, next)) in izip!(deq_data.iter_mut(), row, row_next).enumerate() {
            *data = if lane >= egress.deq_lane0 { *current } else { *next };
        }

        queue::E {
            enq_ready: egress.enq_ready,
            deq_valid: egress.deq_valid,
            enq_lane0: egress.enq_lane0,
            deq_lane0: egress.deq_lane0,
            deq_data,
        }
    }

    /// Commits one cycle.
    pub fn step(&mut self, input: &queue::I<T, LANES>) -> Transfer<LANES> {
        let tracker_input = tracker::I { enq_valid: input.enq_valid, deq_ready: input.deq_ready };
        let transfer = self.tracker.transfer(&tracker_input);
        let pre = *self.tracker.state();
        let S { enq_rows, deq_rows, enq_slot, deq_slot, pending_write } = self.state;

        // Pair distance from the dequeue pair to the pair holding the row `rows` rows after the
        // dequeue row. Rows are counted without wrapping, so a full queue is `PAIRS` away.
        let pairs_ahead = |rows: usize| ((pre.deq.row + rows) >> 1) - (pre.deq.row >> 1);
        let rows_ahead = pre.rows_ahead();
        debug_assert_eq!((deq_slot + rows_ahead) % SIDE_ROWS, enq_slot);

        let enq_push = transfer.enq.wraps() && pre.enq.row & 1 == 1;
        let deq_push = transfer.deq.wraps() && pre.deq.row & 1 == 1;
        let enq_base = sub_mod(enq_slot, pre.enq.row & 1, SIDE_ROWS);
        let deq_base = sub_mod(deq_slot, pre.deq.row & 1, SIDE_ROWS);

        // Distance from the dequeue pair after this cycle to the enqueue pair. Pairs up to two ahead
        // may not have reached the memory yet.
        let fetch_gap = pairs_ahead(rows_ahead).saturating_sub(1);
        let fetch = deq_push.then(|| add_mod(pre.deq.row >> 1, 2, Self::PAIRS));
        let read = fetch.filter(|_| fetch_gap > 2);

        // The pending pair is the one before the enqueue pair, in slots `enq_base + 2..`.
        debug_assert!(pending_write.map_or(true, |pair| pair == sub_mod(pre.enq.row >> 1, 1, Self::PAIRS)));
        let write = pending_write
            .map(|pair| (pair, [enq_rows[add_mod(enq_base, 2, SIDE_ROWS)], enq_rows[add_mod(enq_base, 3, SIDE_ROWS)]]));

        let access = self.ram.cycle(read, write);

        let mut pending_next = if access.is_write() { None } else { pending_write };
        if enq_push {
            debug_assert!(pending_next.is_none(), "row pair {:?} still waiting for the memory port", pending_next);
            pending_next = Some(pre.enq.row >> 1);
        }

        let mut enq_rows_next = enq_rows;
        let mut deq_rows_next = deq_rows;

        // Refills the freed dequeue pair.
        if let Some(pair) = fetch {
            let word = match (access.into_read(), fetch_gap) {
                (Some(word), _) => Some(word),
                (None, 1 | 2) => {
                    let src = add_mod(enq_base, 2 * (fetch_gap - 1), SIDE_ROWS);
                    Some([enq_rows[src], enq_rows[add_mod(src, 1, SIDE_ROWS)]])
                }
                // Nothing of the pair is enqueued yet.
                (None, _) => None,
            };
            debug!(pair, fetch_gap, from_ram = read.is_some(), "fetch");

            if let Some([even, odd]) = word {
                deq_rows_next[deq_base] = even;
                deq_rows_next[add_mod(deq_base, 1, SIDE_ROWS)] = odd;
            }
        }

        // Writes the admitted lanes, and mirrors them if their pair is held by the dequeue rows
        // after this cycle.
        let held = 1 + usize::from(deq_push);
        for (lane, (admitted, data)) in izip!(transfer.enq.mask(), input.enq_data).enumerate() {
            if !admitted {
                continue;
            }
            let next_row = usize::from(transfer.enq.in_next_row(lane));
            let slot = add_mod(enq_slot, next_row, SIDE_ROWS);
            enq_rows_next[slot][lane] = data;
            if pairs_ahead(rows_ahead + next_row) <= held {
                deq_rows_next[slot][lane] = data;
            }
        }

        self.state = S {
            enq_rows: enq_rows_next,
            deq_rows: deq_rows_next,
            enq_slot: add_mod(enq_slot, usize::from(transfer.enq.wraps()), SIDE_ROWS),
            deq_slot: add_mod(deq_slot, usize::from(transfer.deq.wraps()), SIDE_ROWS),
            pending_write: pending_next,
        };

        let committed = self.tracker.step(&tracker_input);
        debug_assert_eq!(committed, transfer);
        transfer
    }
}

impl<T: Copy + Default, const LANES: usize, const ROWS: usize> LaneQueue<T, LANES> for OneRwQueue<T, LANES, ROWS> {
    fn egress(&self) -> queue::E<T, LANES> { OneRwQueue::egress(self) }

    fn step(&mut self, input: &queue::I<T, LANES>) -> Transfer<LANES> { OneRwQueue::step(self, input) }

    fn used(&self) -> usize { self.tracker.state().used }

    fn capacity(&self) -> usize { Self::CAPACITY }

    fn check(&self) -> Result<(), InvariantError> { self.tracker.check() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::I;

    type Queue = OneRwQueue<u32, 4, 8>;

    fn enq(queue: &mut Queue, items: &[u32]) -> usize {
        let lane0 = queue.egress().enq_lane0;
        queue.step(&I::new(lane0, items, 0)).enq.count
    }

    fn deq(queue: &mut Queue, count: usize) -> Vec<u32> {
        let egress = queue.egress();
        let transfer = queue.step(&I { deq_ready: count, ..I::idle() });
        transfer.deq.gather(&egress.deq_data).to_vec()
    }

    #[test]
    fn rejects_geometry() {
        assert_eq!(OneRwQueue::<u32, 4, 6>::new().unwrap_err(), ConfigError::TooFewRows { rows: 6, min: 8 });
        assert_eq!(OneRwQueue::<u32, 4, 9>::new().unwrap_err(), ConfigError::OddRows { rows: 9 });
        assert_eq!(OneRwQueue::<u32, 0, 8>::new().unwrap_err(), ConfigError::ZeroLanes);
        assert_eq!(OneRwQueue::<u32, 2, 0>::new().unwrap_err(), ConfigError::ZeroRows);
        assert!(OneRwQueue::<u32, 3, 10>::new().is_ok());
    }

    #[test]
    fn first_row_admitted() {
        let mut queue = Queue::new().unwrap();
        assert_eq!(queue.egress().enq_ready, 4);
        assert_eq!(enq(&mut queue, &[0, 1, 2, 3]), 4);
        assert_eq!(queue.tracker().state().used, 4);
        assert_eq!(queue.tracker().state().free, 28);
    }

    #[test]
    fn fresh_pair_served_before_memory_write() {
        let mut queue = Queue::new().unwrap();
        enq(&mut queue, &[0, 1, 2, 3]);
        enq(&mut queue, &[4, 5, 6, 7]);

        // The pair is complete and waiting for the port, nothing was written yet.
        assert_eq!(queue.pending_write(), Some(0));
        assert_eq!(queue.port_stats().writes, 0);

        assert_eq!(deq(&mut queue, 4), vec![0, 1, 2, 3]);
        assert_eq!(queue.port_stats().reads, 0);
        assert_eq!(queue.port_stats().writes, 1);
        assert_eq!(deq(&mut queue, 4), vec![4, 5, 6, 7]);
        assert_eq!(queue.tracker().state().used, 0);
    }

    #[test]
    fn unaligned_lanes_wrap_rows() {
        let mut queue = Queue::new().unwrap();
        enq(&mut queue, &[0, 1, 2]);
        assert_eq!(deq(&mut queue, 2), vec![0, 1]);
        enq(&mut queue, &[3, 4, 5, 6]);
        enq(&mut queue, &[7, 8]);

        let egress = queue.egress();
        assert_eq!(egress.deq_lane0, 2);
        assert_eq!(egress.deq_valid, 4);
        assert_eq!(deq(&mut queue, 4), vec![2, 3, 4, 5]);
        assert_eq!(deq(&mut queue, 4), vec![6, 7, 8]);
    }

    #[test]
    fn saturated_queue_refuses_until_dequeue() {
        let mut queue = Queue::new().unwrap();
        for row in 0..8 {
            let items = (row * 4..row * 4 + 4).collect::<Vec<_>>();
            assert_eq!(enq(&mut queue, &items), 4);
        }
        assert_eq!(queue.egress().enq_ready, 0);
        assert_eq!(enq(&mut queue, &[100]), 0);

        assert_eq!(deq(&mut queue, 1), vec![0]);
        assert_eq!(queue.egress().enq_ready, 1);

        // Drains through the memory.
        let mut drained = vec![];
        while queue.tracker().state().used > 0 {
            drained.extend(deq(&mut queue, 4));
        }
        assert_eq!(drained, (1..32).collect::<Vec<_>>());
        assert!(queue.port_stats().reads > 0);
    }

    #[test]
    fn read_defers_write() {
        let mut queue = Queue::new().unwrap();
        let mut next_in = 0;
        let mut next_out = 0;

        // Fill seven rows, then run at full rate on both sides: every dequeue pair crossing
        // reads the memory in the cycle after the enqueue side completed a pair.
        for _ in 0..7 {
            let items = (next_in..next_in + 4).collect::<Vec<_>>();
            next_in += enq(&mut queue, &items) as u32;
        }
        for _ in 0..40 {
            let egress = queue.egress();
            let items = (next_in..next_in + 4).collect::<Vec<_>>();
            let transfer = queue.step(&I::new(egress.enq_lane0, &items, 4));
            next_in += transfer.enq.count as u32;
            for value in transfer.deq.gather(&egress.deq_data) {
                assert_eq!(value, next_out);
                next_out += 1;
            }
        }

        assert_eq!(next_out, 160);
        assert!(queue.port_stats().deferred_writes > 0);
        assert_eq!(queue.check(), Ok(()));
    }

    #[test]
    fn idle_cycles_keep_contents() {
        let mut queue = Queue::new().unwrap();
        for row in 0..6 {
            enq(&mut queue, &[row * 4, row * 4 + 1, row * 4 + 2, row * 4 + 3]);
        }
        assert_eq!(deq(&mut queue, 3), vec![0, 1, 2]);

        let tracker = *queue.tracker().state();
        let egress = queue.egress();
        for _ in 0..50 {
            queue.step(&I::idle());
        }
        assert_eq!(*queue.tracker().state(), tracker);
        assert_eq!(queue.egress(), egress);
        assert_eq!(queue.pending_write(), None);
    }
}
