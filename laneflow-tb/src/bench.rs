//! Testbench runner.

use laneflow::queue::I;
use laneflow::LaneQueue;
use tracing::{debug, trace};

use crate::config::TbConfig;
use crate::error::TbError;
use crate::scoreboard::Scoreboard;
use crate::traffic::Traffic;

/// Outcome of a passing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Traffic cycles, not counting the drain.
    pub cycles: usize,
    /// Cycles spent draining the queue afterwards.
    pub drain_cycles: usize,
    /// Admitted elements.
    pub enqueued: u64,
    /// Dequeued elements.
    pub dequeued: u64,
    /// Highest occupancy seen.
    pub peak_used: usize,
}

/// Runs one cycle: checks flow control against the pre-cycle occupancy, commits, and checks the
/// dequeued ids and the queue invariants.
fn cycle<Q: LaneQueue<u64, LANES>, const LANES: usize>(
    queue: &mut Q, scoreboard: &mut Scoreboard, cycle: usize, enq_valid: usize, deq_ready: usize,
) -> Result<(), TbError> {
    let used = queue.used();
    let free = queue.capacity() - used;
    let egress = queue.egress();

    if egress.enq_ready > free.min(LANES) {
        let what = format!("enq_ready {} exceeds free {} of {} lanes", egress.enq_ready, free, LANES);
        return Err(TbError::FlowControl { cycle, what });
    }
    if egress.deq_valid > used.min(LANES) {
        let what = format!("deq_valid {} exceeds used {} of {} lanes", egress.deq_valid, used, LANES);
        return Err(TbError::FlowControl { cycle, what });
    }

    let ids = scoreboard.offer::<LANES>(enq_valid);
    let transfer = queue.step(&I::new(egress.enq_lane0, &ids, deq_ready));
    trace!(cycle, enq = transfer.enq.count, deq = transfer.deq.count, used, "cycle");

    if transfer.enq.count != enq_valid.min(egress.enq_ready) || transfer.deq.count != deq_ready.min(egress.deq_valid) {
        let what = format!(
            "transferred {}/{} elements for offered {}/{} and ready/valid {}/{}",
            transfer.enq.count, transfer.deq.count, enq_valid, deq_ready, egress.enq_ready, egress.deq_valid
        );
        return Err(TbError::FlowControl { cycle, what });
    }

    scoreboard.admit(transfer.enq.count);
    scoreboard.retire(cycle, transfer.deq.gather(&egress.deq_data))?;
    queue.check().map_err(|source| TbError::Invariant { cycle, source })?;

    if queue.used() as u64 != scoreboard.outstanding() {
        let what = format!("queue holds {} elements, scoreboard expects {}", queue.used(), scoreboard.outstanding());
        return Err(TbError::FlowControl { cycle, what });
    }
    Ok(())
}

/// Drives `queue` with random traffic for `config.cycles` cycles, then drains it.
pub fn run<Q: LaneQueue<u64, LANES>, const LANES: usize>(queue: &mut Q, config: &TbConfig) -> Result<Summary, TbError> {
    config.validate()?;
    debug!(lanes = LANES, capacity = queue.capacity(), cycles = config.cycles, seed = config.seed, "run");

    let mut traffic = Traffic::<LANES>::new(config);
    let mut scoreboard = Scoreboard::default();
    let mut peak_used = queue.used();

    for n in 0..config.cycles {
        let draw = traffic.draw();
        cycle(queue, &mut scoreboard, n, draw.enq_valid, draw.deq_ready)?;
        peak_used = peak_used.max(queue.used());
    }

    // A queue accepting `LANES` per cycle empties within `capacity / LANES` cycles.
    let drain_limit = queue.capacity() / LANES + 1;
    let mut drain_cycles = 0;
    while queue.used() > 0 {
        if drain_cycles == drain_limit {
            let what = format!("{} elements left after {} drain cycles", queue.used(), drain_cycles);
            return Err(TbError::FlowControl { cycle: config.cycles + drain_cycles, what });
        }
        cycle(queue, &mut scoreboard, config.cycles + drain_cycles, 0, LANES)?;
        drain_cycles += 1;
    }

    Ok(Summary {
        cycles: config.cycles,
        drain_cycles,
        enqueued: scoreboard.enqueued(),
        dequeued: scoreboard.dequeued(),
        peak_used,
    })
}
