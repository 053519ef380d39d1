//! Random traffic.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::TbConfig;

/// Probability that a quiet run starts in a cycle, when bursts are enabled.
const QUIET_START: f64 = 0.02;

/// Offered and accepted counts of one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Draw {
    /// Number of elements the producer offers.
    pub enq_valid: usize,
    /// Number of elements the consumer accepts.
    pub deq_ready: usize,
}

/// Seeded generator of per-cycle offered/accepted counts in `[0, LANES]`.
#[derive(Debug, Clone)]
pub struct Traffic<const LANES: usize> {
    rng: StdRng,
    enq_idle: f64,
    deq_idle: f64,
    burst: Option<usize>,
    quiet: usize,
}

impl<const LANES: usize> Traffic<LANES> {
    /// Creates a generator. `config` must be valid.
    pub fn new(config: &TbConfig) -> Self {
        Self {
            rng: StdRng::seed_from_u64(config.seed),
            enq_idle: config.enq_idle,
            deq_idle: config.deq_idle,
            burst: config.burst,
            quiet: 0,
        }
    }

    /// Draws the counts of the next cycle. Both sides are drawn independently.
    pub fn draw(&mut self) -> Draw {
        if self.quiet > 0 {
            self.quiet -= 1;
            return Draw::default();
        }
        if let Some(longest) = self.burst.filter(|longest| *longest > 0) {
            if self.rng.gen_bool(QUIET_START) {
                self.quiet = self.rng.gen_range(1..=longest) - 1;
                return Draw::default();
            }
        }

        let enq_valid = self.count(self.enq_idle);
        let deq_ready = self.count(self.deq_idle);
        Draw { enq_valid, deq_ready }
    }

    fn count(&mut self, idle: f64) -> usize {
        if self.rng.gen_bool(idle) {
            0
        } else {
            self.rng.gen_range(0..=LANES)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_within_lanes() {
        let mut traffic = Traffic::<3>::new(&TbConfig { enq_idle: 0.0, deq_idle: 0.0, ..TbConfig::default() });
        let draws = (0..1_000).map(|_| traffic.draw()).collect::<Vec<_>>();
        assert!(draws.iter().all(|draw| draw.enq_valid <= 3 && draw.deq_ready <= 3));
        assert!(draws.iter().any(|draw| draw.enq_valid == 3));
        assert!(draws.iter().any(|draw| draw.deq_ready == 0));
    }

    #[test]
    fn same_seed_same_traffic() {
        let config = TbConfig { seed: 42, burst: Some(8), ..TbConfig::default() };
        let mut a = Traffic::<4>::new(&config);
        let mut b = Traffic::<4>::new(&config);
        for _ in 0..500 {
            assert_eq!(a.draw(), b.draw());
        }
    }

    #[test]
    fn bursts_go_quiet() {
        let mut traffic = Traffic::<4>::new(&TbConfig { enq_idle: 0.0, deq_idle: 0.0, burst: Some(20), ..TbConfig::default() });
        let mut longest = 0;
        let mut run = 0;
        for _ in 0..10_000 {
            if traffic.draw() == Draw::default() {
                run += 1;
                longest = longest.max(run);
            } else {
                run = 0;
            }
        }
        assert!(longest >= 5);
    }

    #[test]
    fn always_idle() {
        let mut traffic = Traffic::<4>::new(&TbConfig { enq_idle: 1.0, deq_idle: 1.0, ..TbConfig::default() });
        assert!((0..100).all(|_| traffic.draw() == Draw::default()));
    }
}
