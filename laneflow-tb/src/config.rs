//! Testbench configuration.

use crate::error::TbError;

/// Parameters of one testbench run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TbConfig {
    /// Number of random traffic cycles, not counting the final drain.
    pub cycles: usize,
    /// Seed of the traffic generator.
    pub seed: u64,
    /// Probability that the producer offers nothing in a cycle.
    pub enq_idle: f64,
    /// Probability that the consumer accepts nothing in a cycle.
    pub deq_idle: f64,
    /// Longest run of cycles where both sides go quiet, if bursts are enabled.
    pub burst: Option<usize>,
}

impl Default for TbConfig {
    fn default() -> Self { Self { cycles: 10_000, seed: 0, enq_idle: 0.25, deq_idle: 0.25, burst: None } }
}

impl TbConfig {
    /// Checks that the probabilities are in range.
    pub fn validate(&self) -> Result<(), TbError> {
        for (name, value) in [("enqueue idle", self.enq_idle), ("dequeue idle", self.deq_idle)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(TbError::Probability { name, value });
            }
        }
        Ok(())
    }
}
