//! Single-port memory.
//!
//! One read or one write per cycle. Reads observe the content before the cycle; the port never
//! reads and writes in the same cycle.

use tracing::{debug, trace};

/// Access performed by the port in one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access<W> {
    /// The port is idle.
    Idle,
    /// Read of a word.
    Read {
        /// Word address.
        addr: usize,
        /// Word content before the cycle.
        data: W,
    },
    /// Write of a word.
    Write {
        /// Word address.
        addr: usize,
    },
}

impl<W> Access<W> {
    /// Returns whether a write was performed.
    #[inline]
    pub fn is_write(&self) -> bool { matches!(self, Self::Write { .. }) }

    /// Returns the read data, if a read was performed.
    pub fn into_read(self) -> Option<W> {
        match self {
            Self::Read { data, .. } => Some(data),
            _ => None,
        }
    }
}

/// Request granted by [`arbitrate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
    /// Nothing requested.
    Idle,
    /// The read request.
    Read,
    /// The write request.
    Write,
}

/// Read-first arbitration.
///
/// A read request always takes the port. A write request is granted only in a cycle without a
/// read; otherwise it stays pending for the next cycle.
pub fn arbitrate(read: bool, write: bool) -> Grant {
    match (read, write) {
        (true, _) => Grant::Read,
        (false, true) => Grant::Write,
        (false, false) => Grant::Idle,
    }
}

/// Port activity counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PortStats {
    /// Cycles spent reading.
    pub reads: usize,
    /// Cycles spent writing.
    pub writes: usize,
    /// Cycles where a write request lost the port to a read.
    pub deferred_writes: usize,
    /// Cycles without any access.
    pub idle: usize,
}

impl PortStats {
    /// Total number of cycles.
    pub fn cycles(&self) -> usize { self.reads + self.writes + self.idle }
}

/// Memory with one read/write port.
#[derive(Debug, Clone)]
pub struct OnePortRam<W> {
    words: Vec<W>,
    stats: PortStats,
}

impl<W: Clone> OnePortRam<W> {
    /// Creates a memory of `entries` words holding `init`.
    pub fn new(entries: usize, init: W) -> Self { Self { words: vec![init; entries], stats: PortStats::default() } }

    /// Returns the word at `addr` without using the port.
    #[inline]
    pub fn peek(&self, addr: usize) -> &W { &self.words[addr] }

    /// Returns the port activity counters.
    #[inline]
    pub fn stats(&self) -> &PortStats { &self.stats }

    /// Runs one cycle of the port.
    ///
    /// `read` is the address requested for reading, `write` the address and word requested for
    /// writing. The requests are arbitrated read-first; the returned access tells which one was
    /// served.
    pub fn cycle(&mut self, read: Option<usize>, write: Option<(usize, W)>) -> Access<W> {
        match (arbitrate(read.is_some(), write.is_some()), read, write) {
            (Grant::Read, Some(addr), write) => {
                debug_assert!(addr < self.words.len(), "read address {} out of {} words", addr, self.words.len());
                self.stats.reads += 1;
                if let Some((waddr, _)) = write {
                    self.stats.deferred_writes += 1;
                    debug!(raddr = addr, waddr, "write deferred by read");
                }
                trace!(addr, "read");
                Access::Read { addr, data: self.words[addr].clone() }
            }
            (Grant::Write, _, Some((addr, data))) => {
                debug_assert!(addr < self.words.len(), "write address {} out of {} words", addr, self.words.len());
                self.stats.writes += 1;
                trace!(addr, "write");
                self.words[addr] = data;
                Access::Write { addr }
            }
            _ => {
                self.stats.idle += 1;
                Access::Idle
            }
        }
    }
}
