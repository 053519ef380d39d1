//! Testbench for lane-positioned queues.
//!
//! Drives a queue with seeded random traffic, tags every offered element with a strictly
//! increasing id and checks that ids leave the queue in order, without loss or duplication, while
//! the flow-control counts and the queue invariants hold on every cycle.

#![deny(missing_debug_implementations)]
#![deny(rust_2018_idioms)]
#![deny(trivial_numeric_casts)]
#![deny(unused_import_braces)]
#![deny(unused_qualifications)]
#![deny(missing_docs)]
#![deny(unreachable_pub)]

pub mod bench;
pub mod config;
pub mod error;
pub mod scoreboard;
pub mod traffic;

pub use bench::*;
pub use config::TbConfig;
pub use error::TbError;
pub use scoreboard::Scoreboard;
pub use traffic::Traffic;
