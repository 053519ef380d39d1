//! LaneFlow: lane-positioned circular buffers for wide data paths.
//!
//! A lane-positioned queue admits and removes up to `LANES` elements per cycle while preserving
//! the total order of everything ever enqueued. The crate models such queues at cycle level: every
//! component is a synchronous state machine whose next state is computed from the pre-cycle state
//! only, and committed once per [`step`](queue::LaneQueue::step).
//!
//! - [`tracker`]: index/occupancy/flow-control engine shared by every lane-positioned queue.
//! - [`one_rw`]: storage on a single read/write memory port, doubled in width, with side buffers
//!   hiding the memory latency.

// # Tries to deny all lints (`rustc -W help`).
#![deny(absolute_paths_not_starting_with_crate)]
#![deny(anonymous_parameters)]
#![deny(deprecated_in_future)]
#![deny(explicit_outlives_requirements)]
#![deny(keyword_idents)]
#![deny(macro_use_extern_crate)]
#![deny(missing_debug_implementations)]
#![deny(non_ascii_idents)]
#![deny(rust_2018_idioms)]
#![deny(trivial_numeric_casts)]
#![deny(unsafe_op_in_unsafe_fn)]
#![deny(unused_extern_crates)]
#![deny(unused_import_braces)]
#![deny(unused_qualifications)]
//
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::missing_crate_level_docs)]
#![deny(rustdoc::private_doc_tests)]
#![deny(rustdoc::invalid_codeblock_attributes)]
#![deny(rustdoc::invalid_html_tags)]
#![deny(rustdoc::invalid_rust_codeblocks)]
#![deny(rustdoc::bare_urls)]
#![deny(unreachable_pub)]
//
#![allow(clippy::needless_lifetimes)]
#![allow(elided_lifetimes_in_paths)]

pub mod cursor;
pub mod error;
pub mod lane;
pub mod memory;
pub mod one_rw;
pub mod queue;
pub mod tracker;
pub mod utils;

pub use cursor::Cursor;
pub use error::*;
pub use lane::LaneWindow;
pub use memory::{Access, OnePortRam, PortStats};
pub use one_rw::OneRwQueue;
pub use queue::LaneQueue;
pub use tracker::{Tracker, Transfer};
pub use utils::*;
