//! Runtime core: runs and their drivers.
//!
//! The public API from this module is [`Flow`] and the free functions
//! [`serial`], [`parallel`] and [`map`].
//!
//! Internal modules:
//! - [`runner`]: starts one task, applies the timeout, tags the outcome with its index;
//! - [`serial`](mod@serial): sequential driver with value threading and short-circuit;
//! - [`parallel`](mod@parallel): bounded-window driver with ordered slots and first-error latch;
//! - [`map`](mod@map): turns items plus an iteratee into parallel tasks;
//! - [`flow`]: configuration, bus, subscribers and the public entry points.

mod flow;
mod map;
mod parallel;
mod runner;
mod serial;

pub use flow::{map, parallel, serial, Flow};
