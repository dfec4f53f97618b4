//! # taskflow
//!
//! **taskflow** is a small asynchronous control-flow library for Rust.
//!
//! It composes tasks that each report their outcome exactly once through a
//! completion handle ([`Done`]) into higher-level execution shapes, without manual
//! bookkeeping of counters, partial results or error races.
//!
//! ## Primitives
//! | Operation       | Shape                                                      | Resolves with                         |
//! |-----------------|------------------------------------------------------------|---------------------------------------|
//! | [`serial`]      | one at a time, each task gets the previous value           | `Ok(Some(last))` / `Ok(None)` / `Err` |
//! | [`parallel`]    | at most `limit` in flight, all tasks always run            | `Ok(values in input order)` / `Err`   |
//! | [`map`]         | one task per item, unbounded                               | same as `parallel`                    |
//! | [`make_async`]  | wraps a sync `Fn(A) -> Result<V, E>` into a task           | panics become [`TaskError::Panicked`] |
//!
//! ## Architecture
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   BoxTask    │   │   BoxTask    │   │   BoxTask    │
//!     │ start(in, ⟂) │   │ start(in, ⟂) │   │ start(in, ⟂) │     ⟂ = Done<V>
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Flow                                                             │
//! │  - FlowConfig (per-task timeout, bus capacity)                    │
//! │  - Bus (broadcast events)                                         │
//! │  - SubscriberSet (fans out to user subscribers)                   │
//! └──────┬──────────────────────────┬─────────────────────────────────┘
//!        ▼                          ▼
//!   run_serial()               run_parallel(window)  ◄── map_tasks(items, iteratee)
//!   one launch at a time       FuturesUnordered of in-flight launches
//!   value threading            slots by index + first-error latch
//! ```
//!
//! ## Errors
//! One error type, [`TaskError`], reaches the caller per run: the first error for
//! `serial`, the first error **by completion time** for `parallel`/`map` (after
//! every task has reported). Other errors are only visible as events.
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use taskflow::{parallel, BoxTask, Done, TaskFn};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let tasks: Vec<BoxTask<(), u64>> = (1..=3)
//!         .map(|i| {
//!             TaskFn::boxed(format!("job-{i}"), move |_: (), done: Done<u64>| {
//!                 tokio::spawn(async move {
//!                     tokio::time::sleep(std::time::Duration::from_millis(10 * (4 - i))).await;
//!                     done.ok(i * 100);
//!                 });
//!             })
//!         })
//!         .collect();
//!
//!     // Two at a time; values come back in input order.
//!     assert_eq!(parallel(tasks, Some(2)).await, Ok(vec![100, 200, 300]));
//! }
//! ```
mod config;
mod core;
mod error;
mod events;
mod subscribers;
mod tasks;

// ---- Public re-exports ----

pub use config::FlowConfig;
pub use crate::core::{map, parallel, serial, Flow};
pub use error::TaskError;
pub use events::{Bus, Event, EventKind, FlowKind};
pub use subscribers::{Subscribe, SubscriberSet};
pub use tasks::{make_async, AsyncFn, BoxTask, Done, Pending, Task, TaskFn, TaskResult};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
