//! # Task abstractions.
//!
//! This module provides the task-related types:
//! - [`Done`] / [`Pending`] - write-once completion handle and the future observing it
//! - [`Task`] - trait for a unit of work started once with an input
//! - [`TaskFn`] - closure-backed task implementation
//! - [`BoxTask`] - owned task handle (`Box<dyn Task<I, V>>`)
//! - [`make_async`] / [`AsyncFn`] - adapter turning a sync function into a task

mod adapter;
mod done;
mod task;
mod task_fn;

pub use adapter::{make_async, AsyncFn};
pub use done::{Done, Pending, TaskResult};
pub use task::{BoxTask, Task};
pub use task_fn::TaskFn;
