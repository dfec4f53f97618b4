//! # Task abstraction.
//!
//! This module defines the [`Task`] trait: a unit of work that is started once with an
//! explicit input and reports its outcome through a [`Done`] handle.
//! The common handle type is [`BoxTask`], a `Box<dyn Task<I, V>>` consumed by the runners.
//!
//! A task decides *when* it completes: inline inside [`Task::start`], from a spawned
//! future, or from another thread. Runners only observe the one report.

use crate::tasks::done::Done;

/// Owned, type-erased task handle accepted by the runners.
pub type BoxTask<I, V> = Box<dyn Task<I, V>>;

/// # Unit of work with a single completion report.
///
/// `I` is the input handed over at start (`()` for parallel tasks, the previous
/// value for serial ones), `V` the success value.
///
/// # Example
/// ```
/// use taskflow::{Done, Task};
///
/// struct Double;
///
/// impl Task<Option<u32>, u32> for Double {
///     fn name(&self) -> &str { "double" }
///
///     fn start(self: Box<Self>, input: Option<u32>, done: Done<u32>) {
///         done.ok(input.unwrap_or(1) * 2);
///     }
/// }
/// ```
pub trait Task<I, V>: Send + 'static {
    /// Returns a human-readable task name (used in events).
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Starts the task.
    ///
    /// Consumes the task: a runner starts every task at most once. The
    /// implementation must eventually report through `done` (dropping it
    /// reports [`TaskError::Abandoned`](crate::TaskError::Abandoned)).
    fn start(self: Box<Self>, input: I, done: Done<V>);
}
