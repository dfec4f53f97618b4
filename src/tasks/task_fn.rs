//! # Function-backed task (`TaskFn`)
//!
//! [`TaskFn`] wraps a closure `F: FnOnce(I, Done<V>)`. The closure is called once,
//! when a runner starts the task, and owns whatever state it captured.
//!
//! ## Example
//! ```rust
//! use taskflow::{BoxTask, Done, TaskFn};
//!
//! let t: BoxTask<(), u32> = TaskFn::boxed("answer", |_: (), done: Done<u32>| {
//!     done.ok(42);
//! });
//!
//! assert_eq!(t.name(), "answer");
//! ```

use std::borrow::Cow;

use crate::tasks::done::Done;
use crate::tasks::task::{BoxTask, Task};

/// Function-backed task implementation.
#[derive(Debug)]
pub struct TaskFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> TaskFn<F> {
    /// Creates a new function-backed task.
    ///
    /// Prefer [`TaskFn::boxed`] when you immediately need a [`BoxTask`].
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the task and returns it as an owned handle (`Box<dyn Task>`).
    pub fn boxed<I, V>(name: impl Into<Cow<'static, str>>, f: F) -> BoxTask<I, V>
    where
        F: FnOnce(I, Done<V>) + Send + 'static,
        I: 'static,
        V: 'static,
    {
        Box::new(Self::new(name, f))
    }
}

impl<I, V, F> Task<I, V> for TaskFn<F>
where
    F: FnOnce(I, Done<V>) + Send + 'static, // FnOnce: started at most once
{
    fn name(&self) -> &str {
        &self.name
    }

    fn start(self: Box<Self>, input: I, done: Done<V>) {
        (self.f)(input, done)
    }
}
