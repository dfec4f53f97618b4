//! # Sync-to-async adapter (`make_async`)
//!
//! [`make_async`] wraps a plain synchronous function so it can be used wherever a
//! task is expected. Positional arguments are passed as one tuple `A`.
//!
//! ## Rules
//! - `Ok(v)` is reported as success, `Err(e)` as `e.into()`.
//! - A panic inside the function is captured and reported as
//!   [`TaskError::Panicked`]; it never propagates past the adapter.
//! - The function runs synchronously inside [`AsyncFn::call`] / [`Task::start`].
//!
//! ## Example
//! ```rust
//! use taskflow::{make_async, Done, TaskError};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let sum = make_async(|(a, b): (i32, i32)| Ok::<_, TaskError>(a + b));
//!
//! let (done, pending) = Done::channel();
//! sum.call((1, 2), done);
//! assert_eq!(pending.await, Ok(3));
//!
//! // Bound to its arguments it becomes an ordinary parallel task.
//! let results = taskflow::parallel(vec![sum.bind((1, 2)), sum.bind((2, 2))], None).await;
//! assert_eq!(results, Ok(vec![3, 4]));
//! # }
//! ```

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::error::TaskError;
use crate::tasks::done::Done;
use crate::tasks::task::{BoxTask, Task};
use crate::tasks::task_fn::TaskFn;

/// Wraps `f` into a task-shaped function.
pub fn make_async<F>(f: F) -> AsyncFn<F> {
    AsyncFn { f: Arc::new(f) }
}

/// Task-shaped wrapper produced by [`make_async`].
///
/// Cheap to clone; clones share the wrapped function.
pub struct AsyncFn<F> {
    f: Arc<F>,
}

impl<F> Clone for AsyncFn<F> {
    fn clone(&self) -> Self {
        Self {
            f: Arc::clone(&self.f),
        }
    }
}

impl<F> AsyncFn<F> {
    /// Runs the wrapped function with `args` and reports its outcome on `done`.
    pub fn call<A, V, E>(&self, args: A, done: Done<V>)
    where
        F: Fn(A) -> Result<V, E>,
        E: Into<TaskError>,
    {
        match panic::catch_unwind(AssertUnwindSafe(|| (*self.f)(args))) {
            Ok(Ok(value)) => done.ok(value),
            Ok(Err(error)) => done.err(error),
            Err(payload) => done.complete(Err(TaskError::from_panic(payload))),
        }
    }

    /// Binds `args` and returns a parameterless task, ready for
    /// [`parallel`](crate::parallel).
    pub fn bind<A, V, E>(&self, args: A) -> BoxTask<(), V>
    where
        F: Fn(A) -> Result<V, E> + Send + Sync + 'static,
        A: Send + 'static,
        V: 'static,
        E: Into<TaskError>,
    {
        let this = self.clone();
        TaskFn::boxed("make_async", move |(), done: Done<V>| this.call(args, done))
    }
}

impl<A, V, E, F> Task<A, V> for AsyncFn<F>
where
    F: Fn(A) -> Result<V, E> + Send + Sync + 'static,
    E: Into<TaskError>,
{
    fn name(&self) -> &str {
        "make_async"
    }

    fn start(self: Box<Self>, input: A, done: Done<V>) {
        self.call(input, done);
    }
}
