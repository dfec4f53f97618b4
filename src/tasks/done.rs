//! # Write-once completion handle.
//!
//! Every task reports its outcome through a [`Done`]. The handle is consumed by
//! the call that reports, so a task can report at most once; if it is dropped
//! without reporting, it reports [`TaskError::Abandoned`] on its way out. Either
//! way the continuation behind the handle runs **exactly once**.
//!
//! ```text
//! task ── done.ok(v) ───────────┐
//! task ── done.err(e) ──────────┼──► continuation(Result<V, TaskError>)   (once)
//! task ── drop(done) ───────────┘        └─ Done::channel(): oneshot ──► Pending<V>
//! ```
//!
//! ## Example
//! ```rust
//! use taskflow::{Done, TaskError};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let (done, pending) = Done::<u32>::channel();
//! std::thread::spawn(move || done.ok(7));
//! assert_eq!(pending.await, Ok(7));
//!
//! let (done, pending) = Done::<u32>::channel();
//! drop(done);
//! assert_eq!(pending.await, Err(TaskError::Abandoned));
//! # }
//! ```

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::error::TaskError;

/// Outcome of a single task invocation.
pub type TaskResult<V> = Result<V, TaskError>;

type Continuation<V> = Box<dyn FnOnce(TaskResult<V>) + Send>;

/// Completion handle handed to a task.
#[must_use = "a task must report its outcome through `Done`"]
pub struct Done<V> {
    on_done: Option<Continuation<V>>,
}

impl<V> Done<V> {
    /// Creates a handle that forwards the outcome to `f`.
    ///
    /// Useful to chain task-shaped functions by hand, e.g. completing an outer
    /// task from the outcome of an [`AsyncFn`](crate::AsyncFn) call.
    pub fn new(f: impl FnOnce(TaskResult<V>) + Send + 'static) -> Self {
        Self {
            on_done: Some(Box::new(f)),
        }
    }

    /// Reports the outcome.
    pub fn complete(mut self, res: TaskResult<V>) {
        if let Some(f) = self.on_done.take() {
            f(res);
        }
    }

    /// Reports success.
    pub fn ok(self, value: V) {
        self.complete(Ok(value));
    }

    /// Reports failure.
    pub fn err(self, error: impl Into<TaskError>) {
        self.complete(Err(error.into()));
    }
}

impl<V: Send + 'static> Done<V> {
    /// Creates a handle together with the future that observes it.
    pub fn channel() -> (Self, Pending<V>) {
        let (tx, rx) = oneshot::channel();
        let done = Self::new(move |res| {
            // Receiver gone means nobody waits for this task anymore (timeout
            // or dropped run).
            let _ = tx.send(res);
        });
        (done, Pending { rx })
    }
}

impl<V> Drop for Done<V> {
    fn drop(&mut self) {
        if let Some(f) = self.on_done.take() {
            f(Err(TaskError::Abandoned));
        }
    }
}

impl<V> fmt::Debug for Done<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Done")
            .field("reported", &self.on_done.is_none())
            .finish()
    }
}

/// Future resolving to the outcome reported through the paired [`Done`].
#[derive(Debug)]
pub struct Pending<V> {
    rx: oneshot::Receiver<TaskResult<V>>,
}

impl<V> Pending<V> {
    /// Takes the outcome if it has already been reported, without waiting.
    pub(crate) fn try_take(&mut self) -> Option<TaskResult<V>> {
        self.rx.try_recv().ok()
    }
}

impl<V> Future for Pending<V> {
    type Output = TaskResult<V>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|res| res.unwrap_or(Err(TaskError::Abandoned)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_channel_delivers_value() {
        let (done, pending) = Done::<&str>::channel();
        done.ok("first");
        assert_eq!(pending.await, Ok("first"));
    }

    #[tokio::test]
    async fn test_channel_delivers_error() {
        let (done, pending) = Done::<u8>::channel();
        done.err("Error!");
        assert_eq!(pending.await, Err(TaskError::fail("Error!")));
    }

    #[tokio::test]
    async fn test_dropped_handle_reports_abandoned() {
        let (done, pending) = Done::<u8>::channel();
        drop(done);
        assert_eq!(pending.await, Err(TaskError::Abandoned));
    }

    #[tokio::test]
    async fn test_completion_from_spawned_task() {
        let (done, pending) = Done::<u64>::channel();
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            done.ok(42);
        });
        assert_eq!(pending.await, Ok(42));
    }

    #[test]
    fn test_continuation_runs_exactly_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);
        let done = Done::<u8>::new(move |res| {
            assert_eq!(res, Ok(1));
            c.fetch_add(1, Ordering::SeqCst);
        });
        done.ok(1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_runs_continuation_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);
        let done = Done::<u8>::new(move |res| {
            assert_eq!(res, Err(TaskError::Abandoned));
            c.fetch_add(1, Ordering::SeqCst);
        });
        drop(done);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
