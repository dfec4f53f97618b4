//! # Bounded parallel runner.
//!
//! Runs independent tasks with at most `window` of them in flight and collects
//! their values by input index.
//!
//! ## Scheduling
//! ```text
//! queue: [t0 t1 t2 t3 t4]      window = 2
//!
//! launch t0, t1                in_flight = {t0, t1}
//! t1 reports ─► record(1) ─► backfill t2     in_flight = {t0, t2}
//! t0 reports ─► record(0) ─► backfill t3     in_flight = {t2, t3}
//! ...
//! in_flight empty and queue empty ─► finish()
//!     ├─ error latched ─► Err(first error by completion order)
//!     └─ otherwise     ─► Ok(slots in input order)
//! ```
//!
//! ## Rules
//! - Every task is started exactly once, errors never skip queued tasks.
//! - At most `window` tasks are in flight; a freed slot is refilled in input order.
//! - The first error **by completion time** is reported, not the lowest index.
//! - `window == 0` (empty input or `limit = Some(0)`) resolves `Ok(vec![])`
//!   without starting anything.
//!
//! The run state is owned by the driver future. Completions reach it through
//! per-task channels, so slot writes, the pending count and the error latch
//! need no locking even when tasks report from other threads.

use futures::stream::{FuturesUnordered, StreamExt};

use crate::{
    core::runner::{launch, Run},
    error::TaskError,
    tasks::{BoxTask, TaskResult},
};

/// Mutable state of one parallel run.
struct RunState<V> {
    /// Result slots by input index, written once on success.
    slots: Vec<Option<V>>,
    /// Tasks that have not reported yet.
    pending: usize,
    /// First error by completion order, with the index of its task.
    first_error: Option<(usize, TaskError)>,
}

impl<V> RunState<V> {
    fn new(total: usize) -> Self {
        Self {
            slots: (0..total).map(|_| None).collect(),
            pending: total,
            first_error: None,
        }
    }

    /// Records the report of task `index`.
    fn record(&mut self, run: &Run, index: usize, res: TaskResult<V>) {
        self.pending -= 1;
        match res {
            Ok(value) => {
                run.task_completed(index);
                debug_assert!(self.slots[index].is_none(), "slot {index} written twice");
                self.slots[index] = Some(value);
            }
            Err(err) => {
                run.task_failed(index, &err);
                if self.first_error.is_none() {
                    run.error_latched(index, &err);
                    self.first_error = Some((index, err));
                }
            }
        }
    }

    /// Produces the run's single result.
    fn finish(self, run: &Run) -> Result<Vec<V>, TaskError> {
        debug_assert_eq!(self.pending, 0);
        let total = self.slots.len();
        match self.first_error {
            Some((index, err)) => {
                run.failed(total, index, &err);
                Err(err)
            }
            None => {
                run.finished(total);
                Ok(self.slots.into_iter().flatten().collect())
            }
        }
    }
}

/// Drives one parallel run to completion.
///
/// `limit = None` means unbounded (every task starts immediately).
pub(crate) async fn run_parallel<V>(
    run: Run,
    tasks: Vec<BoxTask<(), V>>,
    limit: Option<usize>,
) -> Result<Vec<V>, TaskError>
where
    V: Send + 'static,
{
    let total = tasks.len();
    let window = limit.map_or(total, |n| n.min(total));
    run.started(total, Some(window));

    if window == 0 {
        run.finished(total);
        return Ok(Vec::new());
    }

    let mut state = RunState::new(total);
    let mut queue = tasks.into_iter().enumerate();
    let mut in_flight = FuturesUnordered::new();

    for (index, task) in queue.by_ref().take(window) {
        in_flight.push(launch(&run, index, in_flight.len() + 1, task, ()));
    }

    while let Some((index, res)) = in_flight.next().await {
        state.record(&run, index, res);

        while in_flight.len() < window {
            let Some((next, task)) = queue.next() else {
                break;
            };
            in_flight.push(launch(&run, next, in_flight.len() + 1, task, ()));
        }
    }

    state.finish(&run)
}
