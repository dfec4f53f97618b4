//! # Start a single task of a run.
//!
//! [`launch`] starts one task and returns the future observing its report, tagged
//! with the task's index. The run drivers (`serial`, `parallel`) never touch a
//! task otherwise.
//!
//! ## Flow
//! ```text
//! publish TaskStarting
//!   └─► Done::channel() ─► task.start(input, done)
//!         ├─ start panicked        ─► ready(report made before the panic, else Err(Panicked))
//!         ├─ no timeout configured ─► Pending<V>
//!         └─ timeout configured    ─► time::timeout(Pending<V>)
//!                                        └─ elapsed ─► publish TimeoutHit, Err(Timeout)
//! ```
//!
//! ## Rules
//! - Every launched future resolves **exactly once** with the task's outcome.
//! - A timeout does not abort the task; its later report is discarded.
//! - Terminal task events (`TaskCompleted`/`TaskFailed`) are published by the
//!   driver, which owns the run state.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::future::{self, BoxFuture, FutureExt};
use tokio::time;

use crate::{
    error::TaskError,
    events::{Bus, Event, EventKind, FlowKind},
    tasks::{BoxTask, Done, TaskResult},
};

/// Run id counter.
static RUN_SEQ: AtomicU64 = AtomicU64::new(1);

/// Outcome of one launched task, tagged with its index.
pub(crate) type Launched<V> = BoxFuture<'static, (usize, TaskResult<V>)>;

/// Identity and settings of one run (one invocation of a runner).
#[derive(Clone, Debug)]
pub(crate) struct Run {
    id: u64,
    flow: FlowKind,
    bus: Bus,
    timeout: Option<Duration>,
}

impl Run {
    pub(crate) fn new(flow: FlowKind, bus: Bus, timeout: Option<Duration>) -> Self {
        Self {
            id: RUN_SEQ.fetch_add(1, Ordering::Relaxed),
            flow,
            bus,
            timeout,
        }
    }

    /// New event stamped with this run's id and kind.
    pub(crate) fn event(&self, kind: EventKind) -> Event {
        Event::new(kind).with_run(self.id).with_flow(self.flow)
    }

    pub(crate) fn publish(&self, ev: Event) {
        self.bus.publish(ev);
    }

    pub(crate) fn started(&self, total: usize, window: Option<usize>) {
        let ev = self.event(EventKind::FlowStarted).with_total(total);
        self.publish(match window {
            Some(n) => ev.with_limit(n),
            None => ev,
        });
    }

    pub(crate) fn task_completed(&self, index: usize) {
        self.publish(self.event(EventKind::TaskCompleted).with_index(index));
    }

    pub(crate) fn task_failed(&self, index: usize, err: &TaskError) {
        self.publish(
            self.event(EventKind::TaskFailed)
                .with_index(index)
                .with_reason(err.to_string()),
        );
    }

    pub(crate) fn error_latched(&self, index: usize, err: &TaskError) {
        self.publish(
            self.event(EventKind::ErrorLatched)
                .with_index(index)
                .with_reason(err.to_string()),
        );
    }

    pub(crate) fn finished(&self, total: usize) {
        self.publish(self.event(EventKind::FlowFinished).with_total(total));
    }

    pub(crate) fn failed(&self, total: usize, index: usize, err: &TaskError) {
        self.publish(
            self.event(EventKind::FlowFailed)
                .with_total(total)
                .with_index(index)
                .with_reason(err.to_string()),
        );
    }
}

/// Starts `task` with `input` and returns the future observing its report.
///
/// `in_flight` is the number of tasks in flight including this one (for the
/// `TaskStarting` event only).
pub(crate) fn launch<I, V>(
    run: &Run,
    index: usize,
    in_flight: usize,
    task: BoxTask<I, V>,
    input: I,
) -> Launched<V>
where
    I: 'static,
    V: Send + 'static,
{
    run.publish(
        run.event(EventKind::TaskStarting)
            .with_index(index)
            .with_task(task.name())
            .with_in_flight(in_flight),
    );

    let (done, mut pending) = Done::channel();
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(move || task.start(input, done))) {
        // A report made before the panic stands; unwinding only adds `Abandoned`.
        let res = match pending.try_take() {
            Some(Err(TaskError::Abandoned)) | None => Err(TaskError::from_panic(payload)),
            Some(report) => report,
        };
        return future::ready((index, res)).boxed();
    }

    match run.timeout {
        Some(dur) => {
            let run = run.clone();
            async move {
                match time::timeout(dur, pending).await {
                    Ok(res) => (index, res),
                    Err(_elapsed) => {
                        run.publish(
                            run.event(EventKind::TimeoutHit)
                                .with_index(index)
                                .with_timeout(dur),
                        );
                        (index, Err(TaskError::Timeout { timeout: dur }))
                    }
                }
            }
            .boxed()
        }
        None => pending.map(move |res| (index, res)).boxed(),
    }
}
