//! # Runtime events emitted by the runners.
//!
//! The [`EventKind`] enum classifies event types across two categories:
//! - **Run events**: one run of `serial`/`parallel`/`map` (started, finished, failed)
//! - **Task events**: single task progress (starting, completed, failed, timeout)
//!
//! The [`Event`] struct carries additional metadata such as timestamps, run id,
//! task index and name, reasons and window sizes.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use taskflow::{Event, EventKind, FlowKind};
//!
//! let ev = Event::new(EventKind::TaskFailed)
//!     .with_flow(FlowKind::Parallel)
//!     .with_index(2)
//!     .with_reason("boom");
//!
//! assert_eq!(ev.kind, EventKind::TaskFailed);
//! assert_eq!(ev.index, Some(2));
//! assert_eq!(ev.reason.as_deref(), Some("boom"));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Which runner produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowKind {
    /// Sequential runner.
    Serial,
    /// Bounded parallel runner.
    Parallel,
    /// Mapper (parallel runner over an item sequence).
    Map,
}

impl FlowKind {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowKind::Serial => "serial",
            FlowKind::Parallel => "parallel",
            FlowKind::Map => "map",
        }
    }
}

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Run events ===
    /// A run was invoked.
    ///
    /// Sets:
    /// - `run`, `flow`: run id and runner
    /// - `total`: number of tasks in the input
    /// - `limit`: concurrency window (parallel/map only)
    FlowStarted,

    /// The run resolved successfully.
    ///
    /// Sets:
    /// - `run`, `flow`, `total`
    FlowFinished,

    /// The run resolved with an error.
    ///
    /// Sets:
    /// - `run`, `flow`, `total`
    /// - `index`: index of the task whose error was reported
    /// - `reason`: the reported error
    FlowFailed,

    // === Task events ===
    /// A task is being started.
    ///
    /// Sets:
    /// - `run`, `flow`
    /// - `index`: position in the input sequence
    /// - `task`: task name
    /// - `in_flight`: tasks in flight including this one
    TaskStarting,

    /// A task reported success.
    ///
    /// Sets:
    /// - `run`, `flow`, `index`
    TaskCompleted,

    /// A task reported an error (or was resolved with one by the runner).
    ///
    /// Sets:
    /// - `run`, `flow`, `index`
    /// - `reason`: error message
    TaskFailed,

    /// First error of a run; this is the one reported to the caller.
    ///
    /// Sets:
    /// - `run`, `flow`, `index`
    /// - `reason`: error message
    ErrorLatched,

    /// A task did not report within the configured timeout.
    ///
    /// Sets:
    /// - `run`, `flow`, `index`
    /// - `timeout_ms`: configured per-task timeout (ms)
    TimeoutHit,

    /// Serial run short-circuited; remaining tasks are never started.
    ///
    /// Sets:
    /// - `run`, `flow`
    /// - `index`: index of the failed task
    /// - `total`: number of tasks skipped
    TasksSkipped,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Id of the run (one invocation of a runner).
    pub run: Option<u64>,
    /// Runner that produced the event.
    pub flow: Option<FlowKind>,
    /// Position of the task in the input sequence.
    pub index: Option<usize>,
    /// Name of the task, if applicable.
    pub task: Option<Arc<str>>,
    /// Human-readable reason (errors).
    pub reason: Option<Arc<str>>,
    /// Task count (input size, or skipped count for `TasksSkipped`).
    pub total: Option<usize>,
    /// Tasks in flight at the time of the event.
    pub in_flight: Option<usize>,
    /// Concurrency window of the run.
    pub limit: Option<usize>,
    /// Task timeout in milliseconds (compact).
    pub timeout_ms: Option<u32>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            run: None,
            flow: None,
            index: None,
            task: None,
            reason: None,
            total: None,
            in_flight: None,
            limit: None,
            timeout_ms: None,
        }
    }

    /// Attaches the run id.
    #[inline]
    pub fn with_run(mut self, run: u64) -> Self {
        self.run = Some(run);
        self
    }

    /// Attaches the runner kind.
    #[inline]
    pub fn with_flow(mut self, flow: FlowKind) -> Self {
        self.flow = Some(flow);
        self
    }

    /// Attaches the task index.
    #[inline]
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Attaches a task name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a task count.
    #[inline]
    pub fn with_total(mut self, total: usize) -> Self {
        self.total = Some(total);
        self
    }

    /// Attaches the number of tasks in flight.
    #[inline]
    pub fn with_in_flight(mut self, n: usize) -> Self {
        self.in_flight = Some(n);
        self
    }

    /// Attaches the concurrency window.
    #[inline]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Attaches a timeout duration (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.timeout_ms = Some(ms);
        self
    }

    /// True for `FlowFinished` and `FlowFailed`.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, EventKind::FlowFinished | EventKind::FlowFailed)
    }
}
