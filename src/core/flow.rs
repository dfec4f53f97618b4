//! # Flow: entry point owning configuration, event bus and subscribers.
//!
//! A [`Flow`] starts runs of the three runners and publishes their events on its
//! [`Bus`]. When subscribers are given, a listener forwards every bus event to a
//! [`SubscriberSet`].
//!
//! ## Architecture
//! ```text
//! Flow::serial(tasks)            ─► Run(serial)   ─► run_serial()
//! Flow::parallel(tasks, limit)   ─► Run(parallel) ─► run_parallel()
//! Flow::map(items, iteratee)     ─► Run(map)      ─► map_tasks() ─► run_parallel(limit = None)
//!                                      │
//!                                      └── publish(Event) ─► Bus ─► listener ─► SubscriberSet::emit
//! ```
//!
//! The free functions [`serial`], [`parallel`] and [`map`] run on a default flow
//! (no subscribers, no timeout).
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use taskflow::{Done, Flow, FlowConfig, Subscribe};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let subs: Vec<Arc<dyn Subscribe>> = Vec::new();
//!     let flow = Flow::new(FlowConfig::default(), subs);
//!
//!     let squares = flow
//!         .map(vec![1u32, 2, 3], |x: u32, done: Done<u32>| done.ok(x * x))
//!         .await;
//!     assert_eq!(squares, Ok(vec![1, 4, 9]));
//!
//!     flow.shutdown().await;
//! }
//! ```

use std::sync::Arc;

use tokio::{sync::broadcast::error::RecvError, task::JoinHandle};

use crate::{
    config::FlowConfig,
    core::{map::map_tasks, parallel::run_parallel, runner::Run, serial::run_serial},
    error::TaskError,
    events::{Bus, FlowKind},
    subscribers::{Subscribe, SubscriberSet},
    tasks::{BoxTask, Done},
};

/// Starts runs and delivers their events to subscribers.
pub struct Flow {
    cfg: FlowConfig,
    bus: Bus,
    listener: Option<JoinHandle<()>>,
}

impl Flow {
    /// Creates a new flow with the given config and subscribers.
    ///
    /// Must be called from within a tokio runtime when `subscribers` is non-empty
    /// (one worker per subscriber plus the bus listener are spawned).
    pub fn new(cfg: FlowConfig, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        let listener = if subscribers.is_empty() {
            None
        } else {
            Some(Self::subscriber_listener(&bus, SubscriberSet::new(subscribers)))
        };
        Self { cfg, bus, listener }
    }

    /// Returns the flow configuration.
    pub fn config(&self) -> &FlowConfig {
        &self.cfg
    }

    /// Returns the event bus; `bus().subscribe()` observes subsequent events.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Runs `tasks` one at a time, feeding each task the previous task's value.
    ///
    /// The first task receives `None`. Resolves:
    /// - `Ok(None)` for an empty input;
    /// - `Ok(Some(last))` when every task succeeds;
    /// - `Err(e)` with the first error; later tasks are never started.
    pub async fn serial<V>(&self, tasks: Vec<BoxTask<Option<V>, V>>) -> Result<Option<V>, TaskError>
    where
        V: Send + 'static,
    {
        run_serial(self.run(FlowKind::Serial), tasks).await
    }

    /// Runs independent `tasks` with at most `limit` in flight (`None` = unbounded).
    ///
    /// Resolves after **every** task has reported:
    /// - `Ok(values)` ordered by input index when all succeed;
    /// - `Err(e)` with the error that was reported first in time.
    ///
    /// An empty input or `limit = Some(0)` resolves `Ok(vec![])` without starting
    /// any task.
    pub async fn parallel<V>(
        &self,
        tasks: Vec<BoxTask<(), V>>,
        limit: Option<usize>,
    ) -> Result<Vec<V>, TaskError>
    where
        V: Send + 'static,
    {
        run_parallel(self.run(FlowKind::Parallel), tasks, limit).await
    }

    /// Applies `iteratee` to every item concurrently (unbounded).
    ///
    /// Same result and error semantics as [`Flow::parallel`].
    pub async fn map<T, V, F>(&self, items: Vec<T>, iteratee: F) -> Result<Vec<V>, TaskError>
    where
        T: Send + 'static,
        V: Send + 'static,
        F: Fn(T, Done<V>) + Send + Sync + 'static,
    {
        run_parallel(self.run(FlowKind::Map), map_tasks(items, iteratee), None).await
    }

    /// Drops the bus and waits until subscribers have processed every event.
    pub async fn shutdown(self) {
        let Flow { bus, listener, .. } = self;
        drop(bus);
        if let Some(handle) = listener {
            let _ = handle.await;
        }
    }

    fn run(&self, flow: FlowKind) -> Run {
        Run::new(flow, self.bus.clone(), self.cfg.task_timeout())
    }

    /// Forwards bus events to the subscriber set until every bus handle is gone,
    /// then drains the subscriber queues.
    fn subscriber_listener(bus: &Bus, set: SubscriberSet) -> JoinHandle<()> {
        let mut rx = bus.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => set.emit(&ev),
                    Err(RecvError::Lagged(n)) => {
                        eprintln!("[taskflow] subscriber listener lagged: {n} events skipped");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            set.shutdown().await;
        })
    }
}

impl Default for Flow {
    /// A flow with [`FlowConfig::default`] and no subscribers.
    fn default() -> Self {
        Self::new(FlowConfig::default(), Vec::new())
    }
}

/// Runs `tasks` sequentially on a default [`Flow`]. See [`Flow::serial`].
///
/// ```rust
/// use taskflow::{serial, BoxTask, Done, TaskFn};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let tasks: Vec<BoxTask<Option<String>, String>> = vec![
///     TaskFn::boxed("first", |_: Option<String>, done: Done<String>| done.ok("first".into())),
///     TaskFn::boxed("second", |data: Option<String>, done: Done<String>| {
///         done.ok(format!("{} data", data.unwrap_or_default()))
///     }),
/// ];
/// assert_eq!(serial(tasks).await, Ok(Some("first data".to_string())));
/// # }
/// ```
pub async fn serial<V>(tasks: Vec<BoxTask<Option<V>, V>>) -> Result<Option<V>, TaskError>
where
    V: Send + 'static,
{
    Flow::default().serial(tasks).await
}

/// Runs `tasks` with at most `limit` in flight on a default [`Flow`].
/// See [`Flow::parallel`].
pub async fn parallel<V>(tasks: Vec<BoxTask<(), V>>, limit: Option<usize>) -> Result<Vec<V>, TaskError>
where
    V: Send + 'static,
{
    Flow::default().parallel(tasks, limit).await
}

/// Maps `items` through `iteratee` concurrently on a default [`Flow`].
/// See [`Flow::map`].
pub async fn map<T, V, F>(items: Vec<T>, iteratee: F) -> Result<Vec<V>, TaskError>
where
    T: Send + 'static,
    V: Send + 'static,
    F: Fn(T, Done<V>) + Send + Sync + 'static,
{
    Flow::default().map(items, iteratee).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Event, EventKind};
    use crate::tasks::TaskFn;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<Event>>,
    }

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, event: &Event) {
            self.seen.lock().unwrap().push(event.clone());
        }
    }

    #[tokio::test]
    async fn test_subscribers_see_whole_run() {
        let rec = Arc::new(Recorder::default());
        let subs: Vec<Arc<dyn Subscribe>> = vec![rec.clone()];
        let flow = Flow::new(FlowConfig::default(), subs);

        let res = flow
            .map(vec![1, 2, 3], |x: i32, done: Done<i32>| done.ok(x + 1))
            .await;
        assert_eq!(res, Ok(vec![2, 3, 4]));
        flow.shutdown().await;

        let seen = rec.seen.lock().unwrap();
        assert_eq!(seen.first().map(|e| e.kind), Some(EventKind::FlowStarted));
        assert_eq!(seen.last().map(|e| e.kind), Some(EventKind::FlowFinished));
        assert!(seen.iter().all(|e| e.flow == Some(FlowKind::Map)));
        assert_eq!(
            seen.iter().filter(|e| e.kind == EventKind::TaskStarting).count(),
            3
        );
        assert!(seen.windows(2).all(|w| w[0].seq < w[1].seq));
    }

    #[tokio::test]
    async fn test_runs_get_distinct_ids() {
        let flow = Flow::default();
        let mut rx = flow.bus().subscribe();
        flow.parallel::<i32>(Vec::new(), None).await.unwrap();
        flow.serial::<i32>(Vec::new()).await.unwrap();

        let a = rx.try_recv().unwrap();
        let _ = rx.try_recv().unwrap();
        let b = rx.try_recv().unwrap();
        assert_eq!(a.flow, Some(FlowKind::Parallel));
        assert_eq!(b.flow, Some(FlowKind::Serial));
        assert_ne!(a.run, b.run);
    }

    #[tokio::test(start_paused = true)]
    async fn test_config_timeout_applies_to_tasks() {
        let flow = Flow::new(
            FlowConfig {
                timeout: Duration::from_millis(50),
                ..FlowConfig::default()
            },
            Vec::new(),
        );
        let stuck: BoxTask<(), i32> = TaskFn::boxed("stuck", |_: (), done: Done<i32>| {
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(10)).await;
                done.ok(1);
            });
        });
        let quick: BoxTask<(), i32> = TaskFn::boxed("quick", |_: (), done: Done<i32>| done.ok(0));

        let res = flow.parallel(vec![quick, stuck], None).await;
        assert_eq!(
            res,
            Err(TaskError::Timeout {
                timeout: Duration::from_millis(50)
            })
        );
    }
}
