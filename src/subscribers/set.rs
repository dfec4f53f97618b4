//! # Fan-out of flow events to subscribers.
//!
//! Each subscriber gets its own bounded queue and a worker task draining it, so
//! a slow subscriber never delays a run or the other subscribers.
//!
//! ```text
//! emit(&Event) ── Arc<Event> ──┬─► lane "log"     [queue] ─► worker ─► on_event()
//!                              ├─► lane "metrics" [queue] ─► worker ─► on_event()
//!                              └─► lane ...
//! ```
//!
//! ## Rules
//! - `emit` never waits. A full queue drops the event for that lane only and
//!   bumps the lane's drop counter; drops are summarized once on shutdown.
//! - Events reach one subscriber in emit order. There is no ordering across
//!   subscribers.
//! - A panicking `on_event` is reported and the worker keeps going.

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::FutureExt;
use tokio::{
    sync::mpsc::{self, error::TrySendError},
    task::JoinHandle,
};

use crate::error::TaskError;
use crate::events::Event;

use super::Subscribe;

/// Queue feeding one subscriber.
struct Lane {
    name: &'static str,
    tx: mpsc::Sender<Arc<Event>>,
    dropped: AtomicU64,
}

/// Subscribers of one [`Flow`](crate::Flow), each behind its own queue.
pub struct SubscriberSet {
    lanes: Vec<Lane>,
    workers: Vec<JoinHandle<()>>,
}

impl SubscriberSet {
    /// Spawns one worker per subscriber.
    ///
    /// Needs a tokio runtime unless `subs` is empty.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        let (lanes, workers) = subs
            .into_iter()
            .map(|sub| {
                let (tx, rx) = mpsc::channel(sub.queue_capacity().max(1));
                let lane = Lane {
                    name: sub.name(),
                    tx,
                    dropped: AtomicU64::new(0),
                };
                (lane, spawn_worker(sub, rx))
            })
            .unzip();
        Self { lanes, workers }
    }

    /// Queues `event` for every subscriber.
    pub fn emit(&self, event: &Event) {
        let ev = Arc::new(event.clone());
        for lane in &self.lanes {
            if let Err(TrySendError::Full(_) | TrySendError::Closed(_)) =
                lane.tx.try_send(Arc::clone(&ev))
            {
                lane.dropped.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Events dropped so far because a queue was full, over all subscribers.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.lanes
            .iter()
            .map(|l| l.dropped.load(Ordering::Relaxed))
            .sum()
    }

    /// Closes every queue and waits until the workers have drained them.
    pub async fn shutdown(self) {
        let mut txs = Vec::with_capacity(self.lanes.len());
        for lane in self.lanes {
            let dropped = lane.dropped.into_inner();
            if dropped > 0 {
                eprintln!("[taskflow] subscriber '{}' missed {dropped} events", lane.name);
            }
            txs.push(lane.tx);
        }
        drop(txs);

        for worker in self.workers {
            let _ = worker.await;
        }
    }

    /// True if there are no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lanes.len()
    }
}

fn spawn_worker(sub: Arc<dyn Subscribe>, mut rx: mpsc::Receiver<Arc<Event>>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(ev) = rx.recv().await {
            let handled = AssertUnwindSafe(sub.on_event(&ev)).catch_unwind().await;
            if let Err(payload) = handled {
                eprintln!(
                    "[taskflow] subscriber '{}' panicked on {:?}: {}",
                    sub.name(),
                    ev.kind,
                    TaskError::from_panic(payload).as_message()
                );
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<EventKind>>,
    }

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, event: &Event) {
            self.seen.lock().unwrap().push(event.kind);
        }

        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    struct Panicky;

    #[async_trait]
    impl Subscribe for Panicky {
        async fn on_event(&self, _event: &Event) {
            panic!("subscriber failure");
        }
    }

    /// Never drains its single-slot queue while `gate` is closed.
    struct Stuck {
        gate: tokio::sync::Semaphore,
    }

    #[async_trait]
    impl Subscribe for Stuck {
        async fn on_event(&self, _event: &Event) {
            let _permit = self.gate.acquire().await;
        }

        fn name(&self) -> &'static str {
            "stuck"
        }

        fn queue_capacity(&self) -> usize {
            1
        }
    }

    #[tokio::test]
    async fn test_fan_out_preserves_per_subscriber_order() {
        let rec = Arc::new(Recorder::default());
        let subs: Vec<Arc<dyn Subscribe>> = vec![rec.clone(), Arc::new(Panicky)];
        let set = SubscriberSet::new(subs);
        assert_eq!(set.len(), 2);

        set.emit(&Event::new(EventKind::FlowStarted));
        set.emit(&Event::new(EventKind::TaskStarting));
        set.emit(&Event::new(EventKind::FlowFinished));
        set.shutdown().await;

        assert_eq!(
            *rec.seen.lock().unwrap(),
            vec![
                EventKind::FlowStarted,
                EventKind::TaskStarting,
                EventKind::FlowFinished
            ]
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_full_queue_drops_for_that_lane_only() {
        let rec = Arc::new(Recorder::default());
        let stuck = Arc::new(Stuck {
            gate: tokio::sync::Semaphore::new(0),
        });
        let subs: Vec<Arc<dyn Subscribe>> = vec![rec.clone(), stuck.clone()];
        let set = SubscriberSet::new(subs);

        // Workers have not run yet: the stuck lane holds one event, the rest overflow.
        for _ in 0..3 {
            set.emit(&Event::new(EventKind::TaskCompleted));
        }
        assert_eq!(set.dropped(), 2);

        stuck.gate.add_permits(8);
        set.shutdown().await;
        assert_eq!(rec.seen.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_empty_set_needs_no_runtime() {
        let set = SubscriberSet::new(Vec::new());
        assert!(set.is_empty());
        set.emit(&Event::new(EventKind::FlowStarted));
        assert_eq!(set.dropped(), 0);
    }
}
