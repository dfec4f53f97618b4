//! # Sequential runner.
//!
//! Runs tasks one at a time, threading each success value into the next task.
//!
//! ```text
//! task[0](None) ─ok(v0)─► task[1](Some(v0)) ─ok(v1)─► ... ─► Ok(Some(v_last))
//!        │                      │
//!        └──── err(e) ──────────┴──► TasksSkipped(rest) ─► Err(e)
//! ```
//!
//! ## Rules
//! - Task `i+1` is started only after task `i` has reported.
//! - The first error resolves the run; later tasks are dropped unstarted.
//! - An empty input resolves `Ok(None)`.

use crate::{
    core::runner::{launch, Run},
    error::TaskError,
    events::EventKind,
    tasks::BoxTask,
};

/// Drives one serial run to completion.
pub(crate) async fn run_serial<V>(
    run: Run,
    tasks: Vec<BoxTask<Option<V>, V>>,
) -> Result<Option<V>, TaskError>
where
    V: Send + 'static,
{
    let total = tasks.len();
    run.started(total, None);

    let mut prev: Option<V> = None;
    let mut queue = tasks.into_iter().enumerate();
    while let Some((index, task)) = queue.next() {
        let (_, res) = launch(&run, index, 1, task, prev.take()).await;
        match res {
            Ok(value) => {
                run.task_completed(index);
                prev = Some(value);
            }
            Err(err) => {
                run.task_failed(index, &err);
                run.error_latched(index, &err);

                let skipped = queue.len();
                if skipped > 0 {
                    run.publish(
                        run.event(EventKind::TasksSkipped)
                            .with_index(index)
                            .with_total(skipped),
                    );
                }
                run.failed(total, index, &err);
                return Err(err);
            }
        }
    }

    run.finished(total);
    Ok(prev)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Bus, FlowKind};
    use crate::tasks::{make_async, Done, TaskFn};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn run(bus: &Bus) -> Run {
        Run::new(FlowKind::Serial, bus.clone(), None)
    }

    fn add_one(name: &'static str) -> BoxTask<Option<i32>, i32> {
        TaskFn::boxed(name, |data: Option<i32>, done: Done<i32>| {
            done.ok(data.unwrap_or_default() + 1)
        })
    }

    #[tokio::test]
    async fn test_threads_values_in_order() {
        let first: BoxTask<Option<String>, String> =
            TaskFn::boxed("first", |data: Option<String>, done: Done<String>| {
                assert!(data.is_none());
                done.ok("first".to_string());
            });
        let second: BoxTask<Option<String>, String> =
            TaskFn::boxed("second", |data: Option<String>, done: Done<String>| {
                done.ok(format!("{} data", data.unwrap_or_default()));
            });

        let res = run_serial(run(&Bus::new(16)), vec![first, second]).await;
        assert_eq!(res, Ok(Some("first data".to_string())));
    }

    #[tokio::test]
    async fn test_empty_input_is_none() {
        let res = run_serial::<i32>(run(&Bus::new(16)), Vec::new()).await;
        assert_eq!(res, Ok(None));
    }

    #[tokio::test]
    async fn test_three_tasks_count_up() {
        let first: BoxTask<Option<i32>, i32> =
            TaskFn::boxed("zero", |_: Option<i32>, done: Done<i32>| done.ok(0));
        let res = run_serial(run(&Bus::new(16)), vec![first, add_one("a"), add_one("b")]).await;
        assert_eq!(res, Ok(Some(2)));
    }

    #[tokio::test]
    async fn test_error_short_circuits() {
        let second_called = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&second_called);

        let first: BoxTask<Option<i32>, i32> =
            TaskFn::boxed("first", |_: Option<i32>, done: Done<i32>| done.err("first failed"));
        let second: BoxTask<Option<i32>, i32> =
            TaskFn::boxed("second", move |data: Option<i32>, done: Done<i32>| {
                flag.store(true, Ordering::SeqCst);
                done.ok(data.unwrap_or_default() + 1);
            });

        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let res = run_serial(run(&bus), vec![first, second, add_one("third")]).await;

        assert_eq!(res, Err(TaskError::fail("first failed")));
        assert!(!second_called.load(Ordering::SeqCst));

        let mut kinds = Vec::new();
        let mut skipped = None;
        while let Ok(ev) = rx.try_recv() {
            if ev.kind == EventKind::TasksSkipped {
                skipped = ev.total;
            }
            kinds.push(ev.kind);
        }
        assert_eq!(skipped, Some(2));
        assert_eq!(kinds.first(), Some(&EventKind::FlowStarted));
        assert_eq!(kinds.last(), Some(&EventKind::FlowFailed));
        assert_eq!(
            kinds.iter().filter(|k| **k == EventKind::TaskStarting).count(),
            1
        );
    }

    #[tokio::test]
    async fn test_error_in_middle_gets_threaded_value_and_stops() {
        let seen = Arc::new(std::sync::Mutex::new(None));
        let third_called = Arc::new(AtomicBool::new(false));
        let (s, flag) = (Arc::clone(&seen), Arc::clone(&third_called));

        let first: BoxTask<Option<i32>, i32> =
            TaskFn::boxed("first", |_: Option<i32>, done: Done<i32>| done.ok(7));
        let second: BoxTask<Option<i32>, i32> =
            TaskFn::boxed("second", move |data: Option<i32>, done: Done<i32>| {
                *s.lock().unwrap() = data;
                done.err("second failed");
            });
        let third: BoxTask<Option<i32>, i32> =
            TaskFn::boxed("third", move |data: Option<i32>, done: Done<i32>| {
                flag.store(true, Ordering::SeqCst);
                done.ok(data.unwrap_or_default());
            });

        let res = run_serial(run(&Bus::new(16)), vec![first, second, third]).await;
        assert_eq!(res, Err(TaskError::fail("second failed")));
        assert_eq!(*seen.lock().unwrap(), Some(7));
        assert!(!third_called.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deferred_tasks_never_overlap() {
        let active = Arc::new(AtomicUsize::new(0));
        let tasks: Vec<BoxTask<Option<u32>, u32>> = (0..4)
            .map(|i| {
                let active = Arc::clone(&active);
                TaskFn::boxed(format!("step-{i}"), move |data: Option<u32>, done: Done<u32>| {
                    assert_eq!(active.fetch_add(1, Ordering::SeqCst), 0);
                    tokio::spawn(async move {
                        tokio::time::sleep(Duration::from_millis(10 * (4 - i as u64))).await;
                        active.fetch_sub(1, Ordering::SeqCst);
                        done.ok(data.unwrap_or_default() * 10 + i);
                    });
                })
            })
            .collect();

        let res = run_serial(run(&Bus::new(16)), tasks).await;
        assert_eq!(res, Ok(Some(123)));
    }

    #[tokio::test]
    async fn test_adapter_tasks_chain() {
        let double = make_async(|prev: Option<u64>| Ok::<_, TaskError>(prev.unwrap_or(1) * 2));
        let tasks: Vec<BoxTask<Option<u64>, u64>> = vec![
            Box::new(double.clone()),
            Box::new(double.clone()),
            Box::new(double),
        ];
        let res = run_serial(run(&Bus::new(16)), tasks).await;
        assert_eq!(res, Ok(Some(8)));
    }
}
