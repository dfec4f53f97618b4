//! # Mapper.
//!
//! Builds one task per item by partially applying the iteratee, then runs them
//! through the parallel runner with unbounded concurrency. Ordering, error latching
//! and "run everything" semantics are those of [`run_parallel`](super::parallel::run_parallel).

use std::sync::Arc;

use crate::tasks::{BoxTask, Done, TaskFn};

/// Turns `items` into parameterless tasks sharing `iteratee`.
pub(crate) fn map_tasks<T, V, F>(items: Vec<T>, iteratee: F) -> Vec<BoxTask<(), V>>
where
    T: Send + 'static,
    V: 'static,
    F: Fn(T, Done<V>) + Send + Sync + 'static,
{
    let iteratee = Arc::new(iteratee);
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let f = Arc::clone(&iteratee);
            TaskFn::boxed(format!("map[{index}]"), move |(), done: Done<V>| {
                (*f)(item, done)
            })
        })
        .collect()
}
