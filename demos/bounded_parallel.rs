//! # Example: Bounded Parallel with LogWriter
//!
//! Five downloads, at most two in flight. One of them fails; every other
//! download still runs and the flow reports the first failure.
//!
//! Run with:
//! ```bash
//! cargo run --example bounded_parallel --features logging
//! ```

use std::{sync::Arc, time::Duration};

use taskflow::{BoxTask, Done, Flow, FlowConfig, LogWriter, Subscribe, TaskFn};

/// Download simulation: sleeps `ms`, then reports a byte count or an error.
fn download(name: &'static str, ms: u64, fail: bool) -> BoxTask<(), usize> {
    TaskFn::boxed(name, move |_: (), done: Done<usize>| {
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            if fail {
                done.err(format!("{name}: connection refused"));
            } else {
                done.ok(ms as usize * 10);
            }
        });
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cfg = FlowConfig {
        timeout: Duration::from_secs(2),
        ..FlowConfig::default()
    };
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let flow = Flow::new(cfg, subs);

    let tasks = vec![
        download("index.html", 300, false),
        download("app.js", 500, false),
        download("logo.png", 100, true),
        download("style.css", 200, false),
        download("font.woff", 400, false),
    ];

    let res = flow.parallel(tasks, Some(2)).await;
    flow.shutdown().await;

    match res {
        Ok(sizes) => println!("[main] downloaded {} bytes", sizes.iter().sum::<usize>()),
        Err(e) => println!("[main] flow failed: {e}"),
    }
}
