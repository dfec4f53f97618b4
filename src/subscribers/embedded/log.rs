//! # LogWriter: simple event printer
//!
//! Prints one line per [`Event`] to stdout. Meant for demos and debugging.
//!
//! ## Example output
//! ```text
//! [flow-started] run=3 flow=parallel total=3 limit=2
//! [starting] run=3 index=0 task="fetch" in_flight=1
//! [failed] run=3 index=1 err="execution failed: refused"
//! [error-latched] run=3 index=1 err="execution failed: refused"
//! [completed] run=3 index=0
//! [flow-failed] run=3 flow=parallel err="execution failed: refused"
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// One log line per event.
fn render(e: &Event) -> String {
    let run = e.run.unwrap_or_default();
    let flow = e.flow.map_or("?", |f| f.as_str());
    let idx = e.index.map_or_else(|| "-".to_string(), |i| i.to_string());
    let why = e.reason.as_deref().unwrap_or("");
    match e.kind {
        EventKind::FlowStarted => match e.limit {
            Some(limit) => format!(
                "[flow-started] run={run} flow={flow} total={} limit={limit}",
                e.total.unwrap_or_default()
            ),
            None => format!(
                "[flow-started] run={run} flow={flow} total={}",
                e.total.unwrap_or_default()
            ),
        },
        EventKind::FlowFinished => format!(
            "[flow-finished] run={run} flow={flow} total={}",
            e.total.unwrap_or_default()
        ),
        EventKind::FlowFailed => format!("[flow-failed] run={run} flow={flow} err={why:?}"),
        EventKind::TaskStarting => format!(
            "[starting] run={run} index={idx} task={:?} in_flight={}",
            e.task.as_deref().unwrap_or(""),
            e.in_flight.unwrap_or_default()
        ),
        EventKind::TaskCompleted => format!("[completed] run={run} index={idx}"),
        EventKind::TaskFailed => format!("[failed] run={run} index={idx} err={why:?}"),
        EventKind::ErrorLatched => format!("[error-latched] run={run} index={idx} err={why:?}"),
        EventKind::TimeoutHit => format!(
            "[timeout] run={run} index={idx} after={}ms",
            e.timeout_ms.unwrap_or_default()
        ),
        EventKind::TasksSkipped => format!(
            "[skipped] run={run} after_index={idx} count={}",
            e.total.unwrap_or_default()
        ),
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        println!("{}", render(e));
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::FlowKind;

    #[test]
    fn test_renders_flow_and_task_lines() {
        let started = Event::new(EventKind::FlowStarted)
            .with_run(3)
            .with_flow(FlowKind::Parallel)
            .with_total(3)
            .with_limit(2);
        assert_eq!(
            render(&started),
            "[flow-started] run=3 flow=parallel total=3 limit=2"
        );

        let starting = Event::new(EventKind::TaskStarting)
            .with_run(3)
            .with_index(0)
            .with_task("fetch")
            .with_in_flight(1);
        assert_eq!(
            render(&starting),
            "[starting] run=3 index=0 task=\"fetch\" in_flight=1"
        );

        let failed = Event::new(EventKind::FlowFailed)
            .with_run(3)
            .with_flow(FlowKind::Parallel)
            .with_reason("execution failed: refused");
        assert_eq!(
            render(&failed),
            "[flow-failed] run=3 flow=parallel err=\"execution failed: refused\""
        );
    }
}
