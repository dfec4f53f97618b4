//! # Flow configuration.
//!
//! Provides [`FlowConfig`] with the settings shared by every run started from a
//! [`Flow`](crate::Flow).
//!
//! ## Sentinel values
//! - `timeout = 0s` → no per-task timeout (treated as `None` by [`FlowConfig::task_timeout`])

use std::time::Duration;

/// Configuration for a [`Flow`](crate::Flow).
///
/// ## Field semantics
/// - `timeout`: Per-task wait limit (`0s` = wait until the task reports)
/// - `bus_capacity`: Event bus ring buffer size (min 1; clamped by Bus)
///
/// All fields are public. Prefer the helper accessors over checking the `0`
/// sentinels directly.
#[derive(Clone, Debug)]
pub struct FlowConfig {
    /// How long a runner waits for a single task to report.
    ///
    /// - `Duration::ZERO` = no timeout
    /// - `> 0` = the task's slot resolves with `TaskError::Timeout` once elapsed
    ///
    /// The task itself is never aborted; a report arriving after the timeout
    /// is discarded.
    pub timeout: Duration,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` messages skip
    /// older items. Minimum value is 1 (enforced by Bus).
    pub bus_capacity: usize,
}

impl FlowConfig {
    /// Returns the per-task timeout as an `Option`.
    ///
    /// - `None` → no timeout
    /// - `Some(d)` → applied to every task of every run
    #[inline]
    pub fn task_timeout(&self) -> Option<Duration> {
        if self.timeout == Duration::ZERO {
            None
        } else {
            Some(self.timeout)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for FlowConfig {
    /// Default configuration:
    ///
    /// - `timeout = 0s` (no timeout)
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            timeout: Duration::ZERO,
            bus_capacity: 1024,
        }
    }
}
