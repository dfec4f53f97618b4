//! Error types reported by tasks and runners.
//!
//! [`TaskError`] is the only error that ever reaches a caller of
//! [`serial`](crate::serial), [`parallel`](crate::parallel) or [`map`](crate::map).
//! It provides helper methods (`as_label`, `as_message`) for logging/metrics.

use std::any::Any;
use std::time::Duration;
use thiserror::Error;

/// # Errors produced by task execution.
///
/// Two variants come from tasks themselves (`Fail` reported through the
/// completion handle, `Panicked` captured by an adapter or a runner); the
/// other two are produced by the runner when a task breaks the completion
/// contract (`Abandoned`) or exceeds the flow timeout (`Timeout`).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Task reported a failure through its completion handle.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Task code panicked; the panic was captured and never re-raised.
    #[error("task panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },

    /// Completion handle was dropped without a result.
    #[error("completion handle dropped without a result")]
    Abandoned,

    /// No result arrived within the flow's per-task timeout.
    #[error("timed out after {timeout:?}")]
    Timeout {
        /// The timeout duration that was exceeded.
        timeout: Duration,
    },
}

impl TaskError {
    /// Shorthand for [`TaskError::Fail`].
    ///
    /// # Example
    /// ```
    /// use taskflow::TaskError;
    ///
    /// let err = TaskError::fail("boom");
    /// assert_eq!(err.to_string(), "execution failed: boom");
    /// ```
    pub fn fail(error: impl Into<String>) -> Self {
        TaskError::Fail {
            error: error.into(),
        }
    }

    /// Builds a [`TaskError::Panicked`] from a `catch_unwind` payload.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let info = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        TaskError::Panicked { info }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskflow::TaskError;
    ///
    /// assert_eq!(TaskError::Abandoned.as_label(), "task_abandoned");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Panicked { .. } => "task_panicked",
            TaskError::Abandoned => "task_abandoned",
            TaskError::Timeout { .. } => "task_timeout",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Fail { error } => format!("error: {error}"),
            TaskError::Panicked { info } => format!("panic: {info}"),
            TaskError::Abandoned => "completion handle dropped".to_string(),
            TaskError::Timeout { timeout } => format!("timeout: {timeout:?}"),
        }
    }

    /// True if the error was reported by the task itself rather than
    /// synthesized by the runner.
    pub fn is_reported(&self) -> bool {
        matches!(self, TaskError::Fail { .. } | TaskError::Panicked { .. })
    }
}

impl From<String> for TaskError {
    fn from(error: String) -> Self {
        TaskError::Fail { error }
    }
}

impl From<&str> for TaskError {
    fn from(error: &str) -> Self {
        TaskError::fail(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(TaskError::fail("x").as_label(), "task_failed");
        assert_eq!(
            TaskError::Panicked { info: "x".into() }.as_label(),
            "task_panicked"
        );
        assert_eq!(
            TaskError::Timeout {
                timeout: Duration::from_millis(5)
            }
            .as_label(),
            "task_timeout"
        );
    }

    #[test]
    fn test_from_panic_payloads() {
        let err = TaskError::from_panic(Box::new("static"));
        assert_eq!(err, TaskError::Panicked { info: "static".into() });

        let err = TaskError::from_panic(Box::new(String::from("owned")));
        assert_eq!(err, TaskError::Panicked { info: "owned".into() });

        let err = TaskError::from_panic(Box::new(42u8));
        assert!(matches!(err, TaskError::Panicked { .. }));
    }

    #[test]
    fn test_string_conversions_are_failures() {
        let a: TaskError = "Error!".into();
        let b: TaskError = String::from("Error!").into();
        assert_eq!(a, b);
        assert!(a.is_reported());
        assert!(!TaskError::Abandoned.is_reported());
    }
}
