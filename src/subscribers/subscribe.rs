//! # Subscriber trait
//!
//! Implement [`Subscribe`] to observe the events of every run started by a
//! [`Flow`](crate::Flow). The flow's [`SubscriberSet`](crate::SubscriberSet) calls
//! `on_event` from a worker task dedicated to the subscriber.
//!
//! A slow `on_event` only delays that subscriber: its queue
//! ([`Subscribe::queue_capacity`]) fills up and further events are dropped for it.
//! Runs never wait for subscribers.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use taskflow::{Event, EventKind, Subscribe};
//!
//! struct FailureCounter;
//!
//! #[async_trait]
//! impl Subscribe for FailureCounter {
//!     async fn on_event(&self, ev: &Event) {
//!         if ev.kind == EventKind::TaskFailed {
//!             // bump a counter...
//!         }
//!     }
//!     fn name(&self) -> &'static str { "failure-counter" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Receives flow events. Must not block the runtime.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles one event.
    async fn on_event(&self, event: &Event);

    /// Name used in diagnostics.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Events buffered for this subscriber before new ones are dropped.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
