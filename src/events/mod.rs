//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted while runs execute.
//!
//! ## Contents
//! - [`EventKind`], [`Event`], [`FlowKind`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: the serial and parallel drivers (map runs through the parallel one).
//! - **Consumers**: the `Flow` listener (fans out to `SubscriberSet`) and any
//!   receiver obtained from [`Flow::bus`](crate::Flow::bus).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind, FlowKind};
