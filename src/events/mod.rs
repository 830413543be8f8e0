//! Lifecycle events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted while a frontend starts, runs and shuts down.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Frontend`, `ShutdownPlan::execute`, the OS signal watcher,
//!   `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the frontend's event listener (fans out to `SubscriberSet`)
//!   and any receiver obtained from `Frontend::subscribe()`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
