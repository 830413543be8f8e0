//! # Event subscribers for frontvisor.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out and
//! the built-in [`LogWriter`].
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Frontend ── publish(Event) ──► Bus ──► event listener ──► SubscriberSet::emit(&Event)
//!                                                                  │
//!                                                        ┌─────────┼─────────┐
//!                                                        ▼         ▼         ▼
//!                                                    LogWriter  Metrics   Custom
//! ```
//!
//! ## Subscriber types
//! - **Passive subscribers** - observe and react to events (logging, metrics, crash reports)
//! - **Stateful subscribers** - keep their own view of the lifecycle

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
