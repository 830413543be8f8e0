//! # Lifecycle events emitted by the frontend controller.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Lifecycle events**: state changes and startup milestones
//! - **Loop events**: exit requests and loop termination
//! - **Shutdown events**: per-step progress of the shutdown plan
//! - **Subscriber events**: delivery problems inside the subscriber set
//!
//! The [`Event`] struct carries additional metadata such as timestamps, the
//! lifecycle state, the shutdown step and a reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use frontvisor::{Event, EventKind, LifecycleState};
//!
//! let ev = Event::new(EventKind::StateChanged)
//!     .with_state(LifecycleState::Running)
//!     .with_reason("first tick");
//!
//! assert_eq!(ev.kind, EventKind::StateChanged);
//! assert_eq!(ev.state, Some(LifecycleState::Running));
//! assert_eq!(ev.reason.as_deref(), Some("first tick"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::core::{LifecycleState, StepId};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `source`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `source`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,

    // === Lifecycle events ===
    /// The controller entered a new lifecycle state.
    ///
    /// Sets:
    /// - `state`: the new state
    StateChanged,

    /// A startup call into a collaborator reported a failure; startup continued.
    ///
    /// Sets:
    /// - `source`: the failing call (e.g., "core.init")
    /// - `reason`: failure message
    StartupFailure,

    /// The initial content load was accepted by the task queue.
    ///
    /// Sets:
    /// - `argc`: argument count of the launch context
    ContentLoadSubmitted,

    /// The initial content load was rejected; the main loop will not run.
    ///
    /// Sets:
    /// - `reason`: failure message
    ContentLoadFailed,

    // === Loop events ===
    /// Exit was requested from outside the runloop (OS signal or [`ExitHandle`](crate::ExitHandle)).
    ///
    /// Sets:
    /// - `source`: requester (e.g., "signal")
    ExitRequested,

    /// The main loop stopped.
    ///
    /// Sets:
    /// - `ticks`: number of ticks executed
    /// - `reason`: "terminate" or "exit_requested"
    LoopStopped,

    // === Shutdown events ===
    /// A shutdown step is about to run.
    ///
    /// Sets:
    /// - `step`: step id
    StepStarted,

    /// A shutdown step finished.
    ///
    /// Sets:
    /// - `step`: step id
    StepCompleted,

    /// A shutdown step reported a failure; the plan continues.
    ///
    /// Sets:
    /// - `step`: step id
    /// - `reason`: failure message
    StepFailed,

    /// A shutdown step did not run.
    ///
    /// Sets:
    /// - `step`: step id
    /// - `reason`: skip reason label
    StepSkipped,

    /// The platform driver replaced the process; remaining steps are skipped.
    ///
    /// Sets:
    /// - `step`: the exit-spawn step
    ProcessReplaced,

    /// The shutdown plan ran to the end.
    ///
    /// Sets:
    /// - `failures`: number of failed steps
    ShutdownCompleted,
}

/// Lifecycle event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Lifecycle state, for state changes.
    pub state: Option<LifecycleState>,
    /// Shutdown step, for shutdown events.
    pub step: Option<StepId>,
    /// Human-readable reason (errors, skip reasons, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Emitter detail: failing call, subscriber name or exit requester.
    pub source: Option<Arc<str>>,
    /// Ticks executed by the main loop, for `LoopStopped`.
    pub ticks: Option<u64>,
    /// Launch argument count, for `ContentLoadSubmitted`.
    pub argc: Option<usize>,
    /// Failed shutdown steps, for `ShutdownCompleted`.
    pub failures: Option<usize>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            state: None,
            step: None,
            reason: None,
            source: None,
            ticks: None,
            argc: None,
            failures: None,
        }
    }

    /// Attaches a lifecycle state.
    #[inline]
    pub fn with_state(mut self, state: LifecycleState) -> Self {
        self.state = Some(state);
        self
    }

    /// Attaches a shutdown step.
    #[inline]
    pub fn with_step(mut self, step: StepId) -> Self {
        self.step = Some(step);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches the emitter detail.
    #[inline]
    pub fn with_source(mut self, source: impl Into<Arc<str>>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attaches the number of ticks run.
    #[inline]
    pub fn with_ticks(mut self, n: u64) -> Self {
        self.ticks = Some(n);
        self
    }

    /// Attaches the launch argument count.
    #[inline]
    pub fn with_argc(mut self, argc: usize) -> Self {
        self.argc = Some(argc);
        self
    }

    /// Attaches the number of failed shutdown steps.
    #[inline]
    pub fn with_failures(mut self, failures: usize) -> Self {
        self.failures = Some(failures);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_source(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_source(subscriber)
            .with_reason(info)
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }

    #[inline]
    pub fn is_subscriber_panic(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberPanicked)
    }
}
