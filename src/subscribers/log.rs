//! # LogWriter: lifecycle events as `tracing` records
//!
//! A subscriber that renders incoming [`Event`]s through `tracing`, so they end up
//! wherever the application's tracing subscriber writes.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! INFO frontvisor: state changed state="preinitialized"
//! INFO frontvisor: content load submitted argc=2
//! INFO frontvisor: loop stopped ticks=1822 reason="terminate"
//! WARN frontvisor: shutdown step failed step="driver_deinit" err="..."
//! INFO frontvisor: shutdown completed failures=1
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

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let state = e.state.map_or("none", |s| s.as_label());
        let step = e.step.map_or("none", |s| s.as_label());
        let reason = e.reason.as_deref().unwrap_or("none");
        let source = e.source.as_deref().unwrap_or("unknown");

        match e.kind {
            EventKind::StateChanged => {
                tracing::info!(target: "frontvisor", state, "state changed");
            }
            EventKind::StartupFailure => {
                tracing::warn!(target: "frontvisor", call = source, err = reason, "startup call failed");
            }
            EventKind::ContentLoadSubmitted => {
                tracing::info!(target: "frontvisor", argc = e.argc.unwrap_or(0), "content load submitted");
            }
            EventKind::ContentLoadFailed => {
                tracing::error!(target: "frontvisor", err = reason, "content load failed");
            }
            EventKind::ExitRequested => {
                tracing::info!(target: "frontvisor", by = source, "exit requested");
            }
            EventKind::LoopStopped => {
                tracing::info!(target: "frontvisor", ticks = e.ticks.unwrap_or(0), reason, "loop stopped");
            }
            EventKind::StepStarted => {
                tracing::debug!(target: "frontvisor", step, "shutdown step started");
            }
            EventKind::StepCompleted => {
                tracing::debug!(target: "frontvisor", step, "shutdown step completed");
            }
            EventKind::StepSkipped => {
                tracing::debug!(target: "frontvisor", step, reason, "shutdown step skipped");
            }
            EventKind::StepFailed => {
                tracing::warn!(target: "frontvisor", step, err = reason, "shutdown step failed");
            }
            EventKind::ProcessReplaced => {
                tracing::info!(target: "frontvisor", step, "process replaced");
            }
            EventKind::ShutdownCompleted => {
                tracing::info!(target: "frontvisor", failures = e.failures.unwrap_or(0), "shutdown completed");
            }
            EventKind::SubscriberOverflow => {
                tracing::warn!(target: "frontvisor", subscriber = source, reason, "subscriber overflow");
            }
            EventKind::SubscriberPanicked => {
                tracing::error!(
                    target: "frontvisor",
                    subscriber = source,
                    info = reason,
                    "subscriber panicked"
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
