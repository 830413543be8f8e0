//! # Cross-platform OS signal handling.
//!
//! Provides [`wait_for_exit_signal`] an async helper that completes when the process
//! receives a termination signal, and [`ExitHandle`], the in-process way of asking a
//! running main loop to stop.
//!
//! ## Signals
//! **Unix platforms:**
//! - `SIGINT` (Ctrl-C in terminal)
//! - `SIGTERM` (default kill signal, used by systemd/launchers)
//! - `SIGQUIT` (quit signal)
//!
//! **Windows platforms:**
//! - `Ctrl-C` via [`tokio::signal::ctrl_c`]

use tokio_util::sync::CancellationToken;

use crate::events::{Bus, Event, EventKind};

/// Waits for a termination signal and returns its name.
///
/// Each call creates independent signal listeners.
/// Returns `Err` if signal registration fails.
#[cfg(unix)]
pub async fn wait_for_exit_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    let name = tokio::select! {
        _ = sigint.recv()  => "SIGINT",
        _ = sigterm.recv() => "SIGTERM",
        _ = sigquit.recv() => "SIGQUIT",
    };
    Ok(name)
}

/// Waits for a termination signal and returns its name.
///
/// Each call creates independent signal listeners.
/// Returns `Err` if signal registration fails.
#[cfg(not(unix))]
pub async fn wait_for_exit_signal() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("ctrl_c")
}

/// Cloneable handle that asks a frontend's main loop to stop.
///
/// An exit request interrupts an idle sleep in progress; the loop still pumps the
/// task queue once more before it stops.
#[derive(Clone, Debug)]
pub struct ExitHandle {
    token: CancellationToken,
    bus: Bus,
}

impl ExitHandle {
    pub(crate) fn new(token: CancellationToken, bus: Bus) -> Self {
        Self { token, bus }
    }

    /// Requests exit. Idempotent.
    pub fn request_exit(&self) {
        self.request_exit_by("handle");
    }

    /// Requests exit on behalf of `source`; only the first request publishes `ExitRequested`.
    pub(crate) fn request_exit_by(&self, source: &'static str) {
        if self.token.is_cancelled() {
            return;
        }
        self.token.cancel();
        self.bus
            .publish(Event::new(EventKind::ExitRequested).with_source(source));
    }

    /// Returns true once exit has been requested.
    pub fn is_exit_requested(&self) -> bool {
        self.token.is_cancelled()
    }
}
