//! # Frontend configuration.
//!
//! Provides [`Config`] centralized settings for the lifecycle controller.
//!
//! ## Sentinel values
//! - `max_idle_sleep = 0s` → the core's idle hint is used as-is (no cap)
//! - `core_path = None` → `exit_spawn` receives no successor path

use std::path::PathBuf;
use std::time::Duration;

/// Configuration of a [`Frontend`](crate::Frontend).
///
/// ## Field semantics
/// - `max_idle_sleep`: Upper bound on one idle sleep (`0s` = no cap)
/// - `handle_os_signals`: Turn SIGINT/SIGTERM/SIGQUIT (Ctrl-C on Windows) into an exit request
/// - `shutdown_logger`: Run the logger shutdown step (platform policy)
/// - `bus_capacity`: Event bus ring buffer size (min 1; clamped by Bus)
/// - `core_path`: Previously resolved successor path handed to `exit_spawn`
///
/// ## Notes
/// All fields are public for flexibility. Prefer using helper accessors to avoid
/// sprinkling sentinel checks (`0`) across the codebase.
#[derive(Clone, Debug)]
pub struct Config {
    /// Longest single idle sleep.
    ///
    /// - `Duration::ZERO` = follow the core's hint
    /// - `> 0` = clamp the hint to this value
    pub max_idle_sleep: Duration,

    /// Whether the main loop listens for OS termination signals.
    ///
    /// A signal interrupts an idle sleep already in progress and ends the loop
    /// after the current tick's task pump.
    pub handle_os_signals: bool,

    /// Whether shutdown closes the logging backend.
    ///
    /// Off by default on Android, where the platform owns the log.
    pub shutdown_logger: bool,

    /// Capacity of the event bus broadcast channel ring buffer.
    pub bus_capacity: usize,

    /// Path of the program that may replace this process at exit.
    pub core_path: Option<PathBuf>,
}

impl Config {
    /// Returns the idle sleep cap as an `Option`.
    ///
    /// - `None` → no cap
    /// - `Some(d)` → sleeps never exceed `d`
    #[inline]
    pub fn idle_cap(&self) -> Option<Duration> {
        if self.max_idle_sleep == Duration::ZERO {
            None
        } else {
            Some(self.max_idle_sleep)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `max_idle_sleep = 0s` (follow the core)
    /// - `handle_os_signals = true`
    /// - `shutdown_logger = true` (false on Android)
    /// - `bus_capacity = 1024`
    /// - `core_path = None`
    fn default() -> Self {
        Self {
            max_idle_sleep: Duration::ZERO,
            handle_os_signals: true,
            shutdown_logger: !cfg!(target_os = "android"),
            bus_capacity: 1024,
            core_path: None,
        }
    }
}
