//! # Platform driver and driver registry contracts.
//!
//! The platform driver is torn down at two depths, on purpose as two separate
//! calls with separate contracts:
//!
//! ```text
//! init_first ─► ... ─► deinit ─► exit_spawn ─► ... ─► shutdown ─► ... ─► free
//!                      (light)                        (deep: OS-level)    (object)
//! ```
//!
//! - [`PlatformDriver::deinit`] releases what the frontend acquired on top of the
//!   platform (windows, audio sessions, ...) while the driver object stays usable,
//!   so that [`PlatformDriver::exit_spawn`] can still run.
//! - [`PlatformDriver::shutdown`] releases OS-level resources the driver itself
//!   holds (handles, helper threads, spawned helpers).
//! - [`PlatformDriver::free`] drops the driver's own state.

use std::path::Path;

use crate::core::{EnvironmentAccessor, PlatformArgs};
use crate::error::SubsystemError;

/// How the process is leaving, passed to [`PlatformDriver::shutdown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExitKind {
    /// Regular exit after the main loop stopped.
    #[default]
    Normal,
    /// Content bootstrap failed; the main loop never ran.
    Aborted,
}

impl ExitKind {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ExitKind::Normal => "normal",
            ExitKind::Aborted => "aborted",
        }
    }
}

/// Outcome of [`PlatformDriver::exit_spawn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Respawn {
    /// The process image has been (or is about to be) replaced.
    ///
    /// Every remaining shutdown step is skipped.
    Replaced,
    /// The platform cannot replace the process; shutdown continues.
    NotSupported,
}

/// The platform-specific frontend driver selected at startup.
pub trait PlatformDriver: Send {
    /// Human-readable driver name (for logs).
    fn name(&self) -> &str {
        "platform"
    }

    /// Selects and initializes the first usable driver.
    ///
    /// Has no failure return: a null driver is an acceptable result.
    fn init_first(&mut self, args: Option<&PlatformArgs>);

    /// Returns true if the driver finished initialization.
    fn is_initialized(&self) -> bool;

    /// Returns the accessor used by content loading to query the platform.
    fn environment_accessor(&self) -> EnvironmentAccessor;

    /// Light teardown; the driver object remains valid.
    fn deinit(&mut self, args: Option<&PlatformArgs>) -> Result<(), SubsystemError>;

    /// Exits and possibly replaces the process with `core_path`.
    ///
    /// On platforms with real process replacement a successful call does not return.
    /// Implementations that hand over differently (spawning a successor, deferring the
    /// exec to the host) return [`Respawn::Replaced`].
    fn exit_spawn(&mut self, core_path: Option<&Path>) -> Result<Respawn, SubsystemError>;

    /// Deep teardown of OS-level resources.
    fn shutdown(&mut self, kind: ExitKind) -> Result<(), SubsystemError>;

    /// Releases the driver object's own state.
    fn free(&mut self) -> Result<(), SubsystemError>;
}

/// Registry of the generic drivers (video, audio, input, ...) brought up by the core.
pub trait DriverRegistry: Send {
    /// Deinitializes every registered driver and frees the registry state.
    fn deinit(&mut self) -> Result<(), SubsystemError>;
}
