//! # No-op collaborators.
//!
//! Every contract has a null implementation so a [`Frontend`](crate::Frontend) can
//! always be assembled: the builder falls back to these for anything left unset,
//! and the `frontvisor` binary runs entirely on them (idling until a signal arrives).

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::core::{EnvironmentAccessor, Iteration, LaunchContext, PlatformArgs};
use crate::error::SubsystemError;
use crate::subsystems::{
    Command, CoreControl, DriverRegistry, ExitKind, PlatformDriver, Respawn, RuntimeCore,
    TaskQueue, UiCompanion,
};

/// Idle hint reported by [`NullCore`] by default (about one 60 Hz frame).
pub const NULL_CORE_IDLE: Duration = Duration::from_millis(16);

/// Core with no logic: accepts every control call and idles forever.
#[derive(Debug, Clone, Copy)]
pub struct NullCore {
    idle: Duration,
}

impl NullCore {
    /// Creates a core that idles for `idle` on every tick.
    pub fn new(idle: Duration) -> Self {
        Self { idle }
    }
}

impl Default for NullCore {
    fn default() -> Self {
        Self::new(NULL_CORE_IDLE)
    }
}

impl RuntimeCore for NullCore {
    fn control(&mut self, _ctl: CoreControl) -> Result<(), SubsystemError> {
        Ok(())
    }

    fn command(&mut self, _cmd: Command) -> Result<(), SubsystemError> {
        Ok(())
    }

    fn iterate(&mut self) -> Iteration {
        Iteration::Idle(self.idle)
    }
}

/// Platform driver for hosts with nothing to bring up.
///
/// The environment accessor reads process environment variables.
#[derive(Debug, Default)]
pub struct NullDriver {
    initialized: bool,
}

impl PlatformDriver for NullDriver {
    fn name(&self) -> &str {
        "null"
    }

    fn init_first(&mut self, _args: Option<&PlatformArgs>) {
        self.initialized = true;
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn environment_accessor(&self) -> EnvironmentAccessor {
        Arc::new(|key: &str| std::env::var(key).ok())
    }

    fn deinit(&mut self, _args: Option<&PlatformArgs>) -> Result<(), SubsystemError> {
        Ok(())
    }

    fn exit_spawn(&mut self, _core_path: Option<&Path>) -> Result<Respawn, SubsystemError> {
        Ok(Respawn::NotSupported)
    }

    fn shutdown(&mut self, _kind: ExitKind) -> Result<(), SubsystemError> {
        Ok(())
    }

    fn free(&mut self) -> Result<(), SubsystemError> {
        self.initialized = false;
        Ok(())
    }
}

/// Registry without drivers.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRegistry;

impl DriverRegistry for NullRegistry {
    fn deinit(&mut self) -> Result<(), SubsystemError> {
        Ok(())
    }
}

/// Queue that accepts every submission and has nothing to pump.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTaskQueue;

impl TaskQueue for NullTaskQueue {
    fn submit_content_load(&mut self, _launch: &LaunchContext) -> Result<(), SubsystemError> {
        Ok(())
    }

    fn pump_pending(&mut self) {}
}

/// Headless companion.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullUi;

impl UiCompanion for NullUi {
    fn init_first(&mut self) -> Result<(), SubsystemError> {
        Ok(())
    }

    fn deinit(&mut self) -> Result<(), SubsystemError> {
        Ok(())
    }

    fn free(&mut self) -> Result<(), SubsystemError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_driver_tracks_initialization() {
        let mut driver = NullDriver::default();
        assert!(!driver.is_initialized());
        driver.init_first(None);
        assert!(driver.is_initialized());
        assert_eq!(driver.exit_spawn(None), Ok(Respawn::NotSupported));
        driver.free().unwrap();
        assert!(!driver.is_initialized());
    }

    #[test]
    fn test_null_core_idles() {
        let mut core = NullCore::new(Duration::from_millis(5));
        assert_eq!(core.iterate(), Iteration::idle_ms(5));
        assert!(core.control(CoreControl::Init).is_ok());
    }
}
