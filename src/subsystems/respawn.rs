//! # Process replacement helper for driver implementations.
//!
//! [`ExecRespawn`] implements the usual body of [`PlatformDriver::exit_spawn`](crate::PlatformDriver::exit_spawn):
//!
//! - **Unix**: `execv`-style replacement of the current image. On success the call
//!   never returns; an `Err` means the image is unchanged and shutdown must go on.
//! - **Other platforms**: spawn the successor as a separate process and report
//!   [`Respawn::NotSupported`]: this image was not replaced, so the remaining
//!   teardown still runs before the process exits.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::SubsystemError;
use crate::subsystems::Respawn;

/// Successor process description.
#[derive(Debug, Clone)]
pub struct ExecRespawn {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ExecRespawn {
    /// Describes a successor running `program` with no arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Program that will replace the current process.
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    /// Replaces the current process image.
    ///
    /// Returns only if the replacement failed.
    #[cfg(unix)]
    pub fn respawn(&self) -> Result<Respawn, SubsystemError> {
        use std::os::unix::process::CommandExt;

        let err = self.command().exec();
        Err(SubsystemError::fail(format!(
            "exec {}: {err}",
            self.program.display()
        )))
    }

    /// Starts the successor as a separate process.
    ///
    /// The current image keeps running, so the result is [`Respawn::NotSupported`]
    /// and shutdown continues with the remaining steps.
    #[cfg(not(unix))]
    pub fn respawn(&self) -> Result<Respawn, SubsystemError> {
        self.command()
            .spawn()
            .map(|_| Respawn::NotSupported)
            .map_err(|err| {
                SubsystemError::fail(format!("spawn {}: {err}", self.program.display()))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_reports_failure_and_returns() {
        let respawn = ExecRespawn::new("/nonexistent/frontvisor-successor").arg("--content");
        let err = respawn.respawn().unwrap_err();
        assert_eq!(err.as_label(), "subsystem_failed");
        assert!(err.to_string().contains("frontvisor-successor"));
    }

    #[cfg(not(unix))]
    #[test]
    fn test_spawned_successor_leaves_teardown_running() {
        let exe = std::env::current_exe().unwrap();
        let respawn = ExecRespawn::new(exe).arg("--list");
        assert!(matches!(respawn.respawn(), Ok(Respawn::NotSupported)));
    }
}
