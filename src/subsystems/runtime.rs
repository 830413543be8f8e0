//! # Runtime core contract.
//!
//! The runtime core is the application logic the frontend hosts. The controller
//! sees it through three doors only:
//! - [`RuntimeCore::control`] lifecycle calls (`Preinit`, `Init`, `MainDeinit`, `Destroy`);
//! - [`RuntimeCore::command`] one-shot commands issued during shutdown;
//! - [`RuntimeCore::iterate`] one runloop tick.

use crate::core::Iteration;
use crate::error::SubsystemError;

/// Lifecycle control requests sent to the runtime core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoreControl {
    /// Before any driver is touched; lets the platform driver be selected.
    Preinit,
    /// Establishes configuration, logging and other global services.
    Init,
    /// Releases the services established by `Init`.
    MainDeinit,
    /// Destroys whatever core state is left.
    Destroy,
}

impl CoreControl {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            CoreControl::Preinit => "preinit",
            CoreControl::Init => "init",
            CoreControl::MainDeinit => "main_deinit",
            CoreControl::Destroy => "destroy",
        }
    }
}

/// Commands the controller issues to the runtime core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Persist the current configuration to its backing store.
    SaveCurrentConfig,
    /// Write the frontend performance counters to the log.
    ReportPerfCounters,
}

impl Command {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Command::SaveCurrentConfig => "save_current_config",
            Command::ReportPerfCounters => "report_perf_counters",
        }
    }
}

/// Application logic driven by the frontend.
pub trait RuntimeCore: Send {
    /// Handles a lifecycle control request.
    fn control(&mut self, ctl: CoreControl) -> Result<(), SubsystemError>;

    /// Executes a one-shot command.
    fn command(&mut self, cmd: Command) -> Result<(), SubsystemError>;

    /// Runs one iteration of the application runloop.
    fn iterate(&mut self) -> Iteration;
}
