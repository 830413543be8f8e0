//! External collaborators of the lifecycle controller.
//!
//! Each collaborator is reached only through a trait; its internals belong to the
//! application. This module groups the contracts and their null implementations.
//!
//! ## Contents
//! - [`RuntimeCore`] lifecycle control, commands and the runloop tick
//! - [`PlatformDriver`], [`DriverRegistry`] platform driver and generic drivers
//! - [`TaskQueue`] deferred work, pumped once per tick
//! - [`UiCompanion`] secondary control surface
//! - [`SettingsStore`] the "save on exit" policy
//! - [`Menu`], [`Logger`] optional collaborators
//! - [`ExecRespawn`] process replacement helper for drivers
//!
//! ## Ownership
//! ```text
//! FrontendBuilder ──► Subsystems (Box<dyn ...> each) ──► Frontend
//!                                                          │ owns until shutdown
//!                                                          ▼
//!                                                     ShutdownPlan::execute(&mut Subsystems)
//! ```

mod driver;
mod menu;
mod null;
mod respawn;
mod runtime;
mod settings;
mod tasks;
mod ui;

pub use driver::{DriverRegistry, ExitKind, PlatformDriver, Respawn};
pub use menu::{Logger, Menu};
pub use null::{NULL_CORE_IDLE, NullCore, NullDriver, NullRegistry, NullTaskQueue, NullUi};
pub use respawn::ExecRespawn;
pub use runtime::{Command, CoreControl, RuntimeCore};
pub use settings::{Settings, SettingsStore, StaticSettings};
pub use tasks::TaskQueue;
pub use ui::UiCompanion;

/// Initialization milestones the shutdown plan checks before tearing something down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subsystem {
    /// `RuntimeCore::control(Preinit)` ran.
    CoreState,
    /// `RuntimeCore::control(Init)` ran (configuration, logging, generic drivers).
    CoreServices,
    /// `PlatformDriver::init_first` ran.
    PlatformDriver,
    /// `UiCompanion::init_first` ran.
    UiCompanion,
}

impl Subsystem {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Subsystem::CoreState => "core_state",
            Subsystem::CoreServices => "core_services",
            Subsystem::PlatformDriver => "platform_driver",
            Subsystem::UiCompanion => "ui_companion",
        }
    }
}

/// Every collaborator a frontend owns.
pub struct Subsystems {
    /// Application logic.
    pub core: Box<dyn RuntimeCore>,
    /// Selected platform driver.
    pub driver: Box<dyn PlatformDriver>,
    /// Generic driver registry.
    pub registry: Box<dyn DriverRegistry>,
    /// Background task queue.
    pub tasks: Box<dyn TaskQueue>,
    /// Companion UI.
    pub ui: Box<dyn UiCompanion>,
    /// Configuration store.
    pub settings: Box<dyn SettingsStore>,
    /// Menu, if the application has one.
    pub menu: Option<Box<dyn Menu>>,
    /// Logging backend, if the application owns one.
    pub logger: Option<Box<dyn Logger>>,
}

impl Default for Subsystems {
    /// All null collaborators, no menu and no logger.
    fn default() -> Self {
        Self {
            core: Box::new(NullCore::default()),
            driver: Box::new(NullDriver::default()),
            registry: Box::new(NullRegistry),
            tasks: Box::new(NullTaskQueue),
            ui: Box::new(NullUi),
            settings: Box::new(StaticSettings::default()),
            menu: None,
            logger: None,
        }
    }
}
