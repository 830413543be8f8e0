//! Scripted collaborators for unit tests.
//!
//! Every mock built from one [`Script`] appends its calls to a shared [`Journal`],
//! so a test can assert the exact cross-subsystem order. Calls listed in
//! `failing` return an error, calls listed in `panicking` panic.

use std::collections::{HashSet, VecDeque};
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::core::{EnvironmentAccessor, Iteration, LaunchContext, PlatformArgs};
use crate::error::SubsystemError;
use crate::subsystems::{
    Command, CoreControl, DriverRegistry, ExitKind, Logger, Menu, PlatformDriver, Respawn,
    RuntimeCore, Settings, SettingsStore, Subsystems, TaskQueue, UiCompanion,
};

#[derive(Clone, Default)]
pub(crate) struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn push(&self, call: impl Into<String>) {
        self.0.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|c| *c == call).count()
    }

    pub fn position(&self, call: &str) -> Option<usize> {
        self.0.lock().unwrap().iter().position(|c| c == call)
    }
}

#[derive(Clone, Default)]
pub(crate) struct Script {
    pub journal: Journal,
    failing: HashSet<&'static str>,
    panicking: HashSet<&'static str>,
    iterations: Arc<Mutex<VecDeque<Iteration>>>,
    save_on_exit: bool,
    replace_process: bool,
    driver_inert: bool,
    menu: bool,
    logger: bool,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, calls: &[&'static str]) -> Self {
        self.failing.extend(calls.iter().copied());
        self
    }

    pub fn panicking(mut self, calls: &[&'static str]) -> Self {
        self.panicking.extend(calls.iter().copied());
        self
    }

    /// Iterations returned by the core, in order; `Terminate` once exhausted.
    pub fn iterations(self, its: impl IntoIterator<Item = Iteration>) -> Self {
        self.iterations.lock().unwrap().extend(its);
        self
    }

    pub fn save_on_exit(mut self, on: bool) -> Self {
        self.save_on_exit = on;
        self
    }

    pub fn replace_process(mut self) -> Self {
        self.replace_process = true;
        self
    }

    /// Driver whose `init_first` leaves it uninitialized.
    pub fn driver_inert(mut self) -> Self {
        self.driver_inert = true;
        self
    }

    pub fn with_menu(mut self) -> Self {
        self.menu = true;
        self
    }

    pub fn with_logger(mut self) -> Self {
        self.logger = true;
        self
    }

    fn call(&self, name: &'static str) -> Result<(), SubsystemError> {
        self.journal.push(name);
        if self.panicking.contains(name) {
            panic!("{name} exploded");
        }
        if self.failing.contains(name) {
            return Err(SubsystemError::fail(format!("{name} failed")));
        }
        Ok(())
    }

    pub fn subsystems(&self) -> Subsystems {
        Subsystems {
            core: Box::new(ScriptedCore(self.clone())),
            driver: Box::new(ScriptedDriver {
                script: self.clone(),
                initialized: false,
            }),
            registry: Box::new(ScriptedRegistry(self.clone())),
            tasks: Box::new(ScriptedTasks(self.clone())),
            ui: Box::new(ScriptedUi(self.clone())),
            settings: Box::new(ScriptedSettings(self.clone())),
            menu: self
                .menu
                .then(|| Box::new(ScriptedMenu(self.clone())) as Box<dyn Menu>),
            logger: self
                .logger
                .then(|| Box::new(ScriptedLogger(self.clone())) as Box<dyn Logger>),
        }
    }
}

struct ScriptedCore(Script);

impl RuntimeCore for ScriptedCore {
    fn control(&mut self, ctl: CoreControl) -> Result<(), SubsystemError> {
        self.0.call(match ctl {
            CoreControl::Preinit => "core.preinit",
            CoreControl::Init => "core.init",
            CoreControl::MainDeinit => "core.main_deinit",
            CoreControl::Destroy => "core.destroy",
        })
    }

    fn command(&mut self, cmd: Command) -> Result<(), SubsystemError> {
        self.0.call(match cmd {
            Command::SaveCurrentConfig => "core.save_config",
            Command::ReportPerfCounters => "core.perf_report",
        })
    }

    fn iterate(&mut self) -> Iteration {
        self.0.journal.push("core.iterate");
        self.0
            .iterations
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Iteration::Terminate)
    }
}

struct ScriptedDriver {
    script: Script,
    initialized: bool,
}

impl PlatformDriver for ScriptedDriver {
    fn name(&self) -> &str {
        "scripted"
    }

    fn init_first(&mut self, _args: Option<&PlatformArgs>) {
        self.script.journal.push("driver.init_first");
        self.initialized = !self.script.driver_inert;
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn environment_accessor(&self) -> EnvironmentAccessor {
        Arc::new(|key: &str| (key == "platform").then(|| "scripted".to_string()))
    }

    fn deinit(&mut self, _args: Option<&PlatformArgs>) -> Result<(), SubsystemError> {
        self.script.call("driver.deinit")
    }

    fn exit_spawn(&mut self, _core_path: Option<&Path>) -> Result<Respawn, SubsystemError> {
        self.script.call("driver.exit_spawn")?;
        Ok(if self.script.replace_process {
            Respawn::Replaced
        } else {
            Respawn::NotSupported
        })
    }

    fn shutdown(&mut self, kind: ExitKind) -> Result<(), SubsystemError> {
        self.script.call(match kind {
            ExitKind::Normal => "driver.shutdown",
            ExitKind::Aborted => "driver.shutdown_aborted",
        })
    }

    fn free(&mut self) -> Result<(), SubsystemError> {
        self.initialized = false;
        self.script.call("driver.free")
    }
}

struct ScriptedRegistry(Script);

impl DriverRegistry for ScriptedRegistry {
    fn deinit(&mut self) -> Result<(), SubsystemError> {
        self.0.call("registry.deinit")
    }
}

struct ScriptedTasks(Script);

impl TaskQueue for ScriptedTasks {
    fn submit_content_load(&mut self, launch: &LaunchContext) -> Result<(), SubsystemError> {
        self.0.journal.push(format!("launch.argc={}", launch.argc()));
        self.0.call("tasks.submit_content_load")
    }

    fn pump_pending(&mut self) {
        self.0.journal.push("tasks.pump");
    }
}

struct ScriptedUi(Script);

impl UiCompanion for ScriptedUi {
    fn init_first(&mut self) -> Result<(), SubsystemError> {
        self.0.call("ui.init_first")
    }

    fn deinit(&mut self) -> Result<(), SubsystemError> {
        self.0.call("ui.deinit")
    }

    fn free(&mut self) -> Result<(), SubsystemError> {
        self.0.call("ui.free")
    }

    fn free_driver_state(&mut self) -> Result<(), SubsystemError> {
        self.0.call("ui.free_driver_state")
    }
}

struct ScriptedSettings(Script);

impl SettingsStore for ScriptedSettings {
    fn settings(&self) -> Settings {
        Settings {
            save_on_exit: self.0.save_on_exit,
        }
    }
}

struct ScriptedMenu(Script);

impl Menu for ScriptedMenu {
    fn unset_own_driver(&mut self) -> Result<(), SubsystemError> {
        self.0.call("menu.unset_own_driver")
    }
}

struct ScriptedLogger(Script);

impl Logger for ScriptedLogger {
    fn shutdown(&mut self) -> Result<(), SubsystemError> {
        self.0.call("logger.shutdown")
    }
}
