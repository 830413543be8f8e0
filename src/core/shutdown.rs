//! # Shutdown plan: ordered, total teardown.
//!
//! A [`ShutdownPlan`] is an explicit list of named steps built when the frontend
//! starts and executed exactly once when it stops. The standard plan has twelve steps:
//!
//! ```text
//!  1 save_config      settings.save_on_exit ─► core.command(SaveCurrentConfig)
//!  2 detach_menu      menu.unset_own_driver()
//!  3 core_deinit      core.control(MainDeinit)
//!  4 report_perf      core.command(ReportPerfCounters)
//!  5 logger_shutdown  logger.shutdown()              (if present and allowed)
//!  6 driver_deinit    driver.deinit(platform_args)   (light)
//!  7 exit_spawn       driver.exit_spawn(core_path)   ─► Replaced ⇒ skip 8..12
//!  8 core_destroy     core.control(Destroy)
//!  9 ui_release       ui.deinit(); ui.free()
//! 10 driver_shutdown  driver.shutdown(kind)          (deep)
//! 11 registry_deinit  registry.deinit()
//! 12 free_drivers     ui.free_driver_state(); driver.free()
//! ```
//!
//! ## Rules
//! - **Total**: every step is attempted even when an earlier one failed or panicked.
//! - **Symmetric**: a step whose subsystem never initialized is skipped (`NotInitialized`).
//! - **Explicit replacement**: after `Respawn::Replaced` the rest is recorded as skipped.
//! - **No rollback**: a step that ran is never undone.

use std::collections::HashSet;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::core::{Config, PlatformArgs};
use crate::error::{SubsystemError, panic_message};
use crate::events::{Bus, Event, EventKind};
use crate::subsystems::{Command, CoreControl, ExitKind, Respawn, Subsystem, Subsystems};

/// Identifier of a shutdown step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepId {
    SaveConfig,
    DetachMenu,
    CoreDeinit,
    ReportPerf,
    LoggerShutdown,
    DriverDeinit,
    ExitSpawn,
    CoreDestroy,
    UiRelease,
    DriverShutdown,
    RegistryDeinit,
    FreeDrivers,
}

impl StepId {
    /// Order of the standard plan.
    pub const STANDARD: [StepId; 12] = [
        StepId::SaveConfig,
        StepId::DetachMenu,
        StepId::CoreDeinit,
        StepId::ReportPerf,
        StepId::LoggerShutdown,
        StepId::DriverDeinit,
        StepId::ExitSpawn,
        StepId::CoreDestroy,
        StepId::UiRelease,
        StepId::DriverShutdown,
        StepId::RegistryDeinit,
        StepId::FreeDrivers,
    ];

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            StepId::SaveConfig => "save_config",
            StepId::DetachMenu => "detach_menu",
            StepId::CoreDeinit => "core_deinit",
            StepId::ReportPerf => "report_perf",
            StepId::LoggerShutdown => "logger_shutdown",
            StepId::DriverDeinit => "driver_deinit",
            StepId::ExitSpawn => "exit_spawn",
            StepId::CoreDestroy => "core_destroy",
            StepId::UiRelease => "ui_release",
            StepId::DriverShutdown => "driver_shutdown",
            StepId::RegistryDeinit => "registry_deinit",
            StepId::FreeDrivers => "free_drivers",
        }
    }
}

/// Why a step did not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The subsystem it tears down never initialized.
    NotInitialized(Subsystem),
    /// Policy turned it off (save-on-exit unset, logger shutdown suppressed).
    Disabled,
    /// The optional collaborator is not present.
    Absent,
    /// An earlier step replaced the process.
    ProcessReplaced,
}

impl SkipReason {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SkipReason::NotInitialized(_) => "not_initialized",
            SkipReason::Disabled => "disabled",
            SkipReason::Absent => "absent",
            SkipReason::ProcessReplaced => "process_replaced",
        }
    }
}

/// What a step action reports back when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Done,
    Skipped(SkipReason),
    /// The process image was replaced; nothing after this step may run.
    Replaced,
}

/// Recorded result of one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Completed,
    Skipped(SkipReason),
    Failed(SubsystemError),
    Replaced,
}

/// One line of a [`ShutdownReport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub id: StepId,
    pub outcome: StepOutcome,
}

/// A failure recorded outside the shutdown plan (startup calls with no
/// upward failure path).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The failing call, e.g. `"core.init"`.
    pub call: &'static str,
    pub error: SubsystemError,
}

/// Everything that happened during shutdown, plus the diagnostics gathered before it.
#[derive(Debug, Clone, Default)]
pub struct ShutdownReport {
    /// One record per plan step, in execution order.
    pub steps: Vec<StepRecord>,
    /// Non-fatal failures observed while the frontend was starting.
    pub diagnostics: Vec<Diagnostic>,
}

impl ShutdownReport {
    /// Outcome of the given step, if the plan contained it.
    pub fn outcome(&self, id: StepId) -> Option<&StepOutcome> {
        self.steps.iter().find(|r| r.id == id).map(|r| &r.outcome)
    }

    /// Steps that reported a failure.
    pub fn failures(&self) -> impl Iterator<Item = (StepId, &SubsystemError)> {
        self.steps.iter().filter_map(|r| match &r.outcome {
            StepOutcome::Failed(e) => Some((r.id, e)),
            _ => None,
        })
    }

    /// Steps whose action actually ran (completed, failed or replaced).
    pub fn attempted(&self) -> Vec<StepId> {
        self.steps
            .iter()
            .filter(|r| !matches!(r.outcome, StepOutcome::Skipped(_)))
            .map(|r| r.id)
            .collect()
    }

    /// Returns true if the process was replaced during shutdown.
    pub fn replaced(&self) -> bool {
        self.steps
            .iter()
            .any(|r| matches!(r.outcome, StepOutcome::Replaced))
    }

    /// Returns true if neither startup nor shutdown reported a failure.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty() && self.failures().next().is_none()
    }
}

/// Initialization milestones reached so far.
#[derive(Debug, Clone, Default)]
pub struct InitSet {
    done: HashSet<Subsystem>,
}

impl InitSet {
    /// Records that `subsystem` went through its init call.
    pub fn mark(&mut self, subsystem: Subsystem) {
        self.done.insert(subsystem);
    }

    /// Returns true if `subsystem` went through its init call.
    pub fn contains(&self, subsystem: Subsystem) -> bool {
        self.done.contains(&subsystem)
    }

    /// First entry of `required` that is not initialized.
    pub fn missing(&self, required: &[Subsystem]) -> Option<Subsystem> {
        required.iter().copied().find(|s| !self.contains(*s))
    }
}

impl FromIterator<Subsystem> for InitSet {
    fn from_iter<I: IntoIterator<Item = Subsystem>>(iter: I) -> Self {
        Self {
            done: iter.into_iter().collect(),
        }
    }
}

type StepAction =
    Box<dyn FnOnce(&mut Subsystems, &InitSet) -> Result<Completion, SubsystemError> + Send>;

struct ShutdownStep {
    id: StepId,
    requires: &'static [Subsystem],
    action: StepAction,
}

/// Ordered list of teardown steps.
#[derive(Default)]
pub struct ShutdownPlan {
    steps: Vec<ShutdownStep>,
}

impl ShutdownPlan {
    /// Creates an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a step that runs only if every subsystem in `requires` initialized.
    pub fn step<F>(mut self, id: StepId, requires: &'static [Subsystem], action: F) -> Self
    where
        F: FnOnce(&mut Subsystems, &InitSet) -> Result<Completion, SubsystemError> + Send + 'static,
    {
        self.steps.push(ShutdownStep {
            id,
            requires,
            action: Box::new(action),
        });
        self
    }

    /// Builds the twelve-step plan.
    ///
    /// `platform_args` goes to the light driver teardown, `kind` to the deep one.
    pub fn standard(cfg: &Config, platform_args: Option<PlatformArgs>, kind: ExitKind) -> Self {
        use Subsystem::*;

        let shutdown_logger = cfg.shutdown_logger;
        let core_path = cfg.core_path.clone();

        Self::new()
            .step(StepId::SaveConfig, &[CoreServices], |s, _| {
                if !s.settings.settings().save_on_exit {
                    return Ok(Completion::Skipped(SkipReason::Disabled));
                }
                s.core.command(Command::SaveCurrentConfig)?;
                Ok(Completion::Done)
            })
            .step(StepId::DetachMenu, &[CoreServices], |s, _| match s.menu.as_mut() {
                Some(menu) => menu.unset_own_driver().map(|_| Completion::Done),
                None => Ok(Completion::Skipped(SkipReason::Absent)),
            })
            .step(StepId::CoreDeinit, &[CoreServices], |s, _| {
                s.core.control(CoreControl::MainDeinit)?;
                Ok(Completion::Done)
            })
            .step(StepId::ReportPerf, &[CoreServices], |s, _| {
                s.core.command(Command::ReportPerfCounters)?;
                Ok(Completion::Done)
            })
            .step(StepId::LoggerShutdown, &[CoreServices], move |s, _| {
                if !shutdown_logger {
                    return Ok(Completion::Skipped(SkipReason::Disabled));
                }
                match s.logger.as_mut() {
                    Some(logger) => logger.shutdown().map(|_| Completion::Done),
                    None => Ok(Completion::Skipped(SkipReason::Absent)),
                }
            })
            .step(StepId::DriverDeinit, &[PlatformDriver], move |s, _| {
                s.driver.deinit(platform_args.as_ref())?;
                Ok(Completion::Done)
            })
            .step(StepId::ExitSpawn, &[PlatformDriver], move |s, _| {
                match s.driver.exit_spawn(core_path.as_deref())? {
                    Respawn::Replaced => Ok(Completion::Replaced),
                    Respawn::NotSupported => Ok(Completion::Done),
                }
            })
            .step(StepId::CoreDestroy, &[CoreState], |s, _| {
                s.core.control(CoreControl::Destroy)?;
                Ok(Completion::Done)
            })
            .step(StepId::UiRelease, &[UiCompanion], |s, _| {
                let deinit = s.ui.deinit();
                let free = s.ui.free();
                deinit.and(free).map(|_| Completion::Done)
            })
            .step(StepId::DriverShutdown, &[PlatformDriver], move |s, _| {
                s.driver.shutdown(kind)?;
                Ok(Completion::Done)
            })
            .step(StepId::RegistryDeinit, &[CoreServices], |s, _| {
                s.registry.deinit()?;
                Ok(Completion::Done)
            })
            .step(StepId::FreeDrivers, &[PlatformDriver], |s, init| {
                let ui = if init.contains(UiCompanion) {
                    s.ui.free_driver_state()
                } else {
                    Ok(())
                };
                let driver = s.driver.free();
                ui.and(driver).map(|_| Completion::Done)
            })
    }

    /// Step ids in execution order.
    pub fn ids(&self) -> Vec<StepId> {
        self.steps.iter().map(|s| s.id).collect()
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if the plan has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Runs every step front to back and records each outcome.
    ///
    /// Never returns early: failures and panics are recorded and the next step runs.
    pub fn execute(
        self,
        subsystems: &mut Subsystems,
        initialized: &InitSet,
        bus: &Bus,
    ) -> Vec<StepRecord> {
        let mut records = Vec::with_capacity(self.steps.len());
        let mut replaced = false;

        for step in self.steps {
            let outcome = if replaced {
                StepOutcome::Skipped(SkipReason::ProcessReplaced)
            } else if let Some(missing) = initialized.missing(step.requires) {
                StepOutcome::Skipped(SkipReason::NotInitialized(missing))
            } else {
                bus.publish(Event::new(EventKind::StepStarted).with_step(step.id));
                let action = step.action;
                match catch_unwind(AssertUnwindSafe(|| action(subsystems, initialized))) {
                    Ok(Ok(Completion::Done)) => StepOutcome::Completed,
                    Ok(Ok(Completion::Skipped(reason))) => StepOutcome::Skipped(reason),
                    Ok(Ok(Completion::Replaced)) => {
                        replaced = true;
                        StepOutcome::Replaced
                    }
                    Ok(Err(err)) => StepOutcome::Failed(err),
                    Err(payload) => StepOutcome::Failed(SubsystemError::Panicked {
                        info: panic_message(&*payload),
                    }),
                }
            };

            publish_outcome(bus, step.id, &outcome);
            records.push(StepRecord {
                id: step.id,
                outcome,
            });
        }
        records
    }
}

/// Logs a step outcome and publishes the matching event.
fn publish_outcome(bus: &Bus, id: StepId, outcome: &StepOutcome) {
    let ev = match outcome {
        StepOutcome::Completed => Event::new(EventKind::StepCompleted),
        StepOutcome::Skipped(reason) => {
            tracing::debug!(step = id.as_label(), reason = reason.as_label(), "shutdown step skipped");
            Event::new(EventKind::StepSkipped).with_reason(reason.as_label())
        }
        StepOutcome::Failed(err) => {
            tracing::warn!(step = id.as_label(), error = %err, "shutdown step failed; continuing");
            Event::new(EventKind::StepFailed).with_reason(err.to_string())
        }
        StepOutcome::Replaced => {
            tracing::info!(step = id.as_label(), "process replaced; skipping remaining teardown");
            Event::new(EventKind::ProcessReplaced)
        }
    };
    bus.publish(ev.with_step(id));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Script;

    fn everything() -> InitSet {
        [
            Subsystem::CoreState,
            Subsystem::CoreServices,
            Subsystem::PlatformDriver,
            Subsystem::UiCompanion,
        ]
        .into_iter()
        .collect()
    }

    fn run(script: &Script, plan: ShutdownPlan, init: &InitSet) -> Vec<StepRecord> {
        let mut subs = script.subsystems();
        plan.execute(&mut subs, init, &Bus::new(64))
    }

    #[test]
    fn test_standard_plan_has_twelve_steps_in_order() {
        let plan = ShutdownPlan::standard(&Config::default(), None, ExitKind::Normal);
        assert_eq!(plan.ids(), StepId::STANDARD.to_vec());
    }

    #[test]
    fn test_standard_plan_call_order() {
        let script = Script::new().save_on_exit(true).with_menu().with_logger();
        let plan = ShutdownPlan::standard(&Config::default(), None, ExitKind::Normal);
        let records = run(&script, plan, &everything());

        assert!(records.iter().all(|r| r.outcome == StepOutcome::Completed));
        assert_eq!(
            script.journal.calls(),
            vec![
                "core.save_config",
                "menu.unset_own_driver",
                "core.main_deinit",
                "core.perf_report",
                "logger.shutdown",
                "driver.deinit",
                "driver.exit_spawn",
                "core.destroy",
                "ui.deinit",
                "ui.free",
                "driver.shutdown",
                "registry.deinit",
                "ui.free_driver_state",
                "driver.free",
            ]
        );
    }

    #[test]
    fn test_every_step_runs_even_when_all_fail() {
        let script = Script::new()
            .save_on_exit(true)
            .with_menu()
            .with_logger()
            .failing(&[
                "core.save_config",
                "menu.unset_own_driver",
                "core.main_deinit",
                "core.perf_report",
                "logger.shutdown",
                "driver.deinit",
                "driver.exit_spawn",
                "core.destroy",
                "ui.deinit",
                "driver.shutdown",
                "registry.deinit",
                "ui.free_driver_state",
            ]);
        let plan = ShutdownPlan::standard(&Config::default(), None, ExitKind::Normal);
        let records = run(&script, plan, &everything());

        assert_eq!(records.len(), 12);
        assert!(
            records
                .iter()
                .all(|r| matches!(r.outcome, StepOutcome::Failed(_)))
        );
        // compound steps still reach their second call
        let calls = script.journal.calls();
        assert!(calls.contains(&"ui.free".to_string()));
        assert!(calls.contains(&"driver.free".to_string()));
    }

    #[test]
    fn test_panicking_step_is_recorded_and_plan_continues() {
        let script = Script::new().panicking(&["driver.deinit"]);
        let plan = ShutdownPlan::standard(&Config::default(), None, ExitKind::Normal);
        let records = run(&script, plan, &everything());

        let deinit = records.iter().find(|r| r.id == StepId::DriverDeinit).unwrap();
        assert!(matches!(
            &deinit.outcome,
            StepOutcome::Failed(SubsystemError::Panicked { info }) if info.contains("driver.deinit")
        ));
        assert_eq!(records.last().unwrap().outcome, StepOutcome::Completed);
        assert_eq!(script.journal.count("driver.free"), 1);
    }

    #[test]
    fn test_replacement_skips_everything_after_exit_spawn() {
        let script = Script::new().replace_process();
        let plan = ShutdownPlan::standard(&Config::default(), None, ExitKind::Normal);
        let records = run(&script, plan, &everything());

        let pos = records.iter().position(|r| r.id == StepId::ExitSpawn).unwrap();
        assert_eq!(records[pos].outcome, StepOutcome::Replaced);
        for r in &records[pos + 1..] {
            assert_eq!(r.outcome, StepOutcome::Skipped(SkipReason::ProcessReplaced));
        }
        assert_eq!(script.journal.calls().last().unwrap(), "driver.exit_spawn");
    }

    #[test]
    fn test_uninitialized_subsystems_are_not_torn_down() {
        let script = Script::new().save_on_exit(true);
        let init: InitSet = [Subsystem::CoreState, Subsystem::PlatformDriver]
            .into_iter()
            .collect();
        let plan = ShutdownPlan::standard(&Config::default(), None, ExitKind::Normal);
        let records = run(&script, plan, &init);

        assert_eq!(
            records[0].outcome,
            StepOutcome::Skipped(SkipReason::NotInitialized(Subsystem::CoreServices))
        );
        assert_eq!(
            script.journal.calls(),
            vec![
                "driver.deinit",
                "driver.exit_spawn",
                "core.destroy",
                "driver.shutdown",
                "driver.free",
            ]
        );
    }

    #[test]
    fn test_policy_and_absence_skips() {
        let script = Script::new().with_logger();
        let cfg = Config {
            shutdown_logger: false,
            ..Config::default()
        };
        let plan = ShutdownPlan::standard(&cfg, None, ExitKind::Normal);
        let records = run(&script, plan, &everything());

        let outcome = |id| records.iter().find(|r| r.id == id).unwrap().outcome.clone();
        assert_eq!(outcome(StepId::SaveConfig), StepOutcome::Skipped(SkipReason::Disabled));
        assert_eq!(outcome(StepId::DetachMenu), StepOutcome::Skipped(SkipReason::Absent));
        assert_eq!(
            outcome(StepId::LoggerShutdown),
            StepOutcome::Skipped(SkipReason::Disabled)
        );
        assert_eq!(script.journal.count("logger.shutdown"), 0);
    }

    #[test]
    fn test_custom_plan_runs_in_declared_order() {
        let script = Script::new();
        let plan = ShutdownPlan::new()
            .step(StepId::RegistryDeinit, &[], |s, _| {
                s.registry.deinit().map(|_| Completion::Done)
            })
            .step(StepId::CoreDestroy, &[], |s, _| {
                s.core.control(CoreControl::Destroy).map(|_| Completion::Done)
            });
        assert_eq!(plan.len(), 2);
        run(&script, plan, &InitSet::default());
        assert_eq!(script.journal.calls(), vec!["registry.deinit", "core.destroy"]);
    }

    #[test]
    fn test_events_follow_step_order() {
        let script = Script::new();
        let bus = Bus::new(128);
        let mut rx = bus.subscribe();
        let mut subs = script.subsystems();
        ShutdownPlan::standard(&Config::default(), None, ExitKind::Normal).execute(
            &mut subs,
            &everything(),
            &bus,
        );

        let mut finished = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            if ev.kind != EventKind::StepStarted {
                finished.push(ev.step.unwrap());
            }
        }
        assert_eq!(finished, StepId::STANDARD.to_vec());
    }

    #[test]
    fn test_report_helpers() {
        let report = ShutdownReport {
            steps: vec![
                StepRecord {
                    id: StepId::SaveConfig,
                    outcome: StepOutcome::Skipped(SkipReason::Disabled),
                },
                StepRecord {
                    id: StepId::CoreDeinit,
                    outcome: StepOutcome::Failed(SubsystemError::fail("busy")),
                },
                StepRecord {
                    id: StepId::ExitSpawn,
                    outcome: StepOutcome::Replaced,
                },
            ],
            diagnostics: Vec::new(),
        };
        assert!(!report.is_clean());
        assert!(report.replaced());
        assert_eq!(report.attempted(), vec![StepId::CoreDeinit, StepId::ExitSpawn]);
        assert_eq!(report.failures().count(), 1);
        assert_eq!(report.outcome(StepId::FreeDrivers), None);
        assert_eq!(
            report.outcome(StepId::ExitSpawn),
            Some(&StepOutcome::Replaced)
        );
    }
}
