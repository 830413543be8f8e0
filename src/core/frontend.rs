//! # Frontend: startup, main loop and shutdown of a hosted application.
//!
//! The [`Frontend`] owns every collaborator (see [`Subsystems`]), the lifecycle
//! [`StateMachine`], the event [`Bus`] and the [`ShutdownPlan`] built at startup.
//!
//! ## Lifecycle
//! ```text
//! start(args, platform_args)
//!   ├─► core.control(Preinit)            Uninitialized ─► Preinitialized
//!   ├─► driver.init_first(platform_args)               ─► DriverInitialized
//!   ├─► core.control(Init)               (failure = diagnostic)
//!   ├─► driver initialized?
//!   │     ├─ yes: tasks.submit_content_load(LaunchContext)
//!   │     │        ├─ Ok  ─► ContentBootstrapped
//!   │     │        └─ Err ─► LifecycleError::Bootstrap (after the UI init below)
//!   │     └─ no : ContentBootstrapped
//!   └─► ui.init_first()                  (always)
//!
//! run_loop()                                           ─► Running
//!   loop {
//!     it = core.iterate()
//!     sleep(it.sleep_for(cap))  ◄── interrupted by exit request
//!       or yield_now()          (no sleep: let signal/exit tasks run)
//!     tasks.pump_pending()      (every tick, including the last)
//!     Terminate or exit requested? ─► break
//!   }
//!
//! shutdown(self)                                       ─► Exiting
//!   ShutdownPlan::execute()     (12 steps, total)      ─► Destroyed
//!   flush subscribers
//! ```
//!
//! ## Rules
//! - A failing init call still marks its subsystem as initialized: teardown runs for it.
//! - `run_once` is refused unless content bootstrap succeeded (or was skipped),
//!   and again once it has reported `Terminate`.
//! - `shutdown` consumes the frontend, so it runs at most once and never fails outward.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::core::{
    Config, Diagnostic, ExitHandle, FrontendBuilder, InitSet, Iteration, LaunchContext,
    LifecycleState, PlatformArgs, ShutdownPlan, ShutdownReport, StateMachine,
    wait_for_exit_signal,
};
use crate::error::{EXIT_SUCCESS, LifecycleError, SubsystemError};
use crate::events::{Bus, Event, EventKind};
use crate::subscribers::{Subscribe, SubscriberSet};
use crate::subsystems::{CoreControl, ExitKind, Subsystem, Subsystems};

/// Forwards bus events to the subscriber set until stopped.
struct Listener {
    stop: CancellationToken,
    handle: JoinHandle<()>,
    set: Arc<SubscriberSet>,
}

impl Listener {
    fn spawn(subscribers: Vec<Arc<dyn Subscribe>>, bus: &Bus) -> Self {
        let set = Arc::new(SubscriberSet::new(subscribers, bus.clone()));
        let stop = CancellationToken::new();
        let mut rx = bus.subscribe();

        let handle = tokio::spawn({
            let set = Arc::clone(&set);
            let stop = stop.clone();
            async move {
                loop {
                    tokio::select! {
                        biased;
                        msg = rx.recv() => match msg {
                            Ok(ev) => set.emit(&ev),
                            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                                tracing::warn!(skipped, "event listener lagged behind the bus");
                            }
                            Err(broadcast::error::RecvError::Closed) => break,
                        },
                        _ = stop.cancelled() => break,
                    }
                }
            }
        });
        Self { stop, handle, set }
    }

    /// Drains what is already on the bus, then waits for every subscriber queue.
    async fn close(self) {
        self.stop.cancel();
        if let Err(e) = self.handle.await {
            tracing::warn!(error = %e, "event listener ended abnormally");
        }
        match Arc::try_unwrap(self.set) {
            Ok(set) => set.shutdown().await,
            Err(_) => tracing::warn!("subscriber set still shared; queued events dropped"),
        }
    }
}

/// Lifecycle controller of a hosted application.
pub struct Frontend {
    cfg: Config,
    machine: StateMachine,
    subsystems: Subsystems,
    initialized: InitSet,
    plan: Option<ShutdownPlan>,
    diagnostics: Vec<Diagnostic>,
    bus: Bus,
    subscribers: Vec<Arc<dyn Subscribe>>,
    listener: Option<Listener>,
    exit: CancellationToken,
    ticks: u64,
    halted: bool,
}

impl Frontend {
    /// Returns a builder with the given configuration.
    pub fn builder(cfg: Config) -> FrontendBuilder {
        FrontendBuilder::new(cfg)
    }

    pub(crate) fn from_parts(
        cfg: Config,
        subsystems: Subsystems,
        subscribers: Vec<Arc<dyn Subscribe>>,
    ) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        Self {
            cfg,
            machine: StateMachine::new(),
            subsystems,
            initialized: InitSet::default(),
            plan: None,
            diagnostics: Vec::new(),
            bus,
            subscribers,
            listener: None,
            exit: CancellationToken::new(),
            ticks: 0,
            halted: false,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.machine.current()
    }

    /// The configuration this frontend was built with.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Ticks executed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Startup failures recorded so far (the shutdown report carries them too).
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns a handle that stops the main loop from anywhere.
    pub fn exit_handle(&self) -> ExitHandle {
        ExitHandle::new(self.exit.clone(), self.bus.clone())
    }

    /// Creates a receiver for events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Runs the startup sequence.
    ///
    /// Returns [`LifecycleError::Bootstrap`] if the task queue rejected the initial
    /// content load; the UI companion is initialized anyway and [`Frontend::shutdown`]
    /// stays available.
    pub fn start(
        &mut self,
        args: Vec<String>,
        platform_args: Option<PlatformArgs>,
    ) -> Result<(), LifecycleError> {
        let current = self.machine.current();
        if !current.can_advance_to(LifecycleState::Preinitialized) {
            return Err(LifecycleError::IllegalTransition {
                from: current,
                to: LifecycleState::Preinitialized,
            });
        }
        self.attach_subscribers();

        let res = self.subsystems.core.control(CoreControl::Preinit);
        self.initialized.mark(Subsystem::CoreState);
        self.record("core.preinit", res);
        self.enter(LifecycleState::Preinitialized)?;

        self.subsystems.driver.init_first(platform_args.as_ref());
        self.initialized.mark(Subsystem::PlatformDriver);
        tracing::info!(
            driver = self.subsystems.driver.name(),
            ready = self.subsystems.driver.is_initialized(),
            "platform driver selected"
        );
        self.enter(LifecycleState::DriverInitialized)?;

        let res = self.subsystems.core.control(CoreControl::Init);
        self.initialized.mark(Subsystem::CoreServices);
        self.record("core.init", res);

        let bootstrap = self.bootstrap_content(args, platform_args.clone());

        let res = self.subsystems.ui.init_first();
        self.initialized.mark(Subsystem::UiCompanion);
        self.record("ui.init_first", res);

        let kind = match bootstrap {
            Ok(()) => ExitKind::Normal,
            Err(_) => ExitKind::Aborted,
        };
        self.plan = Some(ShutdownPlan::standard(&self.cfg, platform_args, kind));
        bootstrap
    }

    /// Runs one tick: iterate, idle if asked to, pump the task queue.
    ///
    /// Returns [`Iteration::Terminate`] once exit has been requested, whatever the
    /// core reported. After a `Terminate` every further call is refused.
    ///
    /// A tick that does not sleep still yields to the runtime once, so exit
    /// requests and signals get through on a current-thread runtime with a busy core.
    pub async fn run_once(&mut self) -> Result<Iteration, LifecycleError> {
        if self.halted {
            return Err(LifecycleError::IllegalTransition {
                from: self.machine.current(),
                to: LifecycleState::Running,
            });
        }
        self.enter(LifecycleState::Running)?;

        let it = self.subsystems.core.iterate();
        match it.sleep_for(self.cfg.idle_cap()) {
            Some(d) => {
                tokio::select! {
                    _ = tokio::time::sleep(d) => {}
                    _ = self.exit.cancelled() => {}
                }
            }
            None => tokio::task::yield_now().await,
        }
        self.subsystems.tasks.pump_pending();
        self.ticks += 1;
        tracing::debug!(tick = self.ticks, iteration = it.as_label(), "tick");

        let it = if self.exit.is_cancelled() {
            Iteration::Terminate
        } else {
            it
        };
        self.halted = it.is_terminate();
        Ok(it)
    }

    /// Ticks until the core terminates or exit is requested; returns the ticks run.
    ///
    /// With [`Config::handle_os_signals`] a termination signal requests exit.
    pub async fn run_loop(&mut self) -> Result<u64, LifecycleError> {
        let watcher = self
            .cfg
            .handle_os_signals
            .then(|| self.spawn_signal_watcher());
        let first = self.ticks;

        let outcome = loop {
            match self.run_once().await {
                Ok(Iteration::Terminate) => break Ok(()),
                Ok(_) => {}
                Err(e) => break Err(e),
            }
        };
        if let Some(watcher) = watcher {
            watcher.abort();
        }
        outcome?;

        let ticks = self.ticks - first;
        let reason = if self.exit.is_cancelled() {
            "exit_requested"
        } else {
            "terminate"
        };
        tracing::info!(ticks, reason, "main loop stopped");
        self.bus.publish(
            Event::new(EventKind::LoopStopped)
                .with_ticks(ticks)
                .with_reason(reason),
        );
        Ok(ticks)
    }

    /// Runs the shutdown plan and releases the frontend.
    pub async fn shutdown(mut self) -> ShutdownReport {
        if let Err(e) = self.enter(LifecycleState::Exiting) {
            tracing::warn!(error = %e, "unexpected state at shutdown");
        }

        let plan = self
            .plan
            .take()
            .unwrap_or_else(|| ShutdownPlan::standard(&self.cfg, None, ExitKind::Normal));
        tracing::info!(steps = plan.len(), "shutdown started");

        let steps = plan.execute(&mut self.subsystems, &self.initialized, &self.bus);
        let report = ShutdownReport {
            steps,
            diagnostics: std::mem::take(&mut self.diagnostics),
        };

        if let Err(e) = self.enter(LifecycleState::Destroyed) {
            tracing::warn!(error = %e, "unexpected state after shutdown");
        }
        let failures = report.failures().count();
        tracing::info!(failures, replaced = report.replaced(), "shutdown completed");
        self.bus
            .publish(Event::new(EventKind::ShutdownCompleted).with_failures(failures));

        if let Some(listener) = self.listener.take() {
            listener.close().await;
        }
        report
    }

    /// Start, loop, shut down; returns the process exit code.
    ///
    /// Shutdown runs even when startup failed.
    pub async fn run_main(
        mut self,
        args: Vec<String>,
        platform_args: Option<PlatformArgs>,
    ) -> i32 {
        let code = match self.start(args, platform_args) {
            Ok(()) => match self.run_loop().await {
                Ok(_) => EXIT_SUCCESS,
                Err(e) => {
                    tracing::error!(label = e.as_label(), error = %e, "main loop refused to run");
                    e.exit_code()
                }
            },
            Err(e) => {
                tracing::error!(label = e.as_label(), error = %e, "startup failed");
                e.exit_code()
            }
        };

        let report = self.shutdown().await;
        if !report.is_clean() {
            tracing::warn!(
                failures = report.failures().count(),
                diagnostics = report.diagnostics.len(),
                "frontend exited with subsystem failures"
            );
        }
        code
    }

    fn bootstrap_content(
        &mut self,
        args: Vec<String>,
        platform_args: Option<PlatformArgs>,
    ) -> Result<(), LifecycleError> {
        if !self.subsystems.driver.is_initialized() {
            tracing::info!("platform driver not ready; content load skipped");
            return self.enter(LifecycleState::ContentBootstrapped);
        }

        let launch = LaunchContext::new(
            args,
            platform_args,
            self.subsystems.driver.environment_accessor(),
        );
        match self.subsystems.tasks.submit_content_load(&launch) {
            Ok(()) => {
                tracing::info!(argc = launch.argc(), "content load submitted");
                self.bus.publish(
                    Event::new(EventKind::ContentLoadSubmitted).with_argc(launch.argc()),
                );
                self.enter(LifecycleState::ContentBootstrapped)
            }
            Err(e) => {
                tracing::error!(error = %e, "content load rejected");
                self.bus
                    .publish(Event::new(EventKind::ContentLoadFailed).with_reason(e.to_string()));
                Err(LifecycleError::Bootstrap {
                    reason: e.as_message(),
                })
            }
        }
    }

    fn enter(&mut self, next: LifecycleState) -> Result<(), LifecycleError> {
        let prev = self.machine.advance(next)?;
        if prev != next {
            tracing::info!(from = prev.as_label(), to = next.as_label(), "lifecycle state changed");
            self.bus
                .publish(Event::new(EventKind::StateChanged).with_state(next));
        }
        Ok(())
    }

    fn record(&mut self, call: &'static str, res: Result<(), SubsystemError>) {
        if let Err(error) = res {
            tracing::warn!(call, error = %error, "startup call failed; continuing");
            self.bus.publish(
                Event::new(EventKind::StartupFailure)
                    .with_source(call)
                    .with_reason(error.to_string()),
            );
            self.diagnostics.push(Diagnostic { call, error });
        }
    }

    fn attach_subscribers(&mut self) {
        if self.subscribers.is_empty() {
            return;
        }
        if tokio::runtime::Handle::try_current().is_err() {
            tracing::warn!(
                subscribers = self.subscribers.len(),
                "no tokio runtime; subscribers detached"
            );
            return;
        }
        let subscribers = std::mem::take(&mut self.subscribers);
        self.listener = Some(Listener::spawn(subscribers, &self.bus));
    }

    fn spawn_signal_watcher(&self) -> JoinHandle<()> {
        let handle = self.exit_handle();
        tokio::spawn(async move {
            match wait_for_exit_signal().await {
                Ok(signal) => {
                    tracing::info!(signal, "exit signal received");
                    handle.request_exit_by(signal);
                }
                Err(e) => tracing::warn!(error = %e, "failed to install signal handlers"),
            }
        })
    }
}

impl Drop for Frontend {
    fn drop(&mut self) {
        if let Some(listener) = &self.listener {
            listener.stop.cancel();
        }
    }
}
