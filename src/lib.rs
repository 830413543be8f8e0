//! # frontvisor
//!
//! **Frontvisor** is the lifecycle and main-loop controller of a long-running
//! interactive application (an emulator frontend, a media player, a kiosk app).
//!
//! It brings the application's collaborators up in a strict order, hands the
//! command line to a background task queue as the initial content load, drives a
//! tick loop with an idle-aware sleep, and tears everything down again through an
//! explicit, total shutdown plan that may end in process replacement.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  ┌────────────┐ ┌──────────────┐ ┌───────────┐ ┌─────────────┐ ┌──────────────┐
//!  │RuntimeCore │ │PlatformDriver│ │ TaskQueue │ │ UiCompanion │ │ Settings/Menu│
//!  └─────┬──────┘ └──────┬───────┘ └─────┬─────┘ └──────┬──────┘ └──────┬───────┘
//!        └───────────────┴───────────────┼──────────────┴───────────────┘
//!                                        ▼  (Box<dyn ...>, owned)
//! ┌───────────────────────────────────────────────────────────────────────────────┐
//! │  Frontend (lifecycle controller)                                              │
//! │  - StateMachine   (validated transitions)                                     │
//! │  - InitSet        (which subsystems went through init)                        │
//! │  - ShutdownPlan   (12 ordered steps, built at start)                          │
//! │  - ExitHandle     (CancellationToken; OS signals, other tasks)                │
//! └──────────────────────────────────┬────────────────────────────────────────────┘
//!                                    │ publishes Event
//!                                    ▼
//! ┌───────────────────────────────────────────────────────────────────────────────┐
//! │                        Bus (broadcast channel)                                │
//! │                    (capacity: Config::bus_capacity)                           │
//! └──────────────────────────────────┬────────────────────────────────────────────┘
//!                                    ▼
//!                        event listener ──► SubscriberSet
//!                                          ┌─────┼─────┐
//!                                          ▼     ▼     ▼
//!                                   LogWriter  sub2  subN
//! ```
//!
//! ### Lifecycle
//! ```text
//! Uninitialized ─► Preinitialized ─► DriverInitialized ─► ContentBootstrapped
//!                                                               │
//!                                           Running ◄───────────┘
//!                                    (iterate ─► sleep ─► pump)*
//!                                              │
//!                                           Exiting ─► ShutdownPlan ─► Destroyed
//! ```
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                         |
//! |-------------------|----------------------------------------------------------|--------------------------------------------|
//! | **Controller**    | Startup, main loop, shutdown.                            | [`Frontend`], [`FrontendBuilder`]          |
//! | **Collaborators** | Contracts the application implements.                    | [`RuntimeCore`], [`PlatformDriver`], ...   |
//! | **Shutdown**      | Ordered, total teardown with per-step outcomes.          | [`ShutdownPlan`], [`ShutdownReport`]       |
//! | **Subscriber API**| Hook into lifecycle events (logging, metrics, ...).      | [`Subscribe`]                              |
//! | **Errors**        | Typed errors for sequencing and collaborators.           | [`LifecycleError`], [`SubsystemError`]     |
//! | **Configuration** | Centralized controller settings.                         | [`Config`]                                 |
//!
//! ## Optional features
//! - `logging`: exports the built-in [`LogWriter`] subscriber (default on).
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use frontvisor::{Config, Frontend, Iteration, NullCore, Subscribe};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let mut cfg = Config::default();
//!     cfg.handle_os_signals = false;
//!
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(frontvisor::LogWriter::new())];
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn Subscribe>> = Vec::new();
//!
//!     let mut frontend = Frontend::builder(cfg)
//!         .with_core(NullCore::default())
//!         .with_subscribers(subs)
//!         .build();
//!
//!     frontend.start(vec!["app".into()], None).expect("content load");
//!     // drive a few ticks by hand, as an embedding host would
//!     for _ in 0..3 {
//!         let it = frontend.run_once().await.expect("running");
//!         assert!(!it.is_terminate());
//!     }
//!     let report = frontend.shutdown().await;
//!     assert!(report.is_clean());
//! }
//! ```
mod core;
mod error;
mod events;
mod subscribers;
mod subsystems;

#[cfg(test)]
mod testing;

// ---- Public re-exports ----

pub use crate::core::{
    Completion, Config, Diagnostic, EnvironmentAccessor, ExitHandle, Frontend, FrontendBuilder,
    InitSet, Iteration, LaunchContext, LifecycleState, PlatformArgs, ShutdownPlan,
    ShutdownReport, SkipReason, StateMachine, StepId, StepOutcome, StepRecord,
    wait_for_exit_signal,
};
pub use error::{EXIT_BOOTSTRAP_FAILURE, EXIT_SUCCESS, LifecycleError, SubsystemError};
pub use events::{Bus, Event, EventKind};
pub use subscribers::{Subscribe, SubscriberSet};
pub use subsystems::{
    Command, CoreControl, DriverRegistry, ExecRespawn, ExitKind, Logger, Menu, NULL_CORE_IDLE,
    NullCore, NullDriver, NullRegistry, NullTaskQueue, NullUi, PlatformDriver, Respawn,
    RuntimeCore, Settings, SettingsStore, StaticSettings, Subsystem, Subsystems, TaskQueue,
    UiCompanion,
};

// Optional: expose the built-in logger subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
