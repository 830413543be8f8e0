//! Lifecycle core: sequencing, the main loop and teardown.
//!
//! The public entry point is [`Frontend`], assembled with [`FrontendBuilder`].
//!
//! Internal modules:
//! - [`state`]: lifecycle states and validated transitions;
//! - [`iteration`]: per-tick result and the pure sleep decision;
//! - [`launch`]: immutable launch context handed to the content load;
//! - [`shutdown`]: the ordered, total shutdown plan and its report;
//! - [`signals`]: OS termination signals and the in-process exit handle;
//! - [`frontend`]: the controller tying them together.

mod builder;
mod config;
mod frontend;
mod iteration;
mod launch;
mod shutdown;
mod signals;
mod state;

pub use builder::FrontendBuilder;
pub use config::Config;
pub use frontend::Frontend;
pub use iteration::Iteration;
pub use launch::{EnvironmentAccessor, LaunchContext, PlatformArgs};
pub use shutdown::{
    Completion, Diagnostic, InitSet, ShutdownPlan, ShutdownReport, SkipReason, StepId,
    StepOutcome, StepRecord,
};
pub use signals::{ExitHandle, wait_for_exit_signal};
pub use state::{LifecycleState, StateMachine};
