//! Error types used by the frontvisor controller and its collaborators.
//!
//! This module defines two main error enums:
//!
//! - [`LifecycleError`]: errors raised by the lifecycle controller itself.
//! - [`SubsystemError`]: errors reported by an external collaborator
//!   (driver, task queue, UI companion, runtime core, ...).
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.

use std::any::Any;

use thiserror::Error;

use crate::core::LifecycleState;

/// Process exit code for a clean run.
pub const EXIT_SUCCESS: i32 = 0;

/// Process exit code when the initial content-load submission fails.
pub const EXIT_BOOTSTRAP_FAILURE: i32 = 1;

/// # Errors produced by the lifecycle controller.
///
/// These represent failures of the sequencing itself, such as calling
/// [`Frontend::run_once`](crate::Frontend::run_once) before startup completed,
/// or the initial content load being rejected.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    /// The requested state change is not allowed from the current state.
    #[error("illegal lifecycle transition {from:?} -> {to:?}")]
    IllegalTransition {
        /// State the controller was in.
        from: LifecycleState,
        /// State that was requested.
        to: LifecycleState,
    },

    /// The initial content-load submission was rejected by the task queue.
    #[error("content bootstrap failed: {reason}")]
    Bootstrap {
        /// Reason reported by the task queue.
        reason: String,
    },
}

impl LifecycleError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use frontvisor::LifecycleError;
    ///
    /// let err = LifecycleError::Bootstrap { reason: "no such file".into() };
    /// assert_eq!(err.as_label(), "lifecycle_bootstrap_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            LifecycleError::IllegalTransition { .. } => "lifecycle_illegal_transition",
            LifecycleError::Bootstrap { .. } => "lifecycle_bootstrap_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            LifecycleError::IllegalTransition { from, to } => {
                format!("cannot move from {} to {}", from.as_label(), to.as_label())
            }
            LifecycleError::Bootstrap { reason } => format!("bootstrap: {reason}"),
        }
    }

    /// Process exit code this error maps to.
    pub fn exit_code(&self) -> i32 {
        EXIT_BOOTSTRAP_FAILURE
    }
}

/// # Errors reported by external collaborators.
///
/// The controller never retries and never aborts a sequence because of these;
/// they are logged and collected into diagnostics.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubsystemError {
    /// The operation failed; the subsystem may be left partially released.
    #[error("operation failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The subsystem does not implement this operation on the current platform.
    #[error("operation not supported: {operation}")]
    Unsupported {
        /// Name of the operation.
        operation: &'static str,
    },

    /// The subsystem panicked while the controller was calling into it.
    #[error("subsystem panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl SubsystemError {
    /// Shorthand for [`SubsystemError::Fail`].
    pub fn fail(error: impl Into<String>) -> Self {
        SubsystemError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use frontvisor::SubsystemError;
    ///
    /// let err = SubsystemError::Unsupported { operation: "exit_spawn" };
    /// assert_eq!(err.as_label(), "subsystem_unsupported");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SubsystemError::Fail { .. } => "subsystem_failed",
            SubsystemError::Unsupported { .. } => "subsystem_unsupported",
            SubsystemError::Panicked { .. } => "subsystem_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SubsystemError::Fail { error } => format!("error: {error}"),
            SubsystemError::Unsupported { operation } => format!("unsupported: {operation}"),
            SubsystemError::Panicked { info } => format!("panic: {info}"),
        }
    }
}

/// Renders a panic payload caught by `catch_unwind` as text.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
