//! # Lifecycle state machine.
//!
//! [`LifecycleState`] is the single source of truth for where a [`Frontend`](crate::Frontend)
//! is in its life. It is an owned value inside the controller; transitions go through
//! [`StateMachine::advance`], which rejects anything that is not a legal move.
//!
//! ```text
//! Uninitialized ─► Preinitialized ─► DriverInitialized ─► ContentBootstrapped ─► Running ─┐
//!       │                │                  │                     │                 ▲  │  │
//!       │                │                  │                     │                 └──┘  │
//!       └────────────────┴──────────────────┴─────────────────────┴──────────────► Exiting
//!                                                                                     │
//!                                                                                     ▼
//!                                                                                 Destroyed
//! ```
//!
//! ## Rules
//! - Forward moves go one step at a time.
//! - `Running ─► Running` is the only self-loop (one per tick).
//! - `Exiting` is reachable from every non-terminal state; shutdown is total.
//! - `Destroyed` is terminal.

use crate::error::LifecycleError;

/// Position of a frontend in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LifecycleState {
    /// Nothing has been touched yet.
    Uninitialized,
    /// Pre-initialization signalled; the platform driver may now be selected.
    Preinitialized,
    /// The platform driver has been initialized.
    DriverInitialized,
    /// Core services are up and the initial content load was submitted (or skipped).
    ContentBootstrapped,
    /// The main loop is ticking.
    Running,
    /// The shutdown plan is executing.
    Exiting,
    /// Shutdown completed; the controller holds no live subsystems.
    Destroyed,
}

impl LifecycleState {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            LifecycleState::Uninitialized => "uninitialized",
            LifecycleState::Preinitialized => "preinitialized",
            LifecycleState::DriverInitialized => "driver_initialized",
            LifecycleState::ContentBootstrapped => "content_bootstrapped",
            LifecycleState::Running => "running",
            LifecycleState::Exiting => "exiting",
            LifecycleState::Destroyed => "destroyed",
        }
    }

    /// Returns true if no further transition is possible.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, LifecycleState::Destroyed)
    }

    /// Returns true if a transition from `self` to `next` is legal.
    pub fn can_advance_to(&self, next: LifecycleState) -> bool {
        use LifecycleState::*;

        match (*self, next) {
            (Running, Running) => true,
            (Uninitialized, Preinitialized)
            | (Preinitialized, DriverInitialized)
            | (DriverInitialized, ContentBootstrapped)
            | (ContentBootstrapped, Running)
            | (Exiting, Destroyed) => true,
            (from, Exiting) => from < Exiting,
            _ => false,
        }
    }
}

/// Owned lifecycle state with validated transitions.
#[derive(Debug, Clone)]
pub struct StateMachine {
    current: LifecycleState,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    /// Creates a machine in [`LifecycleState::Uninitialized`].
    pub fn new() -> Self {
        Self {
            current: LifecycleState::Uninitialized,
        }
    }

    /// Current state.
    #[inline]
    pub fn current(&self) -> LifecycleState {
        self.current
    }

    /// Moves to `next`, returning the previous state.
    ///
    /// Returns [`LifecycleError::IllegalTransition`] and leaves the state untouched
    /// if the move is not allowed.
    pub fn advance(&mut self, next: LifecycleState) -> Result<LifecycleState, LifecycleError> {
        let from = self.current;
        if !from.can_advance_to(next) {
            return Err(LifecycleError::IllegalTransition { from, to: next });
        }
        self.current = next;
        Ok(from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use LifecycleState::*;

    const ALL: [LifecycleState; 7] = [
        Uninitialized,
        Preinitialized,
        DriverInitialized,
        ContentBootstrapped,
        Running,
        Exiting,
        Destroyed,
    ];

    #[test]
    fn test_full_forward_path_is_legal() {
        let mut sm = StateMachine::new();
        for next in &ALL[1..] {
            sm.advance(*next).unwrap();
        }
        assert_eq!(sm.current(), Destroyed);
        assert!(sm.current().is_terminal());
    }

    #[test]
    fn test_running_self_loops() {
        let mut sm = StateMachine::new();
        for next in [Preinitialized, DriverInitialized, ContentBootstrapped, Running] {
            sm.advance(next).unwrap();
        }
        for _ in 0..3 {
            assert_eq!(sm.advance(Running).unwrap(), Running);
        }
    }

    #[test]
    fn test_exiting_reachable_from_every_live_state() {
        for from in &ALL[..5] {
            assert!(from.can_advance_to(Exiting), "{from:?} -> Exiting");
        }
        assert!(!Exiting.can_advance_to(Exiting));
        assert!(!Destroyed.can_advance_to(Exiting));
    }

    #[test]
    fn test_backward_and_skipping_moves_are_rejected() {
        let mut sm = StateMachine::new();
        let err = sm.advance(Running).unwrap_err();
        assert_eq!(
            err,
            LifecycleError::IllegalTransition {
                from: Uninitialized,
                to: Running
            }
        );
        assert_eq!(sm.current(), Uninitialized);

        sm.advance(Preinitialized).unwrap();
        assert!(sm.advance(Uninitialized).is_err());
        assert!(sm.advance(Preinitialized).is_err());
        assert!(sm.advance(Destroyed).is_err());
    }

    #[test]
    fn test_destroyed_is_terminal() {
        for next in ALL {
            assert!(!Destroyed.can_advance_to(next));
        }
    }
}
