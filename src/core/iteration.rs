//! # Result of one runloop tick.
//!
//! The runtime core reports one [`Iteration`] per tick. The controller derives its
//! sleep decision from it with [`Iteration::sleep_for`], which depends on nothing
//! but the value itself and the configured cap, so identical results always produce
//! identical decisions regardless of how long the loop has been running.

use std::time::Duration;

/// Outcome of a single runloop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Iteration {
    /// Work was done; tick again immediately.
    Busy,
    /// Nothing pending; the core suggests idling for the given duration.
    Idle(Duration),
    /// The core asked the application to quit.
    Terminate,
}

impl Iteration {
    /// Idle hint expressed in milliseconds, as most cores report it.
    #[inline]
    pub fn idle_ms(ms: u64) -> Self {
        Iteration::Idle(Duration::from_millis(ms))
    }

    /// Returns true if the loop must stop after this tick.
    #[inline]
    pub fn is_terminate(&self) -> bool {
        matches!(self, Iteration::Terminate)
    }

    /// Decides how long the calling thread should suspend after this tick.
    ///
    /// - `Busy` / `Terminate` → `None`
    /// - `Idle(0)` → `None`
    /// - `Idle(d)` → `Some(d)`, clamped to `cap` when one is given
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use frontvisor::Iteration;
    ///
    /// let it = Iteration::idle_ms(40);
    /// assert_eq!(it.sleep_for(None), Some(Duration::from_millis(40)));
    /// assert_eq!(it.sleep_for(Some(Duration::from_millis(16))), Some(Duration::from_millis(16)));
    /// assert_eq!(Iteration::Busy.sleep_for(None), None);
    /// ```
    pub fn sleep_for(&self, cap: Option<Duration>) -> Option<Duration> {
        match self {
            Iteration::Idle(d) if !d.is_zero() => Some(match cap {
                Some(cap) => (*d).min(cap),
                None => *d,
            }),
            _ => None,
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Iteration::Busy => "busy",
            Iteration::Idle(_) => "idle",
            Iteration::Terminate => "terminate",
        }
    }
}
