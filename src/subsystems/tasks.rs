//! # Background task queue contract.
//!
//! The queue may run worker threads internally; the controller only ever calls
//! the two synchronous entry points below, on its own thread.

use crate::core::LaunchContext;
use crate::error::SubsystemError;

/// Deferred work facility pumped once per tick.
pub trait TaskQueue: Send {
    /// Submits the initial content load built from the command line.
    ///
    /// Blocks until the queue accepted or rejected the request.
    fn submit_content_load(&mut self, launch: &LaunchContext) -> Result<(), SubsystemError>;

    /// Gives pending work one chance to make progress. Must not block.
    fn pump_pending(&mut self);
}
