//! # Menu and logger contracts.
//!
//! Both are optional collaborators: a frontend built without a menu or without a
//! logging backend simply leaves them unset and the matching shutdown steps are skipped.

use crate::error::SubsystemError;

/// In-application menu.
pub trait Menu: Send {
    /// Detaches the menu from driver ownership so the driver teardown does not release it too.
    fn unset_own_driver(&mut self) -> Result<(), SubsystemError>;
}

/// Logging backend owned by the application.
pub trait Logger: Send {
    /// Flushes and closes the backend.
    fn shutdown(&mut self) -> Result<(), SubsystemError>;
}
