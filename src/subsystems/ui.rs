//! # UI companion contract.
//!
//! A secondary control surface (desktop UI, remote panel) living next to the main
//! loop without driving it.

use crate::error::SubsystemError;

/// Independently-lifecycled companion UI.
pub trait UiCompanion: Send {
    /// Initializes the first usable companion surface.
    fn init_first(&mut self) -> Result<(), SubsystemError>;

    /// Tears down the companion's windows and callbacks.
    fn deinit(&mut self) -> Result<(), SubsystemError>;

    /// Frees the companion instance.
    fn free(&mut self) -> Result<(), SubsystemError>;

    /// Frees the driver-selection state the companion keeps for the platform driver.
    fn free_driver_state(&mut self) -> Result<(), SubsystemError> {
        Ok(())
    }
}
