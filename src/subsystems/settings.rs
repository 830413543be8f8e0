//! # Configuration store contract.

/// Snapshot of the settings the controller reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Settings {
    /// Persist the current configuration when the frontend exits.
    pub save_on_exit: bool,
}

/// Read access to the application's configuration store.
pub trait SettingsStore: Send {
    /// Returns the current settings.
    fn settings(&self) -> Settings;
}

/// Settings fixed at construction time.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticSettings(pub Settings);

impl SettingsStore for StaticSettings {
    fn settings(&self) -> Settings {
        self.0
    }
}
