use std::sync::Arc;

use crate::core::{Config, Frontend};
use crate::subscribers::Subscribe;
use crate::subsystems::{
    DriverRegistry, Logger, Menu, PlatformDriver, RuntimeCore, SettingsStore, Subsystems,
    TaskQueue, UiCompanion,
};

/// Builder for constructing a [`Frontend`].
///
/// Every collaborator left unset falls back to its null implementation; the menu
/// and the logger stay absent unless provided.
pub struct FrontendBuilder {
    cfg: Config,
    subsystems: Subsystems,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl FrontendBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subsystems: Subsystems::default(),
            subscribers: Vec::new(),
        }
    }

    /// Replaces the whole collaborator bundle.
    pub fn with_subsystems(mut self, subsystems: Subsystems) -> Self {
        self.subsystems = subsystems;
        self
    }

    pub fn with_core(mut self, core: impl RuntimeCore + 'static) -> Self {
        self.subsystems.core = Box::new(core);
        self
    }

    pub fn with_driver(mut self, driver: impl PlatformDriver + 'static) -> Self {
        self.subsystems.driver = Box::new(driver);
        self
    }

    pub fn with_registry(mut self, registry: impl DriverRegistry + 'static) -> Self {
        self.subsystems.registry = Box::new(registry);
        self
    }

    pub fn with_task_queue(mut self, tasks: impl TaskQueue + 'static) -> Self {
        self.subsystems.tasks = Box::new(tasks);
        self
    }

    pub fn with_ui(mut self, ui: impl UiCompanion + 'static) -> Self {
        self.subsystems.ui = Box::new(ui);
        self
    }

    pub fn with_settings(mut self, settings: impl SettingsStore + 'static) -> Self {
        self.subsystems.settings = Box::new(settings);
        self
    }

    pub fn with_menu(mut self, menu: impl Menu + 'static) -> Self {
        self.subsystems.menu = Some(Box::new(menu));
        self
    }

    pub fn with_logger(mut self, logger: impl Logger + 'static) -> Self {
        self.subsystems.logger = Some(Box::new(logger));
        self
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive lifecycle events (state changes, shutdown steps, etc.)
    /// through dedicated workers with bounded queues, started by [`Frontend::start`].
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the frontend. Nothing is initialized until [`Frontend::start`].
    pub fn build(self) -> Frontend {
        Frontend::from_parts(self.cfg, self.subsystems, self.subscribers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LifecycleState;
    use crate::subsystems::{NullCore, Settings, StaticSettings};

    #[test]
    fn test_build_leaves_everything_uninitialized() {
        let fe = FrontendBuilder::new(Config::default())
            .with_core(NullCore::new(std::time::Duration::from_millis(1)))
            .with_settings(StaticSettings(Settings { save_on_exit: true }))
            .build();
        assert_eq!(fe.state(), LifecycleState::Uninitialized);
        assert_eq!(fe.ticks(), 0);
        assert!(fe.diagnostics().is_empty());
        assert_eq!(fe.config().bus_capacity, 1024);
    }
}
