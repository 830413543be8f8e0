//! # Launch context handed to the initial content load.
//!
//! [`LaunchContext`] is an immutable snapshot of how the process was invoked: the
//! argument vector, the opaque platform arguments, and the environment accessor of
//! the driver that was active at startup. It is built once by the startup sequence
//! and only ever read afterwards; clones share the same data.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Opaque, platform-specific startup arguments (an app bundle handle, an intent, ...).
pub type PlatformArgs = Arc<dyn Any + Send + Sync>;

/// Lookup into the platform environment exposed by the active driver.
///
/// Given a key, returns the platform's value for it, if any.
pub type EnvironmentAccessor = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Immutable snapshot of the process invocation.
#[derive(Clone)]
pub struct LaunchContext {
    args: Arc<[String]>,
    platform_args: Option<PlatformArgs>,
    environment: EnvironmentAccessor,
}

impl LaunchContext {
    /// Creates a new launch context.
    pub fn new(
        args: impl Into<Arc<[String]>>,
        platform_args: Option<PlatformArgs>,
        environment: EnvironmentAccessor,
    ) -> Self {
        Self {
            args: args.into(),
            platform_args,
            environment,
        }
    }

    /// Number of arguments, program name included.
    #[inline]
    pub fn argc(&self) -> usize {
        self.args.len()
    }

    /// Argument vector, program name first.
    #[inline]
    pub fn argv(&self) -> &[String] {
        &self.args
    }

    /// Opaque platform arguments, if the platform supplied any.
    #[inline]
    pub fn platform_args(&self) -> Option<&PlatformArgs> {
        self.platform_args.as_ref()
    }

    /// Queries the driver's environment accessor.
    pub fn environment(&self, key: &str) -> Option<String> {
        (self.environment)(key)
    }

    /// Returns a handle to the driver's environment accessor.
    pub fn environment_accessor(&self) -> EnvironmentAccessor {
        Arc::clone(&self.environment)
    }
}

impl fmt::Debug for LaunchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LaunchContext")
            .field("argc", &self.argc())
            .field("argv", &self.args)
            .field("platform_args", &self.platform_args.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argc_matches_argv() {
        let env: EnvironmentAccessor = Arc::new(|_: &str| None::<String>);
        let ctx = LaunchContext::new(vec!["app".to_string(), "game.bin".to_string()], None, env);
        assert_eq!(ctx.argc(), 2);
        assert_eq!(ctx.argv()[1], "game.bin");
        assert!(ctx.platform_args().is_none());
    }

    #[test]
    fn test_environment_goes_through_accessor() {
        let env: EnvironmentAccessor =
            Arc::new(|key: &str| (key == "content_dir").then(|| "/roms".to_string()));
        let ctx = LaunchContext::new(vec!["app".to_string()], None, env);
        assert_eq!(ctx.environment("content_dir").as_deref(), Some("/roms"));
        assert_eq!(ctx.environment("missing"), None);
    }

    #[test]
    fn test_platform_args_are_shared_not_copied() {
        let payload: PlatformArgs = Arc::new(7_u32);
        let env: EnvironmentAccessor = Arc::new(|_: &str| None::<String>);
        let ctx = LaunchContext::new(Vec::<String>::new(), Some(Arc::clone(&payload)), env);
        let clone = ctx.clone();
        let got = clone.platform_args().unwrap();
        assert!(Arc::ptr_eq(got, &payload));
        assert_eq!(got.downcast_ref::<u32>(), Some(&7));
    }
}
