//! Loader configuration.

use crate::layout::ModuleSet;
use crate::platform::HostPlatform;
use std::path::PathBuf;

/// Environment variable overriding the asset root.
pub const RUNTIME_DIR_ENV: &str = "LPJGUESS_RUNTIME_DIR";

/// What a handle does after a failed load attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Re-run the whole load sequence on the next call. Recovers from
    /// transient problems (assets mounted after start-up) but repeats hard
    /// failures on every call.
    #[default]
    Retry,

    /// Remember the failure and return it without touching the host again.
    Cache,
}

/// Configuration for a [`RuntimeHandle`](crate::RuntimeHandle).
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Directory containing `rids/<rid>/`.
    pub asset_root: PathBuf,

    /// Behavior after a failed load.
    pub failure_policy: FailurePolicy,

    /// Module names and file names, in load order.
    pub modules: ModuleSet,

    /// Platform to detect against. `None` probes the running process.
    pub platform: Option<HostPlatform>,
}

impl LoaderConfig {
    /// Create a config rooted at the given asset directory.
    pub fn new(asset_root: impl Into<PathBuf>) -> Self {
        Self {
            asset_root: asset_root.into(),
            failure_policy: FailurePolicy::default(),
            modules: ModuleSet::default(),
            platform: None,
        }
    }

    /// Root from `LPJGUESS_RUNTIME_DIR`, falling back to the directory of the
    /// current executable.
    pub fn from_env() -> Self {
        let asset_root = std::env::var_os(RUNTIME_DIR_ENV)
            .map(PathBuf::from)
            .or_else(|| {
                std::env::current_exe()
                    .ok()
                    .and_then(|exe| exe.parent().map(PathBuf::from))
            })
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(asset_root)
    }

    /// Set the failure policy.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Use a different module pair.
    pub fn with_modules(mut self, modules: ModuleSet) -> Self {
        self.modules = modules;
        self
    }

    /// Detect against a fixed platform instead of the running process.
    pub fn with_platform(mut self, platform: HostPlatform) -> Self {
        self.platform = Some(platform);
        self
    }
}
