//! The process-wide runtime handle.
//!
//! # State machine
//!
//! ```text
//!              acquire()                 load ok
//!  Unloaded ─────────────▶ Loading ─────────────────▶ Loaded
//!     ▲                       │                          │
//!     │ Retry policy          │ load failed              │ acquire() is a no-op
//!     │                       ▼                          ▼
//!     └──────────────────  Failed(error) ──▶ Cache policy: same error again
//! ```
//!
//! Callers that arrive while another thread is `Loading` block on a condvar
//! until the attempt resolves, so concurrent first calls never run the load
//! sequence twice.

use crate::config::{FailurePolicy, LoaderConfig};
use crate::error::LoadError;
use crate::host::ModuleHost;
use crate::layout::RuntimeLayout;
use crate::platform::{HostPlatform, RuntimeIdentifier};
use parking_lot::{Condvar, Mutex};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Description of a successfully loaded runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedRuntime {
    /// Identifier of the binary set that was loaded.
    pub rid: RuntimeIdentifier,
    /// Directory the modules were loaded from.
    pub directory: PathBuf,
    /// Module names, in the order they were loaded.
    pub modules: Vec<String>,
}

/// Snapshot of a handle's state.
#[derive(Debug, Clone)]
pub enum RuntimeStatus {
    Unloaded,
    Loading,
    Loaded(LoadedRuntime),
    /// The last attempt failed with this error.
    Failed(LoadError),
}

impl RuntimeStatus {
    pub fn is_loaded(&self) -> bool {
        matches!(self, RuntimeStatus::Loaded(_))
    }
}

/// Owns the foreign runtime and loads the engine into it exactly once.
///
/// No engine type may be used before [`acquire`](Self::acquire) has
/// succeeded. The handle is `Sync`; share it behind an `Arc` or a `static`.
pub struct RuntimeHandle<H> {
    config: LoaderConfig,
    host: Mutex<H>,
    state: Mutex<RuntimeStatus>,
    changed: Condvar,
    attempts: Mutex<u32>,
}

impl<H: ModuleHost> RuntimeHandle<H> {
    /// Create an unloaded handle. Nothing is touched until the first
    /// [`acquire`](Self::acquire).
    pub fn new(config: LoaderConfig, host: H) -> Self {
        Self {
            config,
            host: Mutex::new(host),
            state: Mutex::new(RuntimeStatus::Unloaded),
            changed: Condvar::new(),
            attempts: Mutex::new(0),
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Current state of the handle.
    pub fn status(&self) -> RuntimeStatus {
        self.state.lock().clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.state.lock().is_loaded()
    }

    /// Number of times the load sequence has been started.
    pub fn attempts(&self) -> u32 {
        *self.attempts.lock()
    }

    /// Run `f` against the host. Intended for inspection once loaded.
    pub fn with_host<R>(&self, f: impl FnOnce(&mut H) -> R) -> R {
        f(&mut self.host.lock())
    }

    /// Make sure the engine is loaded, loading it on the first call.
    ///
    /// Idempotent: after a success every further call returns the same
    /// [`LoadedRuntime`] without touching the host. After a failure the
    /// configured [`FailurePolicy`] decides whether the sequence is re-run or
    /// the original error is returned again.
    pub fn acquire(&self) -> Result<LoadedRuntime, LoadError> {
        let mut state = self.state.lock();
        loop {
            match &*state {
                RuntimeStatus::Loaded(runtime) => {
                    debug!(rid = %runtime.rid, "Runtime already loaded");
                    return Ok(runtime.clone());
                }
                RuntimeStatus::Failed(error)
                    if self.config.failure_policy == FailurePolicy::Cache =>
                {
                    debug!(error = %error, "Returning cached load failure");
                    return Err(error.clone());
                }
                RuntimeStatus::Unloaded | RuntimeStatus::Failed(_) => break,
                RuntimeStatus::Loading => {}
            }
            self.changed.wait(&mut state);
        }
        *state = RuntimeStatus::Loading;
        drop(state);

        let mut guard = LoadingGuard {
            handle: self,
            done: false,
        };
        let outcome = self.load();
        guard.finish(match &outcome {
            Ok(runtime) => RuntimeStatus::Loaded(runtime.clone()),
            Err(e) => RuntimeStatus::Failed(e.clone()),
        });
        outcome
    }

    /// Alias of [`acquire`](Self::acquire) for callers that only need the
    /// side effect.
    pub fn ensure_loaded(&self) -> Result<(), LoadError> {
        self.acquire().map(|_| ())
    }

    fn load(&self) -> Result<LoadedRuntime, LoadError> {
        *self.attempts.lock() += 1;

        let platform = self
            .config
            .platform
            .clone()
            .unwrap_or_else(HostPlatform::current);

        let result = self.load_for(&platform);
        if let Err(e) = &result {
            warn!(platform = %platform, error = %e, "Failed to load engine runtime");
        }
        result
    }

    fn load_for(&self, platform: &HostPlatform) -> Result<LoadedRuntime, LoadError> {
        let rid = platform.runtime_identifier()?;
        let modules = &self.config.modules;
        let layout = RuntimeLayout::resolve(&self.config.asset_root, rid, modules)?;

        let mut host = self.host.lock();

        if !host.probe_paths().contains(&layout.directory) {
            host.add_probe_path(layout.directory.clone());
        }

        let steps = [
            (&modules.dependency, &layout.dependency_path),
            (&modules.primary, &layout.primary_path),
        ];
        for (module, path) in steps {
            debug!(module = %module.name, path = ?path, "Loading engine module");
            host.load_module(module, path)
                .map_err(|source| LoadError::AssemblyLoad {
                    module: module.name.clone(),
                    source,
                })?;
        }

        for module in modules.load_order() {
            host.register_namespace(&module.name)
                .map_err(|source| LoadError::AssemblyLoad {
                    module: module.name.clone(),
                    source,
                })?;
        }

        info!(rid = %rid, dir = ?layout.directory, "Engine runtime loaded");

        Ok(LoadedRuntime {
            rid,
            directory: layout.directory,
            modules: modules.load_order().iter().map(|m| m.name.clone()).collect(),
        })
    }

    fn publish(&self, status: RuntimeStatus) {
        let mut state = self.state.lock();
        *state = status;
        self.changed.notify_all();
    }
}

/// Publishes the outcome of a load attempt, including when the host panics
/// mid-sequence, so waiters never block on a `Loading` state forever.
struct LoadingGuard<'a, H: ModuleHost> {
    handle: &'a RuntimeHandle<H>,
    done: bool,
}

impl<H: ModuleHost> LoadingGuard<'_, H> {
    fn finish(&mut self, status: RuntimeStatus) {
        self.done = true;
        self.handle.publish(status);
    }
}

impl<H: ModuleHost> Drop for LoadingGuard<'_, H> {
    fn drop(&mut self) {
        if !self.done {
            self.handle
                .publish(RuntimeStatus::Failed(LoadError::HostPanicked));
        }
    }
}
