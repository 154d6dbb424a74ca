//! The seam between the loader and the foreign runtime.
//!
//! Implementations live outside this crate, next to whatever embeds the
//! runtime.

use crate::error::HostError;
use crate::layout::EngineModule;
use std::path::{Path, PathBuf};

/// A runtime that can load engine modules into the current process.
///
/// The loader drives the host through a fixed sequence: extend the probe
/// path, load the dependency module, load the primary module, register both
/// namespaces. Implementations only perform the individual steps; ordering
/// and once-only semantics belong to [`RuntimeHandle`](crate::RuntimeHandle).
///
/// # Example
///
/// ```ignore
/// struct CoreClrHost { /* runtime handle */ }
///
/// impl ModuleHost for CoreClrHost {
///     fn probe_paths(&self) -> &[PathBuf] { &self.probe }
///     fn add_probe_path(&mut self, dir: PathBuf) { self.probe.push(dir) }
///     fn load_module(&mut self, module: &EngineModule, path: &Path) -> Result<(), HostError> {
///         self.context.load_from_path(path).map_err(|e| HostError::Other(e.to_string()))
///     }
///     fn register_namespace(&mut self, namespace: &str) -> Result<(), HostError> {
///         self.resolver.add_reference(namespace).map_err(|e| HostError::Other(e.to_string()))
///     }
/// }
/// ```
pub trait ModuleHost: Send {
    /// Directories the host searches when resolving module references.
    fn probe_paths(&self) -> &[PathBuf];

    /// Add a directory to the search path.
    fn add_probe_path(&mut self, dir: PathBuf);

    /// Load a module binary by absolute path.
    ///
    /// Must fail if the module references a module that is not loaded yet.
    fn load_module(&mut self, module: &EngineModule, path: &Path) -> Result<(), HostError>;

    /// Make a loaded module's namespace resolvable by callers.
    fn register_namespace(&mut self, namespace: &str) -> Result<(), HostError>;
}

impl<H: ModuleHost + ?Sized> ModuleHost for Box<H> {
    fn probe_paths(&self) -> &[PathBuf] {
        (**self).probe_paths()
    }

    fn add_probe_path(&mut self, dir: PathBuf) {
        (**self).add_probe_path(dir)
    }

    fn load_module(&mut self, module: &EngineModule, path: &Path) -> Result<(), HostError> {
        (**self).load_module(module, path)
    }

    fn register_namespace(&mut self, namespace: &str) -> Result<(), HostError> {
        (**self).register_namespace(namespace)
    }
}
