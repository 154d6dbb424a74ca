//! A module host double that models inter-module dependencies.

use lpjguess_loader::{EngineModule, HostError, ModuleHost};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// One call made to the host, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    AddProbePath(PathBuf),
    LoadModule(String),
    RegisterNamespace(String),
}

/// Records every call and refuses to load a module before the modules it
/// references.
#[derive(Debug, Default)]
pub struct RecordingHost {
    probe: Vec<PathBuf>,
    loaded: Vec<String>,
    namespaces: Vec<String>,
    calls: Vec<HostCall>,
    dependencies: HashMap<String, Vec<String>>,
    failures: HashMap<String, u32>,
    panic_on: Option<String>,
    load_delay: Duration,
}

impl RecordingHost {
    /// A host where `LpjGuess.Runner` references `LpjGuess.Core`.
    pub fn engine_modules() -> Self {
        Self::default().with_dependency("LpjGuess.Runner", "LpjGuess.Core")
    }

    /// Declare that `module` references `dependency` at load time.
    pub fn with_dependency(mut self, module: &str, dependency: &str) -> Self {
        self.dependencies
            .entry(module.to_string())
            .or_default()
            .push(dependency.to_string());
        self
    }

    /// Fail the next `times` loads of `module` with a bad-image error.
    pub fn failing(mut self, module: &str, times: u32) -> Self {
        self.failures.insert(module.to_string(), times);
        self
    }

    /// Panic when asked to load `module`.
    pub fn panicking_on(mut self, module: &str) -> Self {
        self.panic_on = Some(module.to_string());
        self
    }

    /// Sleep for `delay` inside every load, to widen race windows.
    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = delay;
        self
    }

    /// Modules loaded so far, in order.
    pub fn loaded(&self) -> &[String] {
        &self.loaded
    }

    /// Namespaces registered so far, in order.
    pub fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    /// Every call received, in order.
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Number of `load_module` calls, successful or not.
    pub fn load_calls(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, HostCall::LoadModule(_)))
            .count()
    }
}

impl ModuleHost for RecordingHost {
    fn probe_paths(&self) -> &[PathBuf] {
        &self.probe
    }

    fn add_probe_path(&mut self, dir: PathBuf) {
        self.calls.push(HostCall::AddProbePath(dir.clone()));
        self.probe.push(dir);
    }

    fn load_module(&mut self, module: &EngineModule, path: &Path) -> Result<(), HostError> {
        self.calls.push(HostCall::LoadModule(module.name.clone()));

        if !self.load_delay.is_zero() {
            thread::sleep(self.load_delay);
        }

        if self.panic_on.as_deref() == Some(module.name.as_str()) {
            panic!("host crashed loading {}", module.name);
        }

        if let Some(remaining) = self.failures.get_mut(&module.name) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(HostError::BadImage {
                    path: path.to_path_buf(),
                    reason: "corrupt module header".to_string(),
                });
            }
        }

        if let Some(deps) = self.dependencies.get(&module.name) {
            if let Some(missing) = deps.iter().find(|d| !self.loaded.contains(*d)) {
                return Err(HostError::UnresolvedDependency {
                    module: module.name.clone(),
                    dependency: missing.clone(),
                });
            }
        }

        self.loaded.push(module.name.clone());
        Ok(())
    }

    fn register_namespace(&mut self, namespace: &str) -> Result<(), HostError> {
        self.calls
            .push(HostCall::RegisterNamespace(namespace.to_string()));
        if !self.loaded.iter().any(|m| m == namespace) {
            return Err(HostError::UnknownNamespace(namespace.to_string()));
        }
        self.namespaces.push(namespace.to_string());
        Ok(())
    }
}
