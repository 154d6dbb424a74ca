//! Error types for runtime loading.

use std::path::PathBuf;
use thiserror::Error;

/// Failure reported by a [`ModuleHost`](crate::ModuleHost).
#[derive(Debug, Clone, Error)]
pub enum HostError {
    /// A module references another module that is not loaded yet.
    #[error("unresolved dependency {dependency} while loading {module}")]
    UnresolvedDependency { module: String, dependency: String },

    /// The binary could not be read or is not a valid module.
    #[error("failed to load {path}: {reason}")]
    BadImage { path: PathBuf, reason: String },

    /// A namespace was registered for a module that is not loaded.
    #[error("namespace {0} is not provided by any loaded module")]
    UnknownNamespace(String),

    /// Any other failure raised by the underlying runtime.
    #[error("{0}")]
    Other(String),
}

/// Errors while establishing the engine runtime.
///
/// `Clone` so a handle with [`FailurePolicy::Cache`](crate::FailurePolicy)
/// can hand the same error to every later caller.
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    /// No engine binaries exist for this (system, machine) pair.
    #[error("unsupported platform: system={system}, machine={machine}")]
    UnsupportedPlatform { system: String, machine: String },

    /// The platform directory or one of its modules is absent.
    #[error("missing runtime assets at {}: {reason}", path.display())]
    MissingRuntimeAssets { path: PathBuf, reason: String },

    /// The underlying runtime refused a module.
    #[error("failed to load module {module}: {source}")]
    AssemblyLoad {
        module: String,
        #[source]
        source: HostError,
    },

    /// The module host panicked part-way through the load sequence.
    #[error("module host panicked while loading the engine runtime")]
    HostPanicked,
}
