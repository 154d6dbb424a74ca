//! Runtime loader for the LPJ-GUESS engine.
//!
//! The engine is distributed as two binary modules per platform. This crate
//! detects the host platform, finds the matching binary set and loads it into
//! a foreign runtime exactly once, dependency module first.
//!
//! # Architecture
//!
//! ```text
//! RuntimeHandle::acquire()
//!     │
//!     ├─ Loaded? ──────────────▶ return (no side effects)
//!     │
//!     ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │ load sequence (one thread at a time)                     │
//! │                                                          │
//! │   1. detect_runtime(system, machine) → RuntimeIdentifier │
//! │   2. RuntimeLayout::resolve(asset_root, rid)             │
//! │   3. host.add_probe_path(rid_dir)        (once)          │
//! │   4. host.load_module(LpjGuess.Core)                     │
//! │   5. host.load_module(LpjGuess.Runner)                   │
//! │   6. host.register_namespace(..) for both                │
//! └──────────────────────────────────────────────────────────┘
//!     │
//!     ▼
//!  Loaded / Failed(reason)
//! ```
//!
//! # Hosts
//!
//! This crate ships no [`ModuleHost`]. Embedding the foreign runtime is the
//! embedder's job: it implements the four host calls against its runtime and
//! hands the host to [`RuntimeHandle::new`]. Any `ModuleHost`, including a
//! `Box<dyn ModuleHost>`, can be used. The workspace's own host is the test
//! double in `lpjguess-test-helpers`, so the `lpjguess-bridge` CLI only
//! detects platforms and checks assets. It never loads modules.
//!
//! # Example
//!
//! ```ignore
//! use lpjguess_loader::{LoaderConfig, RuntimeHandle};
//! use std::sync::OnceLock;
//!
//! static RUNTIME: OnceLock<RuntimeHandle<CoreClrHost>> = OnceLock::new();
//!
//! let runtime = RUNTIME.get_or_init(|| {
//!     RuntimeHandle::new(LoaderConfig::from_env(), CoreClrHost::start())
//! });
//! runtime.ensure_loaded()?;
//! ```

mod config;
mod error;
mod host;
mod layout;
mod platform;
mod runtime;

pub use config::{FailurePolicy, LoaderConfig, RUNTIME_DIR_ENV};
pub use error::{HostError, LoadError};
pub use host::ModuleHost;
pub use layout::{EngineModule, ModuleSet, RuntimeLayout, RIDS_DIR};
pub use platform::{detect_runtime, HostPlatform, RuntimeIdentifier};
pub use runtime::{LoadedRuntime, RuntimeHandle, RuntimeStatus};
