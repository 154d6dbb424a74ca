//! Test helpers for the LPJ-GUESS bridge.
//!
//! - [`RecordingHost`] - module host that records calls and enforces the
//!   Core-before-Runner dependency
//! - [`ScriptedEngine`] - engine that runs every job on its own thread
//! - [`asset_tree`] / [`linux_x64_config`] - on-disk fixtures

mod engine;
mod fixtures;
mod host;

pub use engine::{ScriptedEngine, ScriptedEngineError};
pub use fixtures::{asset_tree, install_modules, linux_x64_config};
pub use host::{HostCall, RecordingHost};
