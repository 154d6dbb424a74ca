//! On-disk layout of the engine binaries.
//!
//! ```text
//! <asset_root>/
//!     rids/
//!         linux-x64/
//!             LpjGuess.Core.dll
//!             LpjGuess.Runner.dll
//!         osx-arm64/
//!             ...
//! ```

use crate::error::LoadError;
use crate::platform::RuntimeIdentifier;
use std::path::{Path, PathBuf};

/// Name of the directory holding one subdirectory per runtime identifier.
pub const RIDS_DIR: &str = "rids";

/// One engine module: its namespace and its file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineModule {
    /// Namespace registered with the host once the module is loaded.
    pub name: String,
    /// File name inside the runtime identifier directory.
    pub file_name: String,
}

impl EngineModule {
    /// A module whose file is `<name>.dll`.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        let file_name = format!("{name}.dll");
        Self { name, file_name }
    }
}

/// The two engine modules, in load order.
///
/// `primary` references types from `dependency` at load time, so the
/// dependency must always be loaded first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSet {
    pub dependency: EngineModule,
    pub primary: EngineModule,
}

impl Default for ModuleSet {
    fn default() -> Self {
        Self {
            dependency: EngineModule::named("LpjGuess.Core"),
            primary: EngineModule::named("LpjGuess.Runner"),
        }
    }
}

impl ModuleSet {
    /// Modules in the order they must be loaded.
    pub fn load_order(&self) -> [&EngineModule; 2] {
        [&self.dependency, &self.primary]
    }
}

/// Resolved paths of the binary set for one runtime identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeLayout {
    pub rid: RuntimeIdentifier,
    pub directory: PathBuf,
    pub dependency_path: PathBuf,
    pub primary_path: PathBuf,
}

impl RuntimeLayout {
    /// Locate the binary set for `rid` under `asset_root`.
    ///
    /// Fails with [`LoadError::MissingRuntimeAssets`] if the identifier
    /// directory or either module file is absent.
    pub fn resolve(
        asset_root: &Path,
        rid: RuntimeIdentifier,
        modules: &ModuleSet,
    ) -> Result<Self, LoadError> {
        let directory = asset_root.join(RIDS_DIR).join(rid.as_str());
        if !directory.is_dir() {
            return Err(LoadError::MissingRuntimeAssets {
                path: directory,
                reason: format!("no binaries for {rid}"),
            });
        }

        let dependency_path = directory.join(&modules.dependency.file_name);
        let primary_path = directory.join(&modules.primary.file_name);

        for path in [&dependency_path, &primary_path] {
            if !path.is_file() {
                return Err(LoadError::MissingRuntimeAssets {
                    path: path.clone(),
                    reason: "module not found".to_string(),
                });
            }
        }

        Ok(Self {
            rid,
            directory,
            dependency_path,
            primary_path,
        })
    }
}
