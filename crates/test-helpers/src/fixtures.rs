//! Asset trees and loader configurations for tests.

use lpjguess_loader::{HostPlatform, LoaderConfig, ModuleSet, RuntimeIdentifier, RIDS_DIR};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create `rids/<rid>/` with both engine modules for each identifier.
pub fn asset_tree(rids: &[RuntimeIdentifier]) -> io::Result<TempDir> {
    let root = tempfile::tempdir()?;
    for rid in rids {
        install_modules(root.path(), *rid)?;
    }
    Ok(root)
}

/// Write both engine modules for `rid` under `root`, returning the
/// identifier directory.
pub fn install_modules(root: &Path, rid: RuntimeIdentifier) -> io::Result<PathBuf> {
    let dir = root.join(RIDS_DIR).join(rid.as_str());
    fs::create_dir_all(&dir)?;
    for module in ModuleSet::default().load_order() {
        fs::write(dir.join(&module.file_name), b"MZ\x90\x00")?;
    }
    Ok(dir)
}

/// Loader config rooted at `root`, detecting as Linux on x86_64.
pub fn linux_x64_config(root: &Path) -> LoaderConfig {
    LoaderConfig::new(root).with_platform(HostPlatform::new("Linux", "x86_64"))
}
