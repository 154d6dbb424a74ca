//! Platform detection.
//!
//! The engine ships one binary set per runtime identifier. Detection maps the
//! host's (system, machine) pair onto one of the supported identifiers, or
//! fails naming the pair.

use crate::error::LoadError;
use std::fmt;
use std::str::FromStr;

/// Platform and architecture tag selecting the engine binary set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuntimeIdentifier {
    LinuxX64,
    LinuxArm64,
    OsxX64,
    OsxArm64,
    WinX64,
}

impl RuntimeIdentifier {
    /// All identifiers with a published binary set.
    pub const ALL: [RuntimeIdentifier; 5] = [
        RuntimeIdentifier::LinuxX64,
        RuntimeIdentifier::LinuxArm64,
        RuntimeIdentifier::OsxX64,
        RuntimeIdentifier::OsxArm64,
        RuntimeIdentifier::WinX64,
    ];

    /// The identifier string, also the asset directory name.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuntimeIdentifier::LinuxX64 => "linux-x64",
            RuntimeIdentifier::LinuxArm64 => "linux-arm64",
            RuntimeIdentifier::OsxX64 => "osx-x64",
            RuntimeIdentifier::OsxArm64 => "osx-arm64",
            RuntimeIdentifier::WinX64 => "win-x64",
        }
    }
}

impl fmt::Display for RuntimeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuntimeIdentifier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuntimeIdentifier::ALL
            .into_iter()
            .find(|rid| rid.as_str() == s)
            .ok_or_else(|| format!("unknown runtime identifier: {s}"))
    }
}

/// The (system, machine) pair reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPlatform {
    pub system: String,
    pub machine: String,
}

impl HostPlatform {
    pub fn new(system: impl Into<String>, machine: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            machine: machine.into(),
        }
    }

    /// The platform this process was compiled for.
    ///
    /// Rust reports macOS as `macos`; the conventional system name is
    /// `darwin`.
    pub fn current() -> Self {
        let system = match std::env::consts::OS {
            "macos" => "darwin",
            other => other,
        };
        Self::new(system, std::env::consts::ARCH)
    }

    /// Map this platform onto a runtime identifier.
    pub fn runtime_identifier(&self) -> Result<RuntimeIdentifier, LoadError> {
        detect_runtime(&self.system, &self.machine)
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.system, self.machine)
    }
}

/// Map a (system, machine) pair onto a runtime identifier.
///
/// Matching is case-insensitive. Unsupported pairs fail with
/// [`LoadError::UnsupportedPlatform`] carrying the lower-cased pair.
pub fn detect_runtime(system: &str, machine: &str) -> Result<RuntimeIdentifier, LoadError> {
    let system = system.to_lowercase();
    let machine = machine.to_lowercase();

    let x64 = matches!(machine.as_str(), "x86_64" | "amd64" | "x64");
    let arm64 = matches!(machine.as_str(), "aarch64" | "arm64");

    let rid = if system.starts_with("linux") {
        if x64 {
            Some(RuntimeIdentifier::LinuxX64)
        } else if arm64 {
            Some(RuntimeIdentifier::LinuxArm64)
        } else {
            None
        }
    } else if system == "darwin" || system == "macos" {
        if arm64 {
            Some(RuntimeIdentifier::OsxArm64)
        } else if x64 {
            Some(RuntimeIdentifier::OsxX64)
        } else {
            None
        }
    } else if system.starts_with("win") && x64 {
        Some(RuntimeIdentifier::WinX64)
    } else {
        None
    };

    rid.ok_or(LoadError::UnsupportedPlatform { system, machine })
}
