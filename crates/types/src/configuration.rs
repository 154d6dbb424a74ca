//! Runner configuration submitted to the engine.

use crate::{RunSettings, Simulation};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Everything the engine needs for one run.
///
/// The sequences are stored as fixed-length boxed slices, in the order the
/// caller supplied them. The value is immutable once built; the engine only
/// ever borrows it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunnerConfiguration {
    settings: RunSettings,
    simulations: Box<[Simulation]>,
    instruction_files: Box<[PathBuf]>,
    pfts: Box<[String]>,
}

impl RunnerConfiguration {
    /// Build a configuration. Empty sequences are accepted; whether a
    /// zero-work run is an error is for the engine to decide.
    pub fn new(
        settings: RunSettings,
        simulations: impl IntoIterator<Item = Simulation>,
        instruction_files: impl IntoIterator<Item = impl Into<PathBuf>>,
        pfts: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            settings,
            simulations: simulations.into_iter().collect(),
            instruction_files: instruction_files.into_iter().map(Into::into).collect(),
            pfts: pfts.into_iter().map(Into::into).collect(),
        }
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    pub fn simulations(&self) -> &[Simulation] {
        &self.simulations
    }

    /// Simulation names, in submission order.
    pub fn simulation_names(&self) -> impl Iterator<Item = &str> {
        self.simulations.iter().map(|s| s.name.as_str())
    }

    pub fn instruction_files(&self) -> impl ExactSizeIterator<Item = &Path> {
        self.instruction_files.iter().map(PathBuf::as_path)
    }

    pub fn pfts(&self) -> &[String] {
        &self.pfts
    }

    /// Number of jobs the engine will generate: one per simulation per
    /// instruction file.
    pub fn job_count(&self) -> usize {
        self.simulations.len() * self.instruction_files.len()
    }

    /// True if the configuration describes no work.
    pub fn is_empty(&self) -> bool {
        self.job_count() == 0
    }
}
