//! Experiment files.
//!
//! An experiment file is TOML describing one run:
//!
//! ```toml
//! ins_files = ["global.ins"]
//! pfts = ["TeBE", "C3G"]
//!
//! [settings]
//! output_directory = "out"
//! guess_path = "/opt/guess/bin/guess"
//! input_module = "cru_ncep"
//!
//! [[simulations]]
//! name = "baseline"
//!
//! [[simulations]]
//! [[simulations.factors]]
//! kind = "block"
//! block_type = "pft"
//! block_name = "TeBE"
//! name = "sla"
//! value = "20"
//! ```
//!
//! A simulation without a `name` is named after its factors.

use lpjguess_bridge::{runner_config, simulation};
use lpjguess_types::{Factor, RunSettings, RunnerConfiguration, Simulation};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors reading or validating an experiment file.
#[derive(Debug, Error)]
pub enum ExperimentError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Two simulations resolve to the same name, so their job directories
    /// would collide.
    #[error("duplicate simulation name: {0}")]
    DuplicateSimulation(String),
}

/// One `[[simulations]]` entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub factors: Vec<Factor>,
}

impl SimulationEntry {
    fn into_simulation(self) -> Simulation {
        match self.name {
            Some(name) => simulation(name, self.factors),
            None => Simulation::from_factors(self.factors),
        }
    }
}

/// Parsed experiment file.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExperimentFile {
    pub settings: RunSettings,
    pub ins_files: Vec<PathBuf>,
    #[serde(default)]
    pub pfts: Vec<String>,
    #[serde(default)]
    pub simulations: Vec<SimulationEntry>,
}

impl ExperimentFile {
    /// Read and parse an experiment file from disk.
    pub fn load(path: &Path) -> Result<Self, ExperimentError> {
        let text = fs::read_to_string(path).map_err(|source| ExperimentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let experiment = Self::parse(&text).map_err(|source| ExperimentError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(
            path = %path.display(),
            simulations = experiment.simulations.len(),
            "Loaded experiment file"
        );
        Ok(experiment)
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Build the runner configuration, rejecting duplicate simulation names.
    pub fn into_config(self) -> Result<RunnerConfiguration, ExperimentError> {
        let simulations: Vec<Simulation> = self
            .simulations
            .into_iter()
            .map(SimulationEntry::into_simulation)
            .collect();

        let mut seen = HashSet::new();
        for sim in &simulations {
            if !seen.insert(sim.name.as_str()) {
                return Err(ExperimentError::DuplicateSimulation(sim.name.clone()));
            }
        }

        Ok(runner_config(
            self.settings,
            simulations,
            self.ins_files,
            self.pfts,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lpjguess_types::CompositeFactor;

    const EXPERIMENT: &str = r#"
ins_files = ["global.ins", "europe.ins"]
pfts = ["TeBE", "C3G"]

[settings]
output_directory = "out"
guess_path = "/opt/guess/bin/guess"
input_module = "cru_ncep"
parallel = true

[[simulations]]
name = "baseline"

[[simulations]]
[[simulations.factors]]
kind = "block"
block_type = "pft"
block_name = "TeBE"
name = "sla"
value = "20"

[[simulations]]
[[simulations.factors]]
kind = "composite"
[[simulations.factors.factors]]
kind = "top_level"
name = "npatch"
value = "10"
[[simulations.factors.factors]]
kind = "top_level"
name = "nyear_spinup"
value = "500"
"#;

    #[test]
    fn test_parse_experiment() {
        let experiment = ExperimentFile::parse(EXPERIMENT).unwrap();

        assert_eq!(experiment.ins_files.len(), 2);
        assert_eq!(experiment.pfts, vec!["TeBE", "C3G"]);
        assert!(experiment.settings.parallel);
        assert!(experiment.settings.run_local);
        assert_eq!(experiment.simulations.len(), 3);
        assert_eq!(
            experiment.simulations[2].factors,
            vec![Factor::Composite(CompositeFactor::new([
                Factor::top_level("npatch", "10"),
                Factor::top_level("nyear_spinup", "500"),
            ]))]
        );
    }

    #[test]
    fn test_config_names_unnamed_simulations() {
        let config = ExperimentFile::parse(EXPERIMENT)
            .unwrap()
            .into_config()
            .unwrap();

        let names: Vec<&str> = config.simulation_names().collect();
        assert_eq!(
            names,
            vec!["baseline", "TeBE.sla-20", "npatch-10_nyear_spinup-500"]
        );
        assert_eq!(config.job_count(), 6);
    }

    #[test]
    fn test_duplicate_simulation_rejected() {
        let experiment = ExperimentFile {
            settings: RunSettings::new("out", "guess", "nc"),
            ins_files: vec![PathBuf::from("a.ins")],
            pfts: Vec::new(),
            simulations: vec![
                SimulationEntry {
                    name: None,
                    factors: vec![Factor::top_level("npatch", "5")],
                },
                SimulationEntry {
                    name: Some("npatch-5".to_string()),
                    factors: Vec::new(),
                },
            ],
        };

        let err = experiment.into_config().unwrap_err();
        assert!(matches!(err, ExperimentError::DuplicateSimulation(name) if name == "npatch-5"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let text = r#"
ins_files = []
colour = "blue"

[settings]
output_directory = "out"
guess_path = "guess"
input_module = "nc"
"#;
        assert!(ExperimentFile::parse(text).is_err());
    }

    #[test]
    fn test_load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");

        let err = ExperimentFile::load(&missing).unwrap_err();
        assert!(matches!(err, ExperimentError::Read { .. }));
        assert!(err.to_string().contains("missing.toml"));

        let bad = dir.path().join("bad.toml");
        fs::write(&bad, "ins_files = 3").unwrap();
        assert!(matches!(
            ExperimentFile::load(&bad),
            Err(ExperimentError::Parse { .. })
        ));
    }
}
