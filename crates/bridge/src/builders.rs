//! Builders marshaling caller sequences into engine values.
//!
//! Pure adapters: the inputs are copied into fixed-length containers in the
//! order given. Nothing is validated; an empty list describes a zero-work run.

use lpjguess_types::{Factor, RunSettings, RunnerConfiguration, Simulation};
use std::path::PathBuf;

/// Create a simulation from a name and an ordered list of changes.
pub fn simulation(name: impl Into<String>, factors: impl IntoIterator<Item = Factor>) -> Simulation {
    Simulation::new(name, factors)
}

/// Create the configuration submitted to the engine.
///
/// # Arguments
///
/// * `settings` - Run settings
/// * `simulations` - Simulations, in submission order
/// * `instruction_files` - Base instruction files
/// * `pfts` - Plant functional types to enable; empty keeps the files' own
pub fn runner_config<P, S>(
    settings: RunSettings,
    simulations: impl IntoIterator<Item = Simulation>,
    instruction_files: impl IntoIterator<Item = P>,
    pfts: impl IntoIterator<Item = S>,
) -> RunnerConfiguration
where
    P: Into<PathBuf>,
    S: Into<String>,
{
    RunnerConfiguration::new(settings, simulations, instruction_files, pfts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lpjguess_types::BlockParameter;
    use std::path::Path;

    fn settings() -> RunSettings {
        RunSettings::new("/scratch/out", "/opt/guess", "cru_ncep")
    }

    #[test]
    fn test_config_preserves_inputs() {
        let s1 = simulation("s1", [Factor::top_level("co2", "350")]);
        let s2 = simulation("s2", [BlockParameter::pft("TeBE", "sla", "20").into()]);

        let config = runner_config(settings(), [s1.clone(), s2.clone()], ["a.ins"], ["TeBE"]);

        assert_eq!(config.simulation_names().collect::<Vec<_>>(), vec!["s1", "s2"]);
        assert_eq!(config.simulations(), &[s1, s2]);
        assert_eq!(
            config.instruction_files().collect::<Vec<_>>(),
            vec![Path::new("a.ins")]
        );
        assert_eq!(config.pfts(), &["TeBE".to_string()]);
        assert_eq!(config.settings(), &settings());
    }

    #[test]
    fn test_empty_simulation_list_builds() {
        let config = runner_config(
            settings(),
            Vec::new(),
            Vec::<&str>::new(),
            Vec::<&str>::new(),
        );

        assert!(config.simulations().is_empty());
        assert_eq!(config.job_count(), 0);
    }

    #[test]
    fn test_simulation_keeps_factor_order() {
        let sim = simulation(
            "ordered",
            [
                Factor::top_level("z", "1"),
                Factor::top_level("a", "2"),
                Factor::block("k", "st", "Forest", "3"),
            ],
        );
        let names: Vec<_> = sim.factors.iter().map(Factor::name).collect();
        assert_eq!(names, vec!["z-1", "a-2", "Forest.k-3"]);
    }
}
