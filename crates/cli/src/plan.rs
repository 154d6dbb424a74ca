//! Human- and machine-readable summaries of a runner configuration.

use lpjguess_types::RunnerConfiguration;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlannedSimulation {
    pub name: String,
    /// Factor names, in application order.
    pub factors: Vec<String>,
}

/// What a configuration would submit, without running anything.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    pub output_directory: PathBuf,
    pub run_local: bool,
    pub dry_run: bool,
    pub simulations: Vec<PlannedSimulation>,
    pub instruction_files: Vec<PathBuf>,
    pub pfts: Vec<String>,
    pub job_count: usize,
}

impl PlanSummary {
    pub fn from_config(config: &RunnerConfiguration) -> Self {
        let settings = config.settings();
        Self {
            output_directory: settings.output_directory.clone(),
            run_local: settings.run_local,
            dry_run: settings.dry_run,
            simulations: config
                .simulations()
                .iter()
                .map(|sim| PlannedSimulation {
                    name: sim.name.clone(),
                    factors: sim.factors.iter().map(|f| f.name()).collect(),
                })
                .collect(),
            instruction_files: config.instruction_files().map(PathBuf::from).collect(),
            pfts: config.pfts().to_vec(),
            job_count: config.job_count(),
        }
    }
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = if self.run_local { "local" } else { "pbs" };
        writeln!(
            f,
            "{} jobs ({} simulations x {} instruction files), {target}{}",
            self.job_count,
            self.simulations.len(),
            self.instruction_files.len(),
            if self.dry_run { ", dry run" } else { "" },
        )?;
        writeln!(f, "output: {}", self.output_directory.display())?;

        writeln!(f, "instruction files:")?;
        for ins in &self.instruction_files {
            writeln!(f, "  {}", ins.display())?;
        }

        if self.pfts.is_empty() {
            writeln!(f, "pfts: (from instruction files)")?;
        } else {
            writeln!(f, "pfts: {}", self.pfts.join(", "))?;
        }

        writeln!(f, "simulations:")?;
        for sim in &self.simulations {
            if sim.factors.is_empty() {
                writeln!(f, "  {} (unchanged)", sim.name)?;
            } else {
                writeln!(f, "  {}: {}", sim.name, sim.factors.join(", "))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lpjguess_bridge::{runner_config, simulation};
    use lpjguess_types::{Factor, RunSettings};

    fn config() -> RunnerConfiguration {
        runner_config(
            RunSettings::new("out", "guess", "nc").with_dry_run(true),
            [
                simulation("baseline", Vec::<Factor>::new()),
                simulation(
                    "wet",
                    [
                        Factor::top_level("npatch", "10"),
                        Factor::block("sla", "pft", "TeBE", "20"),
                    ],
                ),
            ],
            ["global.ins"],
            Vec::<String>::new(),
        )
    }

    #[test]
    fn test_summary_from_config() {
        let summary = PlanSummary::from_config(&config());

        assert_eq!(summary.job_count, 2);
        assert_eq!(summary.instruction_files, vec![PathBuf::from("global.ins")]);
        assert_eq!(
            summary.simulations[1].factors,
            vec!["npatch-10", "TeBE.sla-20"]
        );
    }

    #[test]
    fn test_summary_text() {
        let text = PlanSummary::from_config(&config()).to_string();

        assert!(text.starts_with("2 jobs (2 simulations x 1 instruction files), local, dry run\n"));
        assert!(text.contains("pfts: (from instruction files)\n"));
        assert!(text.contains("  baseline (unchanged)\n"));
        assert!(text.contains("  wet: npatch-10, TeBE.sla-20\n"));
    }

    #[test]
    fn test_summary_json() {
        let json = serde_json::to_value(PlanSummary::from_config(&config())).unwrap();

        assert_eq!(json["job_count"], 2);
        assert_eq!(json["simulations"][0]["name"], "baseline");
        assert_eq!(json["dry_run"], true);
    }
}
