//! LPJ-GUESS Bridge CLI
//!
//! Inspects the engine runtime assets on this host and plans experiments
//! without running them.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use lpjguess_cli::{ExperimentFile, PlanSummary};
use lpjguess_loader::{HostPlatform, ModuleSet, RuntimeLayout, RUNTIME_DIR_ENV};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lpjguess-bridge")]
#[command(about = "Runtime and experiment tooling for the LPJ-GUESS engine bridge")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Overrides for the probed host platform.
#[derive(Args)]
struct PlatformArgs {
    /// Operating system name (e.g. "Linux", "Darwin", "Windows")
    #[arg(long, requires = "machine")]
    system: Option<String>,

    /// Machine architecture (e.g. "x86_64", "arm64")
    #[arg(long, requires = "system")]
    machine: Option<String>,
}

impl PlatformArgs {
    fn platform(self) -> HostPlatform {
        match (self.system, self.machine) {
            (Some(system), Some(machine)) => HostPlatform::new(system, machine),
            _ => HostPlatform::current(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the runtime identifier selected for a platform
    Detect {
        #[command(flatten)]
        platform: PlatformArgs,
    },

    /// Check that the engine modules for this platform are installed
    Check {
        /// Directory containing `rids/<rid>/`
        #[arg(long, env = RUNTIME_DIR_ENV)]
        assets: PathBuf,

        #[command(flatten)]
        platform: PlatformArgs,
    },

    /// Print what an experiment file would submit
    Plan {
        /// Experiment TOML file
        #[arg(short, long)]
        experiment: PathBuf,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Detect { platform } => {
            let platform = platform.platform();
            let rid = platform.runtime_identifier()?;
            info!(platform = %platform, rid = %rid, "Detected runtime");
            println!("{rid}");
        }

        Commands::Check { assets, platform } => {
            let platform = platform.platform();
            let rid = platform.runtime_identifier()?;
            let modules = ModuleSet::default();
            let layout = RuntimeLayout::resolve(&assets, rid, &modules)
                .with_context(|| format!("engine runtime for {platform} is not installed"))?;

            println!("{rid}: {}", layout.directory.display());
            println!("  {} {}", modules.dependency.name, layout.dependency_path.display());
            println!("  {} {}", modules.primary.name, layout.primary_path.display());
        }

        Commands::Plan { experiment, json } => {
            let config = ExperimentFile::load(&experiment)?.into_config()?;
            let summary = PlanSummary::from_config(&config);

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{summary}");
            }
        }
    }

    Ok(())
}
