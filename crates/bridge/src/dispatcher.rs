//! Submitting experiments to the engine.

use crate::builders::runner_config;
use crate::engine::Engine;
use crate::error::RunError;
use crate::events::event_channel;
use crate::reporter::{console_reporters, OutputHelper, ProgressReporter};
use lpjguess_loader::{LoadError, LoadedRuntime, ModuleHost, RuntimeHandle};
use lpjguess_types::{ExperimentResult, RunSettings, RunnerConfiguration, Simulation};
use std::panic;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use tracing::{info, warn};

/// Binding between callers and a loaded engine.
///
/// Every run first acquires the runtime, so the engine is never reached
/// before its modules are loaded.
pub struct Bridge<E, H> {
    runtime: Arc<RuntimeHandle<H>>,
    engine: E,
}

impl<E: Engine, H: ModuleHost> Bridge<E, H> {
    /// Pair a runtime with an already constructed engine. The runtime is
    /// loaded lazily, on the first run.
    pub fn new(runtime: Arc<RuntimeHandle<H>>, engine: E) -> Self {
        Self { runtime, engine }
    }

    /// Load the runtime, then construct the engine from it.
    pub fn connect<F>(runtime: Arc<RuntimeHandle<H>>, make_engine: F) -> Result<Self, LoadError>
    where
        F: FnOnce(&LoadedRuntime) -> E,
    {
        let loaded = runtime.acquire()?;
        let engine = make_engine(&loaded);
        Ok(Self { runtime, engine })
    }

    pub fn runtime(&self) -> &RuntimeHandle<H> {
        &self.runtime
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Build a configuration and run it.
    ///
    /// Blocks until the engine finishes. `None` handlers fall back to the
    /// console implementations from
    /// [`console_reporters`](crate::console_reporters). Handlers run on this
    /// thread, one event at a time, while the engine's workers run elsewhere.
    pub fn run<P, S>(
        &self,
        settings: RunSettings,
        simulations: impl IntoIterator<Item = Simulation>,
        instruction_files: impl IntoIterator<Item = P>,
        pfts: impl IntoIterator<Item = S>,
        progress: Option<&mut dyn ProgressReporter>,
        output: Option<&mut dyn OutputHelper>,
    ) -> Result<ExperimentResult, RunError<E::Error>>
    where
        P: Into<PathBuf>,
        S: Into<String>,
    {
        let config = runner_config(settings, simulations, instruction_files, pfts);
        self.run_config(&config, progress, output)
    }

    /// Run a prebuilt configuration.
    pub fn run_config(
        &self,
        config: &RunnerConfiguration,
        progress: Option<&mut dyn ProgressReporter>,
        output: Option<&mut dyn OutputHelper>,
    ) -> Result<ExperimentResult, RunError<E::Error>> {
        self.runtime.acquire()?;

        let (mut console_progress, mut console_output) = console_reporters();
        let progress: &mut dyn ProgressReporter = match progress {
            Some(p) => p,
            None => &mut console_progress,
        };
        let output: &mut dyn OutputHelper = match output {
            Some(o) => o,
            None => &mut console_output,
        };

        info!(
            simulations = config.simulations().len(),
            instruction_files = config.instruction_files().len(),
            pfts = config.pfts().len(),
            jobs = config.job_count(),
            "Dispatching experiment"
        );

        let (sink, stream) = event_channel();
        let engine = &self.engine;

        let (joined, stats) = thread::scope(|scope| {
            let worker = scope.spawn(move || engine.run(config, sink));
            let stats = stream.pump(progress, output);
            (worker.join(), stats)
        });

        let outcome = match joined {
            Ok(outcome) => outcome,
            Err(payload) => panic::resume_unwind(payload),
        };

        match outcome {
            Ok(result) => {
                info!(
                    total = result.total_jobs,
                    succeeded = result.successful_jobs,
                    failed = result.failed_jobs,
                    progress_events = stats.progress_events,
                    output_events = stats.output_events,
                    "Experiment finished"
                );
                Ok(result)
            }
            Err(e) => {
                warn!(error = %e, "Experiment failed");
                Err(RunError::Engine(e))
            }
        }
    }
}
