//! The external engine's execution entry point.

use crate::events::EventSink;
use lpjguess_types::{ExperimentResult, RunnerConfiguration};

/// An engine able to run an experiment.
///
/// The engine generates jobs from the configuration, runs them on its own
/// worker threads and reports progress and output through `events`. The
/// call blocks until every worker has finished; all clones of `events` must
/// be dropped by then.
///
/// Errors are returned as the engine's own type and reach the caller of
/// [`Bridge::run`](crate::Bridge::run) unchanged.
///
/// # Example
///
/// ```ignore
/// impl Engine for ExperimentRunner {
///     type Error = ModelError;
///
///     fn run(&self, config: &RunnerConfiguration, events: EventSink) -> Result<ExperimentResult, ModelError> {
///         let jobs = self.generate_jobs(config)?;
///         self.job_manager(config.settings()).run_all(jobs, events)
///     }
/// }
/// ```
pub trait Engine: Sync {
    /// Failure raised by the engine (job failure, bad instruction file, ...).
    type Error: std::error::Error + Send + 'static;

    /// Run the experiment described by `config`.
    fn run(
        &self,
        config: &RunnerConfiguration,
        events: EventSink,
    ) -> Result<ExperimentResult, Self::Error>;
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    type Error = E::Error;

    fn run(
        &self,
        config: &RunnerConfiguration,
        events: EventSink,
    ) -> Result<ExperimentResult, Self::Error> {
        (**self).run(config, events)
    }
}
