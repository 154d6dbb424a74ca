//! Result of a completed run.

use indexmap::IndexMap;
use serde::Serialize;
use std::time::Duration;

/// Summary returned by the engine once every job has finished.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ExperimentResult {
    /// Jobs submitted.
    pub total_jobs: usize,
    /// Jobs that completed successfully.
    pub successful_jobs: usize,
    /// Jobs that failed.
    pub failed_jobs: usize,
    /// First error reported by the engine, if any.
    pub error: Option<String>,
    /// Wall time per job, in completion order.
    pub job_durations: IndexMap<String, Duration>,
}

impl ExperimentResult {
    /// A result where every job succeeded.
    pub fn succeeded(job_durations: IndexMap<String, Duration>) -> Self {
        let total = job_durations.len();
        Self {
            total_jobs: total,
            successful_jobs: total,
            failed_jobs: 0,
            error: None,
            job_durations,
        }
    }

    /// True if no job failed and no error was reported.
    pub fn is_success(&self) -> bool {
        self.failed_jobs == 0 && self.error.is_none()
    }
}
