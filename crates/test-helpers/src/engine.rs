//! A scripted engine that runs each job on its own thread.

use indexmap::IndexMap;
use lpjguess_bridge::{Engine, EventSink};
use lpjguess_types::{ExperimentResult, RunnerConfiguration};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors the scripted engine can raise.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScriptedEngineError {
    /// A job exited with a non-zero code.
    #[error("job {job} exited with code {code}")]
    JobFailed { job: String, code: i32 },

    /// An instruction file could not be read.
    #[error("invalid instruction file: {}", .0.display())]
    InvalidInstructionFile(PathBuf),
}

/// Engine double.
///
/// One job per (instruction file, simulation) pair, named
/// `{file_stem}_{simulation}`. Every job runs on its own thread, writes
/// `lines_per_job` stdout lines (`line 0`, `line 1`, ...) and one stderr line,
/// then reports aggregate progress.
#[derive(Debug, Default)]
pub struct ScriptedEngine {
    lines_per_job: usize,
    fail_job: Option<(String, i32)>,
    panic_job: Option<String>,
    bad_file: Option<PathBuf>,
    runs: AtomicUsize,
    threads: Mutex<HashSet<thread::ThreadId>>,
}

impl ScriptedEngine {
    pub fn new(lines_per_job: usize) -> Self {
        Self {
            lines_per_job,
            ..Default::default()
        }
    }

    /// Make `job` fail with the given exit code.
    pub fn failing_job(mut self, job: &str, code: i32) -> Self {
        self.fail_job = Some((job.to_string(), code));
        self
    }

    /// Make `job` panic.
    pub fn panicking_job(mut self, job: &str) -> Self {
        self.panic_job = Some(job.to_string());
        self
    }

    /// Reject the given instruction file before starting any job.
    pub fn rejecting_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.bad_file = Some(path.into());
        self
    }

    /// Number of times `run` has been called.
    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    /// Threads that emitted events in any run.
    pub fn worker_threads(&self) -> HashSet<thread::ThreadId> {
        self.threads.lock().clone()
    }

    /// Job names for a configuration, in generation order.
    pub fn job_names(config: &RunnerConfiguration) -> Vec<String> {
        config
            .instruction_files()
            .flat_map(|ins| {
                let stem = ins
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                config
                    .simulation_names()
                    .map(move |sim| format!("{stem}_{sim}"))
            })
            .collect()
    }
}

impl Engine for ScriptedEngine {
    type Error = ScriptedEngineError;

    fn run(
        &self,
        config: &RunnerConfiguration,
        events: EventSink,
    ) -> Result<ExperimentResult, ScriptedEngineError> {
        self.runs.fetch_add(1, Ordering::SeqCst);

        if let Some(bad) = &self.bad_file {
            if config.instruction_files().any(|p| p == bad.as_path()) {
                return Err(ScriptedEngineError::InvalidInstructionFile(bad.clone()));
            }
        }

        let jobs = Self::job_names(config);
        let total = jobs.len();
        let start = Instant::now();
        // (completed jobs, durations); sent under the lock so percentages
        // reach the sink in non-decreasing order.
        let progress: Mutex<(usize, IndexMap<String, Duration>)> =
            Mutex::new((0, IndexMap::new()));

        events.progress(0.0, Duration::ZERO, 0, total);

        let failures: Vec<ScriptedEngineError> = thread::scope(|scope| {
            let handles: Vec<_> = jobs
                .iter()
                .map(|job| {
                    let events = events.clone();
                    let progress = &progress;
                    scope.spawn(move || {
                        self.threads.lock().insert(thread::current().id());
                        let job_start = Instant::now();

                        if self.panic_job.as_deref() == Some(job.as_str()) {
                            panic!("job {job} crashed");
                        }

                        for i in 0..self.lines_per_job {
                            events.stdout(job.as_str(), format!("line {i}"));
                        }
                        events.stderr(job.as_str(), "done");

                        let mut state = progress.lock();
                        state.0 += 1;
                        state.1.insert(job.clone(), job_start.elapsed());
                        let percent = 100.0 * state.0 as f64 / total as f64;
                        events.progress(percent, start.elapsed(), state.0, total);
                        drop(state);

                        match &self.fail_job {
                            Some((name, code)) if name == job => {
                                Err(ScriptedEngineError::JobFailed {
                                    job: job.clone(),
                                    code: *code,
                                })
                            }
                            _ => Ok(()),
                        }
                    })
                })
                .collect();

            handles
                .into_iter()
                .filter_map(|h| match h.join() {
                    Ok(result) => result.err(),
                    Err(payload) => std::panic::resume_unwind(payload),
                })
                .collect()
        });

        if let Some(first) = failures.into_iter().next() {
            return Err(first);
        }

        let (_, durations) = progress.into_inner();
        Ok(ExperimentResult::succeeded(durations))
    }
}
