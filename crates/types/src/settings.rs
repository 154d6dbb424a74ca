//! Run settings for an experiment.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Describes how the engine should run an experiment.
///
/// Settings are fixed once the configuration is submitted. Fields that only
/// matter for cluster submission (walltime, memory, queue, project, email)
/// are ignored by the engine when `run_local` is set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSettings {
    /// Create the run directory but do not execute any job.
    #[serde(default)]
    pub dry_run: bool,

    /// Run the engine's post-processing in parallel.
    #[serde(default)]
    pub parallel: bool,

    /// Run jobs on this machine instead of submitting them to a PBS queue.
    #[serde(default = "default_run_local")]
    pub run_local: bool,

    /// Output directory of the run.
    pub output_directory: PathBuf,

    /// Path to the LPJ-GUESS executable.
    pub guess_path: PathBuf,

    /// Input module passed to LPJ-GUESS (e.g. `cru_ncep`, `nc`).
    pub input_module: String,

    /// Number of CPUs allocated to the run.
    #[serde(default = "default_cpu_count")]
    pub cpu_count: u16,

    /// Maximum walltime for a submitted job.
    #[serde(default = "default_walltime", with = "walltime_serde")]
    pub walltime: Duration,

    /// Memory allocated to a submitted job, in GiB.
    #[serde(default = "default_memory_gib")]
    pub memory_gib: u32,

    /// Queue to which jobs are submitted.
    #[serde(default = "default_queue")]
    pub queue: String,

    /// PBS project under which jobs are submitted.
    #[serde(default)]
    pub project: String,

    /// Send email notifications for submitted jobs.
    #[serde(default)]
    pub email_notifications: bool,

    /// Notification address. Only used when `email_notifications` is set.
    #[serde(default)]
    pub email_address: String,

    /// Name of the submitted job.
    #[serde(default = "default_job_name")]
    pub job_name: String,

    /// Run every combination of the supplied factors.
    #[serde(default)]
    pub full_factorial: bool,
}

fn default_run_local() -> bool {
    true
}

fn default_cpu_count() -> u16 {
    1
}

fn default_walltime() -> Duration {
    Duration::from_secs(12 * 60 * 60)
}

fn default_memory_gib() -> u32 {
    4
}

fn default_queue() -> String {
    "normal".to_string()
}

fn default_job_name() -> String {
    "guess".to_string()
}

impl RunSettings {
    /// Create local run settings with defaults for everything else.
    pub fn new(
        output_directory: impl Into<PathBuf>,
        guess_path: impl Into<PathBuf>,
        input_module: impl Into<String>,
    ) -> Self {
        Self {
            dry_run: false,
            parallel: false,
            run_local: default_run_local(),
            output_directory: output_directory.into(),
            guess_path: guess_path.into(),
            input_module: input_module.into(),
            cpu_count: default_cpu_count(),
            walltime: default_walltime(),
            memory_gib: default_memory_gib(),
            queue: default_queue(),
            project: String::new(),
            email_notifications: false,
            email_address: String::new(),
            job_name: default_job_name(),
            full_factorial: false,
        }
    }

    /// Only create the run directory.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Enable parallel post-processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the number of CPUs.
    pub fn with_cpu_count(mut self, cpu_count: u16) -> Self {
        self.cpu_count = cpu_count;
        self
    }

    /// Set the job name.
    pub fn with_job_name(mut self, job_name: impl Into<String>) -> Self {
        self.job_name = job_name.into();
        self
    }

    /// Run every combination of the supplied factors.
    pub fn with_full_factorial(mut self, full_factorial: bool) -> Self {
        self.full_factorial = full_factorial;
        self
    }

    /// Submit jobs to a PBS queue instead of running locally.
    pub fn with_pbs(
        mut self,
        queue: impl Into<String>,
        project: impl Into<String>,
        walltime: Duration,
        memory_gib: u32,
    ) -> Self {
        self.run_local = false;
        self.queue = queue.into();
        self.project = project.into();
        self.walltime = walltime;
        self.memory_gib = memory_gib;
        self
    }

    /// Enable email notifications to the given address.
    pub fn with_email(mut self, address: impl Into<String>) -> Self {
        self.email_notifications = true;
        self.email_address = address.into();
        self
    }
}

/// Walltime as a human-readable duration ("12h", "1h 30m").
mod walltime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&humantime::format_duration(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}
