//! prow-jobs CLI
//!
//! Entry point for the `prow-jobs` command-line tool.

use clap::{Parser, Subcommand};
use prow_jobs::{
    build_spec, latest_periodics, new_prow_job, partition_pending, prow_job_to_pod, JobConfig,
    JobTemplate, ProwJob, ProwJobSpec, ProwJobType, Refs, SystemClock, UuidGenerator,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

/// Environment variable naming the job config when `--config` is absent
const CONFIG_ENV: &str = "PROW_JOBS_CONFIG";

/// Config file used when neither `--config` nor the environment names one
const DEFAULT_CONFIG: &str = "jobs.toml";

#[derive(Parser)]
#[command(name = "prow-jobs")]
#[command(about = "Build ProwJob specs, jobs and pods from job templates", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate a job config
    Verify {
        /// Path to job config (default: $PROW_JOBS_CONFIG or jobs.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },

    /// Print the ProwJobSpec for a configured job
    Spec {
        #[command(flatten)]
        target: JobTarget,
    },

    /// Print a new ProwJob for a configured job
    Job {
        #[command(flatten)]
        target: JobTarget,

        /// Label to attach, as key=value (repeatable)
        #[arg(long = "label", short = 'l')]
        labels: Vec<String>,
    },

    /// Print the pod that runs a ProwJob
    Pod {
        /// Path to ProwJob JSON
        #[arg(long)]
        prowjob: PathBuf,

        /// Build identifier exposed as BUILD_NUMBER
        #[arg(long)]
        build_id: String,
    },

    /// Split ProwJobs into pending and non-pending
    Partition {
        /// Path to a JSON array of ProwJobs
        #[arg(long)]
        prowjobs: PathBuf,
    },

    /// Print the latest ProwJob of each periodic job
    LatestPeriodics {
        /// Path to a JSON array of ProwJobs
        #[arg(long)]
        prowjobs: PathBuf,
    },
}

#[derive(clap::Args)]
struct JobTarget {
    /// Path to job config (default: $PROW_JOBS_CONFIG or jobs.toml)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Job type: presubmit, postsubmit, periodic or batch
    #[arg(long = "type", short = 't')]
    job_type: ProwJobType,

    /// Job name
    #[arg(long)]
    job: String,

    /// Path to refs JSON (required for all but periodic jobs)
    #[arg(long)]
    refs: Option<PathBuf>,
}

#[derive(Serialize)]
struct Partitioned {
    pending: Vec<ProwJob>,
    non_pending: Vec<ProwJob>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Verify { config } => run_verify(config),
        Commands::Spec { target } => {
            let spec = resolve_spec(&target);
            print_json(&spec);
        }
        Commands::Job { target, labels } => {
            let spec = resolve_spec(&target);
            let labels = parse_labels(&labels).unwrap_or_else(|e| fail("Invalid label", e));
            let pj = new_prow_job(spec, &labels, &UuidGenerator, &SystemClock);
            print_json(&pj);
        }
        Commands::Pod { prowjob, build_id } => {
            let pj: ProwJob = read_json(&prowjob);
            let pod = prow_job_to_pod(&pj, &build_id).unwrap_or_else(|e| fail("Error building pod", e));
            print_json(&pod);
        }
        Commands::Partition { prowjobs } => {
            let pjs: Vec<ProwJob> = read_json(&prowjobs);
            let (pending, non_pending) = partition_pending(&pjs);
            print_json(&Partitioned { pending, non_pending });
        }
        Commands::LatestPeriodics { prowjobs } => {
            let pjs: Vec<ProwJob> = read_json(&prowjobs);
            let latest: BTreeMap<String, ProwJob> = latest_periodics(&pjs).into_iter().collect();
            print_json(&latest);
        }
    }
}

fn run_verify(config_path: Option<PathBuf>) {
    let path = config_path_or_default(config_path);
    let config = load_config(&path);
    let (presubmits, postsubmits, periodics) = config.counts();

    println!("Configuration valid: {}", path.display());
    println!();
    println!("  Presubmits: {}", presubmits);
    println!("  Postsubmits: {}", postsubmits);
    println!("  Periodics: {}", periodics);
    println!("  Total jobs (with run_after_success): {}", config.all_templates().len());
}

fn resolve_spec(target: &JobTarget) -> ProwJobSpec {
    let path = config_path_or_default(target.config.clone());
    let config = load_config(&path);

    let template = match target.job_type {
        ProwJobType::Presubmit => config.presubmit(&target.job).map(JobTemplate::Presubmit),
        ProwJobType::Batch => config.presubmit(&target.job).map(JobTemplate::Batch),
        ProwJobType::Postsubmit => config.postsubmit(&target.job).map(JobTemplate::Postsubmit),
        ProwJobType::Periodic => config.periodic(&target.job).map(JobTemplate::Periodic),
    };
    let template = template.unwrap_or_else(|| {
        fail(
            "Job not found",
            format!("no {} job named '{}' in {}", target.job_type, target.job, path.display()),
        )
    });

    let refs: Option<Refs> = match (&target.refs, target.job_type) {
        (Some(refs_path), _) => Some(read_json(refs_path)),
        (None, ProwJobType::Periodic) => None,
        (None, job_type) => fail("Missing refs", format!("{} jobs require --refs", job_type)),
    };

    build_spec(template, refs.as_ref()).unwrap_or_else(|e| fail("Error building spec", e))
}

fn config_path_or_default(config_path: Option<PathBuf>) -> PathBuf {
    config_path
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG))
}

fn load_config(path: &Path) -> JobConfig {
    JobConfig::load(path).unwrap_or_else(|e| fail("Configuration error", e))
}

fn parse_labels(raw: &[String]) -> Result<BTreeMap<String, String>, String> {
    raw.iter()
        .map(|entry| {
            entry
                .split_once('=')
                .filter(|(key, _)| !key.is_empty())
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .ok_or_else(|| format!("expected key=value, got '{}'", entry))
        })
        .collect()
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> T {
    let contents = fs::read_to_string(path)
        .unwrap_or_else(|e| fail(&format!("Error reading {}", path.display()), e));
    serde_json::from_str(&contents)
        .unwrap_or_else(|e| fail(&format!("Error parsing {}", path.display()), e))
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => fail("Error serializing output", e),
    }
}

fn fail(context: &str, err: impl Display) -> ! {
    eprintln!("{}: {}", context, err);
    process::exit(1);
}
