//! Job configuration for ProwJobs.
//!
//! Parses the job config file (TOML), fills built-in defaults, and validates
//! it before any template is turned into a job spec.
//!
//! ```toml
//! [[presubmits."kubernetes/test-infra"]]
//! name = "pull-test-infra-unit"
//! max_concurrency = 4
//! spec = { containers = [{ image = "golang:1.22", command = ["make", "test"] }] }
//!
//! [[periodics]]
//! name = "ci-test-infra-nightly"
//! agent = "jenkins"
//! ```

mod defaults;
mod jobs;

pub use defaults::BuiltinDefaults;
pub use jobs::{JobBase, JobTemplate, Periodic, Postsubmit, Presubmit};

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io;
use std::path::Path;
use std::sync::OnceLock;

/// Agents the controller knows how to dispatch to.
pub const KNOWN_AGENTS: &[&str] = &["kubernetes", "jenkins"];

/// Errors that can occur when loading or validating a job config
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Duplicate job name: '{0}'")]
    DuplicateJob(String),

    #[error("Invalid job name: '{0}'")]
    InvalidJobName(String),

    #[error("Job '{name}': unknown agent '{agent}'")]
    UnknownAgent { name: String, agent: String },

    #[error("Job '{0}': kubernetes agent requires a pod spec")]
    MissingPodSpec(String),

    #[error("Job '{name}': pod spec must have exactly one container, found {count}")]
    InvalidContainerCount { name: String, count: usize },
}

/// Job configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfig {
    /// Presubmits keyed by "org/repo"
    #[serde(default)]
    pub presubmits: BTreeMap<String, Vec<Presubmit>>,

    /// Postsubmits keyed by "org/repo"
    #[serde(default)]
    pub postsubmits: BTreeMap<String, Vec<Postsubmit>>,

    #[serde(default)]
    pub periodics: Vec<Periodic>,
}

impl JobConfig {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate a TOML string
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let mut config: JobConfig = toml::from_str(contents)?;
        config.apply_defaults();
        config.validate()?;
        Ok(config)
    }

    fn apply_defaults(&mut self) {
        for presubmit in self.presubmits.values_mut().flatten() {
            presubmit.apply_defaults();
        }
    }

    /// Validate every template, including nested run-after-success jobs
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for template in self.all_templates() {
            let base = template.base();
            if !seen.insert(base.name.as_str()) {
                return Err(ConfigError::DuplicateJob(base.name.clone()));
            }
            validate_base(base)?;
        }
        Ok(())
    }

    /// Every template in the config, depth-first, parents before children
    pub fn all_templates(&self) -> Vec<JobTemplate<'_>> {
        let mut roots: Vec<JobTemplate<'_>> = Vec::new();
        roots.extend(self.presubmits.values().flatten().map(JobTemplate::Presubmit));
        roots.extend(self.postsubmits.values().flatten().map(JobTemplate::Postsubmit));
        roots.extend(self.periodics.iter().map(JobTemplate::Periodic));

        let mut out = Vec::new();
        let mut stack: Vec<JobTemplate<'_>> = roots.into_iter().rev().collect();
        while let Some(template) = stack.pop() {
            stack.extend(template.run_after_success().into_iter().rev());
            out.push(template);
        }
        out
    }

    /// Find a top-level presubmit by name
    pub fn presubmit(&self, name: &str) -> Option<&Presubmit> {
        self.presubmits.values().flatten().find(|p| p.base.name == name)
    }

    /// Find a top-level postsubmit by name
    pub fn postsubmit(&self, name: &str) -> Option<&Postsubmit> {
        self.postsubmits.values().flatten().find(|p| p.base.name == name)
    }

    /// Find a periodic by name
    pub fn periodic(&self, name: &str) -> Option<&Periodic> {
        self.periodics.iter().find(|p| p.base.name == name)
    }

    /// Number of top-level jobs of each kind: (presubmits, postsubmits, periodics)
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.presubmits.values().map(Vec::len).sum(),
            self.postsubmits.values().map(Vec::len).sum(),
            self.periodics.len(),
        )
    }
}

fn job_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("job name pattern is valid"))
}

fn validate_base(base: &JobBase) -> Result<(), ConfigError> {
    if !job_name_pattern().is_match(&base.name) {
        return Err(ConfigError::InvalidJobName(base.name.clone()));
    }

    if !KNOWN_AGENTS.contains(&base.agent.as_str()) {
        return Err(ConfigError::UnknownAgent {
            name: base.name.clone(),
            agent: base.agent.clone(),
        });
    }

    if base.agent == "kubernetes" {
        let spec = base
            .spec
            .as_ref()
            .ok_or_else(|| ConfigError::MissingPodSpec(base.name.clone()))?;
        if spec.containers.len() != 1 {
            return Err(ConfigError::InvalidContainerCount {
                name: base.name.clone(),
                count: spec.containers.len(),
            });
        }
    }

    Ok(())
}
