//! Error taxonomy
//!
//! Every builder in this crate is total over well-formed input. The only
//! failures are templates or specs that could never have produced a runnable
//! job, reported as [`PjError::InvalidConfiguration`].

use std::fmt;

/// What is wrong with a job's configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Defect {
    /// Kubernetes agent with no pod spec to run
    MissingPodSpec,
    /// Non-periodic spec with no refs
    MissingRefs,
    /// Presubmit refs with no pull requests
    NoPulls,
}

impl fmt::Display for Defect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Defect::MissingPodSpec => write!(f, "kubernetes agent requires a pod spec"),
            Defect::MissingRefs => write!(f, "job type requires refs"),
            Defect::NoPulls => write!(f, "presubmit refs contain no pull requests"),
        }
    }
}

/// Errors produced while building specs, environments or pods
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PjError {
    #[error("Invalid configuration for job '{job}': {defect}")]
    InvalidConfiguration { job: String, defect: Defect },
}

impl PjError {
    pub(crate) fn invalid(job: &str, defect: Defect) -> Self {
        PjError::InvalidConfiguration {
            job: job.to_string(),
            defect,
        }
    }

    /// The defect behind this error
    pub fn defect(&self) -> Defect {
        match self {
            PjError::InvalidConfiguration { defect, .. } => *defect,
        }
    }
}
