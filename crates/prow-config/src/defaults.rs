//! Built-in job defaults
//!
//! Values applied to any template field the config file leaves unset.

use serde::{Deserialize, Serialize};

/// Built-in default template values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Execution agent (default: "kubernetes")
    pub agent: String,

    /// Concurrency bound (default: 0 = unbounded)
    pub max_concurrency: u32,

    /// Skip reporting to the pull request (default: false)
    pub skip_report: bool,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            agent: "kubernetes".to_string(),
            max_concurrency: 0,
            skip_report: false,
        }
    }
}

impl BuiltinDefaults {
    /// Rerun command for a presubmit without one
    pub fn rerun_command(job_name: &str) -> String {
        format!("/test {}", job_name)
    }

    /// Status context for a presubmit without one
    pub fn context(job_name: &str) -> String {
        job_name.to_string()
    }
}

pub(crate) fn default_agent() -> String {
    BuiltinDefaults::default().agent
}

pub(crate) fn default_max_concurrency() -> u32 {
    BuiltinDefaults::default().max_concurrency
}

pub(crate) fn default_skip_report() -> bool {
    BuiltinDefaults::default().skip_report
}
