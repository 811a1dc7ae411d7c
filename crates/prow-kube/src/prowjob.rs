//! The ProwJob custom resource.
//!
//! ProwJob lifecycle: triggered → pending → {success | failure | aborted | error}.
//! Transitions are driven by the controller; this crate only describes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::pod::{ObjectMeta, PodSpec};
use crate::refs::Refs;

/// Kind of job, determining which refs and reporting fields it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProwJobType {
    /// Runs against a pull request before merge
    Presubmit,
    /// Runs against a branch after merge
    Postsubmit,
    /// Runs on a schedule, without refs
    Periodic,
    /// Runs a batch of pulls merged together
    Batch,
}

impl ProwJobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProwJobType::Presubmit => "presubmit",
            ProwJobType::Postsubmit => "postsubmit",
            ProwJobType::Periodic => "periodic",
            ProwJobType::Batch => "batch",
        }
    }
}

impl fmt::Display for ProwJobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProwJobType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "presubmit" => Ok(ProwJobType::Presubmit),
            "postsubmit" => Ok(ProwJobType::Postsubmit),
            "periodic" => Ok(ProwJobType::Periodic),
            "batch" => Ok(ProwJobType::Batch),
            _ => Err(format!("unknown job type: {}", s)),
        }
    }
}

/// Agent responsible for executing a job.
///
/// Only [`ProwJobAgent::Kubernetes`] jobs are run as pods; every other agent
/// executes outside the pod projector and carries no pod spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProwJobAgent {
    #[default]
    Kubernetes,
    Jenkins,
    Other(String),
}

impl ProwJobAgent {
    pub fn as_str(&self) -> &str {
        match self {
            ProwJobAgent::Kubernetes => "kubernetes",
            ProwJobAgent::Jenkins => "jenkins",
            ProwJobAgent::Other(name) => name,
        }
    }
}

impl From<&str> for ProwJobAgent {
    fn from(s: &str) -> Self {
        match s {
            "kubernetes" => ProwJobAgent::Kubernetes,
            "jenkins" => ProwJobAgent::Jenkins,
            other => ProwJobAgent::Other(other.to_string()),
        }
    }
}

impl From<String> for ProwJobAgent {
    fn from(s: String) -> Self {
        ProwJobAgent::from(s.as_str())
    }
}

impl From<ProwJobAgent> for String {
    fn from(agent: ProwJobAgent) -> Self {
        agent.as_str().to_string()
    }
}

impl fmt::Display for ProwJobAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a ProwJob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProwJobState {
    /// Created, not yet scheduled
    Triggered,
    /// Pod or external build is running
    Pending,
    Success,
    Failure,
    /// Superseded or cancelled
    Aborted,
    /// Could not be scheduled or run
    Error,
}

impl ProwJobState {
    /// Check whether the job has reached a terminal state.
    pub fn is_complete(&self) -> bool {
        matches!(
            self,
            ProwJobState::Success | ProwJobState::Failure | ProwJobState::Aborted | ProwJobState::Error
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProwJobState::Triggered => "triggered",
            ProwJobState::Pending => "pending",
            ProwJobState::Success => "success",
            ProwJobState::Failure => "failure",
            ProwJobState::Aborted => "aborted",
            ProwJobState::Error => "error",
        }
    }
}

impl fmt::Display for ProwJobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Agent-resolved description of one runnable job.
///
/// Field names follow the upstream ProwJob JSON tags, which are snake_case
/// here and camelCase only for `apiVersion`, `startTime` and `completionTime`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProwJobSpec {
    #[serde(rename = "type")]
    pub job_type: ProwJobType,

    #[serde(default)]
    pub agent: ProwJobAgent,

    /// Job name
    pub job: String,

    /// Absent for periodic jobs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refs: Option<Refs>,

    /// Whether results are reported back to the pull request
    #[serde(default)]
    pub report: bool,

    /// Status context used when reporting
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub context: String,

    /// Comment that retriggers the job
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub rerun_command: String,

    /// 0 means unbounded
    #[serde(default)]
    pub max_concurrency: u32,

    /// Present only for the kubernetes agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_spec: Option<PodSpec>,

    /// Jobs to trigger once this one succeeds
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub run_after_success: Vec<ProwJobSpec>,
}

impl ProwJobSpec {
    /// Empty spec of the given type; every other field is zero-valued.
    pub fn new(job_type: ProwJobType, job: impl Into<String>) -> Self {
        Self {
            job_type,
            agent: ProwJobAgent::default(),
            job: job.into(),
            refs: None,
            report: false,
            context: String::new(),
            rerun_command: String::new(),
            max_concurrency: 0,
            pod_spec: None,
            run_after_success: Vec::new(),
        }
    }
}

/// Observed state of a ProwJob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProwJobStatus {
    #[serde(rename = "startTime")]
    pub start_time: DateTime<Utc>,

    #[serde(rename = "completionTime", default, skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<DateTime<Utc>>,

    pub state: ProwJobState,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_id: Option<String>,
}

/// One concrete run of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProwJob {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: ProwJobSpec,
    pub status: ProwJobStatus,
}

impl ProwJob {
    /// Name of the job this run belongs to.
    pub fn job_name(&self) -> &str {
        &self.spec.job
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_type_roundtrip_str() {
        for job_type in [
            ProwJobType::Presubmit,
            ProwJobType::Postsubmit,
            ProwJobType::Periodic,
            ProwJobType::Batch,
        ] {
            assert_eq!(job_type.as_str().parse::<ProwJobType>().unwrap(), job_type);
        }
        assert!("nightly".parse::<ProwJobType>().is_err());
    }

    #[test]
    fn test_agent_serializes_as_string() {
        let json = serde_json::to_string(&ProwJobAgent::Kubernetes).unwrap();
        assert_eq!(json, "\"kubernetes\"");

        let agent: ProwJobAgent = serde_json::from_str("\"buildkite\"").unwrap();
        assert_eq!(agent, ProwJobAgent::Other("buildkite".to_string()));
        assert_eq!(agent.to_string(), "buildkite");
    }

    #[test]
    fn test_state_is_complete() {
        assert!(!ProwJobState::Triggered.is_complete());
        assert!(!ProwJobState::Pending.is_complete());
        assert!(ProwJobState::Success.is_complete());
        assert!(ProwJobState::Failure.is_complete());
        assert!(ProwJobState::Aborted.is_complete());
        assert!(ProwJobState::Error.is_complete());
    }

    #[test]
    fn test_spec_type_field_name() {
        let spec = ProwJobSpec::new(ProwJobType::Periodic, "ci-nightly");
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["type"], "periodic");
        assert_eq!(json["agent"], "kubernetes");
        assert!(json.get("refs").is_none());
        assert!(json.get("run_after_success").is_none());
    }

    #[test]
    fn test_field_names_match_upstream_tags() {
        let mut spec = ProwJobSpec::new(ProwJobType::Presubmit, "pull-unit");
        spec.max_concurrency = 2;
        spec.run_after_success.push(ProwJobSpec::new(ProwJobType::Presubmit, "pull-child"));
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["max_concurrency"], 2);
        assert_eq!(json["run_after_success"][0]["job"], "pull-child");

        let status = ProwJobStatus {
            start_time: "2024-03-01T00:00:00Z".parse().unwrap(),
            completion_time: Some("2024-03-01T00:10:00Z".parse().unwrap()),
            state: ProwJobState::Success,
            description: None,
            url: None,
            pod_name: Some("pj-0".to_string()),
            build_id: Some("17".to_string()),
        };
        let json = serde_json::to_value(&status).unwrap();
        assert!(json["startTime"].is_string());
        assert!(json["completionTime"].is_string());
        assert_eq!(json["pod_name"], "pj-0");
        assert_eq!(json["build_id"], "17");
    }
}
