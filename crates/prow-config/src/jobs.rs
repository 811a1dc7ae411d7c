//! Job templates.
//!
//! A template describes a class of job independent of any particular run.
//! Each kind carries its own run-after-success chain of the same kind.

use prow_kube::{PodSpec, ProwJobType};
use serde::{Deserialize, Serialize};

use crate::defaults::{default_agent, default_max_concurrency, default_skip_report, BuiltinDefaults};

/// Fields shared by every template kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobBase {
    /// Job name, unique across the config
    pub name: String,

    /// Execution agent identifier
    #[serde(default = "default_agent")]
    pub agent: String,

    /// Pod template, used only by the kubernetes agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<PodSpec>,

    /// Maximum concurrently running instances (0 = unbounded)
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: u32,
}

impl JobBase {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            agent: default_agent(),
            spec: None,
            max_concurrency: default_max_concurrency(),
        }
    }
}

/// Job run against pull requests before merge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presubmit {
    #[serde(flatten)]
    pub base: JobBase,

    /// Status context reported on the pull request
    #[serde(default)]
    pub context: String,

    /// Comment that retriggers the job
    #[serde(default)]
    pub rerun_command: String,

    /// Do not report results back to the pull request
    #[serde(default = "default_skip_report")]
    pub skip_report: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub run_after_success: Vec<Presubmit>,
}

impl Presubmit {
    pub fn new(base: JobBase) -> Self {
        Self {
            context: BuiltinDefaults::context(&base.name),
            rerun_command: BuiltinDefaults::rerun_command(&base.name),
            base,
            skip_report: default_skip_report(),
            run_after_success: Vec::new(),
        }
    }

    /// Fill unset reporting fields, recursively.
    pub(crate) fn apply_defaults(&mut self) {
        if self.context.is_empty() {
            self.context = BuiltinDefaults::context(&self.base.name);
        }
        if self.rerun_command.is_empty() {
            self.rerun_command = BuiltinDefaults::rerun_command(&self.base.name);
        }
        for next in &mut self.run_after_success {
            next.apply_defaults();
        }
    }
}

/// Job run against a branch after merge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Postsubmit {
    #[serde(flatten)]
    pub base: JobBase,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub run_after_success: Vec<Postsubmit>,
}

impl Postsubmit {
    pub fn new(base: JobBase) -> Self {
        Self {
            base,
            run_after_success: Vec::new(),
        }
    }
}

/// Job run on a schedule, independent of any refs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Periodic {
    #[serde(flatten)]
    pub base: JobBase,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub run_after_success: Vec<Periodic>,
}

impl Periodic {
    pub fn new(base: JobBase) -> Self {
        Self {
            base,
            run_after_success: Vec::new(),
        }
    }
}

/// A borrowed template of any kind.
///
/// Batch jobs are presubmit templates run against several pulls at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobTemplate<'a> {
    Presubmit(&'a Presubmit),
    Postsubmit(&'a Postsubmit),
    Periodic(&'a Periodic),
    Batch(&'a Presubmit),
}

impl<'a> JobTemplate<'a> {
    /// Job type this template builds.
    pub fn job_type(&self) -> ProwJobType {
        match self {
            JobTemplate::Presubmit(_) => ProwJobType::Presubmit,
            JobTemplate::Postsubmit(_) => ProwJobType::Postsubmit,
            JobTemplate::Periodic(_) => ProwJobType::Periodic,
            JobTemplate::Batch(_) => ProwJobType::Batch,
        }
    }

    pub fn base(&self) -> &'a JobBase {
        match self {
            JobTemplate::Presubmit(p) | JobTemplate::Batch(p) => &p.base,
            JobTemplate::Postsubmit(p) => &p.base,
            JobTemplate::Periodic(p) => &p.base,
        }
    }

    /// The presubmit-only fields, for presubmit and batch templates.
    pub fn presubmit(&self) -> Option<&'a Presubmit> {
        match self {
            JobTemplate::Presubmit(p) | JobTemplate::Batch(p) => Some(p),
            JobTemplate::Postsubmit(_) | JobTemplate::Periodic(_) => None,
        }
    }

    /// Run-after-success children, wrapped as the same kind, in order.
    pub fn run_after_success(&self) -> Vec<JobTemplate<'a>> {
        match self {
            JobTemplate::Presubmit(p) => p.run_after_success.iter().map(JobTemplate::Presubmit).collect(),
            JobTemplate::Batch(p) => p.run_after_success.iter().map(JobTemplate::Batch).collect(),
            JobTemplate::Postsubmit(p) => p.run_after_success.iter().map(JobTemplate::Postsubmit).collect(),
            JobTemplate::Periodic(p) => p.run_after_success.iter().map(JobTemplate::Periodic).collect(),
        }
    }

    pub fn name(&self) -> &'a str {
        &self.base().name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presubmit_new_fills_reporting_defaults() {
        let p = Presubmit::new(JobBase::new("pull-unit"));
        assert_eq!(p.context, "pull-unit");
        assert_eq!(p.rerun_command, "/test pull-unit");
        assert!(!p.skip_report);
        assert_eq!(p.base.agent, "kubernetes");
    }

    #[test]
    fn test_batch_children_stay_batch() {
        let mut parent = Presubmit::new(JobBase::new("pull-e2e"));
        parent.run_after_success.push(Presubmit::new(JobBase::new("pull-e2e-followup")));

        let template = JobTemplate::Batch(&parent);
        let children = template.run_after_success();

        assert_eq!(children.len(), 1);
        assert_eq!(children[0].job_type(), ProwJobType::Batch);
        assert_eq!(children[0].name(), "pull-e2e-followup");
    }

    #[test]
    fn test_presubmit_fields_only_for_presubmit_and_batch() {
        let pre = Presubmit::new(JobBase::new("a"));
        let post = Postsubmit::new(JobBase::new("b"));
        let per = Periodic::new(JobBase::new("c"));

        assert!(JobTemplate::Presubmit(&pre).presubmit().is_some());
        assert!(JobTemplate::Batch(&pre).presubmit().is_some());
        assert!(JobTemplate::Postsubmit(&post).presubmit().is_none());
        assert!(JobTemplate::Periodic(&per).presubmit().is_none());
    }

    #[test]
    fn test_apply_defaults_recurses() {
        let mut parent: Presubmit = serde_json::from_value(serde_json::json!({
            "name": "parent",
            "run_after_success": [{"name": "child", "context": "custom"}]
        }))
        .unwrap();
        parent.apply_defaults();

        assert_eq!(parent.context, "parent");
        assert_eq!(parent.run_after_success[0].context, "custom");
        assert_eq!(parent.run_after_success[0].rerun_command, "/test child");
    }
}
