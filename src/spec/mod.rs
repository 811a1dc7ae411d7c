//! ProwJobSpec builder
//!
//! Turns a job template plus the refs under test into a `ProwJobSpec`,
//! recursively building the run-after-success chain. The four job kinds
//! share one traversal; they differ only in which optional fields they copy,
//! as recorded in [`FieldPolicy`].

use prow_config::{JobTemplate, Periodic, Postsubmit, Presubmit};
use prow_kube::{ProwJobAgent, ProwJobSpec, ProwJobType, Refs};
use tracing::debug;

use crate::error::{Defect, PjError};

/// Which optional fields a job kind copies from its template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPolicy {
    pub refs: bool,
    /// Set `report = !skip_report`
    pub report: bool,
    pub context: bool,
    pub rerun_command: bool,
}

impl FieldPolicy {
    pub fn for_type(job_type: ProwJobType) -> Self {
        match job_type {
            ProwJobType::Presubmit => FieldPolicy {
                refs: true,
                report: true,
                context: true,
                rerun_command: true,
            },
            ProwJobType::Postsubmit => FieldPolicy {
                refs: true,
                report: false,
                context: false,
                rerun_command: false,
            },
            ProwJobType::Periodic => FieldPolicy {
                refs: false,
                report: false,
                context: false,
                rerun_command: false,
            },
            // The batch queue matches finished batches by context.
            ProwJobType::Batch => FieldPolicy {
                refs: true,
                report: false,
                context: true,
                rerun_command: false,
            },
        }
    }
}

/// Build a spec for a presubmit job
pub fn presubmit_spec(template: &Presubmit, refs: &Refs) -> Result<ProwJobSpec, PjError> {
    build_spec(JobTemplate::Presubmit(template), Some(refs))
}

/// Build a spec for a postsubmit job
pub fn postsubmit_spec(template: &Postsubmit, refs: &Refs) -> Result<ProwJobSpec, PjError> {
    build_spec(JobTemplate::Postsubmit(template), Some(refs))
}

/// Build a spec for a periodic job; periodics never carry refs
pub fn periodic_spec(template: &Periodic) -> Result<ProwJobSpec, PjError> {
    build_spec(JobTemplate::Periodic(template), None)
}

/// Build a spec for a batch of pulls tested together
pub fn batch_spec(template: &Presubmit, refs: &Refs) -> Result<ProwJobSpec, PjError> {
    build_spec(JobTemplate::Batch(template), Some(refs))
}

/// Build a spec from any template kind.
///
/// `refs` is ignored for kinds whose policy does not carry refs. Every
/// run-after-success child is built as the same kind with the same refs.
pub fn build_spec(template: JobTemplate<'_>, refs: Option<&Refs>) -> Result<ProwJobSpec, PjError> {
    let job_type = template.job_type();
    let policy = FieldPolicy::for_type(job_type);
    let base = template.base();

    let mut spec = ProwJobSpec::new(job_type, base.name.clone());
    spec.max_concurrency = base.max_concurrency;
    if policy.refs {
        spec.refs = refs.cloned();
    }

    if let Some(presubmit) = template.presubmit() {
        if policy.report {
            spec.report = !presubmit.skip_report;
        }
        if policy.context {
            spec.context = presubmit.context.clone();
        }
        if policy.rerun_command {
            spec.rerun_command = presubmit.rerun_command.clone();
        }
    }

    spec.agent = ProwJobAgent::from(base.agent.as_str());
    if spec.agent == ProwJobAgent::Kubernetes {
        let pod_spec = base
            .spec
            .as_ref()
            .ok_or_else(|| PjError::invalid(&base.name, Defect::MissingPodSpec))?;
        spec.pod_spec = Some(pod_spec.clone());
    }

    for next in template.run_after_success() {
        spec.run_after_success.push(build_spec(next, refs)?);
    }

    debug!(
        job = %spec.job,
        job_type = %job_type,
        agent = %spec.agent,
        children = spec.run_after_success.len(),
        "built job spec"
    );
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use prow_config::JobBase;
    use prow_kube::{Container, PodSpec, Pull};

    fn pod_spec(image: &str) -> PodSpec {
        PodSpec {
            containers: vec![Container {
                image: image.to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn k8s_base(name: &str) -> JobBase {
        let mut base = JobBase::new(name);
        base.spec = Some(pod_spec("golang:1.22"));
        base
    }

    fn refs() -> Refs {
        Refs::new("kubernetes", "test-infra", "master", "abc123").with_pull(Pull::new(42, "def456"))
    }

    #[test]
    fn test_presubmit_copies_reporting_fields() {
        let mut template = Presubmit::new(k8s_base("pull-unit"));
        template.skip_report = true;
        template.context = "ci/unit".to_string();
        template.base.max_concurrency = 3;

        let spec = presubmit_spec(&template, &refs()).unwrap();

        assert_eq!(spec.job_type, ProwJobType::Presubmit);
        assert_eq!(spec.job, "pull-unit");
        assert!(!spec.report);
        assert_eq!(spec.context, "ci/unit");
        assert_eq!(spec.rerun_command, "/test pull-unit");
        assert_eq!(spec.max_concurrency, 3);
        assert_eq!(spec.refs, Some(refs()));
        assert_eq!(spec.pod_spec, template.base.spec);
        assert!(spec.run_after_success.is_empty());
    }

    #[test]
    fn test_batch_copies_context_only() {
        let template = Presubmit::new(k8s_base("pull-e2e"));
        let spec = batch_spec(&template, &refs()).unwrap();

        assert_eq!(spec.job_type, ProwJobType::Batch);
        assert_eq!(spec.context, "pull-e2e");
        assert!(!spec.report);
        assert!(spec.rerun_command.is_empty());
        assert_eq!(spec.refs, Some(refs()));
    }

    #[test]
    fn test_postsubmit_has_refs_but_no_reporting() {
        let template = Postsubmit::new(k8s_base("post-push"));
        let spec = postsubmit_spec(&template, &refs()).unwrap();

        assert_eq!(spec.job_type, ProwJobType::Postsubmit);
        assert_eq!(spec.refs, Some(refs()));
        assert!(!spec.report);
        assert!(spec.context.is_empty());
    }

    #[test]
    fn test_periodic_has_no_refs() {
        let mut template = Periodic::new(k8s_base("ci-nightly"));
        template.base.max_concurrency = 1;
        let spec = periodic_spec(&template).unwrap();

        assert_eq!(spec.job_type, ProwJobType::Periodic);
        assert!(spec.refs.is_none());
        assert_eq!(spec.max_concurrency, 1);
    }

    #[test]
    fn test_build_spec_ignores_refs_for_periodic() {
        let template = Periodic::new(k8s_base("ci-nightly"));
        let spec = build_spec(JobTemplate::Periodic(&template), Some(&refs())).unwrap();
        assert!(spec.refs.is_none());
    }

    #[test]
    fn test_non_kubernetes_agent_drops_pod_spec() {
        let mut base = k8s_base("post-jenkins");
        base.agent = "jenkins".to_string();
        let template = Postsubmit::new(base);

        let spec = postsubmit_spec(&template, &refs()).unwrap();

        assert_eq!(spec.agent, ProwJobAgent::Jenkins);
        assert!(spec.pod_spec.is_none());
    }

    #[test]
    fn test_unknown_agent_is_not_an_error() {
        let mut base = JobBase::new("ci-external");
        base.agent = "buildkite".to_string();
        let spec = periodic_spec(&Periodic::new(base)).unwrap();

        assert_eq!(spec.agent, ProwJobAgent::Other("buildkite".to_string()));
        assert!(spec.pod_spec.is_none());
    }

    #[test]
    fn test_kubernetes_without_pod_spec_is_invalid() {
        let template = Periodic::new(JobBase::new("ci-broken"));
        let err = periodic_spec(&template).unwrap_err();
        assert_eq!(
            err,
            PjError::InvalidConfiguration {
                job: "ci-broken".to_string(),
                defect: Defect::MissingPodSpec,
            }
        );
    }

    #[test]
    fn test_defect_in_child_fails_whole_chain() {
        let mut parent = Postsubmit::new(k8s_base("post-parent"));
        parent.run_after_success.push(Postsubmit::new(JobBase::new("post-child")));

        let err = postsubmit_spec(&parent, &refs()).unwrap_err();
        assert!(matches!(err, PjError::InvalidConfiguration { ref job, .. } if job == "post-child"));
    }

    #[test]
    fn test_pod_spec_is_copied_not_shared() {
        let template = Presubmit::new(k8s_base("pull-unit"));
        let mut spec = presubmit_spec(&template, &refs()).unwrap();

        if let Some(pod_spec) = spec.pod_spec.as_mut() {
            pod_spec.containers[0].image = "mutated".to_string();
        }

        assert_eq!(template.base.spec.as_ref().unwrap().containers[0].image, "golang:1.22");
    }

    #[test]
    fn test_policy_table() {
        let pre = FieldPolicy::for_type(ProwJobType::Presubmit);
        assert!(pre.refs && pre.report && pre.context && pre.rerun_command);

        let batch = FieldPolicy::for_type(ProwJobType::Batch);
        assert!(batch.refs && batch.context);
        assert!(!batch.report && !batch.rerun_command);

        let periodic = FieldPolicy::for_type(ProwJobType::Periodic);
        assert!(!periodic.refs);
    }
}
