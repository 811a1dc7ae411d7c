//! ProwJob to Pod projection
//!
//! Builds the pod that runs a ProwJob's tests. The pod is a fresh value: the
//! job, its spec and its pod template are never modified.

use prow_kube::{
    ObjectMeta, Pod, ProwJob, CREATED_BY_PROW, PROW_JOB_ANNOTATION, PROW_JOB_TYPE_LABEL,
    RESTART_POLICY_NEVER,
};
use std::collections::BTreeMap;
use tracing::debug;

use crate::env::{env_for_spec, kube_env, BUILD_NUMBER};
use crate::error::PjError;

/// Convert a ProwJob into the pod that will run it.
///
/// Containers are renamed `<prowjob name>-<index>` and get the job environment
/// (plus `BUILD_NUMBER = build_id`) appended after their own env entries.
/// Controller-owned labels override caller labels with the same key.
pub fn prow_job_to_pod(pj: &ProwJob, build_id: &str) -> Result<Pod, PjError> {
    let mut env = env_for_spec(&pj.spec)?;
    env.insert(BUILD_NUMBER.to_string(), build_id.to_string());
    let env_vars = kube_env(&env);

    let mut spec = pj.spec.pod_spec.clone().unwrap_or_default();
    spec.restart_policy = Some(RESTART_POLICY_NEVER.to_string());
    for (i, container) in spec.containers.iter_mut().enumerate() {
        container.name = format!("{}-{}", pj.metadata.name, i);
        container.env.extend(env_vars.iter().cloned());
    }

    let mut labels = pj.metadata.labels.clone();
    labels.insert(CREATED_BY_PROW.to_string(), "true".to_string());
    labels.insert(PROW_JOB_TYPE_LABEL.to_string(), pj.spec.job_type.to_string());

    let annotations = BTreeMap::from([(PROW_JOB_ANNOTATION.to_string(), pj.spec.job.clone())]);

    debug!(
        pod = %pj.metadata.name,
        job = %pj.spec.job,
        containers = spec.containers.len(),
        "projected prowjob to pod"
    );

    Ok(Pod {
        metadata: ObjectMeta {
            name: pj.metadata.name.clone(),
            labels,
            annotations,
        },
        spec,
    })
}
