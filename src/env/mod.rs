//! Job environment
//!
//! Environment variables a running job observes, derived from its spec.
//! The variable names are a stable interface with job payloads.

use prow_kube::{EnvVar, ProwJobSpec, ProwJobType};
use std::collections::BTreeMap;

use crate::error::{Defect, PjError};

pub const JOB_NAME: &str = "JOB_NAME";
pub const BUILD_NUMBER: &str = "BUILD_NUMBER";
pub const REPO_OWNER: &str = "REPO_OWNER";
pub const REPO_NAME: &str = "REPO_NAME";
pub const PULL_BASE_REF: &str = "PULL_BASE_REF";
pub const PULL_BASE_SHA: &str = "PULL_BASE_SHA";
pub const PULL_REFS: &str = "PULL_REFS";
pub const PULL_NUMBER: &str = "PULL_NUMBER";
pub const PULL_PULL_SHA: &str = "PULL_PULL_SHA";

/// Environment variables available to a job.
///
/// - every job: `JOB_NAME`
/// - postsubmit and batch add the refs: `REPO_OWNER`, `REPO_NAME`,
///   `PULL_BASE_REF`, `PULL_BASE_SHA`, `PULL_REFS`
/// - presubmit further adds the first pull: `PULL_NUMBER`, `PULL_PULL_SHA`
pub fn env_for_spec(spec: &ProwJobSpec) -> Result<BTreeMap<String, String>, PjError> {
    let mut env = BTreeMap::new();
    env.insert(JOB_NAME.to_string(), spec.job.clone());

    if spec.job_type == ProwJobType::Periodic {
        return Ok(env);
    }

    let refs = spec
        .refs
        .as_ref()
        .ok_or_else(|| PjError::invalid(&spec.job, Defect::MissingRefs))?;
    env.insert(REPO_OWNER.to_string(), refs.org.clone());
    env.insert(REPO_NAME.to_string(), refs.repo.clone());
    env.insert(PULL_BASE_REF.to_string(), refs.base_ref.clone());
    env.insert(PULL_BASE_SHA.to_string(), refs.base_sha.clone());
    env.insert(PULL_REFS.to_string(), refs.to_string());

    if matches!(spec.job_type, ProwJobType::Postsubmit | ProwJobType::Batch) {
        return Ok(env);
    }

    let pull = refs
        .pulls
        .first()
        .ok_or_else(|| PjError::invalid(&spec.job, Defect::NoPulls))?;
    env.insert(PULL_NUMBER.to_string(), pull.number.to_string());
    env.insert(PULL_PULL_SHA.to_string(), pull.sha.clone());
    Ok(env)
}

/// Serialize an environment mapping into container env records
pub fn kube_env(environment: &BTreeMap<String, String>) -> Vec<EnvVar> {
    environment
        .iter()
        .map(|(name, value)| EnvVar::new(name.clone(), value.clone()))
        .collect()
}
