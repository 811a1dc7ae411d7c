//! ProwJob instantiation
//!
//! Wraps a `ProwJobSpec` into a `ProwJob` in the triggered state. Identity
//! and time come from injected capabilities so callers can make runs
//! deterministic.

use chrono::{DateTime, Utc};
use prow_kube::{ObjectMeta, ProwJob, ProwJobSpec, ProwJobState, ProwJobStatus, API_VERSION, KIND};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Source of globally unique job identities
pub trait IdGenerator {
    fn next_id(&self) -> String;
}

/// Source of the current instant
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Random UUID identities
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Identities `<prefix>-0`, `<prefix>-1`, ...
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        format!("{}-{}", self.prefix, n)
    }
}

/// A clock stopped at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Create a new ProwJob for `spec` in the triggered state.
///
/// The labels are copied; later changes to the caller's map do not reach the
/// returned job.
pub fn new_prow_job<G, C>(
    spec: ProwJobSpec,
    labels: &BTreeMap<String, String>,
    ids: &G,
    clock: &C,
) -> ProwJob
where
    G: IdGenerator + ?Sized,
    C: Clock + ?Sized,
{
    let name = ids.next_id();
    debug!(name = %name, job = %spec.job, job_type = %spec.job_type, "created prowjob");

    ProwJob {
        api_version: API_VERSION.to_string(),
        kind: KIND.to_string(),
        metadata: ObjectMeta {
            name,
            labels: labels.clone(),
            annotations: BTreeMap::new(),
        },
        spec,
        status: ProwJobStatus {
            start_time: clock.now(),
            completion_time: None,
            state: ProwJobState::Triggered,
            description: None,
            url: None,
            pod_name: None,
            build_id: None,
        },
    }
}
