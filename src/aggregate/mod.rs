//! Aggregation over lists of ProwJobs

use prow_kube::{ProwJob, ProwJobState, ProwJobType};
use std::collections::HashMap;

/// Split jobs into (pending, non-pending), preserving input order in each.
///
/// The controller drains pending jobs first so that running jobs count
/// against max concurrency before new ones start. The returned vectors are
/// owned and can be handed to separate workers.
pub fn partition_pending(pjs: &[ProwJob]) -> (Vec<ProwJob>, Vec<ProwJob>) {
    pjs.iter()
        .cloned()
        .partition(|pj| pj.status.state == ProwJobState::Pending)
}

/// Latest periodic job per job name, by start time.
///
/// Non-periodic jobs are ignored. On equal start times the job appearing
/// later in the input wins.
pub fn latest_periodics(pjs: &[ProwJob]) -> HashMap<String, ProwJob> {
    let mut latest: HashMap<String, ProwJob> = HashMap::new();
    for pj in pjs {
        if pj.spec.job_type != ProwJobType::Periodic {
            continue;
        }
        let newer = latest
            .get(&pj.spec.job)
            .map_or(true, |current| pj.status.start_time >= current.status.start_time);
        if newer {
            latest.insert(pj.spec.job.clone(), pj.clone());
        }
    }
    latest
}
