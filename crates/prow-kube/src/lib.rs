//! ProwJob API Types
//!
//! Data model shared by the job controller and the pod client: the ProwJob
//! custom resource, the source refs it tests, and the subset of the Pod API
//! that ProwJobs project into.

pub mod pod;
pub mod prowjob;
pub mod refs;

pub use pod::{Container, EnvVar, ObjectMeta, Pod, PodSpec};
pub use prowjob::{ProwJob, ProwJobAgent, ProwJobSpec, ProwJobState, ProwJobStatus, ProwJobType};
pub use refs::{Pull, Refs};

/// API version stamped on every ProwJob.
pub const API_VERSION: &str = "prow.k8s.io/v1";

/// Kind stamped on every ProwJob.
pub const KIND: &str = "ProwJob";

/// Label marking pods owned by the controller.
pub const CREATED_BY_PROW: &str = "created-by-prow";

/// Label carrying the job type of a pod.
pub const PROW_JOB_TYPE_LABEL: &str = "prow.k8s.io/type";

/// Annotation carrying the job name of a pod.
pub const PROW_JOB_ANNOTATION: &str = "prow.k8s.io/job";

/// Restart policy forced onto every job pod.
pub const RESTART_POLICY_NEVER: &str = "Never";
