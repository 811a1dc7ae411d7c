//! ProwJob utilities
//!
//! Builds ProwJob specs from job templates, instantiates ProwJobs, derives
//! their environment, projects them into pods, and aggregates lists of
//! ProwJobs for the controller. Everything here is a pure transformation:
//! no I/O, no scheduling, no persistence.
//!
//! Data flows one way: template → [`spec`] → [`instance`] → [`pod`], with
//! [`env`] feeding the pod. [`aggregate`] works on already-built jobs.

pub mod aggregate;
pub mod env;
pub mod error;
pub mod instance;
pub mod pod;
pub mod spec;

pub use aggregate::{latest_periodics, partition_pending};
pub use env::{env_for_spec, kube_env};
pub use error::{Defect, PjError};
pub use instance::{new_prow_job, Clock, FixedClock, IdGenerator, SequentialIds, SystemClock, UuidGenerator};
pub use pod::prow_job_to_pod;
pub use spec::{batch_spec, build_spec, periodic_spec, postsubmit_spec, presubmit_spec, FieldPolicy};

pub use prow_config::{ConfigError, JobConfig, JobTemplate};
pub use prow_kube::{Pod, ProwJob, ProwJobSpec, ProwJobState, ProwJobType, Refs};
