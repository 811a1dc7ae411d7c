//! Shared fixtures for ProwJob integration tests
//!
//! - `prow/jobs.toml`: one run-after-success chain per job kind
//! - `prow/refs.json`: refs with a single pull

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use prow_jobs::{FixedClock, JobConfig, Refs, SequentialIds};
use std::path::{Path, PathBuf};

/// Path to the job config fixture
pub fn jobs_config_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/prow/jobs.toml")
}

/// Path to the refs fixture
pub fn refs_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/prow/refs.json")
}

/// Load the job config fixture
pub fn load_jobs_config() -> JobConfig {
    JobConfig::load(&jobs_config_path()).expect("job config fixture should load")
}

/// Load the refs fixture
pub fn load_refs() -> Refs {
    let json = std::fs::read_to_string(refs_path()).expect("refs fixture should exist");
    serde_json::from_str(&json).expect("refs fixture should parse")
}

/// Fixed reference instant, offset by `secs`
pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() + Duration::seconds(secs)
}

/// Deterministic identity and clock pair
pub fn deterministic(prefix: &str, secs: i64) -> (SequentialIds, FixedClock) {
    (SequentialIds::new(prefix), FixedClock(at(secs)))
}
