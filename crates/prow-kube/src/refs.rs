//! Source refs under test.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A pull request merged on top of the base ref.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pull {
    /// Pull request number.
    pub number: u64,
    /// Pull request author login.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub author: String,
    /// Head commit of the pull request.
    pub sha: String,
}

impl Pull {
    pub fn new(number: u64, sha: impl Into<String>) -> Self {
        Self {
            number,
            author: String::new(),
            sha: sha.into(),
        }
    }
}

/// Identifies the code a job tests: a base commit plus zero or more pulls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refs {
    /// Repository owner.
    pub org: String,
    /// Repository name.
    pub repo: String,
    /// Base branch.
    pub base_ref: String,
    /// Base commit.
    pub base_sha: String,
    /// Pulls in merge order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pulls: Vec<Pull>,
}

impl Refs {
    pub fn new(
        org: impl Into<String>,
        repo: impl Into<String>,
        base_ref: impl Into<String>,
        base_sha: impl Into<String>,
    ) -> Self {
        Self {
            org: org.into(),
            repo: repo.into(),
            base_ref: base_ref.into(),
            base_sha: base_sha.into(),
            pulls: Vec::new(),
        }
    }

    /// Append a pull.
    pub fn with_pull(mut self, pull: Pull) -> Self {
        self.pulls.push(pull);
        self
    }
}

/// Canonical form: `base_ref:base_sha` followed by `,number:sha` per pull.
impl fmt::Display for Refs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.base_ref, self.base_sha)?;
        for pull in &self.pulls {
            write!(f, ",{}:{}", pull.number, pull.sha)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refs_string_base_only() {
        let refs = Refs::new("kubernetes", "test-infra", "master", "abc123");
        assert_eq!(refs.to_string(), "master:abc123");
    }

    #[test]
    fn test_refs_string_with_pulls() {
        let refs = Refs::new("kubernetes", "test-infra", "master", "abc123")
            .with_pull(Pull::new(42, "def456"))
            .with_pull(Pull::new(7, "0a1b2c"));
        assert_eq!(refs.to_string(), "master:abc123,42:def456,7:0a1b2c");
    }

    #[test]
    fn test_refs_deserialize_without_pulls() {
        let refs: Refs = serde_json::from_str(
            r#"{"org":"o","repo":"r","base_ref":"main","base_sha":"s"}"#,
        )
        .unwrap();
        assert!(refs.pulls.is_empty());
        assert_eq!(refs.base_ref, "main");
    }
}
