//! In-memory fixtures for driving the engine without a real repository

use std::collections::{HashMap, HashSet};

use relnotes_core::error::GitError;
use relnotes_git::{CommitRef, RepoQuery};

/// Deterministic synthetic commit hash
pub fn sha(n: u8) -> CommitRef {
    CommitRef::new(format!("{n:040x}")).unwrap()
}

/// A canned [`RepoQuery`] that returns pre-built results
#[derive(Debug, Default)]
pub struct FakeQuery {
    pub labels: HashMap<String, CommitRef>,
    pub order: Vec<CommitRef>,
    pub tags: HashSet<CommitRef>,
    pub merge_lines: Vec<String>,
    pub ordinary_lines: Vec<String>,
}

impl RepoQuery for FakeQuery {
    fn resolve_object(&self, label: &str) -> Result<CommitRef, GitError> {
        self.labels
            .get(label)
            .cloned()
            .ok_or_else(|| GitError::InvalidReference(label.to_string()))
    }

    fn commits_in_range(
        &self,
        _lower: &CommitRef,
        _upper: &CommitRef,
    ) -> Result<Vec<CommitRef>, GitError> {
        Ok(self.order.clone())
    }

    fn tag_targets(&self) -> Result<HashSet<CommitRef>, GitError> {
        Ok(self.tags.clone())
    }

    fn merge_commit_lines(
        &self,
        _lower: &CommitRef,
        _upper: &CommitRef,
    ) -> Result<Vec<String>, GitError> {
        Ok(self.merge_lines.clone())
    }

    fn ordinary_commit_lines(
        &self,
        _lower: &CommitRef,
        _upper: &CommitRef,
        _paths: &[String],
    ) -> Result<Vec<String>, GitError> {
        Ok(self.ordinary_lines.clone())
    }
}
