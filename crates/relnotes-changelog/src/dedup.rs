//! Deduplication and footer accumulation
//!
//! Both sets grow monotonically during the single classification pass and
//! are owned by it; nothing else mutates them.

use std::collections::{BTreeSet, HashSet};

use relnotes_git::CommitRef;

/// Commits already represented in the output, directly or via a merge
#[derive(Debug, Default)]
pub struct SeenSet(HashSet<CommitRef>);

impl SeenSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Check-and-set: returns true when this call newly marked the ref.
    /// Marking an already-seen ref is a no-op returning false.
    pub fn try_mark(&mut self, commit: &CommitRef) -> bool {
        self.0.insert(commit.clone())
    }

    /// Whether the ref has been marked
    pub fn contains(&self, commit: &CommitRef) -> bool {
        self.0.contains(commit)
    }
}

/// Reference-link definition lines for the changelog footer.
///
/// Duplicate insertions collapse; rendering yields lexicographic order.
#[derive(Debug, Default)]
pub struct FooterSet(BTreeSet<String>);

impl FooterSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a link-definition line; duplicates collapse
    pub fn add(&mut self, line: impl Into<String>) {
        self.0.insert(line.into());
    }

    /// The lines in lexicographic order, each exactly once
    pub fn render(self) -> Vec<String> {
        self.0.into_iter().collect()
    }
}
