//! Read-only repository queries consumed by the changelog engine
//!
//! The merge/ordinary listings are deliberately returned as raw
//! `<sha> <parent>... <message>` lines: the changelog engine owns the strict
//! parse (and the fatal error when a line does not match), and tests can
//! drive it through an in-memory implementation of [`RepoQuery`].

use std::collections::HashSet;

use git2::{DiffOptions, Oid, Sort};
use tracing::{debug, instrument};

use relnotes_core::error::GitError;

use crate::repository::{GitRepo, Result};
use crate::types::CommitRef;

/// Read-only queries against a commit graph.
///
/// Merge detection is not path-filtered: a path-restricted walk can silently
/// omit a merge commit that is otherwise relevant, so merges are listed
/// unfiltered and reconciled against the path-filtered ordinary listing
/// during classification.
pub trait RepoQuery {
    /// Resolve a label (tag name, branch, `HEAD`, hash prefix) to a commit
    fn resolve_object(&self, label: &str) -> Result<CommitRef>;

    /// Commits reachable from `upper` but not `lower`, newest first, in
    /// topological order
    fn commits_in_range(&self, lower: &CommitRef, upper: &CommitRef) -> Result<Vec<CommitRef>>;

    /// Commits pointed to by tags anywhere in the history, annotated tags
    /// dereferenced to their ultimate target
    fn tag_targets(&self) -> Result<HashSet<CommitRef>>;

    /// Raw `<sha> <parent1> <parent2> <message>` lines for every two-parent
    /// commit in the range
    fn merge_commit_lines(&self, lower: &CommitRef, upper: &CommitRef) -> Result<Vec<String>>;

    /// Raw `<sha> <parent> <message>` lines for every single-parent commit
    /// in the range touching at least one of `paths`
    fn ordinary_commit_lines(
        &self,
        lower: &CommitRef,
        upper: &CommitRef,
        paths: &[String],
    ) -> Result<Vec<String>>;
}

impl GitRepo {
    fn range_walk(&self, lower: &CommitRef, upper: &CommitRef) -> Result<git2::Revwalk<'_>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(Oid::from_str(upper.as_str())?)?;
        revwalk.hide(Oid::from_str(lower.as_str())?)?;
        Ok(revwalk)
    }

    /// Whether a single-parent commit changes anything under the given paths.
    /// An empty path set means no filter.
    fn touches_paths(&self, commit: &git2::Commit<'_>, paths: &[String]) -> Result<bool> {
        if paths.is_empty() {
            return Ok(true);
        }

        let tree = commit.tree()?;
        let parent_tree = commit.parent(0)?.tree()?;

        let mut opts = DiffOptions::new();
        for path in paths {
            opts.pathspec(path);
        }

        let diff =
            self.repo
                .diff_tree_to_tree(Some(&parent_tree), Some(&tree), Some(&mut opts))?;
        Ok(diff.deltas().len() > 0)
    }
}

impl RepoQuery for GitRepo {
    #[instrument(skip(self), fields(label))]
    fn resolve_object(&self, label: &str) -> Result<CommitRef> {
        let object = self
            .repo
            .revparse_single(label)
            .map_err(|_| GitError::InvalidReference(label.to_string()))?;
        // Annotated tags peel to the commit they ultimately point to
        let commit = object
            .peel(git2::ObjectType::Commit)
            .map_err(|_| GitError::InvalidReference(label.to_string()))?;

        debug!(label, commit = %commit.id(), "resolved object");
        Ok(CommitRef::from_oid(commit.id()))
    }

    #[instrument(skip(self), fields(lower = lower.short(), upper = upper.short()))]
    fn commits_in_range(&self, lower: &CommitRef, upper: &CommitRef) -> Result<Vec<CommitRef>> {
        let mut commits = Vec::new();

        for oid in self.range_walk(lower, upper)? {
            commits.push(CommitRef::from_oid(oid?));
        }

        debug!(count = commits.len(), "listed commits in range");
        Ok(commits)
    }

    #[instrument(skip(self))]
    fn tag_targets(&self) -> Result<HashSet<CommitRef>> {
        let mut targets = HashSet::new();

        self.repo.tag_foreach(|oid, _name| {
            if let Ok(tag) = self.repo.find_tag(oid) {
                // Annotated tag: dereference to the commit it points to
                if let Ok(object) = tag.peel() {
                    if let Some(commit) = object.as_commit() {
                        targets.insert(CommitRef::from_oid(commit.id()));
                    }
                }
            } else if self.repo.find_commit(oid).is_ok() {
                // Lightweight tag directly on a commit
                targets.insert(CommitRef::from_oid(oid));
            }

            true
        })?;

        debug!(count = targets.len(), "collected tag targets");
        Ok(targets)
    }

    #[instrument(skip(self), fields(lower = lower.short(), upper = upper.short()))]
    fn merge_commit_lines(&self, lower: &CommitRef, upper: &CommitRef) -> Result<Vec<String>> {
        let mut lines = Vec::new();

        for oid in self.range_walk(lower, upper)? {
            let commit = self.repo.find_commit(oid?)?;
            if commit.parent_count() != 2 {
                continue;
            }

            lines.push(format!(
                "{} {} {} {}",
                commit.id(),
                commit.parent_id(0)?,
                commit.parent_id(1)?,
                commit
                    .summary()
                    .filter(|s| !s.is_empty())
                    .unwrap_or("(no message)")
            ));
        }

        debug!(count = lines.len(), "listed merge commits");
        Ok(lines)
    }

    #[instrument(skip(self, paths), fields(lower = lower.short(), upper = upper.short()))]
    fn ordinary_commit_lines(
        &self,
        lower: &CommitRef,
        upper: &CommitRef,
        paths: &[String],
    ) -> Result<Vec<String>> {
        let mut lines = Vec::new();

        for oid in self.range_walk(lower, upper)? {
            let commit = self.repo.find_commit(oid?)?;
            if commit.parent_count() != 1 {
                continue;
            }
            if !self.touches_paths(&commit, paths)? {
                continue;
            }

            // An empty or non-UTF-8 message is valid git input; a
            // placeholder keeps the line parseable downstream
            lines.push(format!(
                "{} {} {}",
                commit.id(),
                commit.parent_id(0)?,
                commit
                    .summary()
                    .filter(|s| !s.is_empty())
                    .unwrap_or("(no message)")
            ));
        }

        debug!(count = lines.len(), "listed ordinary commits");
        Ok(lines)
    }
}
