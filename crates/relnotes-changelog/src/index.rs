//! Commit index over the traversed range
//!
//! Built once per run from the query layer and read-only afterward. Merge
//! detection is not path-filtered (a path-filtered walk can silently drop a
//! relevant merge); ordinary commits are restricted to the configured
//! meaningful paths. The two tables are reconciled during classification.

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument};

use relnotes_core::error::ChangelogError;
use relnotes_core::Result;
use relnotes_git::{CommitRef, RepoQuery};

use crate::types::{MergeRecord, OrdinaryRecord};

const MERGE_SHAPE: &str = "<sha> <parent1> <parent2> <message>";
const ORDINARY_SHAPE: &str = "<sha> <parent> <message>";

/// Lookup structures over a commit range
#[derive(Debug)]
pub struct CommitIndex {
    /// Range commits, newest first, in topological order
    pub order: Vec<CommitRef>,
    /// Commits pointed to by tags, over the entire history
    pub tags: HashSet<CommitRef>,
    /// Two-parent merge commits in the range
    pub merges: HashMap<CommitRef, MergeRecord>,
    /// Single-parent commits in the range touching a meaningful path
    pub ordinary: HashMap<CommitRef, OrdinaryRecord>,
}

impl CommitIndex {
    /// Build the index for the range `lower..upper` from the query layer.
    ///
    /// Any raw line not matching its expected shape aborts the build: a
    /// silently dropped line would mean a silently incomplete changelog.
    #[instrument(skip(query, paths), fields(lower = lower.short(), upper = upper.short()))]
    pub fn build<Q: RepoQuery + ?Sized>(
        query: &Q,
        lower: &CommitRef,
        upper: &CommitRef,
        paths: &[String],
    ) -> Result<Self> {
        let order = query.commits_in_range(lower, upper)?;
        let tags = query.tag_targets()?;

        let mut merges = HashMap::new();
        for line in query.merge_commit_lines(lower, upper)? {
            let (key, record) = parse_merge_line(&line)?;
            merges.insert(key, record);
        }

        let mut ordinary = HashMap::new();
        for line in query.ordinary_commit_lines(lower, upper, paths)? {
            let (key, record) = parse_ordinary_line(&line)?;
            ordinary.insert(key, record);
        }

        debug!(
            commits = order.len(),
            tags = tags.len(),
            merges = merges.len(),
            ordinary = ordinary.len(),
            "commit index built"
        );

        Ok(Self {
            order,
            tags,
            merges,
            ordinary,
        })
    }
}

fn malformed(expected: &str, line: &str) -> ChangelogError {
    ChangelogError::MalformedQueryOutput {
        expected: expected.to_string(),
        line: line.to_string(),
    }
}

/// Parse a `<sha> <parent1> <parent2> <message>` merge line
fn parse_merge_line(line: &str) -> std::result::Result<(CommitRef, MergeRecord), ChangelogError> {
    let mut parts = line.splitn(4, ' ');

    let key = parts
        .next()
        .and_then(|s| CommitRef::new(s).ok())
        .ok_or_else(|| malformed(MERGE_SHAPE, line))?;
    let trunk_parent = parts
        .next()
        .and_then(|s| CommitRef::new(s).ok())
        .ok_or_else(|| malformed(MERGE_SHAPE, line))?;
    let branch_parent = parts
        .next()
        .and_then(|s| CommitRef::new(s).ok())
        .ok_or_else(|| malformed(MERGE_SHAPE, line))?;
    let message = parts
        .next()
        .filter(|m| !m.is_empty())
        .ok_or_else(|| malformed(MERGE_SHAPE, line))?;

    Ok((
        key,
        MergeRecord {
            trunk_parent,
            branch_parent,
            message: message.to_string(),
        },
    ))
}

/// Parse a `<sha> <parent> <message>` ordinary line
fn parse_ordinary_line(
    line: &str,
) -> std::result::Result<(CommitRef, OrdinaryRecord), ChangelogError> {
    let mut parts = line.splitn(3, ' ');

    let key = parts
        .next()
        .and_then(|s| CommitRef::new(s).ok())
        .ok_or_else(|| malformed(ORDINARY_SHAPE, line))?;
    let parent = parts
        .next()
        .and_then(|s| CommitRef::new(s).ok())
        .ok_or_else(|| malformed(ORDINARY_SHAPE, line))?;
    let message = parts
        .next()
        .filter(|m| !m.is_empty())
        .ok_or_else(|| malformed(ORDINARY_SHAPE, line))?;

    Ok((
        key,
        OrdinaryRecord {
            parent,
            message: message.to_string(),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{sha, FakeQuery};
    use relnotes_core::RelnotesError;

    #[test]
    fn test_build_index() {
        let query = FakeQuery {
            order: vec![sha(4), sha(3), sha(2)],
            tags: [sha(1)].into_iter().collect(),
            merge_lines: vec![format!("{} {} {} Merge branch 'x'", sha(4), sha(3), sha(2))],
            ordinary_lines: vec![format!("{} {} Add widget", sha(2), sha(1))],
            ..FakeQuery::default()
        };

        let index = CommitIndex::build(&query, &sha(1), &sha(4), &[]).unwrap();
        assert_eq!(index.order.len(), 3);
        assert!(index.tags.contains(&sha(1)));

        let merge = &index.merges[&sha(4)];
        assert_eq!(merge.trunk_parent, sha(3));
        assert_eq!(merge.branch_parent, sha(2));
        assert_eq!(merge.message, "Merge branch 'x'");

        let ordinary = &index.ordinary[&sha(2)];
        assert_eq!(ordinary.parent, sha(1));
        assert_eq!(ordinary.message, "Add widget");
    }

    #[test]
    fn test_message_may_contain_spaces() {
        let line = format!("{} {} Fix crash on launch", sha(2), sha(1));
        let (_, record) = parse_ordinary_line(&line).unwrap();
        assert_eq!(record.message, "Fix crash on launch");
    }

    #[test]
    fn test_malformed_lines_are_fatal() {
        for line in [
            "",
            "garbage",
            &format!("{} Add widget", sha(2)),
            &format!("{} {} ", sha(2), sha(1)),
            &format!("short {} Add widget", sha(1)),
        ] {
            assert!(
                parse_ordinary_line(line).is_err(),
                "accepted ordinary line: {line:?}"
            );
        }

        // Merge lines need two parents and a non-empty message
        let missing_parent = format!("{} {} Merge branch 'x'", sha(4), sha(3));
        assert!(parse_merge_line(&missing_parent).is_err());
        let empty_message = format!("{} {} {} ", sha(4), sha(3), sha(2));
        assert!(parse_merge_line(&empty_message).is_err());
    }

    #[test]
    fn test_build_aborts_on_malformed_query_output() {
        let query = FakeQuery {
            ordinary_lines: vec!["not a commit line".to_string()],
            ..FakeQuery::default()
        };

        let err = CommitIndex::build(&query, &sha(1), &sha(4), &[]).unwrap_err();
        assert!(matches!(
            err,
            RelnotesError::Changelog(ChangelogError::MalformedQueryOutput { .. })
        ));
    }
}
