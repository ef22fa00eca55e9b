//! Changelog types

use serde::{Deserialize, Serialize};

use relnotes_git::CommitRef;

/// A two-parent merge commit inside the traversed range.
///
/// Merges are indexed without any path restriction; whether they carry
/// changelog content is decided during classification by looking at the
/// branch parent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeRecord {
    /// First parent: the mainline tip the branch was merged into
    pub trunk_parent: CommitRef,
    /// Second parent: the tip of the merged branch
    pub branch_parent: CommitRef,
    /// First line of the merge commit message
    pub message: String,
}

/// A single-parent commit inside the range touching a meaningful path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdinaryRecord {
    /// The commit's single parent
    pub parent: CommitRef,
    /// First line of the commit message
    pub message: String,
}

/// A pull-request reference derived from a recognized merge message.
///
/// `credited_user` is `None` when the submitter is a configured maintainer:
/// maintainers are not credited for their own merges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrReference {
    /// PR number as a string of digits
    pub number: String,
    /// Submitting user to thank, unless a maintainer
    pub credited_user: Option<String>,
}
