//! Commit classification and PR resolution
//!
//! A single sequential pass over the ordered range, newest first. Each
//! commit is either skipped (tag marker, already represented, or outside
//! both tables), emitted as an indented ordinary bullet, or resolved as a
//! merge into a PR bullet, a plain passthrough bullet, or nothing.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use relnotes_core::Config;
use relnotes_git::CommitRef;

use crate::dedup::{FooterSet, SeenSet};
use crate::index::CommitIndex;
use crate::types::{MergeRecord, PrReference};

/// Recognizes "Merge pull request #N from user/branch" at the start of a
/// message. The username segment may contain neither whitespace nor a
/// slash; the branch segment is any run of non-whitespace.
static PR_MERGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Merge pull request #(?P<number>\d+) from (?P<user>[^/\s]+)/\S+")
        .expect("Invalid regex")
});

/// Result of parsing a merge commit message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeMessage {
    /// A recognizable pull-request merge
    PullRequest { number: String, user: String },
    /// Any other merge; not an error, handled via plain passthrough
    Plain,
}

/// Parse a merge commit message into a tagged result
pub fn parse_merge_message(message: &str) -> MergeMessage {
    match PR_MERGE_REGEX.captures(message) {
        Some(caps) => MergeMessage::PullRequest {
            number: caps["number"].to_string(),
            user: caps["user"].to_string(),
        },
        None => MergeMessage::Plain,
    }
}

/// Single-pass classifier over an immutable [`CommitIndex`].
///
/// Owns the only mutable state of a run: the seen set and the footer set.
pub struct Classifier<'a> {
    index: &'a CommitIndex,
    config: &'a Config,
    project_url: &'a str,
    seen: SeenSet,
    footer: FooterSet,
}

impl<'a> Classifier<'a> {
    /// Create a classifier for one traversal
    pub fn new(index: &'a CommitIndex, config: &'a Config, project_url: &'a str) -> Self {
        Self {
            index,
            config,
            project_url,
            seen: SeenSet::new(),
            footer: FooterSet::new(),
        }
    }

    /// Walk the ordered range once, returning the bullet lines in traversal
    /// order and the sorted footer lines
    #[instrument(skip(self), fields(commits = self.index.order.len()))]
    pub fn run(mut self) -> (Vec<String>, Vec<String>) {
        let mut lines = Vec::new();

        for commit in &self.index.order {
            if let Some(line) = self.classify(commit) {
                lines.push(line);
            }
        }

        debug!(lines = lines.len(), "classification pass complete");
        (lines, self.footer.render())
    }

    fn classify(&mut self, commit: &CommitRef) -> Option<String> {
        // Tags are release markers, never changelog content
        if self.index.tags.contains(commit) {
            return None;
        }

        // Already represented via an earlier merge
        if !self.seen.try_mark(commit) {
            return None;
        }

        if let Some(record) = self.index.ordinary.get(commit) {
            return Some(format!("     - {}", record.message));
        }

        if let Some(record) = self.index.merges.get(commit) {
            return self.resolve_merge(record);
        }

        // Outside both tables: no meaningful-path changes and not a
        // two-parent merge
        None
    }

    /// Resolve a merge commit into a bullet line, or drop it.
    ///
    /// A merge whose branch parent carried no meaningful-path changes has no
    /// changelog content regardless of its message.
    fn resolve_merge(&mut self, merge: &MergeRecord) -> Option<String> {
        let branch = self.index.ordinary.get(&merge.branch_parent)?;

        match parse_merge_message(&merge.message) {
            MergeMessage::PullRequest { number, user } => {
                // The branch tip is now represented by this merge; it must
                // not also appear as a standalone bullet later in the walk.
                // First traversal occurrence wins.
                self.seen.try_mark(&merge.branch_parent);

                let pr = PrReference {
                    credited_user: (!self.config.is_maintainer(&user)).then_some(user),
                    number,
                };

                self.footer.add(format!(
                    "[#{n}]: {url}/issues/{n}",
                    n = pr.number,
                    url = self.project_url
                ));

                let mut line = format!("- [#{}][] {}", pr.number, branch.message);
                if let Some(user) = &pr.credited_user {
                    self.footer
                        .add(format!("[@{user}]: https://github.com/{user}"));
                    line.push_str(&format!(" <3 [@{user}][]"));
                }
                Some(line)
            }
            // Not a recognizable PR, but the branch did touch meaningful
            // paths: pass the merge's own message through unmodified
            MergeMessage::Plain => Some(format!("- {}", merge.message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{sha, FakeQuery};

    fn config() -> Config {
        Config {
            maintainers: vec!["maintainer".to_string()],
            ..Config::default()
        }
    }

    fn run(query: &FakeQuery, config: &Config) -> (Vec<String>, Vec<String>) {
        let index = CommitIndex::build(query, &sha(1), &sha(9), &[]).unwrap();
        Classifier::new(&index, config, "https://github.com/org/repo").run()
    }

    #[test]
    fn test_parse_merge_message() {
        assert_eq!(
            parse_merge_message("Merge pull request #42 from alice/feature-x"),
            MergeMessage::PullRequest {
                number: "42".to_string(),
                user: "alice".to_string(),
            }
        );

        for message in [
            "Merge branch 'main' into develop",
            "Merge pull request #42 from alice",
            "Merge pull request #42 from alice bob/x",
            "Revert \"Merge pull request #42 from alice/feature-x\"",
            "merge pull request #42 from alice/feature-x",
        ] {
            assert_eq!(parse_merge_message(message), MergeMessage::Plain, "{message}");
        }
    }

    #[test]
    fn test_credited_pr_merge() {
        let query = FakeQuery {
            order: vec![sha(4), sha(3)],
            merge_lines: vec![format!(
                "{} {} {} Merge pull request #42 from alice/feature-x",
                sha(4),
                sha(2),
                sha(3)
            )],
            ordinary_lines: vec![format!("{} {} Add widget", sha(3), sha(2))],
            ..FakeQuery::default()
        };

        let (lines, footer) = run(&query, &config());
        assert_eq!(lines, vec!["- [#42][] Add widget <3 [@alice][]"]);
        assert_eq!(
            footer,
            vec![
                "[#42]: https://github.com/org/repo/issues/42",
                "[@alice]: https://github.com/alice",
            ]
        );
    }

    #[test]
    fn test_maintainer_gets_no_credit() {
        let query = FakeQuery {
            order: vec![sha(4), sha(3)],
            merge_lines: vec![format!(
                "{} {} {} Merge pull request #42 from maintainer/feature-x",
                sha(4),
                sha(2),
                sha(3)
            )],
            ordinary_lines: vec![format!("{} {} Add widget", sha(3), sha(2))],
            ..FakeQuery::default()
        };

        let (lines, footer) = run(&query, &config());
        assert_eq!(lines, vec!["- [#42][] Add widget"]);
        assert_eq!(footer, vec!["[#42]: https://github.com/org/repo/issues/42"]);
    }

    #[test]
    fn test_branch_parent_not_emitted_twice() {
        // The branch tip follows the merge in traversal order and must be
        // suppressed once the merge has represented it.
        let query = FakeQuery {
            order: vec![sha(4), sha(3), sha(2)],
            merge_lines: vec![format!(
                "{} {} {} Merge pull request #7 from bob/fix",
                sha(4),
                sha(2),
                sha(3)
            )],
            ordinary_lines: vec![
                format!("{} {} Fix crash on launch", sha(3), sha(1)),
                format!("{} {} Polish layout", sha(2), sha(1)),
            ],
            ..FakeQuery::default()
        };

        let (lines, _) = run(&query, &config());
        assert_eq!(
            lines,
            vec![
                "- [#7][] Fix crash on launch <3 [@bob][]",
                "     - Polish layout",
            ]
        );
    }

    #[test]
    fn test_plain_merge_passthrough() {
        // Branch touched meaningful paths but the message is not a PR
        // pattern: the merge message passes through and the branch tip
        // still gets its own bullet.
        let query = FakeQuery {
            order: vec![sha(4), sha(3)],
            merge_lines: vec![format!(
                "{} {} {} Merge remote-tracking branch 'fork/main'",
                sha(4),
                sha(2),
                sha(3)
            )],
            ordinary_lines: vec![format!("{} {} Add widget", sha(3), sha(2))],
            ..FakeQuery::default()
        };

        let (lines, footer) = run(&query, &config());
        assert_eq!(
            lines,
            vec![
                "- Merge remote-tracking branch 'fork/main'",
                "     - Add widget",
            ]
        );
        assert!(footer.is_empty());
    }

    #[test]
    fn test_merge_without_content_is_dropped() {
        // Two-parent merge whose branch parent touched no meaningful path
        // and whose message is not a PR pattern: nothing at all.
        let query = FakeQuery {
            order: vec![sha(4)],
            merge_lines: vec![format!(
                "{} {} {} Merge branch 'housekeeping'",
                sha(4),
                sha(2),
                sha(3)
            )],
            ..FakeQuery::default()
        };

        let (lines, footer) = run(&query, &config());
        assert!(lines.is_empty());
        assert!(footer.is_empty());
    }

    #[test]
    fn test_pr_merge_without_content_is_dropped() {
        // Even a recognizable PR merge is dropped when the branch parent
        // has no ordinary record.
        let query = FakeQuery {
            order: vec![sha(4)],
            merge_lines: vec![format!(
                "{} {} {} Merge pull request #9 from carol/assets",
                sha(4),
                sha(2),
                sha(3)
            )],
            ..FakeQuery::default()
        };

        let (lines, footer) = run(&query, &config());
        assert!(lines.is_empty());
        assert!(footer.is_empty());
    }

    #[test]
    fn test_ordinary_commit_bullet() {
        let query = FakeQuery {
            order: vec![sha(3)],
            ordinary_lines: vec![format!("{} {} Fix crash on launch", sha(3), sha(2))],
            ..FakeQuery::default()
        };

        let (lines, footer) = run(&query, &config());
        assert_eq!(lines, vec!["     - Fix crash on launch"]);
        assert!(footer.is_empty());
    }

    #[test]
    fn test_tagged_commits_never_appear() {
        let query = FakeQuery {
            order: vec![sha(3)],
            tags: [sha(3)].into_iter().collect(),
            ordinary_lines: vec![format!("{} {} Fix crash on launch", sha(3), sha(2))],
            ..FakeQuery::default()
        };

        let (lines, _) = run(&query, &config());
        assert!(lines.is_empty());
    }

    #[test]
    fn test_empty_range() {
        let query = FakeQuery::default();
        let (lines, footer) = run(&query, &config());
        assert!(lines.is_empty());
        assert!(footer.is_empty());
    }

    #[test]
    fn test_footer_deduplicates_repeat_credits() {
        // Two PRs from the same user: one user-credit line, two PR lines,
        // sorted.
        let query = FakeQuery {
            order: vec![sha(6), sha(5), sha(4), sha(3)],
            merge_lines: vec![
                format!(
                    "{} {} {} Merge pull request #12 from alice/one",
                    sha(6),
                    sha(4),
                    sha(5)
                ),
                format!(
                    "{} {} {} Merge pull request #8 from alice/two",
                    sha(4),
                    sha(2),
                    sha(3)
                ),
            ],
            ordinary_lines: vec![
                format!("{} {} Add first", sha(5), sha(4)),
                format!("{} {} Add second", sha(3), sha(2)),
            ],
            ..FakeQuery::default()
        };

        let (lines, footer) = run(&query, &config());
        assert_eq!(lines.len(), 2);
        assert_eq!(
            footer,
            vec![
                "[#12]: https://github.com/org/repo/issues/12",
                "[#8]: https://github.com/org/repo/issues/8",
                "[@alice]: https://github.com/alice",
            ]
        );
    }
}
