//! Tag listing and release-tag selection

use regex::Regex;
use semver::Version;
use tracing::{debug, instrument};

use relnotes_core::error::GitError;

use crate::repository::{GitRepo, Result};
use crate::types::{CommitRef, TagInfo};

impl GitRepo {
    /// Get all tags
    #[instrument(skip(self))]
    pub fn tags(&self) -> Result<Vec<TagInfo>> {
        let mut tags = Vec::new();

        self.repo.tag_foreach(|oid, name| {
            let name = String::from_utf8_lossy(name)
                .trim_start_matches("refs/tags/")
                .to_string();

            if let Ok(tag) = self.repo.find_tag(oid) {
                // Annotated tag: dereference to its target commit
                if let Ok(object) = tag.peel() {
                    if let Some(commit) = object.as_commit() {
                        tags.push(TagInfo::new(&name, CommitRef::from_oid(commit.id())));
                    }
                }
            } else if self.repo.find_commit(oid).is_ok() {
                tags.push(TagInfo::new(&name, CommitRef::from_oid(oid)));
            }

            true
        })?;

        debug!(count = tags.len(), "listed all tags");
        Ok(tags)
    }

    /// Get tags matching a pattern
    pub fn tags_matching(&self, pattern: &str) -> Result<Vec<TagInfo>> {
        let regex = Regex::new(pattern).map_err(|e| GitError::NoTags(format!(": {e}")))?;

        let all_tags = self.tags()?;
        let matching: Vec<_> = all_tags
            .into_iter()
            .filter(|t| regex.is_match(&t.name))
            .collect();

        Ok(matching)
    }

    /// Find the latest release tag by semantic version
    #[instrument(skip(self), fields(pattern))]
    pub fn find_latest_tag(&self, pattern: Option<&str>) -> Result<Option<TagInfo>> {
        let tags = match pattern {
            Some(p) => self.tags_matching(p)?,
            None => self.tags()?,
        };

        // Filter to tags with valid versions and sort by version
        let mut versioned_tags: Vec<_> = tags
            .into_iter()
            .filter_map(|t| {
                t.version
                    .as_ref()
                    .and_then(|v| Version::parse(v).ok())
                    .map(|v| (t, v))
            })
            .collect();

        versioned_tags.sort_by(|a, b| b.1.cmp(&a.1));

        let result = versioned_tags.into_iter().next().map(|(t, _)| t);
        debug!(latest = ?result.as_ref().map(|t| &t.name), "found latest tag");
        Ok(result)
    }
}
