//! Changelog generation

use tracing::{debug, info, instrument};

use relnotes_core::{Config, Result};
use relnotes_git::RepoQuery;

use crate::classify::Classifier;
use crate::index::CommitIndex;
use crate::render::ChangelogDraft;

/// Drafts a changelog for the range between a release marker and HEAD
pub struct NotesGenerator {
    config: Config,
    project_url: String,
}

impl NotesGenerator {
    /// Create a generator with a resolved project URL for footer links
    pub fn new(config: Config, project_url: impl Into<String>) -> Self {
        Self {
            config,
            project_url: project_url.into(),
        }
    }

    /// Draft the changelog for commits after `release_label` up to
    /// `upper_label` (HEAD when not given). `next_label` only appears in
    /// the rendered header.
    #[instrument(skip(self, query), fields(release_label, next_label))]
    pub fn generate<Q: RepoQuery + ?Sized>(
        &self,
        query: &Q,
        release_label: &str,
        upper_label: Option<&str>,
        next_label: &str,
    ) -> Result<ChangelogDraft> {
        let lower = query.resolve_object(release_label)?;
        let upper = query.resolve_object(upper_label.unwrap_or("HEAD"))?;
        debug!(lower = %lower, upper = %upper, "resolved range bounds");

        let index = CommitIndex::build(query, &lower, &upper, &self.config.meaningful_paths)?;
        let (lines, footer) = Classifier::new(&index, &self.config, &self.project_url).run();

        info!(
            lines = lines.len(),
            footer = footer.len(),
            "changelog drafted"
        );

        Ok(ChangelogDraft {
            label: next_label.to_string(),
            lines,
            footer,
        })
    }
}
