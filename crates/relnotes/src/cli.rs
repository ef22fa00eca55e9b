//! CLI definition and command handling

use std::path::PathBuf;

use clap::Parser;
use console::style;
use tracing::{info, warn};

use relnotes_changelog::NotesGenerator;
use relnotes_core::config::load_config_or_default;
use relnotes_core::error::{ConfigError, GitError};
use relnotes_git::GitRepo;

/// Draft a release changelog from the commit history between a prior
/// release tag and HEAD
#[derive(Debug, Parser)]
#[command(name = "relnotes")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Prior release marking the lower range bound; defaults to the most
    /// recent release tag
    #[arg(value_name = "RELEASE")]
    pub release_label: Option<String>,

    /// Label of the upcoming release, used only in the header
    #[arg(long, value_name = "LABEL", env = "RELNOTES_NEXT_RELEASE", default_value = "Unreleased")]
    pub next_release: String,

    /// Upper range bound
    #[arg(long, value_name = "REF")]
    pub upper: Option<String>,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,

    /// Suppress output except errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Working directory
    #[arg(short = 'C', long)]
    pub directory: Option<PathBuf>,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Rendered Markdown
    #[default]
    Text,
    /// JSON draft (label, lines, footer)
    Json,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<()> {
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }
        let cwd = std::env::current_dir()?;

        let (config, _) = load_config_or_default(&cwd);
        let repo = GitRepo::discover(&cwd)?;

        // Non-fatal: drafting from another branch is allowed but suspect
        if let Some(branch) = repo.current_branch()? {
            if branch != config.release_branch {
                warn!(%branch, expected = %config.release_branch, "not on the release branch");
                if !self.quiet {
                    eprintln!(
                        "{} drafting from branch '{}', release branch is '{}'",
                        style("warning:").yellow().bold(),
                        branch,
                        config.release_branch
                    );
                }
            }
        }

        let release_label = match self.release_label.clone() {
            Some(label) => label,
            None => {
                let tag = repo
                    .find_latest_tag(config.tag_pattern.as_deref())?
                    .ok_or_else(|| GitError::NoTags(String::new()))?;
                info!(tag = %tag.name, "defaulted release label to latest tag");
                tag.name
            }
        };

        let project_url = config
            .project_url
            .clone()
            .or_else(|| repo.origin_url())
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "project_url".to_string(),
                message: "set project_url in relnotes.toml or add an origin remote".to_string(),
            })?;

        let generator = NotesGenerator::new(config, project_url);
        let draft = generator.generate(
            &repo,
            &release_label,
            self.upper.as_deref(),
            &self.next_release,
        )?;

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&draft)?),
            OutputFormat::Text => println!("{}", draft.render()),
        }

        Ok(())
    }
}
