//! Configuration loading
//!
//! Configuration lives in a `relnotes.toml` found in the working directory
//! or any of its parents; every field has a default so the tool runs
//! unconfigured in a plain repository.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, Result};

/// Name of the configuration file searched for in parent directories
pub const CONFIG_FILE_NAME: &str = "relnotes.toml";

/// Relnotes configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project URL used to build PR reference links (e.g.
    /// "https://github.com/org/repo"). When absent, derived from the
    /// origin remote.
    pub project_url: Option<String>,

    /// Branch releases are cut from; a warning is printed when the
    /// active branch differs
    pub release_branch: String,

    /// Regex pattern restricting which tags count as release tags when
    /// defaulting the lower range bound
    pub tag_pattern: Option<String>,

    /// Paths whose changes are considered changelog-worthy
    pub meaningful_paths: Vec<String>,

    /// Users who are never credited for their own merged PRs
    pub maintainers: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_url: None,
            release_branch: "main".to_string(),
            tag_pattern: None,
            meaningful_paths: vec!["src".to_string()],
            maintainers: Vec::new(),
        }
    }
}

impl Config {
    /// Check whether a user handle belongs to a configured maintainer
    pub fn is_maintainer(&self, user: &str) -> bool {
        self.maintainers.iter().any(|m| m == user)
    }
}

/// Load configuration from a file
pub fn load_config(path: &Path) -> Result<Config> {
    info!(path = %path.display(), "loading config");

    let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: Config = toml::from_str(&content).map_err(ConfigError::TomlError)?;

    debug!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Find the configuration file in a directory or its parents.
///
/// The first match wins; parents are walked until the filesystem root.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    debug!(start_dir = %start_dir.display(), "searching for config file");
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            info!(path = %config_path.display(), "found config file");
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    debug!("no config file found");
    None
}

/// Load configuration or use defaults
pub fn load_config_or_default(dir: &Path) -> (Config, Option<PathBuf>) {
    match find_config(dir) {
        Some(path) => match load_config(&path) {
            Ok(config) => (config, Some(path)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
                (Config::default(), None)
            }
        },
        None => {
            debug!(dir = %dir.display(), "no config found, using defaults");
            (Config::default(), None)
        }
    }
}
