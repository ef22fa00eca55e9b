//! Remote URL discovery
//!
//! The footer links need a project URL. When the config does not pin one,
//! it is derived from the origin remote.

use tracing::debug;

use crate::repository::GitRepo;

impl GitRepo {
    /// Origin remote URL normalized to an https project URL, if configured
    pub fn origin_url(&self) -> Option<String> {
        let remote = self.repo.find_remote("origin").ok()?;
        let url = remote.url()?;
        let normalized = normalize_remote_url(url);
        debug!(url, %normalized, "resolved origin url");
        Some(normalized)
    }
}

/// Rewrite common git remote URL forms to a browsable https URL
fn normalize_remote_url(url: &str) -> String {
    let url = url.strip_suffix(".git").unwrap_or(url);

    // git@host:org/repo
    if let Some(rest) = url.strip_prefix("git@") {
        if let Some((host, path)) = rest.split_once(':') {
            return format!("https://{host}/{path}");
        }
    }

    // ssh://git@host/org/repo
    if let Some(rest) = url.strip_prefix("ssh://git@") {
        return format!("https://{rest}");
    }

    url.to_string()
}
