//! Git types

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use relnotes_core::error::GitError;

/// Regex a value must match to be accepted as a commit hash
static SHA_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-f]{40}$").expect("Invalid regex"));

/// An opaque, validated commit hash.
///
/// Construction rejects anything that is not exactly forty lowercase hex
/// characters, so a `CommitRef` can be used as a range boundary without
/// further checking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitRef(String);

impl CommitRef {
    /// Validate and wrap a commit hash string
    pub fn new(hash: impl Into<String>) -> Result<Self, GitError> {
        let hash = hash.into();
        if !SHA_REGEX.is_match(&hash) {
            return Err(GitError::InvalidReference(hash));
        }
        Ok(Self(hash))
    }

    /// Wrap a git2 object id (always a valid full hash)
    pub fn from_oid(oid: git2::Oid) -> Self {
        Self(oid.to_string())
    }

    /// The full hash as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short hash (first 7 characters)
    pub fn short(&self) -> &str {
        &self.0[..7]
    }
}

impl fmt::Display for CommitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CommitRef {
    type Err = GitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Information about a git tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagInfo {
    /// Tag name
    pub name: String,
    /// Commit the tag ultimately points to
    pub target: CommitRef,
    /// Extracted version from tag name
    pub version: Option<String>,
}

impl TagInfo {
    /// Create a new TagInfo
    pub fn new(name: impl Into<String>, target: CommitRef) -> Self {
        let name = name.into();
        let version = extract_version(&name);

        Self {
            name,
            target,
            version,
        }
    }
}

/// Extract version from a tag name
fn extract_version(tag: &str) -> Option<String> {
    // Handle common tag formats: v1.0.0, 1.0.0, package@1.0.0, package-v1.0.0
    let tag = tag.strip_prefix('v').unwrap_or(tag);

    // Check for package@version format
    if let Some(pos) = tag.rfind('@') {
        let version_part = &tag[pos + 1..];
        let version = version_part.strip_prefix('v').unwrap_or(version_part);
        if looks_like_version(version) {
            return Some(version.to_string());
        }
    }

    // Check for package-vX.Y.Z format
    if let Some(pos) = tag.rfind("-v") {
        let version = &tag[pos + 2..];
        if looks_like_version(version) {
            return Some(version.to_string());
        }
    }

    // Check if the whole thing looks like a version
    if looks_like_version(tag) {
        return Some(tag.to_string());
    }

    None
}

/// Check if a string looks like a semantic version
fn looks_like_version(s: &str) -> bool {
    let parts: Vec<&str> = s.split('.').collect();
    if parts.len() < 2 {
        return false;
    }

    // First part should be numeric
    parts[0].parse::<u64>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHA: &str = "0123456789abcdef0123456789abcdef01234567";

    #[test]
    fn test_commit_ref_accepts_full_hash() {
        let r = CommitRef::new(SHA).unwrap();
        assert_eq!(r.as_str(), SHA);
        assert_eq!(r.short(), "0123456");
    }

    #[test]
    fn test_commit_ref_rejects_bad_input() {
        assert!(CommitRef::new("").is_err());
        assert!(CommitRef::new("abc123").is_err());
        assert!(CommitRef::new(SHA.to_uppercase()).is_err());
        assert!(CommitRef::new(format!("{SHA}0")).is_err());
        assert!(CommitRef::new("zzzz456789abcdef0123456789abcdef01234567").is_err());
    }

    #[test]
    fn test_commit_ref_from_oid() {
        let oid = git2::Oid::from_str(SHA).unwrap();
        assert_eq!(CommitRef::from_oid(oid).as_str(), SHA);
    }

    #[test]
    fn test_extract_version() {
        assert_eq!(extract_version("v1.0.0"), Some("1.0.0".to_string()));
        assert_eq!(extract_version("1.0.0"), Some("1.0.0".to_string()));
        assert_eq!(extract_version("package@1.0.0"), Some("1.0.0".to_string()));
        assert_eq!(extract_version("pkg-v2.0.0"), Some("2.0.0".to_string()));
        assert_eq!(extract_version("not-a-version"), None);
    }
}
