//! Changelog rendering
//!
//! Assembles the header block, the bullet lines in traversal order, and the
//! sorted footer into the final Markdown text. Release date and statistics
//! are deliberately left as placeholders for the release manager to fill in.

use serde::Serialize;

/// A drafted changelog: header label, body bullets, footer link definitions
#[derive(Debug, Clone, Serialize)]
pub struct ChangelogDraft {
    /// Label of the upcoming release, used only in the header
    pub label: String,
    /// Bullet lines in traversal order
    pub lines: Vec<String>,
    /// Reference-link definitions, sorted and deduplicated
    pub footer: Vec<String>,
}

impl ChangelogDraft {
    /// Render the full Markdown document
    pub fn render(&self) -> String {
        let mut parts = vec![render_header(&self.label)];

        if !self.lines.is_empty() {
            parts.push(self.lines.join("\n"));
        }
        if !self.footer.is_empty() {
            parts.push(self.footer.join("\n"));
        }

        parts.join("\n\n")
    }
}

/// Static header block with manually-filled placeholder statistics
fn render_header(label: &str) -> String {
    format!(
        "## {label}\n\
         \n\
         Release date: TBD\n\
         \n\
         - Contributors: TBD\n\
         - New packages: TBD"
    )
}
