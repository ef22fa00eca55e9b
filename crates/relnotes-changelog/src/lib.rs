//! Relnotes Changelog - drafts a release changelog from commit history
//!
//! Given the commit range between a prior release tag and HEAD, this crate
//! classifies every commit, resolves pull-request merges into linkable
//! references, suppresses commits already represented by a merge, and
//! renders Markdown bullets plus a sorted, deduplicated reference footer.

pub mod classify;
pub mod dedup;
pub mod generator;
pub mod index;
pub mod render;
pub mod types;

#[cfg(test)]
pub(crate) mod testutil;

pub use classify::{parse_merge_message, Classifier, MergeMessage};
pub use dedup::{FooterSet, SeenSet};
pub use generator::NotesGenerator;
pub use index::CommitIndex;
pub use render::ChangelogDraft;
pub use types::{MergeRecord, OrdinaryRecord, PrReference};
