//! Relnotes Git - read-only git queries for changelog drafting
//!
//! This crate wraps a git repository and exposes the handful of read-only
//! queries the changelog engine consumes: object resolution, ranged history
//! walks, tag targets, and raw merge/ordinary commit listings.

mod query;
mod remote;
mod repository;
mod tags;
pub mod types;

pub use query::RepoQuery;
pub use repository::{GitRepo, Result};
pub use types::{CommitRef, TagInfo};
