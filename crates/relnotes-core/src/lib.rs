//! Relnotes Core - shared foundation for the relnotes changelog drafter
//!
//! This crate provides the error taxonomy and configuration handling shared
//! by the git query layer, the changelog engine, and the CLI.

pub mod config;
pub mod error;

pub use config::{load_config_or_default, Config};
pub use error::{ChangelogError, ConfigError, GitError, RelnotesError, Result};
