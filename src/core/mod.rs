//! Core building blocks for offlineimap-release
//!
//! - **config**: release.toml parsing with all-defaults fallback
//! - **error**: error types with contextual help messages and exit codes
//! - **vcs**: git operations abstraction (SystemGit)

pub mod config;
pub mod error;
pub mod vcs;
