pub mod system_git;
mod system_git_ops;

pub use system_git::SystemGit;

/// One author entry from the version-control shortlog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorInfo {
  pub name: String,
  pub commits: u32,
}
