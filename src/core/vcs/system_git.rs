//! System git backend
//!
//! Every git operation shells out to the system binary with an isolated
//! environment. The release tool owns two working trees for its whole run
//! (the project and the website checkout nested inside it); each gets its
//! own `SystemGit` handle anchored at its top level.

use crate::core::error::{GitError, ReleaseError, ReleaseResult, ResultExt};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Git backend using system git (zero crate dependencies)
#[derive(Debug)]
pub struct SystemGit {
  /// Working tree root
  work_tree: PathBuf,
}

impl SystemGit {
  /// Open a git repository, resolving the working tree top level
  ///
  /// This performs ONE subprocess call to get the repository metadata.
  pub fn open(path: &Path) -> ReleaseResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(ReleaseError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(ReleaseError::message(format!("Failed to open git repository: {}", stderr)));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let work_tree = stdout.trim();

    Ok(Self {
      work_tree: PathBuf::from(work_tree),
    })
  }

  /// Working tree top level
  pub fn work_tree(&self) -> &Path {
    &self.work_tree
  }

  /// True when the working tree has no uncommitted or untracked changes
  pub fn is_clean(&self) -> ReleaseResult<bool> {
    let stdout = self.run(&["status", "--porcelain"])?;
    Ok(stdout.trim().is_empty())
  }

  /// Resolve a ref (branch, tag, HEAD) to its commit SHA
  pub fn get_ref(&self, reference: &str) -> ReleaseResult<String> {
    let stdout = self.run(&["rev-parse", "--verify", reference])?;
    Ok(stdout.trim().to_string())
  }

  /// True when a tag of that exact name exists
  pub fn tag_exists(&self, name: &str) -> ReleaseResult<bool> {
    let stdout = self.run(&["tag", "--list", name])?;
    Ok(!stdout.trim().is_empty())
  }

  /// Run a git command in the working tree, capturing stdout
  ///
  /// A non-zero exit becomes `GitError::CommandFailed` with the captured
  /// stderr attached.
  pub(crate) fn run(&self, args: &[&str]) -> ReleaseResult<String> {
    let output = self
      .git_cmd()
      .args(args)
      .output()
      .with_context(|| format!("Failed to execute git {}", args.join(" ")))?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(ReleaseError::Git(GitError::CommandFailed {
        command: format!("git {}", args.join(" ")),
        stderr: stderr.to_string(),
      }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to the working tree
  /// - Clears environment variables
  /// - Whitelists only PATH and HOME
  /// - Adds safe configuration overrides
  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.work_tree);

    // Isolated environment (don't trust global config)
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    // Force safe behavior (override user config)
    cmd.arg("-c").arg("protocol.version=2");
    cmd.arg("-c").arg("advice.detachedHead=false");
    cmd.arg("-c").arg("core.quotePath=false"); // Don't escape non-ASCII

    cmd
  }
}
