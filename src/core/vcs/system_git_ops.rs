//! Release operations for SystemGit (branching, tagging, history listings)

use super::system_git::SystemGit;
use super::AuthorInfo;
use crate::core::error::{GitError, ReleaseError, ReleaseResult};

impl SystemGit {
  /// Checkout an existing branch or ref
  pub fn checkout(&self, reference: &str) -> ReleaseResult<()> {
    self.run(&["checkout", reference])?;
    Ok(())
  }

  /// Create (or reset) a branch and switch to it
  pub fn checkout_new(&self, branch: &str) -> ReleaseResult<()> {
    self.run(&["checkout", "-B", branch])?;
    Ok(())
  }

  /// Discard uncommitted changes in the working tree
  pub fn checkout_force(&self) -> ReleaseResult<()> {
    self.run(&["checkout", "-f"])?;
    Ok(())
  }

  /// Stage a path
  pub fn add(&self, path: &str) -> ReleaseResult<()> {
    self.run(&["add", path])?;
    Ok(())
  }

  /// Commit the staged changes
  pub fn commit(&self, message: &str) -> ReleaseResult<()> {
    self.run(&["commit", "-m", message])?;
    Ok(())
  }

  /// Create an annotated tag at HEAD
  pub fn tag(&self, name: &str) -> ReleaseResult<()> {
    self.run(&["tag", "-a", name, "-m", name])?;
    Ok(())
  }

  /// Delete a tag
  pub fn delete_tag(&self, name: &str) -> ReleaseResult<()> {
    self.run(&["tag", "-d", name])?;
    Ok(())
  }

  /// Fast-forward-only merge of a branch into the current branch
  ///
  /// A merge commit is never created; a rejected fast-forward is a
  /// dedicated error so the workflow fails loudly.
  pub fn merge_ff(&self, branch: &str) -> ReleaseResult<()> {
    match self.run(&["merge", "--ff-only", branch]) {
      Ok(_) => Ok(()),
      Err(ReleaseError::Git(GitError::CommandFailed { stderr, .. })) => {
        Err(ReleaseError::Git(GitError::NotFastForward {
          branch: branch.to_string(),
          stderr,
        }))
      }
      Err(other) => Err(other),
    }
  }

  /// Stash uncommitted work under a fixed message
  pub fn stash(&self, message: &str) -> ReleaseResult<()> {
    self.run(&["stash", "push", "-m", message])?;
    Ok(())
  }

  /// Authors with commit counts since a ref, one record per output line
  ///
  /// Parses `git shortlog -sn` lines of the form `    12\tJane Doe`.
  pub fn authors_since(&self, reference: &str) -> ReleaseResult<Vec<AuthorInfo>> {
    let range = format!("{}..HEAD", reference);
    let stdout = self.run(&["shortlog", "-sn", "--no-merges", &range])?;

    let mut authors = Vec::new();
    for line in stdout.lines() {
      let mut parts = line.trim().splitn(2, '\t');
      let count = parts.next().and_then(|c| c.trim().parse::<u32>().ok());
      let name = parts.next().map(str::trim);
      if let (Some(commits), Some(name)) = (count, name) {
        authors.push(AuthorInfo {
          name: name.to_string(),
          commits,
        });
      }
    }

    Ok(authors)
  }

  /// Oneline commit listing since a ref, oldest last (git log order)
  pub fn commits_since(&self, reference: &str) -> ReleaseResult<Vec<String>> {
    let range = format!("{}..HEAD", reference);
    let stdout = self.run(&["log", "--oneline", "--no-merges", &range])?;

    Ok(
      stdout
        .lines()
        .map(|s| s.trim_end().to_string())
        .filter(|s| !s.is_empty())
        .collect(),
    )
  }
}
