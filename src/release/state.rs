//! Ref snapshots for best-effort rollback

use crate::core::error::ReleaseResult;
use crate::core::vcs::SystemGit;
use crate::release::best_effort;
use std::path::Path;

/// Snapshot of the refs a release attempt mutates
///
/// One instance per run. Refs are recorded as each destructive operation
/// approaches; `restore` is consumed only on failure and leaves things no
/// worse rather than guaranteeing consistency — already-merged state cannot
/// be undone.
#[derive(Debug, Default)]
pub struct ReleaseState {
  saved_master: Option<String>,
  saved_next: Option<String>,
  saved_website: Option<String>,
  created_tag: Option<String>,
}

impl ReleaseState {
  pub fn new() -> Self {
    Self::default()
  }

  /// Record the current refs of the integration branches
  pub fn save(&mut self, git: &SystemGit, master: &str, next: &str) -> ReleaseResult<()> {
    self.saved_master = Some(git.get_ref(master)?);
    self.saved_next = Some(git.get_ref(next)?);
    Ok(())
  }

  /// Record the website repository's HEAD before it is mutated
  pub fn save_website(&mut self, website_git: &SystemGit) -> ReleaseResult<()> {
    self.saved_website = Some(website_git.get_ref("HEAD")?);
    Ok(())
  }

  /// Record a tag so a failed run can delete it again
  pub fn set_tag(&mut self, tag: impl Into<String>) {
    self.created_tag = Some(tag.into());
  }

  pub fn created_tag(&self) -> Option<&str> {
    self.created_tag.as_deref()
  }

  pub fn saved_master(&self) -> Option<&str> {
    self.saved_master.as_deref()
  }

  pub fn saved_next(&self) -> Option<&str> {
    self.saved_next.as_deref()
  }

  pub fn saved_website(&self) -> Option<&str> {
    self.saved_website.as_deref()
  }

  /// Best-effort rollback; never raises
  ///
  /// Discards uncommitted changes in the main working tree, deletes the
  /// created tag if one was recorded, and checks the website repository
  /// back out to its saved ref if one was recorded. Each step is
  /// independently swallowed: a missing tag or an unreachable website
  /// checkout must not mask the original failure.
  pub fn restore(&self, git: &SystemGit, website_dir: &Path) {
    best_effort("discard uncommitted changes", git.checkout_force());

    if let Some(tag) = &self.created_tag {
      best_effort("delete release tag", git.delete_tag(tag));
    }

    if let Some(sha) = &self.saved_website {
      if let Some(website_git) = best_effort("reopen website repository", SystemGit::open(website_dir)) {
        best_effort("restore website checkout", website_git.checkout(sha));
      }
    }
  }
}
