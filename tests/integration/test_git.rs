//! SystemGit against real temporary repositories

use crate::helpers::{git, TestRepo};
use offlineimap_release::core::error::{GitError, ReleaseError};
use offlineimap_release::core::vcs::SystemGit;

#[test]
fn test_open_resolves_top_level_from_subdirectory() {
  let repo = TestRepo::new().unwrap();
  let sub = repo.path.join("offlineimap");

  let repo_git = SystemGit::open(&sub).unwrap();
  assert_eq!(repo_git.work_tree(), repo.path.canonicalize().unwrap());
}

#[test]
fn test_open_outside_a_repository_fails() {
  let dir = tempfile::tempdir().unwrap();
  let err = SystemGit::open(dir.path()).unwrap_err();
  assert!(matches!(err, ReleaseError::Git(GitError::RepoNotFound { .. })));
}

#[test]
fn test_is_clean_tracks_working_tree_state() {
  let repo = TestRepo::new().unwrap();
  let repo_git = SystemGit::open(&repo.path).unwrap();

  assert!(repo_git.is_clean().unwrap());
  std::fs::write(repo.path.join("README.md"), "# changed\n").unwrap();
  assert!(!repo_git.is_clean().unwrap());
}

#[test]
fn test_get_ref_resolves_branches_and_head() {
  let repo = TestRepo::new().unwrap();
  let repo_git = SystemGit::open(&repo.path).unwrap();

  let head = repo_git.get_ref("HEAD").unwrap();
  let master = repo_git.get_ref("master").unwrap();
  assert_eq!(head, master);
  assert_eq!(head.len(), 40);
}

#[test]
fn test_tag_create_probe_delete() {
  let repo = TestRepo::new().unwrap();
  let repo_git = SystemGit::open(&repo.path).unwrap();

  assert!(!repo_git.tag_exists("v7.3.0").unwrap());
  repo_git.tag("v7.3.0").unwrap();
  assert!(repo_git.tag_exists("v7.3.0").unwrap());

  repo_git.delete_tag("v7.3.0").unwrap();
  assert!(!repo_git.tag_exists("v7.3.0").unwrap());
  assert!(repo_git.delete_tag("v7.3.0").is_err());
}

#[test]
fn test_merge_ff_fast_forwards_the_stable_branch() {
  let repo = TestRepo::new().unwrap();
  let repo_git = SystemGit::open(&repo.path).unwrap();

  repo_git.checkout("next").unwrap();
  std::fs::write(repo.path.join("new-file.txt"), "content\n").unwrap();
  repo_git.add("new-file.txt").unwrap();
  repo_git.commit("commit on next").unwrap();
  let next_sha = repo_git.get_ref("next").unwrap();

  repo_git.checkout("master").unwrap();
  repo_git.merge_ff("next").unwrap();
  assert_eq!(repo_git.get_ref("master").unwrap(), next_sha);
}

#[test]
fn test_merge_ff_rejects_diverged_branches() {
  let repo = TestRepo::new().unwrap();
  let repo_git = SystemGit::open(&repo.path).unwrap();

  repo_git.checkout("next").unwrap();
  std::fs::write(repo.path.join("next-file.txt"), "next\n").unwrap();
  repo_git.add("next-file.txt").unwrap();
  repo_git.commit("commit on next").unwrap();

  repo_git.checkout("master").unwrap();
  std::fs::write(repo.path.join("master-file.txt"), "master\n").unwrap();
  repo_git.add("master-file.txt").unwrap();
  repo_git.commit("commit on master").unwrap();

  let err = repo_git.merge_ff("next").unwrap_err();
  assert!(matches!(err, ReleaseError::Git(GitError::NotFastForward { .. })));
  assert!(err.help_message().unwrap().contains("never created automatically"));
}

#[test]
fn test_checkout_new_creates_or_resets_a_branch() {
  let repo = TestRepo::new().unwrap();
  let repo_git = SystemGit::open(&repo.path).unwrap();

  repo_git.checkout_new("import-v7.3.0").unwrap();
  std::fs::write(repo.path.join("staged.txt"), "staged\n").unwrap();
  repo_git.add("staged.txt").unwrap();
  repo_git.commit("branch work").unwrap();

  // Re-running lands on the same branch name, reset to the start point
  repo_git.checkout("master").unwrap();
  repo_git.checkout_new("import-v7.3.0").unwrap();
  assert_eq!(
    repo_git.get_ref("import-v7.3.0").unwrap(),
    repo_git.get_ref("master").unwrap()
  );
}

#[test]
fn test_stash_parks_uncommitted_work() {
  let repo = TestRepo::new().unwrap();
  let repo_git = SystemGit::open(&repo.path).unwrap();

  std::fs::write(repo.path.join("README.md"), "# WIP\n").unwrap();
  assert!(!repo_git.is_clean().unwrap());

  repo_git.stash("WIP during offlineimap API import").unwrap();
  assert!(repo_git.is_clean().unwrap());

  let output = git(&repo.path, &["stash", "list"]).unwrap();
  let listing = String::from_utf8_lossy(&output.stdout).to_string();
  assert!(listing.contains("WIP during offlineimap API import"));
}

#[test]
fn test_authors_since_parses_one_record_per_line() {
  let repo = TestRepo::new().unwrap();
  let repo_git = SystemGit::open(&repo.path).unwrap();

  let authors = repo_git.authors_since("v7.2.0").unwrap();
  assert_eq!(authors.len(), 1);
  assert_eq!(authors[0].name, "Test User");
  assert_eq!(authors[0].commits, 1);
}

#[test]
fn test_commits_since_lists_oneline_entries() {
  let repo = TestRepo::new().unwrap();
  let repo_git = SystemGit::open(&repo.path).unwrap();

  let commits = repo_git.commits_since("v7.2.0").unwrap();
  assert_eq!(commits.len(), 1);
  assert!(commits[0].contains("Add readme"));

  // Nothing since HEAD itself
  assert!(repo_git.commits_since("HEAD").unwrap().is_empty());
}
