//! End-to-end release workflow runs in temporary repositories

use crate::helpers::{git, ScriptedPrompter, TestRepo};
use offlineimap_release::core::config::ReleaseConfig;
use offlineimap_release::core::vcs::SystemGit;
use offlineimap_release::release::state::ReleaseState;
use offlineimap_release::release::testers::TesterRoster;
use offlineimap_release::release::workflow;

fn bump_version_edit(version: &'static str) -> impl FnMut(&std::path::Path) -> anyhow::Result<()> {
  move |path| {
    let content = std::fs::read_to_string(path)?;
    std::fs::write(path, content.replace("7.2.0", version))?;
    Ok(())
  }
}

#[test]
fn test_release_end_to_end_from_7_2_0_to_7_3_0() {
  let repo = TestRepo::new().unwrap();
  let repo_git = SystemGit::open(&repo.path).unwrap();
  let config = ReleaseConfig::load(&repo.path).unwrap();

  // One acknowledged tester goes into excerpt and commit message
  std::fs::create_dir_all(repo.cache_dir()).unwrap();
  let mut roster = TesterRoster::load(repo.cache_dir().join("testers.json")).unwrap();
  roster.add("Jane Doe", "jane@example.com").unwrap();
  roster.mark_ok("jane@example.com").unwrap();
  roster.save().unwrap();

  // intent: yes; website uploads: no; website api: no
  let mut prompter = ScriptedPrompter::new(vec![true, false, false])
    .on_next_edit(bump_version_edit("7.3.0"))
    .on_next_edit(|_excerpt| Ok(()));

  workflow::run(&config, &repo_git, &mut prompter).unwrap();

  // Exactly one operator-review pause; both website prompts were declined
  assert_eq!(prompter.pauses, 1);

  // Version check passed and the release landed on both branches
  assert!(repo.has_tag("v7.3.0").unwrap());
  assert_eq!(repo.rev_parse("master").unwrap(), repo.rev_parse("next").unwrap());

  let message = repo.commit_message("next").unwrap();
  assert!(message.starts_with("v7.3.0"));
  assert!(message.contains("Tested-by: Jane Doe jane@example.com"));

  // Changelog gained the new block above the previous release
  let merged = repo.read_file("Changelog.md").unwrap();
  assert!(merged.contains("### OfflineIMAP v7.3.0 ("));
  assert!(merged.contains("- Jane Doe"));
  assert!(merged.lines().all(|l| l == l.trim_end()));

  // Announcement draft is ready for git send-email
  let announce = std::fs::read_to_string(repo.cache_dir().join("announce.txt")).unwrap();
  assert!(announce.contains("Subject: [ANNOUNCE] OfflineIMAP v7.3.0 released"));
  assert!(announce.contains("archive/v7.3.0.tar.gz"));

  // Website descriptor rewritten even though both interactive steps were skipped
  let latest = repo.read_file("website/_data/latest.yml").unwrap();
  assert!(latest.contains("stable: v7.3.0"));

  // Post-run cleanup: roster back to pending, excerpt rotated for reuse
  let roster = TesterRoster::load(repo.cache_dir().join("testers.json")).unwrap();
  assert!(roster.ok_testers().is_empty());
  assert_eq!(roster.all().len(), 1);
  assert!(!repo.cache_dir().join("changelog.excerpt.md").exists());
  assert!(repo.cache_dir().join("changelog.excerpt.md.old").exists());
}

#[test]
fn test_unchanged_version_stops_before_any_excerpt_exists() {
  let repo = TestRepo::new().unwrap();
  let repo_git = SystemGit::open(&repo.path).unwrap();
  let config = ReleaseConfig::load(&repo.path).unwrap();

  // intent: yes; the operator saves the version file without changing it
  let mut prompter = ScriptedPrompter::new(vec![true]).on_next_edit(|_version_file| Ok(()));

  let err = workflow::run(&config, &repo_git, &mut prompter).unwrap_err();
  assert_eq!(err.exit_code().as_i32(), 1);

  assert!(!repo.cache_dir().join("changelog.excerpt.md").exists());
  let tags = git(&repo.path, &["tag", "--list"]).unwrap();
  assert_eq!(String::from_utf8_lossy(&tags.stdout).trim(), "v7.2.0");
  let changelog = repo.read_file("Changelog.md").unwrap();
  assert!(!changelog.contains("This release was tested by:"));
}

#[test]
fn test_dirty_work_tree_aborts_immediately() {
  let repo = TestRepo::new().unwrap();
  let repo_git = SystemGit::open(&repo.path).unwrap();
  let config = ReleaseConfig::load(&repo.path).unwrap();
  std::fs::write(repo.path.join("README.md"), "# uncommitted\n").unwrap();

  let mut prompter = ScriptedPrompter::new(vec![]);
  let err = workflow::run(&config, &repo_git, &mut prompter).unwrap_err();

  assert_eq!(err.exit_code().as_i32(), 1);
  assert!(err.to_string().contains("not clean"));
}

#[test]
fn test_restore_without_recorded_state_is_a_noop() {
  let repo = TestRepo::new().unwrap();
  let repo_git = SystemGit::open(&repo.path).unwrap();
  let head_before = repo.rev_parse("HEAD").unwrap();

  let state = ReleaseState::new();
  state.restore(&repo_git, &repo.website_path());

  assert_eq!(repo.rev_parse("HEAD").unwrap(), head_before);
  assert!(repo_git.is_clean().unwrap());
}

#[test]
fn test_state_save_records_branch_and_website_refs() {
  let repo = TestRepo::new().unwrap();
  let repo_git = SystemGit::open(&repo.path).unwrap();
  let website_git = SystemGit::open(&repo.website_path()).unwrap();

  let mut state = ReleaseState::new();
  assert!(state.created_tag().is_none());
  assert!(state.saved_website().is_none());

  state.save(&repo_git, "master", "next").unwrap();
  state.save_website(&website_git).unwrap();

  assert_eq!(state.saved_master(), Some(repo.rev_parse("master").unwrap().as_str()));
  assert_eq!(state.saved_next(), Some(repo.rev_parse("next").unwrap().as_str()));
  assert!(state.saved_website().is_some());
}

#[test]
fn test_failed_fast_forward_rolls_back_the_tag() {
  let repo = TestRepo::new().unwrap();

  // Diverge master so the stable branch cannot fast-forward
  std::fs::write(repo.path.join("hotfix.txt"), "hotfix\n").unwrap();
  git(&repo.path, &["add", "hotfix.txt"]).unwrap();
  git(&repo.path, &["commit", "-m", "hotfix on master"]).unwrap();

  let repo_git = SystemGit::open(&repo.path).unwrap();
  let config = ReleaseConfig::load(&repo.path).unwrap();

  let mut prompter = ScriptedPrompter::new(vec![true])
    .on_next_edit(bump_version_edit("7.3.0"))
    .on_next_edit(|_excerpt| Ok(()));

  let err = workflow::run(&config, &repo_git, &mut prompter).unwrap_err();
  assert_eq!(err.exit_code().as_i32(), 2);

  // Rollback deleted the tag; the release commit on next is kept (best effort)
  assert!(!repo.has_tag("v7.3.0").unwrap());
  assert!(repo.commit_message("next").unwrap().starts_with("v7.3.0"));
  assert!(repo.read_file("Changelog.md").unwrap().contains("# Changelog"));
}

#[test]
fn test_previous_excerpt_reuse_skips_regeneration() {
  let repo = TestRepo::new().unwrap();
  let repo_git = SystemGit::open(&repo.path).unwrap();
  let config = ReleaseConfig::load(&repo.path).unwrap();

  std::fs::create_dir_all(repo.cache_dir()).unwrap();
  let leftover = "### OfflineIMAP v7.3.0 (2024-01-01)\n\n#### Fixes\n\n- carefully curated entry\n";
  std::fs::write(repo.cache_dir().join("changelog.excerpt.md.old"), leftover).unwrap();

  // intent: yes; reuse previous excerpt: yes; website steps: no, no
  let mut prompter = ScriptedPrompter::new(vec![true, true, false, false])
    .on_next_edit(bump_version_edit("7.3.0"))
    .on_next_edit(|_excerpt| Ok(()));

  workflow::run(&config, &repo_git, &mut prompter).unwrap();

  // The curated content survived byte-for-byte; no template was rendered
  let merged = repo.read_file("Changelog.md").unwrap();
  assert!(merged.contains("- carefully curated entry"));
  assert!(!merged.contains("This release was tested by:"));
}
