//! Changelog excerpt lifecycle against a real checkout

use crate::helpers::TestRepo;
use offlineimap_release::core::config::ReleaseConfig;
use offlineimap_release::release::announce::Announcement;
use offlineimap_release::release::changelog::Changelog;

fn changelog_for(repo: &TestRepo) -> Changelog {
  std::fs::create_dir_all(repo.cache_dir()).unwrap();
  Changelog::new(
    &repo.cache_dir(),
    repo.path.join("Changelog.md"),
    "{:toc}".to_string(),
    "OfflineIMAP".to_string(),
  )
}

#[test]
fn test_excerpt_template_merge_and_extraction_cycle() {
  let repo = TestRepo::new().unwrap();
  let changelog = changelog_for(&repo);

  changelog
    .write_excerpt("7.3.0", "2024-01-01", "", "- Jane Doe (12)\n", "")
    .unwrap();

  // The operator fills in a fix before the merge
  let excerpt = std::fs::read_to_string(changelog.excerpt_path()).unwrap();
  let edited = excerpt.replace("#### Fixes\n\n\n", "#### Fixes\n\n- IMAP timeout handled\n\n");
  std::fs::write(changelog.excerpt_path(), edited).unwrap();

  changelog.merge().unwrap();

  let merged = repo.read_file("Changelog.md").unwrap();
  let lines: Vec<&str> = merged.lines().collect();
  let marker = lines.iter().position(|l| l.contains("{:toc}")).unwrap();
  let header = lines[marker..]
    .iter()
    .position(|l| *l == "### OfflineIMAP v7.3.0 (2024-01-01)")
    .unwrap();
  let old_header = lines
    .iter()
    .position(|l| l.contains("### OfflineIMAP v7.2.0"))
    .unwrap();
  assert!(marker + header < old_header);
  assert!(merged.contains("- Jane Doe (12)"));
  assert!(merged.contains("- IMAP timeout handled"));
  assert!(merged.lines().all(|l| l == l.trim_end()));

  // All five template sections extract, the filled one with its content
  let sections = changelog.extract_sections().unwrap();
  assert_eq!(sections.len(), 5);
  assert!(sections["Fixes"].contains("- IMAP timeout handled"));
  assert!(sections["Authors"].contains("- Jane Doe (12)"));
  assert!(sections["Notes"].contains("This release was tested by:"));
}

#[test]
fn test_sections_feed_the_announcement_draft() {
  let repo = TestRepo::new().unwrap();
  let changelog = changelog_for(&repo);
  let config = ReleaseConfig::default();

  changelog
    .write_excerpt("7.3.0", "2024-01-01", "", "- Jane Doe (12)\n", "")
    .unwrap();
  let sections = changelog.extract_sections().unwrap();

  let announce_path = repo.cache_dir().join("announce.txt");
  let mut announcement = Announcement::create(announce_path.clone(), "7.3.0".to_string()).unwrap();
  announcement
    .set_headers("<1.abc@laposte.net>", "Mon, 01 Jan 2024 10:00:00 +0000", &config.announce)
    .unwrap();
  announcement.set_content(&sections, &config.announce.signature).unwrap();
  announcement.close().unwrap();

  let content = std::fs::read_to_string(&announce_path).unwrap();
  assert!(content.contains("Subject: [ANNOUNCE] OfflineIMAP v7.3.0 released"));
  assert!(content.contains("# Authors"));
  assert!(content.contains("- Jane Doe (12)"));
  assert!(content.ends_with("-- \nNicolas Sebrecht\n"));
}

#[test]
fn test_previous_excerpt_round_trip_survives_reuse() {
  let repo = TestRepo::new().unwrap();
  let mut changelog = changelog_for(&repo);

  changelog
    .write_excerpt("7.3.0", "2024-01-01", "", "- Jane Doe (12)\n", "")
    .unwrap();
  let original = std::fs::read_to_string(changelog.excerpt_path()).unwrap();

  // An aborted run leaves the excerpt rotated aside
  changelog.rotate().unwrap();
  assert!(changelog.is_previous_available());
  assert_eq!(changelog.previous_contents().unwrap(), original);

  // The next attempt reuses it byte-for-byte
  changelog.use_previous().unwrap();
  assert!(changelog.using_previous());
  assert_eq!(std::fs::read_to_string(changelog.excerpt_path()).unwrap(), original);
}
