//! The release orchestrator
//!
//! Sequential states, each a precondition for the next:
//! clean-check → prepare → read version → confirm intent → edit version →
//! validate changed → build-or-reuse excerpt → edit excerpt → merge
//! changelog → compose announcement → operator review → commit + tag +
//! fast-forward merge → website publishing → post-run cleanup → report.
//!
//! Any uncaught failure triggers one best-effort `ReleaseState::restore`
//! pass, then propagates to the caller.

use crate::core::config::ReleaseConfig;
use crate::core::error::{ReleaseError, ReleaseResult};
use crate::core::vcs::SystemGit;
use crate::release::announce::{self, Announcement};
use crate::release::best_effort;
use crate::release::changelog::Changelog;
use crate::release::state::ReleaseState;
use crate::release::testers::TesterRoster;
use crate::release::version::VersionFile;
use crate::release::website::{StepStatus, WebsitePublisher};
use crate::ui::prompt::Prompter;
use chrono::Local;
use std::fs;
use std::path::PathBuf;

/// Tag created for a released version
fn tag_name(version: &str) -> String {
  format!("v{}", version)
}

/// Run the whole release workflow
pub fn run(config: &ReleaseConfig, git: &SystemGit, prompter: &mut dyn Prompter) -> ReleaseResult<()> {
  let mut state = ReleaseState::new();
  let mut workflow = ReleaseWorkflow { config, git, prompter };

  let result = workflow.drive(&mut state);
  if result.is_err() {
    println!("\n⚠️  release failed; restoring saved state");
    let website_dir = git.work_tree().join(&config.website.dir);
    state.restore(git, &website_dir);
  }
  result
}

struct ReleaseWorkflow<'a> {
  config: &'a ReleaseConfig,
  git: &'a SystemGit,
  prompter: &'a mut dyn Prompter,
}

impl ReleaseWorkflow<'_> {
  fn drive(&mut self, state: &mut ReleaseState) -> ReleaseResult<()> {
    self.prepare()?;
    state.save(self.git, &self.config.branches.master, &self.config.branches.next)?;

    let version_file = VersionFile::new(self.git.work_tree().join(&self.config.project.version_file));
    let current = version_file.read()?;

    let intent = format!("going to make a new release after {}", current);
    if !self.prompter.confirm(&intent, true)? {
      return Err(ReleaseError::message("release aborted by operator"));
    }

    self.prompter.edit_file(version_file.path())?;
    let new = version_file.read()?;
    if new == current {
      return Err(ReleaseError::VersionUnchanged { version: new });
    }
    VersionFile::warn_if_not_semver(&new);

    let mut changelog = Changelog::new(
      &self.cache_dir(),
      self.git.work_tree().join(&self.config.project.changelog),
      self.config.project.changelog_magic.clone(),
      self.config.project.name.clone(),
    );
    let mut roster = TesterRoster::load(self.cache_dir().join("testers.json"))?;

    self.update_changelog(&mut changelog, &roster, &current, &new)?;
    let announce_path = self.write_announce(&changelog, &new)?;

    self.prompter.pause("review the announcement draft and the merged changelog")?;

    self.make(state, &roster, &new)?;
    let website_branch = self.update_website(state, &new)?;

    self.after(&mut roster, &changelog);
    self.report(&announce_path, &new, website_branch.as_deref());
    Ok(())
  }

  fn cache_dir(&self) -> PathBuf {
    self.config.cache_dir_in(self.git.work_tree())
  }

  /// Clean check, cache dir, checkout of the integration branch
  fn prepare(&mut self) -> ReleaseResult<()> {
    if !self.git.is_clean()? {
      return Err(ReleaseError::DirtyWorkTree);
    }
    fs::create_dir_all(self.cache_dir())?;
    self.git.checkout(&self.config.branches.next)?;
    Ok(())
  }

  /// Build or reuse the excerpt, let the operator edit it, merge it
  fn update_changelog(
    &mut self,
    changelog: &mut Changelog,
    roster: &TesterRoster,
    current: &str,
    new: &str,
  ) -> ReleaseResult<()> {
    if changelog.is_previous_available() {
      println!("{}", changelog.previous_contents()?);
      if self.prompter.confirm("A previous Changelog excerpt was found. Use it?", false)? {
        changelog.use_previous()?;
      }
    }

    if !changelog.using_previous() {
      let date = Local::now().format("%Y-%m-%d").to_string();

      let mut testers_list = String::new();
      for tester in roster.ok_testers() {
        testers_list.push_str(&format!("- {}\n", tester.name));
      }

      let mut authors_list = String::new();
      for author in self.git.authors_since(&tag_name(current))? {
        authors_list.push_str(&format!("- {} ({})\n", author.name, author.commits));
      }

      let commits_list = self.git.commits_since(&tag_name(current))?.join("\n");
      changelog.write_excerpt(new, &date, &testers_list, &authors_list, &commits_list)?;
    }

    self.prompter.edit_file(changelog.excerpt_path())?;
    changelog.merge()?;
    Ok(())
  }

  /// Compose the announcement draft from the excerpt's sections
  fn write_announce(&mut self, changelog: &Changelog, new: &str) -> ReleaseResult<PathBuf> {
    let sections = changelog.extract_sections()?;
    let path = self.cache_dir().join("announce.txt");

    let mut announcement = Announcement::create(path.clone(), new.to_string())?;
    let message_id = announce::make_message_id(&self.config.announce.message_id_domain, new);
    let date = announce::rfc2822_date();
    announcement.set_headers(&message_id, &date, &self.config.announce)?;
    announcement.set_content(&sections, &self.config.announce.signature)?;
    announcement.close()?;

    Ok(path)
  }

  /// Commit, tag, fast-forward the stable branch, return to integration
  ///
  /// Stages exactly two files. The tag is recorded in the release state
  /// before creation so a failed tag still gets cleaned up.
  fn make(&mut self, state: &mut ReleaseState, roster: &TesterRoster, new: &str) -> ReleaseResult<()> {
    self.git.add(&self.config.project.version_file.to_string_lossy())?;
    self.git.add(&self.config.project.changelog.to_string_lossy())?;

    let mut message = format!("v{}\n", new);
    for tester in roster.ok_testers() {
      message.push_str(&format!("\nTested-by: {} {}", tester.name, tester.email));
    }
    self.git.commit(&message)?;

    let tag = tag_name(new);
    state.set_tag(tag.clone());
    self.git.tag(&tag)?;

    self.git.checkout(&self.config.branches.master)?;
    self.git.merge_ff(&self.config.branches.next)?;
    self.git.checkout(&self.config.branches.next)?;
    Ok(())
  }

  /// Website phase: descriptor, uploads, API docs, import branch
  fn update_website(&mut self, state: &mut ReleaseState, new: &str) -> ReleaseResult<Option<String>> {
    let website_dir = self.git.work_tree().join(&self.config.website.dir);
    if !website_dir.is_dir() {
      println!("no website checkout at {}; skipping website publishing", website_dir.display());
      return Ok(None);
    }

    let website_git = SystemGit::open(&website_dir)?;
    state.save_website(&website_git)?;

    let mut publisher = WebsitePublisher::new(self.config, self.git.work_tree());
    publisher.build_latest(new)?;
    publisher.update_uploads(self.prompter)?;
    publisher.update_api(self.prompter)?;
    if publisher.api_status() == StepStatus::Ran {
      publisher.export_docs(self.prompter)?;
    }

    if publisher.should_create_branch() {
      return publisher.create_import_branch(new, self.prompter);
    }
    Ok(None)
  }

  /// Post-run cleanup; failures are logged, never propagated
  fn after(&mut self, roster: &mut TesterRoster, changelog: &Changelog) {
    best_effort("reset tester roster", {
      roster.reset();
      roster.save()
    });
    best_effort("rotate changelog excerpt", changelog.rotate());
  }

  /// Manual follow-up instructions
  fn report(&self, announce_path: &std::path::Path, new: &str, website_branch: Option<&str>) {
    println!("\n🎉 Release is ready!");
    println!("Make your checks and push the changes for both offlineimap and the website.");
    println!("Announce template stands in '{}'.", announce_path.display());
    println!("Command samples to do manually:\n");
    println!(
      "- git push <remote> {} {} {}",
      self.config.branches.master,
      self.config.branches.next,
      tag_name(new)
    );
    println!("- python2 setup.py sdist && twine upload dist/* && rm -rf dist MANIFEST");
    if let Some(branch) = website_branch {
      println!("- cd {}", self.config.website.dir.display());
      println!("- git checkout master");
      println!("- git merge {}", branch);
      println!("- git push <remote> master");
      println!("- cd ..");
    }
    println!("- git send-email {}", announce_path.display());
    println!("\n...and write a Twitter message.");
    println!("Have fun! ,-)");
  }
}
