//! Companion-website publishing
//!
//! Four independently skippable steps: upload build, API doc preparation,
//! doc export, and the "latest stable" descriptor rewrite. Each interactive
//! step reports an explicit tri-state result; hard failures (upload script,
//! doc build) carry their own exit codes and end the whole process, because
//! half-updated checksums or a truncated doc build must never be published.

use crate::core::config::ReleaseConfig;
use crate::core::error::{ReleaseError, ReleaseResult, ResultExt};
use crate::core::vcs::SystemGit;
use crate::ui::prompt::Prompter;
use std::fs;
use std::path::Path;
use std::process::Command;

/// Outcome of one website step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
  NotRun,
  Skipped,
  Ran,
}

/// The import branch is created iff at least one step actually ran
///
/// Hard failures abort the process before this rule is ever evaluated, so
/// "none hard-failed" holds by construction.
pub fn any_ran(statuses: &[StepStatus]) -> bool {
  statuses.iter().any(|s| *s == StepStatus::Ran)
}

pub struct WebsitePublisher<'a> {
  config: &'a ReleaseConfig,
  work_tree: &'a Path,
  uploads: StepStatus,
  api: StepStatus,
  export: StepStatus,
}

impl<'a> WebsitePublisher<'a> {
  pub fn new(config: &'a ReleaseConfig, work_tree: &'a Path) -> Self {
    Self {
      config,
      work_tree,
      uploads: StepStatus::NotRun,
      api: StepStatus::NotRun,
      export: StepStatus::NotRun,
    }
  }

  pub fn api_status(&self) -> StepStatus {
    self.api
  }

  /// Run the external build-and-checksum script for uploads/
  pub fn update_uploads(&mut self, prompter: &mut dyn Prompter) -> ReleaseResult<StepStatus> {
    let question = "add new archive to uploads/ on the website? \
                    (warning: checksums will change if it already exists)";
    if !prompter.confirm(question, true)? {
      self.uploads = StepStatus::Skipped;
      return Ok(self.uploads);
    }

    let script = &self.config.tools.uploads_script;
    let status = Command::new(script)
      .current_dir(self.work_tree)
      .status()
      .with_context(|| format!("Failed to run upload script {}", script))?;

    if !status.success() {
      return Err(ReleaseError::UploadsFailed { command: script.clone() });
    }

    self.uploads = StepStatus::Ran;
    Ok(self.uploads)
  }

  /// Prepare the website repository for an API documentation import
  ///
  /// A missing documentation toolchain is not a failure: remediation
  /// instructions are printed and the step is skipped. Uncommitted work in
  /// the website repository is stashed, never dropped.
  pub fn update_api(&mut self, prompter: &mut dyn Prompter) -> ReleaseResult<StepStatus> {
    let sphinx = &self.config.tools.sphinx_build;
    let question = format!("update API of the website? (requires {})", sphinx);
    if !prompter.confirm(&question, true)? {
      self.api = StepStatus::Skipped;
      return Ok(self.api);
    }

    let probe = Command::new(sphinx).arg("--version").output();
    let present = matches!(probe, Ok(output) if output.status.success());
    if !present {
      println!(
        "\nOops! you don't have {sphinx} installed?\n\
         Cannot update the website documentation...\n\
         You should install it and manually run:\n\
         \x20 $ cd {docs}\n\
         \x20 $ make websitedoc\n\
         Then, commit and push changes of the website.",
        sphinx = sphinx,
        docs = self.config.tools.docs_dir.display(),
      );
      prompter.pause("")?;
      self.api = StepStatus::Skipped;
      return Ok(self.api);
    }

    let website_dir = self.work_tree.join(&self.config.website.dir);
    if !website_dir.is_dir() {
      prompter.pause(&format!("website checkout not found at {}", website_dir.display()))?;
      self.api = StepStatus::Skipped;
      return Ok(self.api);
    }

    let website_git = SystemGit::open(&website_dir)?;
    if !website_git.is_clean()? {
      println!("There is WIP in the website repository: stashing");
      website_git.stash("WIP during offlineimap API import")?;
    }

    self.api = StepStatus::Ran;
    Ok(self.api)
  }

  /// Run the documentation export in the docs directory
  pub fn export_docs(&mut self, prompter: &mut dyn Prompter) -> ReleaseResult<StepStatus> {
    let docs_dir = self.work_tree.join(&self.config.tools.docs_dir);
    if !docs_dir.is_dir() {
      prompter.pause(&format!("documentation directory not found at {}", docs_dir.display()))?;
      return Ok(StepStatus::NotRun);
    }

    let command = &self.config.tools.websitedoc_command;
    let display = command.join(" ");
    let (program, args) = command
      .split_first()
      .ok_or_else(|| ReleaseError::message("websitedoc command is empty"))?;

    let status = Command::new(program)
      .args(args)
      .current_dir(&docs_dir)
      .status()
      .with_context(|| format!("Failed to run {}", display))?;

    if !status.success() {
      return Err(ReleaseError::DocsExportFailed { command: display });
    }

    self.export = StepStatus::Ran;
    Ok(self.export)
  }

  /// Rewrite the "latest stable" descriptor file
  ///
  /// Unconditional: cheap, reversible, and must always match the release.
  pub fn build_latest(&self, version: &str) -> ReleaseResult<()> {
    let path = self.work_tree.join(&self.config.website.latest);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)?;
    }
    let content = format!(
      "# DO NOT EDIT MANUALLY: it is generated by the release script.\nstable: v{}\n",
      version
    );
    fs::write(&path, content)
      .with_context(|| format!("Failed to write latest descriptor {}", path.display()))?;
    Ok(())
  }

  /// Stage everything in the website repository on the import branch
  ///
  /// Returns the branch name for the follow-up instructions; the operator
  /// merges it into the website's stable branch by hand.
  pub fn create_import_branch(&self, version: &str, prompter: &mut dyn Prompter) -> ReleaseResult<Option<String>> {
    let branch = format!("{}{}", self.config.website.import_branch_prefix, version);

    let website_dir = self.work_tree.join(&self.config.website.dir);
    if !website_dir.is_dir() {
      prompter.pause(&format!("website checkout not found at {}", website_dir.display()))?;
      return Ok(None);
    }

    let website_git = SystemGit::open(&website_dir)?;
    website_git.checkout_new(&branch)?;
    website_git.add(".")?;
    website_git.commit(&format!("update for offlineimap v{}", version))?;

    prompter.pause(&format!("website: branch '{}' is ready for a merge in master!", branch))?;
    Ok(Some(branch))
  }

  /// Whether the import branch should be created for this run
  pub fn should_create_branch(&self) -> bool {
    any_ran(&[self.uploads, self.api, self.export])
  }
}
