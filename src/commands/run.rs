use std::env;

use crate::core::config::ReleaseConfig;
use crate::core::error::ReleaseResult;
use crate::core::vcs::SystemGit;
use crate::release::workflow;
use crate::ui::prompt::ConsolePrompter;

/// Run the release workflow from the current directory's repository
pub fn run_release() -> ReleaseResult<()> {
  let current_dir = env::current_dir()?;
  let git = SystemGit::open(&current_dir)?;
  let config = ReleaseConfig::load(git.work_tree())?;

  println!("📦 Releasing {} from {}", config.project.name, git.work_tree().display());

  let mut prompter = ConsolePrompter::new(config.editor());
  workflow::run(&config, &git, &mut prompter)
}
