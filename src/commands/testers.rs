use std::env;

use crate::core::config::ReleaseConfig;
use crate::core::error::ReleaseResult;
use crate::core::vcs::SystemGit;
use crate::release::testers::{TesterRoster, TesterStatus};

fn open_roster() -> ReleaseResult<TesterRoster> {
  let current_dir = env::current_dir()?;
  let git = SystemGit::open(&current_dir)?;
  let config = ReleaseConfig::load(git.work_tree())?;
  TesterRoster::load(config.cache_dir_in(git.work_tree()).join("testers.json"))
}

/// Add a tester to the roster as pending
pub fn run_testers_add(name: String, email: String) -> ReleaseResult<()> {
  let mut roster = open_roster()?;
  roster.add(&name, &email)?;
  roster.save()?;
  println!("✅ Added {} <{}> as pending", name, email);
  Ok(())
}

/// Record a tested-by acknowledgment
pub fn run_testers_ok(email: String) -> ReleaseResult<()> {
  let mut roster = open_roster()?;
  roster.mark_ok(&email)?;
  roster.save()?;
  println!("✅ Marked {} as ok for the next release", email);
  Ok(())
}

/// List the roster with per-tester status
pub fn run_testers_list() -> ReleaseResult<()> {
  let roster = open_roster()?;
  if roster.all().is_empty() {
    println!("No testers on the roster.");
    println!("   Add one with: offlineimap-release testers add <name> <email>");
    return Ok(());
  }

  println!("📋 Tester roster ({}):", roster.path().display());
  for tester in roster.all() {
    let marker = match tester.status {
      TesterStatus::Ok => "✅",
      TesterStatus::Pending => "⏳",
    };
    println!("   {} {} <{}>", marker, tester.name, tester.email);
  }
  Ok(())
}

/// Return every tester to pending
pub fn run_testers_reset() -> ReleaseResult<()> {
  let mut roster = open_roster()?;
  roster.reset();
  roster.save()?;
  println!("✅ All testers returned to pending");
  Ok(())
}
