//! Operator interaction capability
//!
//! The workflow never reads stdin or spawns an editor directly; it goes
//! through `Prompter`, so the whole sequencing can be driven by a scripted
//! implementation in tests without real processes.

use crate::core::error::{ReleaseResult, ResultExt};
use std::io::{self, Write};
use std::path::Path;
use std::process::Command;

/// Interactive capabilities the release workflow depends on
pub trait Prompter {
  /// Ask a yes/no question; an empty answer takes the default
  fn confirm(&mut self, message: &str, default_yes: bool) -> ReleaseResult<bool>;

  /// Print a message and block until the operator acknowledges
  fn pause(&mut self, message: &str) -> ReleaseResult<()>;

  /// Open a file in the operator's editor and block until it exits
  ///
  /// The editor's exit status is intentionally not checked: the operator
  /// may save-and-quit or abort without that being an error.
  fn edit_file(&mut self, path: &Path) -> ReleaseResult<()>;
}

/// Console-backed prompter (stdin + external editor)
pub struct ConsolePrompter {
  editor: String,
}

impl ConsolePrompter {
  pub fn new(editor: String) -> Self {
    Self { editor }
  }

  fn read_line(&self) -> ReleaseResult<String> {
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
  }
}

impl Prompter for ConsolePrompter {
  fn confirm(&mut self, message: &str, default_yes: bool) -> ReleaseResult<bool> {
    let hint = if default_yes { "[Y/n]" } else { "[y/N]" };
    print!("\n{} {}: ", message, hint);
    io::stdout().flush()?;

    let answer = self.read_line()?;
    if answer.is_empty() {
      return Ok(default_yes);
    }
    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
  }

  fn pause(&mut self, message: &str) -> ReleaseResult<()> {
    if !message.is_empty() {
      println!("\n{}", message);
    }
    print!("Press Enter to continue... ");
    io::stdout().flush()?;
    self.read_line()?;
    Ok(())
  }

  fn edit_file(&mut self, path: &Path) -> ReleaseResult<()> {
    let status = Command::new(&self.editor)
      .arg(path)
      .status()
      .with_context(|| format!("Failed to launch editor '{}'", self.editor))?;

    if !status.success() {
      // Editors exit non-zero for reasons that are not failures (:cq,
      // aborted swap recovery); leave the decision to the operator.
      println!("editor exited with {}; continuing", status);
    }
    Ok(())
  }
}
