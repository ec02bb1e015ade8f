//! Version source-of-truth file

use crate::core::error::{ReleaseError, ReleaseResult, ResultExt};
use std::fs;
use std::path::{Path, PathBuf};

/// The single file holding the project version
///
/// The tool only ever reads this file; the bump itself is a manual edit by
/// the operator. The version is the string assigned to `__version__`.
pub struct VersionFile {
  path: PathBuf,
}

impl VersionFile {
  pub fn new(path: PathBuf) -> Self {
    Self { path }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Scan for the `__version__ = "..."` assignment and return its value
  pub fn read(&self) -> ReleaseResult<String> {
    let content = fs::read_to_string(&self.path)
      .with_context(|| format!("Failed to read version file {}", self.path.display()))?;

    for line in content.lines() {
      if let Some(version) = parse_version_assignment(line) {
        return Ok(version);
      }
    }

    Err(ReleaseError::with_help(
      format!("no __version__ assignment found in {}", self.path.display()),
      "The version file must contain a line like: __version__ = \"7.2.0\"",
    ))
  }

  /// Warn when the version does not parse as semver
  ///
  /// The release itself only compares old and new for inequality, so a
  /// non-semver string is the operator's call, not an error.
  pub fn warn_if_not_semver(version: &str) {
    if semver::Version::parse(version).is_err() {
      println!("⚠️  '{}' does not parse as semantic versioning", version);
    }
  }
}

/// Parse one line as a `__version__` assignment, if it is one
fn parse_version_assignment(line: &str) -> Option<String> {
  let rest = line.trim().strip_prefix("__version__")?.trim_start();
  let rest = rest.strip_prefix('=')?.trim();

  let quote = rest.chars().next()?;
  if quote != '"' && quote != '\'' {
    return None;
  }
  let inner = &rest[1..];
  let end = inner.find(quote)?;
  Some(inner[..end].to_string())
}
