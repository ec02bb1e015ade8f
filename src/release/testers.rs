//! Tester roster
//!
//! People who tested the release candidate. Their acknowledgments go into
//! the release commit (`Tested-by:` lines) and the changelog excerpt. The
//! roster persists across runs as JSON in the cache directory; a successful
//! release returns everyone to pending so the pool survives into the next
//! cycle.

use crate::core::error::{ReleaseError, ReleaseResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TesterStatus {
  Pending,
  Ok,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tester {
  pub name: String,
  pub email: String,
  pub status: TesterStatus,
}

/// The persisted roster
pub struct TesterRoster {
  path: PathBuf,
  testers: Vec<Tester>,
}

impl TesterRoster {
  /// Load the roster; a missing file is an empty roster
  pub fn load(path: PathBuf) -> ReleaseResult<Self> {
    let testers = if path.exists() {
      let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read tester roster {}", path.display()))?;
      serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse tester roster {}", path.display()))?
    } else {
      Vec::new()
    };

    Ok(Self { path, testers })
  }

  pub fn save(&self) -> ReleaseResult<()> {
    if let Some(parent) = self.path.parent() {
      fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(&self.testers)?;
    fs::write(&self.path, content)
      .with_context(|| format!("Failed to write tester roster {}", self.path.display()))?;
    Ok(())
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn all(&self) -> &[Tester] {
    &self.testers
  }

  /// Testers whose acknowledgment arrived for this release
  pub fn ok_testers(&self) -> Vec<&Tester> {
    self.testers.iter().filter(|t| t.status == TesterStatus::Ok).collect()
  }

  /// Add a tester as pending; the email is the identity
  pub fn add(&mut self, name: &str, email: &str) -> ReleaseResult<()> {
    if self.testers.iter().any(|t| t.email == email) {
      return Err(ReleaseError::message(format!("tester with email {} already on the roster", email)));
    }
    self.testers.push(Tester {
      name: name.to_string(),
      email: email.to_string(),
      status: TesterStatus::Pending,
    });
    Ok(())
  }

  /// Record a tested-by acknowledgment
  pub fn mark_ok(&mut self, email: &str) -> ReleaseResult<()> {
    match self.testers.iter_mut().find(|t| t.email == email) {
      Some(tester) => {
        tester.status = TesterStatus::Ok;
        Ok(())
      }
      None => Err(ReleaseError::with_help(
        format!("no tester with email {} on the roster", email),
        "Add them first: offlineimap-release testers add <name> <email>",
      )),
    }
  }

  /// Return every tester to pending for the next release cycle
  pub fn reset(&mut self) {
    for tester in &mut self.testers {
      tester.status = TesterStatus::Pending;
    }
  }
}
