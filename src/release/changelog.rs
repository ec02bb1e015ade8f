//! Changelog excerpt lifecycle
//!
//! The excerpt is the in-progress changelog fragment for the release being
//! prepared. It is rendered from a fixed template, hand-edited by the
//! operator, merged into the permanent changelog at the magic marker line,
//! and parsed back into named sections for the announcement. An excerpt
//! left behind by an aborted run is offered for reuse on the next attempt.

use crate::core::error::{ReleaseError, ReleaseResult, ResultExt};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Section headers recognized in the excerpt, in announcement order
pub const SECTIONS: [&str; 5] = ["Notes", "Authors", "Features", "Fixes", "Changes"];

pub struct Changelog {
  excerpt: PathBuf,
  excerpt_old: PathBuf,
  changelog: PathBuf,
  magic: String,
  project_name: String,
  using_previous: bool,
}

impl Changelog {
  pub fn new(cache_dir: &Path, changelog: PathBuf, magic: String, project_name: String) -> Self {
    let excerpt = cache_dir.join("changelog.excerpt.md");
    let excerpt_old = excerpt.with_extension("md.old");
    Self {
      excerpt,
      excerpt_old,
      changelog,
      magic,
      project_name,
      using_previous: false,
    }
  }

  pub fn excerpt_path(&self) -> &Path {
    &self.excerpt
  }

  /// True if a leftover excerpt from an aborted prior run exists
  pub fn is_previous_available(&self) -> bool {
    self.excerpt_old.is_file()
  }

  /// Contents of the leftover excerpt, for operator review
  pub fn previous_contents(&self) -> ReleaseResult<String> {
    fs::read_to_string(&self.excerpt_old)
      .with_context(|| format!("Failed to read previous excerpt {}", self.excerpt_old.display()))
  }

  /// Promote the leftover excerpt to the active one
  ///
  /// Subsequent steps must skip regeneration; the prior content is
  /// preserved byte-for-byte.
  pub fn use_previous(&mut self) -> ReleaseResult<()> {
    fs::rename(&self.excerpt_old, &self.excerpt)
      .with_context(|| format!("Failed to promote previous excerpt {}", self.excerpt_old.display()))?;
    self.using_previous = true;
    Ok(())
  }

  pub fn using_previous(&self) -> bool {
    self.using_previous
  }

  /// Render the excerpt template into the excerpt file
  pub fn write_excerpt(
    &self,
    version: &str,
    date: &str,
    testers_list: &str,
    authors_list: &str,
    commits_list: &str,
  ) -> ReleaseResult<()> {
    if let Some(parent) = self.excerpt.parent() {
      fs::create_dir_all(parent)?;
    }

    let content = format!(
      "\n### {project} v{version} ({date})\n\n\
       #### Notes\n\n\n\
       This release was tested by:\n\n\
       {testers}\n\
       #### Authors\n\n\
       {authors}\n\
       #### Features\n\n\n\
       #### Fixes\n\n\n\
       #### Changes\n\n\n\n\
       {commits}\n",
      project = self.project_name,
      version = version,
      date = date,
      testers = testers_list,
      authors = authors_list,
      commits = commits_list,
    );

    fs::write(&self.excerpt, content)
      .with_context(|| format!("Failed to write excerpt {}", self.excerpt.display()))?;
    Ok(())
  }

  /// Insert the excerpt into the permanent changelog at the marker line
  ///
  /// The excerpt's content lands immediately after the first line
  /// containing the magic token; afterwards trailing whitespace is
  /// stripped from every line of the file. Calling this twice duplicates
  /// the content; the workflow calls it exactly once per release.
  pub fn merge(&self) -> ReleaseResult<()> {
    let excerpt = fs::read_to_string(&self.excerpt)
      .with_context(|| format!("Failed to read excerpt {}", self.excerpt.display()))?;
    let changelog = fs::read_to_string(&self.changelog)
      .with_context(|| format!("Failed to read changelog {}", self.changelog.display()))?;

    if !changelog.lines().any(|line| line.contains(&self.magic)) {
      return Err(ReleaseError::with_help(
        format!(
          "marker '{}' not found in {}",
          self.magic,
          self.changelog.display()
        ),
        "The permanent changelog needs the marker line so the tool knows where to insert new content.",
      ));
    }

    let mut merged = Vec::new();
    let mut inserted = false;
    for line in changelog.lines() {
      merged.push(line.to_string());
      if !inserted && line.contains(&self.magic) {
        merged.extend(excerpt.lines().map(str::to_string));
        inserted = true;
      }
    }

    let content: String = merged
      .iter()
      .map(|line| format!("{}\n", line.trim_end()))
      .collect();

    fs::write(&self.changelog, content)
      .with_context(|| format!("Failed to write changelog {}", self.changelog.display()))?;
    Ok(())
  }

  /// Rotate the active excerpt aside for possible reuse next run
  pub fn rotate(&self) -> ReleaseResult<()> {
    fs::rename(&self.excerpt, &self.excerpt_old)
      .with_context(|| format!("Failed to rotate excerpt {}", self.excerpt.display()))?;
    Ok(())
  }

  /// Parse the excerpt back into named sections
  ///
  /// Scans line by line: an exact `#### <Section>` header opens a section
  /// (the header itself is dropped), a line whose trailing whitespace trims
  /// to `--` ends extraction (signature delimiter), everything else is
  /// captured into the open section. Lines before the first header are
  /// discarded. Empty sections stay present as empty strings; adjacent
  /// sections are never merged.
  pub fn extract_sections(&self) -> ReleaseResult<HashMap<String, String>> {
    let content = fs::read_to_string(&self.excerpt)
      .with_context(|| format!("Failed to read excerpt {}", self.excerpt.display()))?;

    let mut sections: HashMap<String, String> = HashMap::new();
    let mut current: Option<&'static str> = None;

    'lines: for line in content.lines() {
      let trimmed = line.trim_end();

      for section in SECTIONS {
        if trimmed == format!("#### {}", section) {
          current = Some(section);
          sections.insert(section.to_string(), String::new());
          continue 'lines;
        }
      }

      if trimmed == "--" {
        break;
      }

      if let Some(section) = current {
        let text = sections.entry(section.to_string()).or_default();
        text.push_str(trimmed);
        text.push('\n');
      }
    }

    Ok(sections)
  }
}
