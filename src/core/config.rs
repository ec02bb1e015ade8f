use crate::core::error::{ConfigError, ReleaseError, ReleaseResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for offlineimap-release
///
/// Loaded from an optional `release.toml` at the repository top level.
/// Every field has a default matching the OfflineIMAP project layout, so
/// the file only needs to exist when a knob differs from stock.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReleaseConfig {
  #[serde(default)]
  pub project: ProjectConfig,
  #[serde(default)]
  pub branches: BranchConfig,
  #[serde(default)]
  pub website: WebsiteConfig,
  #[serde(default)]
  pub tools: ToolsConfig,
  #[serde(default)]
  pub announce: AnnounceConfig,
}

/// Project identity and source-of-truth files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
  /// Human name used in changelog headers and announcement subjects
  #[serde(default = "default_project_name")]
  pub name: String,

  /// File holding the version assignment, edited by the operator
  #[serde(default = "default_version_file")]
  pub version_file: PathBuf,

  /// Permanent changelog file
  #[serde(default = "default_changelog")]
  pub changelog: PathBuf,

  /// Marker line in the changelog; excerpts are inserted after the first
  /// line containing it
  #[serde(default = "default_changelog_magic")]
  pub changelog_magic: String,

  /// Cache directory for excerpt/announcement/roster files, relative to
  /// the repository top level (kept under .git so it never dirties status)
  #[serde(default = "default_cache_dir")]
  pub cache_dir: PathBuf,
}

fn default_project_name() -> String {
  "OfflineIMAP".to_string()
}

fn default_version_file() -> PathBuf {
  PathBuf::from("offlineimap/__init__.py")
}

fn default_changelog() -> PathBuf {
  PathBuf::from("Changelog.md")
}

fn default_changelog_magic() -> String {
  "{:toc}".to_string()
}

fn default_cache_dir() -> PathBuf {
  PathBuf::from(".git/release-cache")
}

impl Default for ProjectConfig {
  fn default() -> Self {
    Self {
      name: default_project_name(),
      version_file: default_version_file(),
      changelog: default_changelog(),
      changelog_magic: default_changelog_magic(),
      cache_dir: default_cache_dir(),
    }
  }
}

/// Integration and stable branch names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchConfig {
  /// Stable branch, fast-forwarded to the integration branch on release
  #[serde(default = "default_master")]
  pub master: String,

  /// Integration branch the release is prepared on
  #[serde(default = "default_next")]
  pub next: String,
}

fn default_master() -> String {
  "master".to_string()
}

fn default_next() -> String {
  "next".to_string()
}

impl Default for BranchConfig {
  fn default() -> Self {
    Self {
      master: default_master(),
      next: default_next(),
    }
  }
}

/// Companion website repository layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebsiteConfig {
  /// Website checkout, relative to the main repository top level
  #[serde(default = "default_website_dir")]
  pub dir: PathBuf,

  /// Generated "latest stable" descriptor, relative to the main
  /// repository top level
  #[serde(default = "default_website_latest")]
  pub latest: PathBuf,

  /// Prefix for the staging branch created in the website repository
  #[serde(default = "default_import_branch_prefix")]
  pub import_branch_prefix: String,
}

fn default_website_dir() -> PathBuf {
  PathBuf::from("website")
}

fn default_website_latest() -> PathBuf {
  PathBuf::from("website/_data/latest.yml")
}

fn default_import_branch_prefix() -> String {
  "import-v".to_string()
}

impl Default for WebsiteConfig {
  fn default() -> Self {
    Self {
      dir: default_website_dir(),
      latest: default_website_latest(),
      import_branch_prefix: default_import_branch_prefix(),
    }
  }
}

/// External tool invocations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
  /// Editor command; falls back to $EDITOR, then vi
  #[serde(default)]
  pub editor: Option<String>,

  /// Documentation toolchain binary, probed with `--version`
  #[serde(default = "default_sphinx_build")]
  pub sphinx_build: String,

  /// Documentation directory holding the website-doc makefile
  #[serde(default = "default_docs_dir")]
  pub docs_dir: PathBuf,

  /// Upload build-and-checksum script, run from the repository top level
  #[serde(default = "default_uploads_script")]
  pub uploads_script: String,

  /// Documentation export command, run inside the docs directory
  #[serde(default = "default_websitedoc_command")]
  pub websitedoc_command: Vec<String>,
}

fn default_sphinx_build() -> String {
  "sphinx-build".to_string()
}

fn default_docs_dir() -> PathBuf {
  PathBuf::from("docs")
}

fn default_uploads_script() -> String {
  "./docs/build-uploads.sh".to_string()
}

fn default_websitedoc_command() -> Vec<String> {
  vec!["make".to_string(), "websitedoc".to_string()]
}

impl Default for ToolsConfig {
  fn default() -> Self {
    Self {
      editor: None,
      sphinx_build: default_sphinx_build(),
      docs_dir: default_docs_dir(),
      uploads_script: default_uploads_script(),
      websitedoc_command: default_websitedoc_command(),
    }
  }
}

/// Announcement message headers and signature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnounceConfig {
  /// From header
  #[serde(default = "default_announce_from")]
  pub from: String,

  /// To header (the project mailing list)
  #[serde(default = "default_mailing_list")]
  pub mailing_list: String,

  /// Domain for generated message-ids
  #[serde(default = "default_message_id_domain")]
  pub message_id_domain: String,

  /// Name written after the signature delimiter
  #[serde(default = "default_signature")]
  pub signature: String,
}

fn default_announce_from() -> String {
  "Nicolas Sebrecht <nicolas.s-dev@laposte.net>".to_string()
}

fn default_mailing_list() -> String {
  "offlineimap-project@lists.alioth.debian.org".to_string()
}

fn default_message_id_domain() -> String {
  "laposte.net".to_string()
}

fn default_signature() -> String {
  "Nicolas Sebrecht".to_string()
}

impl Default for AnnounceConfig {
  fn default() -> Self {
    Self {
      from: default_announce_from(),
      mailing_list: default_mailing_list(),
      message_id_domain: default_message_id_domain(),
      signature: default_signature(),
    }
  }
}

impl ReleaseConfig {
  /// Load config from release.toml at the repository top level
  ///
  /// A missing file yields the all-defaults configuration; a file that
  /// exists but does not parse is an error.
  pub fn load(work_tree: &Path) -> ReleaseResult<Self> {
    let config_path = work_tree.join("release.toml");
    if !config_path.exists() {
      return Ok(Self::default());
    }

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: ReleaseConfig = toml_edit::de::from_str(&content).map_err(|e| {
      ReleaseError::Config(ConfigError::Invalid {
        path: config_path.clone(),
        message: e.to_string(),
      })
    })?;

    Ok(config)
  }

  /// Absolute cache directory for a given repository top level
  pub fn cache_dir_in(&self, work_tree: &Path) -> PathBuf {
    work_tree.join(&self.project.cache_dir)
  }

  /// Editor command: config value, then $EDITOR, then vi
  pub fn editor(&self) -> String {
    self
      .tools
      .editor
      .clone()
      .or_else(|| std::env::var("EDITOR").ok())
      .unwrap_or_else(|| "vi".to_string())
  }
}
