//! Error types for offlineimap-release with contextual messages and exit codes
//!
//! Failures fall into two tiers: fatal errors that end the process with a
//! categorized exit code, and skippable conditions (declined prompts, missing
//! toolchain) that never become errors at all. Cleanup and restore paths
//! swallow their failures entirely; see `release::best_effort`.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for offlineimap-release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// Operator error (dirty tree, unchanged version, aborted release)
  User = 1,
  /// System error (git, I/O, config)
  System = 2,
  /// Website documentation export failed
  DocsExport = 3,
  /// Upload build-and-checksum script failed
  Uploads = 5,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for offlineimap-release
#[derive(Debug)]
pub enum ReleaseError {
  /// Configuration errors (release.toml)
  Config(ConfigError),

  /// Git operation errors
  Git(GitError),

  /// I/O errors
  Io(io::Error),

  /// The main working tree has uncommitted changes at startup
  DirtyWorkTree,

  /// The operator closed the editor without changing the version
  VersionUnchanged { version: String },

  /// The website documentation build exited non-zero
  DocsExportFailed { command: String },

  /// The upload build-and-checksum script exited non-zero
  UploadsFailed { command: String },

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ReleaseError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ReleaseError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    ReleaseError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ReleaseError::Message { message, context, help } => ReleaseError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      other => other,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ReleaseError::Config(_) => ExitCode::System,
      ReleaseError::Git(_) => ExitCode::System,
      ReleaseError::Io(_) => ExitCode::System,
      ReleaseError::DirtyWorkTree => ExitCode::User,
      ReleaseError::VersionUnchanged { .. } => ExitCode::User,
      ReleaseError::DocsExportFailed { .. } => ExitCode::DocsExport,
      ReleaseError::UploadsFailed { .. } => ExitCode::Uploads,
      ReleaseError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ReleaseError::Config(e) => e.help_message(),
      ReleaseError::Git(e) => e.help_message(),
      ReleaseError::DirtyWorkTree => {
        Some("Commit or stash your work, then start the release again.".to_string())
      }
      ReleaseError::VersionUnchanged { .. } => Some(
        "Edit the version assignment in the version source file before saving and quitting."
          .to_string(),
      ),
      ReleaseError::UploadsFailed { command } => Some(format!(
        "Uploaded archive checksums must not be left inconsistent. Inspect and re-run: {}",
        command
      )),
      ReleaseError::DocsExportFailed { command } => Some(format!(
        "An incomplete documentation build cannot be published. Inspect and re-run: {}",
        command
      )),
      ReleaseError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for ReleaseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReleaseError::Config(e) => write!(f, "{}", e),
      ReleaseError::Git(e) => write!(f, "{}", e),
      ReleaseError::Io(e) => write!(f, "I/O error: {}", e),
      ReleaseError::DirtyWorkTree => {
        write!(f, "The git repository is not clean; aborting")
      }
      ReleaseError::VersionUnchanged { version } => {
        write!(f, "version was not changed (still {}); stopping", version)
      }
      ReleaseError::DocsExportFailed { command } => {
        write!(f, "documentation export failed: {}", command)
      }
      ReleaseError::UploadsFailed { command } => {
        write!(f, "upload build failed: {}", command)
      }
      ReleaseError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ReleaseError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ReleaseError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ReleaseError {
  fn from(err: io::Error) -> Self {
    ReleaseError::Io(err)
  }
}

impl From<String> for ReleaseError {
  fn from(msg: String) -> Self {
    ReleaseError::message(msg)
  }
}

impl From<&str> for ReleaseError {
  fn from(msg: &str) -> Self {
    ReleaseError::message(msg)
  }
}

impl From<toml_edit::de::Error> for ReleaseError {
  fn from(err: toml_edit::de::Error) -> Self {
    ReleaseError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for ReleaseError {
  fn from(err: serde_json::Error) -> Self {
    ReleaseError::message(format!("JSON error: {}", err))
  }
}

impl From<std::string::FromUtf8Error> for ReleaseError {
  fn from(err: std::string::FromUtf8Error) -> Self {
    ReleaseError::message(format!("UTF-8 conversion error: {}", err))
  }
}

impl From<anyhow::Error> for ReleaseError {
  fn from(err: anyhow::Error) -> Self {
    ReleaseError::message(err.to_string())
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// release.toml exists but does not parse
  Invalid { path: PathBuf, message: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::Invalid { path, .. } => Some(format!(
        "Fix or remove {} — every field has a default, so the file is optional.",
        path.display()
      )),
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::Invalid { path, message } => {
        write!(f, "Invalid configuration {}: {}", path.display(), message)
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },

  /// Fast-forward merge rejected
  NotFastForward { branch: String, stderr: String },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::RepoNotFound { path } => Some(format!(
        "Run the release from inside the project checkout; no repository found at: {}",
        path.display()
      )),
      GitError::NotFastForward { branch, .. } => Some(format!(
        "The stable branch has diverged from '{}'. A merge commit is never created automatically; reconcile the branches by hand first.",
        branch
      )),
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
      GitError::NotFastForward { branch, stderr } => {
        write!(f, "fast-forward merge of '{}' rejected\n{}", branch, stderr)
      }
    }
  }
}

/// Result type alias for offlineimap-release
pub type ReleaseResult<T> = Result<T, ReleaseError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ReleaseResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ReleaseResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ReleaseError>,
{
  fn context(self, ctx: impl Into<String>) -> ReleaseResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ReleaseResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with colors and help text
pub fn print_error(error: &ReleaseError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
