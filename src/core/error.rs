//! Error types for shipway with contextual messages and exit codes
//!
//! Errors fall into four classes, each with its own exit code so the
//! orchestrating pipeline can distinguish "misconfigured" from "infrastructure
//! flake" from "bad artifact set" from "concurrent-run race". None of these
//! are recovered locally; every error aborts the remaining stages of the run.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for shipway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, missing credential)
  User = 1,
  /// Infrastructure error (git, host unreachable, timeouts)
  Infra = 2,
  /// Data-integrity failure (missing/unexpected artifacts, digest failure)
  Integrity = 3,
  /// Logic/race failure (duplicate tag, non-monotonic version)
  Race = 4,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for shipway
#[derive(Debug)]
pub enum ShipError {
  /// Configuration errors
  Config(ConfigError),

  /// Git operation errors
  Git(GitError),

  /// Release host / network errors
  Infra(InfraError),

  /// Artifact and manifest integrity errors
  Integrity(IntegrityError),

  /// Duplicate-tag and version-ordering errors
  Race(RaceError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ShipError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ShipError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ShipError::Message { message, context, help } => ShipError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ShipError::Config(_) => ExitCode::User,
      ShipError::Git(_) => ExitCode::Infra,
      ShipError::Infra(_) => ExitCode::Infra,
      ShipError::Integrity(_) => ExitCode::Integrity,
      ShipError::Race(_) => ExitCode::Race,
      ShipError::Io(_) => ExitCode::Infra,
      ShipError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ShipError::Config(e) => e.help_message(),
      ShipError::Git(e) => e.help_message(),
      ShipError::Infra(e) => e.help_message(),
      ShipError::Integrity(e) => e.help_message(),
      ShipError::Race(e) => e.help_message(),
      ShipError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for ShipError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ShipError::Config(e) => write!(f, "{}", e),
      ShipError::Git(e) => write!(f, "{}", e),
      ShipError::Infra(e) => write!(f, "{}", e),
      ShipError::Integrity(e) => write!(f, "{}", e),
      ShipError::Race(e) => write!(f, "{}", e),
      ShipError::Io(e) => write!(f, "I/O error: {}", e),
      ShipError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ShipError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ShipError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ShipError {
  fn from(err: io::Error) -> Self {
    ShipError::Io(err)
  }
}

impl From<String> for ShipError {
  fn from(msg: String) -> Self {
    ShipError::message(msg)
  }
}

impl From<&str> for ShipError {
  fn from(msg: &str) -> Self {
    ShipError::message(msg)
  }
}

impl From<toml_edit::TomlError> for ShipError {
  fn from(err: toml_edit::TomlError) -> Self {
    ShipError::message(format!("TOML parse error: {}", err))
  }
}

impl From<toml_edit::de::Error> for ShipError {
  fn from(err: toml_edit::de::Error) -> Self {
    ShipError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for ShipError {
  fn from(err: serde_json::Error) -> Self {
    ShipError::message(format!("JSON error: {}", err))
  }
}

impl From<semver::Error> for ShipError {
  fn from(err: semver::Error) -> Self {
    ShipError::message(format!("Version parse error: {}", err))
  }
}

impl From<std::env::VarError> for ShipError {
  fn from(err: std::env::VarError) -> Self {
    ShipError::message(format!("Environment variable error: {}", err))
  }
}

impl From<std::string::FromUtf8Error> for ShipError {
  fn from(err: std::string::FromUtf8Error) -> Self {
    ShipError::message(format!("UTF-8 conversion error: {}", err))
  }
}

impl From<reqwest::Error> for ShipError {
  fn from(err: reqwest::Error) -> Self {
    let what = if err.is_timeout() {
      InfraError::Timeout {
        operation: err.url().map(|u| u.to_string()).unwrap_or_else(|| "HTTP request".to_string()),
      }
    } else {
      InfraError::HostUnreachable {
        url: err.url().map(|u| u.to_string()).unwrap_or_default(),
        reason: err.to_string(),
      }
    };
    ShipError::Infra(what)
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// shipway.toml not found
  NotFound { search_root: PathBuf },

  /// Missing required field
  MissingField { field: String },

  /// Release host credential not present in the environment
  MissingToken,

  /// Invalid field value
  Invalid { field: String, reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => {
        Some("Create a shipway.toml in the repository root. See `shipway --help` for the expected layout.".to_string())
      }
      ConfigError::MissingToken => Some(
        "Set a release host token in the environment:\n  export SHIPWAY_TOKEN=<token>\n(GITHUB_TOKEN is also accepted.)"
          .to_string(),
      ),
      _ => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { search_root } => {
        write!(
          f,
          "No shipway configuration found.\nExpected file: {}/shipway.toml",
          search_root.display()
        )
      }
      ConfigError::MissingField { field } => {
        write!(f, "Missing required field in config: {}", field)
      }
      ConfigError::MissingToken => {
        write!(f, "No release host token found in SHIPWAY_TOKEN or GITHUB_TOKEN")
      }
      ConfigError::Invalid { field, reason } => {
        write!(f, "Invalid config field '{}': {}", field, reason)
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
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::RepoNotFound { path } => Some(format!(
        "shipway must run inside a git checkout. Checked: {}",
        path.display()
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
    }
  }
}

/// Release host / network errors
///
/// These are the retryable class: a rerun of the whole pipeline is safe
/// because no stage before the publish transaction has externally visible
/// effects.
#[derive(Debug)]
pub enum InfraError {
  /// Host could not be reached at all
  HostUnreachable { url: String, reason: String },

  /// Host answered with an unexpected status
  HostStatus { status: u16, url: String, body: String },

  /// Bounded wait elapsed
  Timeout { operation: String },
}

impl InfraError {
  fn help_message(&self) -> Option<String> {
    match self {
      InfraError::HostUnreachable { .. } => {
        Some("This is an infrastructure failure, not a release decision. Re-run the pipeline.".to_string())
      }
      InfraError::HostStatus { status, .. } if *status == 401 || *status == 403 => {
        Some("Check that the token in SHIPWAY_TOKEN has permission to read PRs and create releases.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for InfraError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      InfraError::HostUnreachable { url, reason } => {
        write!(f, "Release host unreachable: {}\n{}", url, reason)
      }
      InfraError::HostStatus { status, url, body } => {
        write!(f, "Release host returned HTTP {} for {}\n{}", status, url, body)
      }
      InfraError::Timeout { operation } => {
        write!(f, "Timed out waiting for: {}", operation)
      }
    }
  }
}

/// Artifact and manifest integrity errors
#[derive(Debug)]
pub enum IntegrityError {
  /// Expected platform binary never appeared in the staging directory
  MissingArtifact { target: String, expected_name: String },

  /// Staged file does not match the artifact naming convention
  UnexpectedArtifact { file: String },

  /// Artifact bytes could not be read for digesting
  DigestFailed { name: String, reason: String },
}

impl IntegrityError {
  fn help_message(&self) -> Option<String> {
    match self {
      IntegrityError::MissingArtifact { target, .. } => Some(format!(
        "The build job for '{}' either failed or has not uploaded its binary. A release never ships a partial platform matrix.",
        target
      )),
      IntegrityError::UnexpectedArtifact { .. } => {
        Some("Staged files must be named <project>-<target-triple>[.exe]. Remove stale uploads from the staging directory.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for IntegrityError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      IntegrityError::MissingArtifact { target, expected_name } => {
        write!(f, "Missing artifact for {}: expected '{}'", target, expected_name)
      }
      IntegrityError::UnexpectedArtifact { file } => {
        write!(f, "Unexpected file in staging directory: {}", file)
      }
      IntegrityError::DigestFailed { name, reason } => {
        write!(f, "Failed to compute digest for '{}': {}", name, reason)
      }
    }
  }
}

/// Duplicate-tag and version-ordering errors
///
/// These indicate either a version-deduction bug or two concurrent pipeline
/// runs both deciding to release. The remote host refusing a duplicate tag is
/// the system's real cross-run mutual exclusion.
#[derive(Debug)]
pub enum RaceError {
  /// A release for the deduced tag already exists on the host
  DuplicateTag { tag: String },

  /// Deduced tag does not order strictly above all prior tags
  NonMonotonicTag { tag: String, latest: String },
}

impl RaceError {
  fn help_message(&self) -> Option<String> {
    match self {
      RaceError::DuplicateTag { tag } => Some(format!(
        "A release for '{}' already exists. Either a concurrent run won the race (nothing to do) or version deduction is wrong. Never delete the existing release to retry.",
        tag
      )),
      RaceError::NonMonotonicTag { .. } => None,
    }
  }
}

impl fmt::Display for RaceError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RaceError::DuplicateTag { tag } => {
        write!(f, "Release '{}' already exists on the host", tag)
      }
      RaceError::NonMonotonicTag { tag, latest } => {
        write!(f, "Deduced tag '{}' is not greater than latest prior tag '{}'", tag, latest)
      }
    }
  }
}

/// Result type alias for shipway
pub type ShipResult<T> = Result<T, ShipError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ShipResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ShipResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ShipError>,
{
  fn context(self, ctx: impl Into<String>) -> ShipResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ShipResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with colors and help text
pub fn print_error(error: &ShipError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}

/// Convert anyhow::Error to ShipError (for transition period)
impl From<anyhow::Error> for ShipError {
  fn from(err: anyhow::Error) -> Self {
    ShipError::message(err.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_exit_codes_by_class() {
    let config = ShipError::Config(ConfigError::MissingToken);
    let infra = ShipError::Infra(InfraError::Timeout {
      operation: "barrier".to_string(),
    });
    let integrity = ShipError::Integrity(IntegrityError::UnexpectedArtifact {
      file: "junk.bin".to_string(),
    });
    let race = ShipError::Race(RaceError::DuplicateTag {
      tag: "v0.5.0".to_string(),
    });

    assert_eq!(config.exit_code().as_i32(), 1);
    assert_eq!(infra.exit_code().as_i32(), 2);
    assert_eq!(integrity.exit_code().as_i32(), 3);
    assert_eq!(race.exit_code().as_i32(), 4);
  }

  #[test]
  fn test_message_context_chains() {
    let err = ShipError::message("base").context("while doing a thing");
    let text = err.to_string();
    assert!(text.contains("base"));
    assert!(text.contains("while doing a thing"));
  }

  #[test]
  fn test_duplicate_tag_has_help() {
    let err = ShipError::Race(RaceError::DuplicateTag {
      tag: "v1.0.0".to_string(),
    });
    assert!(err.help_message().unwrap().contains("v1.0.0"));
  }
}
