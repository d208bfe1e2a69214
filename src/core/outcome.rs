//! Machine-readable run outcome
//!
//! The orchestrating pipeline must be able to distinguish "nothing to do"
//! from "failed", so the outcome is a structured record rather than a bare
//! exit status. It is emitted two ways: pretty/JSON on stdout, and
//! `key=value` lines into the outputs file named by `SHIPWAY_OUTPUT` (or
//! `GITHUB_OUTPUT`) so later pipeline steps can gate on it.

use crate::core::error::{ResultExt, ShipResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// Outcome of one engine run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseOutcome {
  /// Whether a release was requested for this run
  pub detected: bool,

  /// The minted tag, present exactly when `detected` is true
  pub tag: Option<String>,

  /// Commit the decision was made for
  pub source_sha: String,

  /// When the outcome was produced (UTC)
  pub timestamp: DateTime<Utc>,
}

impl ReleaseOutcome {
  /// Outcome for a run where no release was requested (terminal success)
  pub fn no_release(source_sha: impl Into<String>) -> Self {
    Self {
      detected: false,
      tag: None,
      source_sha: source_sha.into(),
      timestamp: Utc::now(),
    }
  }

  /// Outcome for a published (or deduced, for detect-only runs) release
  pub fn released(tag: impl Into<String>, source_sha: impl Into<String>) -> Self {
    Self {
      detected: true,
      tag: Some(tag.into()),
      source_sha: source_sha.into(),
      timestamp: Utc::now(),
    }
  }

  /// Render as `key=value` lines for pipeline output files
  pub fn to_output_lines(&self) -> String {
    format!(
      "release-detected={}\ntag-name={}\n",
      self.detected,
      self.tag.as_deref().unwrap_or("")
    )
  }

  /// Append the outcome to a pipeline outputs file
  pub fn write_outputs(&self, path: &Path) -> ShipResult<()> {
    let mut file = std::fs::OpenOptions::new()
      .create(true)
      .append(true)
      .open(path)
      .with_context(|| format!("Failed to open outputs file {}", path.display()))?;
    file
      .write_all(self.to_output_lines().as_bytes())
      .with_context(|| format!("Failed to write outputs file {}", path.display()))?;
    Ok(())
  }

  /// Resolve the outputs file from the environment, if any
  pub fn outputs_file_from_env() -> Option<std::path::PathBuf> {
    for var in ["SHIPWAY_OUTPUT", "GITHUB_OUTPUT"] {
      if let Ok(path) = std::env::var(var)
        && !path.is_empty()
      {
        return Some(std::path::PathBuf::from(path));
      }
    }
    None
  }
}
