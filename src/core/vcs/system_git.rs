//! System git backend - zero dependencies
//!
//! Uses git plumbing commands with an isolated environment. The engine only
//! needs read access: the head commit the decision is made for, and the set
//! of existing release tags. Tags are read fresh on every call, never cached
//! across runs, because they are the monotonicity source shared between runs.

use crate::core::error::{GitError, ResultExt, ShipError, ShipResult};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Git backend using system git (zero crate dependencies)
#[derive(Debug)]
pub struct SystemGit {
  /// Repository working directory
  repo_path: PathBuf,
}

impl SystemGit {
  /// Open a git repository
  ///
  /// This performs ONE subprocess call to validate the repository.
  pub fn open(path: &Path) -> ShipResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(ShipError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(ShipError::message(format!("Failed to open git repository: {}", stderr)));
    }

    Ok(Self {
      repo_path: path.to_path_buf(),
    })
  }

  /// Get HEAD commit SHA
  pub fn head_commit(&self) -> ShipResult<String> {
    let output = self
      .git_cmd()
      .args(["rev-parse", "HEAD"])
      .output()
      .context("Failed to get HEAD commit")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(ShipError::Git(GitError::CommandFailed {
        command: "git rev-parse HEAD".to_string(),
        stderr: stderr.to_string(),
      }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// List all tag names in the repository
  pub fn list_tags(&self) -> ShipResult<Vec<String>> {
    let output = self
      .git_cmd()
      .args(["tag", "--list"])
      .output()
      .context("Failed to list tags")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(ShipError::Git(GitError::CommandFailed {
        command: "git tag --list".to_string(),
        stderr: stderr.to_string(),
      }));
    }

    Ok(
      String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect(),
    )
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to repo path
  /// - Clears environment variables
  /// - Whitelists only PATH and HOME
  /// - Adds safe configuration overrides
  fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);

    // Isolated environment (don't trust global config)
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    // Force safe behavior (override user config)
    cmd.arg("-c").arg("protocol.version=2");
    cmd.arg("-c").arg("advice.detachedHead=false");
    cmd.arg("-c").arg("core.quotePath=false"); // Don't escape non-ASCII

    cmd
  }
}
