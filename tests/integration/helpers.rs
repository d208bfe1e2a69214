//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub const TARGETS: [&str; 4] = [
  "x86_64-unknown-linux-gnu",
  "x86_64-apple-darwin",
  "aarch64-apple-darwin",
  "x86_64-pc-windows-msvc",
];

/// A test repository with a shipway.toml and a staging directory
pub struct TestWorkspace {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestWorkspace {
  /// Create a git repo with one commit and a default shipway config
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;

    std::fs::write(
      path.join("shipway.toml"),
      r#"[project]
name = "fab"
repository = "acme/fab"

[artifacts]
targets = [
  "x86_64-unknown-linux-gnu",
  "x86_64-apple-darwin",
  "aarch64-apple-darwin",
  "x86_64-pc-windows-msvc",
]
staging_dir = "staging"
wait_timeout_secs = 1
poll_interval_secs = 1
"#,
    )?;

    std::fs::create_dir(path.join("staging"))?;
    git(&path, &["add", "."])?;
    git(&path, &["commit", "-m", "Initial setup"])?;

    Ok(Self { _root: root, path })
  }

  /// Stage a binary for one target with the expected file name
  pub fn stage_artifact(&self, target: &str, contents: &[u8]) -> Result<PathBuf> {
    let name = if target.contains("-windows-") {
      format!("fab-{}.exe", target)
    } else {
      format!("fab-{}", target)
    };
    let path = self.path.join("staging").join(name);
    std::fs::write(&path, contents)?;
    Ok(path)
  }

  /// Stage all four expected platform binaries
  pub fn stage_all(&self) -> Result<()> {
    for target in TARGETS {
      self.stage_artifact(target, target.as_bytes())?;
    }
    Ok(())
  }

  /// Read a file relative to the workspace root
  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run the shipway binary, expecting success
pub fn run_shipway(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_shipway_raw(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "shipway command failed: shipway {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

/// Run the shipway binary and return the output regardless of exit status
///
/// Host credentials are stripped from the environment so tests never talk to
/// a real release host by accident.
pub fn run_shipway_raw(cwd: &Path, args: &[&str]) -> Result<Output> {
  let shipway_bin = env!("CARGO_BIN_EXE_shipway");

  let output = Command::new(shipway_bin)
    .current_dir(cwd)
    .args(args)
    .env_remove("SHIPWAY_TOKEN")
    .env_remove("GITHUB_TOKEN")
    .env_remove("SHIPWAY_OUTPUT")
    .env_remove("GITHUB_OUTPUT")
    .output()
    .context("Failed to run shipway")?;

  Ok(output)
}
