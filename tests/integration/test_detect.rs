//! Integration tests for configuration and error surfaces of `shipway detect`
//!
//! Detection itself needs a reachable release host; these tests cover the
//! offline failure paths and their exit codes.

use crate::helpers::{TestWorkspace, run_shipway_raw};
use anyhow::Result;

#[test]
fn test_detect_without_token_is_user_error() -> Result<()> {
  let ws = TestWorkspace::new()?;

  let output = run_shipway_raw(&ws.path, &["detect"])?;
  let stderr = String::from_utf8_lossy(&output.stderr);

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr.contains("SHIPWAY_TOKEN"), "got: {}", stderr);

  Ok(())
}

#[test]
fn test_missing_config_is_user_error() -> Result<()> {
  let ws = TestWorkspace::new()?;
  std::fs::remove_file(ws.path.join("shipway.toml"))?;

  let output = run_shipway_raw(&ws.path, &["detect"])?;
  let stderr = String::from_utf8_lossy(&output.stderr);

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr.contains("shipway.toml"), "got: {}", stderr);

  Ok(())
}

#[test]
fn test_outside_git_repo_is_infra_error() -> Result<()> {
  let dir = tempfile::tempdir()?;
  std::fs::write(
    dir.path().join("shipway.toml"),
    r#"[project]
name = "fab"
repository = "acme/fab"

[artifacts]
targets = ["x86_64-unknown-linux-gnu"]
"#,
  )?;

  let output = run_shipway_raw(dir.path(), &["detect"])?;
  let stderr = String::from_utf8_lossy(&output.stderr);

  assert_eq!(output.status.code(), Some(2));
  assert!(stderr.contains("repository"), "got: {}", stderr);

  Ok(())
}

#[test]
fn test_invalid_config_reports_field() -> Result<()> {
  let ws = TestWorkspace::new()?;
  std::fs::write(
    ws.path.join("shipway.toml"),
    r#"[project]
name = "fab"
repository = "not-a-slug"

[artifacts]
targets = ["x86_64-unknown-linux-gnu"]
"#,
  )?;

  let output = run_shipway_raw(&ws.path, &["detect"])?;
  let stderr = String::from_utf8_lossy(&output.stderr);

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr.contains("project.repository"), "got: {}", stderr);

  Ok(())
}
