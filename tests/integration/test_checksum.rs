//! Integration tests for `shipway checksum`

use crate::helpers::{TARGETS, TestWorkspace, run_shipway};
use anyhow::Result;

#[test]
fn test_checksum_writes_detached_files() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.stage_all()?;

  run_shipway(&ws.path, &["checksum"])?;

  for target in TARGETS {
    let name = if target.contains("-windows-") {
      format!("fab-{}.exe", target)
    } else {
      format!("fab-{}", target)
    };
    let digest = ws.read_file(&format!("staging/{}.sha256", name))?;
    let digest = digest.trim();
    assert_eq!(digest.len(), 64, "digest for {} should be 64 hex chars", name);
    assert!(
      digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()),
      "digest for {} should be lowercase hex",
      name
    );
  }

  Ok(())
}

#[test]
fn test_checksum_is_deterministic_across_runs() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.stage_all()?;

  run_shipway(&ws.path, &["checksum"])?;
  let first = ws.read_file("staging/fab-x86_64-unknown-linux-gnu.sha256")?;

  run_shipway(&ws.path, &["checksum"])?;
  let second = ws.read_file("staging/fab-x86_64-unknown-linux-gnu.sha256")?;

  assert_eq!(first, second, "same bytes must always yield the same digest");
  Ok(())
}

#[test]
fn test_checksum_json_manifest() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.stage_all()?;

  let output = run_shipway(&ws.path, &["checksum", "--json"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  let entries: serde_json::Value = serde_json::from_str(&stdout)?;
  let entries = entries.as_array().expect("manifest should be a JSON array");
  assert_eq!(entries.len(), 4);
  for entry in entries {
    assert_eq!(entry["sha256_hex"].as_str().unwrap().len(), 64);
  }

  Ok(())
}

#[test]
fn test_checksum_refuses_incomplete_set() -> Result<()> {
  let ws = TestWorkspace::new()?;
  for target in &TARGETS[..3] {
    ws.stage_artifact(target, b"bytes")?;
  }

  let output = crate::helpers::run_shipway_raw(&ws.path, &["checksum"])?;
  assert_eq!(output.status.code(), Some(3), "data-integrity failures exit with 3");

  // no partial manifest
  for target in &TARGETS[..3] {
    let name = format!("fab-{}", target);
    assert!(
      !ws.path.join(format!("staging/{}.sha256", name)).exists(),
      "no checksum file should exist for {}",
      name
    );
  }

  Ok(())
}
