//! Integration tests for `shipway collect`

use crate::helpers::{TestWorkspace, run_shipway, run_shipway_raw};
use anyhow::Result;

#[test]
fn test_collect_full_set() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.stage_all()?;

  let output = run_shipway(&ws.path, &["collect", "--no-wait"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("All 4 expected artifact(s)"), "got: {}", stdout);
  assert!(stdout.contains("fab-x86_64-pc-windows-msvc.exe"));

  Ok(())
}

#[test]
fn test_collect_json_listing() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.stage_all()?;

  let output = run_shipway(&ws.path, &["collect", "--no-wait", "--json"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  let listing: serde_json::Value = serde_json::from_str(&stdout)?;
  assert_eq!(listing.as_array().unwrap().len(), 4);

  Ok(())
}

#[test]
fn test_collect_missing_platform_fails() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.stage_artifact("x86_64-unknown-linux-gnu", b"linux")?;
  ws.stage_artifact("x86_64-apple-darwin", b"mac")?;

  let output = run_shipway_raw(&ws.path, &["collect", "--no-wait"])?;
  let stderr = String::from_utf8_lossy(&output.stderr);

  assert_eq!(output.status.code(), Some(3));
  assert!(stderr.contains("Missing artifact"), "got: {}", stderr);

  Ok(())
}

#[test]
fn test_collect_barrier_times_out() -> Result<()> {
  // wait_timeout_secs = 1 in the test config keeps this fast
  let ws = TestWorkspace::new()?;
  ws.stage_artifact("x86_64-unknown-linux-gnu", b"linux")?;

  let output = run_shipway_raw(&ws.path, &["collect"])?;
  assert_eq!(output.status.code(), Some(3));

  Ok(())
}

#[test]
fn test_collect_rejects_contaminated_staging() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.stage_all()?;
  std::fs::write(ws.path.join("staging/fab-old-leftover"), b"stale")?;

  let output = run_shipway_raw(&ws.path, &["collect", "--no-wait"])?;
  let stderr = String::from_utf8_lossy(&output.stderr);

  assert_eq!(output.status.code(), Some(3));
  assert!(stderr.contains("Unexpected file"), "got: {}", stderr);

  Ok(())
}

#[test]
fn test_collect_staging_override() -> Result<()> {
  let ws = TestWorkspace::new()?;
  std::fs::create_dir(ws.path.join("other"))?;
  for target in crate::helpers::TARGETS {
    let name = if target.contains("-windows-") {
      format!("fab-{}.exe", target)
    } else {
      format!("fab-{}", target)
    };
    std::fs::write(ws.path.join("other").join(name), b"bytes")?;
  }

  run_shipway(&ws.path, &["collect", "--no-wait", "--staging", "other"])?;
  Ok(())
}
