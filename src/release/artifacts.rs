//! Artifact collection: gather the per-platform build outputs
//!
//! Build jobs run concurrently and race to drop their binaries into the
//! staging directory in arbitrary order. Collection is the synchronization
//! barrier: it polls with a bounded timeout until the expected set is fully
//! present, then validates that nothing unexpected is staged alongside. A
//! release never ships a partial platform matrix, and artifact bytes are
//! never mutated here.

use crate::core::error::{IntegrityError, ShipError, ShipResult};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// A staged binary for one target platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildArtifact {
  /// File name, `<project>-<target-triple>[.exe]`
  pub name: String,

  /// Platform triple this binary was built for
  pub target: String,

  /// Location in the staging directory
  pub path: PathBuf,
}

/// Expected staged file name for a project/target pair
///
/// Windows targets carry the `.exe` suffix; everything else is bare.
pub fn expected_name(project: &str, target: &str) -> String {
  if target.contains("-windows-") {
    format!("{}-{}.exe", project, target)
  } else {
    format!("{}-{}", project, target)
  }
}

/// Validate the staging directory against the expected platform set, once
///
/// Fails with `MissingArtifact` for the first absent platform and
/// `UnexpectedArtifact` for any staged file outside the naming convention.
/// Detached `.sha256` companions of expected artifacts are tolerated so the
/// check can rerun after stamping.
pub fn collect(staging_dir: &Path, project: &str, targets: &[String]) -> ShipResult<Vec<BuildArtifact>> {
  let mut artifacts = Vec::with_capacity(targets.len());

  for target in targets {
    let name = expected_name(project, target);
    let path = staging_dir.join(&name);
    if !path.is_file() {
      return Err(ShipError::Integrity(IntegrityError::MissingArtifact {
        target: target.clone(),
        expected_name: name,
      }));
    }
    artifacts.push(BuildArtifact {
      name,
      target: target.clone(),
      path,
    });
  }

  let expected: Vec<String> = artifacts.iter().map(|a| a.name.clone()).collect();
  for entry in std::fs::read_dir(staging_dir)? {
    let entry = entry?;
    let file_name = entry.file_name().to_string_lossy().to_string();

    if expected.iter().any(|name| &file_name == name) {
      continue;
    }
    if let Some(stem) = file_name.strip_suffix(".sha256")
      && expected.iter().any(|name| name == stem)
    {
      continue;
    }

    return Err(ShipError::Integrity(IntegrityError::UnexpectedArtifact {
      file: file_name,
    }));
  }

  Ok(artifacts)
}

/// Barrier: poll until the full expected set is staged, or time out
///
/// Completion order is arbitrary, so this re-checks the whole set on every
/// poll. The wait is bounded; on timeout the missing platform is reported
/// rather than hanging the run. Unexpected files fail immediately without
/// waiting out the clock.
pub fn wait_and_collect(
  staging_dir: &Path,
  project: &str,
  targets: &[String],
  timeout: Duration,
  poll_interval: Duration,
) -> ShipResult<Vec<BuildArtifact>> {
  let deadline = Instant::now() + timeout;

  loop {
    match collect(staging_dir, project, targets) {
      Ok(artifacts) => return Ok(artifacts),
      Err(err @ ShipError::Integrity(IntegrityError::UnexpectedArtifact { .. })) => return Err(err),
      Err(err) => {
        if Instant::now() >= deadline {
          return Err(err);
        }
      }
    }

    let remaining = deadline.saturating_duration_since(Instant::now());
    std::thread::sleep(poll_interval.min(remaining));
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const TARGETS: [&str; 4] = [
    "x86_64-unknown-linux-gnu",
    "x86_64-apple-darwin",
    "aarch64-apple-darwin",
    "x86_64-pc-windows-msvc",
  ];

  fn targets() -> Vec<String> {
    TARGETS.iter().map(|s| s.to_string()).collect()
  }

  fn stage_all(dir: &Path) {
    for target in TARGETS {
      std::fs::write(dir.join(expected_name("fab", target)), target.as_bytes()).unwrap();
    }
  }

  #[test]
  fn test_expected_name_appends_exe_for_windows() {
    assert_eq!(expected_name("fab", "x86_64-pc-windows-msvc"), "fab-x86_64-pc-windows-msvc.exe");
    assert_eq!(expected_name("fab", "x86_64-unknown-linux-gnu"), "fab-x86_64-unknown-linux-gnu");
  }

  #[test]
  fn test_collect_full_set_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    stage_all(dir.path());

    let artifacts = collect(dir.path(), "fab", &targets()).unwrap();
    assert_eq!(artifacts.len(), 4);
    assert!(artifacts.iter().any(|a| a.name.ends_with(".exe")));
  }

  #[test]
  fn test_collect_missing_platform_fails() {
    let dir = tempfile::tempdir().unwrap();
    stage_all(dir.path());
    std::fs::remove_file(dir.path().join("fab-aarch64-apple-darwin")).unwrap();

    let err = collect(dir.path(), "fab", &targets()).unwrap_err();
    match err {
      ShipError::Integrity(IntegrityError::MissingArtifact { target, .. }) => {
        assert_eq!(target, "aarch64-apple-darwin");
      }
      other => panic!("expected MissingArtifact, got {:?}", other),
    }
  }

  #[test]
  fn test_collect_rejects_unexpected_file() {
    let dir = tempfile::tempdir().unwrap();
    stage_all(dir.path());
    std::fs::write(dir.path().join("fab-stale-upload"), b"junk").unwrap();

    let err = collect(dir.path(), "fab", &targets()).unwrap_err();
    assert!(matches!(
      err,
      ShipError::Integrity(IntegrityError::UnexpectedArtifact { .. })
    ));
  }

  #[test]
  fn test_collect_tolerates_own_checksum_files() {
    let dir = tempfile::tempdir().unwrap();
    stage_all(dir.path());
    std::fs::write(dir.path().join("fab-x86_64-apple-darwin.sha256"), b"deadbeef\n").unwrap();

    assert!(collect(dir.path(), "fab", &targets()).is_ok());
  }

  #[test]
  fn test_collect_rejects_foreign_checksum_file() {
    let dir = tempfile::tempdir().unwrap();
    stage_all(dir.path());
    std::fs::write(dir.path().join("other-tool.sha256"), b"deadbeef\n").unwrap();

    let err = collect(dir.path(), "fab", &targets()).unwrap_err();
    assert!(matches!(
      err,
      ShipError::Integrity(IntegrityError::UnexpectedArtifact { .. })
    ));
  }

  #[test]
  fn test_barrier_waits_for_late_artifact() {
    let dir = tempfile::tempdir().unwrap();
    stage_all(dir.path());
    let late = dir.path().join("fab-x86_64-unknown-linux-gnu");
    std::fs::remove_file(&late).unwrap();

    let staging = dir.path().to_path_buf();
    let writer = std::thread::spawn(move || {
      std::thread::sleep(Duration::from_millis(150));
      std::fs::write(late, b"linux binary").unwrap();
    });

    let artifacts = wait_and_collect(
      &staging,
      "fab",
      &targets(),
      Duration::from_secs(5),
      Duration::from_millis(25),
    )
    .unwrap();
    writer.join().unwrap();
    assert_eq!(artifacts.len(), 4);
  }

  #[test]
  fn test_barrier_times_out_with_missing_artifact() {
    let dir = tempfile::tempdir().unwrap();
    stage_all(dir.path());
    std::fs::remove_file(dir.path().join("fab-x86_64-apple-darwin")).unwrap();

    let err = wait_and_collect(
      dir.path(),
      "fab",
      &targets(),
      Duration::from_millis(100),
      Duration::from_millis(20),
    )
    .unwrap_err();
    assert!(matches!(
      err,
      ShipError::Integrity(IntegrityError::MissingArtifact { .. })
    ));
  }

  #[test]
  fn test_barrier_fails_fast_on_unexpected_file() {
    let dir = tempfile::tempdir().unwrap();
    stage_all(dir.path());
    std::fs::write(dir.path().join("contaminant"), b"junk").unwrap();

    let start = Instant::now();
    let err = wait_and_collect(
      dir.path(),
      "fab",
      &targets(),
      Duration::from_secs(30),
      Duration::from_millis(20),
    )
    .unwrap_err();
    assert!(start.elapsed() < Duration::from_secs(5));
    assert!(matches!(
      err,
      ShipError::Integrity(IntegrityError::UnexpectedArtifact { .. })
    ));
  }
}
