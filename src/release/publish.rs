//! Publishing: the single transaction against the release host
//!
//! Creates the tagged release object and attaches every artifact together
//! with its detached checksum. Idempotent with respect to tag identity in
//! the fail-loud sense: an existing release for the tag means either a
//! version-deduction bug or a concurrent run, and the operation refuses to
//! overwrite or silently succeed. If attachment fails after the release was
//! created, the remnant is left visible for a human to resolve; retrying
//! automatically could attach mismatched artifacts to an existing tag.

use crate::core::error::{RaceError, ResultExt, ShipError, ShipResult};
use crate::release::artifacts::BuildArtifact;
use crate::release::checksum::ManifestEntry;
use crate::release::host::ReleaseHost;
use crate::release::version::ReleaseTag;

/// Create the release for `tag` and attach all artifacts and checksums
///
/// Callers must pass artifacts and entries in 1:1 correspondence; that
/// invariant is re-checked here because a half-stamped set must never reach
/// the host.
pub fn publish(
  host: &dyn ReleaseHost,
  tag: &ReleaseTag,
  source_sha: &str,
  artifacts: &[BuildArtifact],
  entries: &[ManifestEntry],
) -> ShipResult<()> {
  if artifacts.len() != entries.len() {
    return Err(ShipError::message(format!(
      "Manifest mismatch: {} artifacts but {} checksum entries",
      artifacts.len(),
      entries.len()
    )));
  }

  let tag_name = tag.to_string();

  if host.release_exists(&tag_name)? {
    return Err(ShipError::Race(RaceError::DuplicateTag { tag: tag_name }));
  }

  let release = host.create_release(&tag_name, source_sha)?;

  for (artifact, entry) in artifacts.iter().zip(entries) {
    let bytes =
      std::fs::read(&artifact.path).with_context(|| format!("Failed to read artifact {}", artifact.path.display()))?;

    host
      .upload_asset(&release, &artifact.name, &bytes)
      .with_context(|| format!("Failed to attach '{}' to release {}", artifact.name, tag_name))?;
    host
      .upload_asset(&release, &entry.file_name(), entry.file_contents().as_bytes())
      .with_context(|| format!("Failed to attach '{}' to release {}", entry.file_name(), tag_name))?;
  }

  Ok(())
}
