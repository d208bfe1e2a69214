//! Integrity stamping: detached SHA-256 manifest entries per artifact
//!
//! A digest is a pure function of the artifact's bytes. Each entry is also
//! written as `<artifact-name>.sha256` next to the artifact, one lowercase
//! hex line, so a downstream consumer can verify integrity without trusting
//! the transport. An unreadable artifact aborts the whole run; a partial
//! manifest never escapes this module.

use crate::core::error::{IntegrityError, ShipError, ShipResult};
use crate::release::artifacts::BuildArtifact;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One verified checksum record binding an artifact to its content digest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
  /// Artifact file name the digest belongs to
  pub artifact_name: String,

  /// 64 lowercase hex characters of SHA-256 over the exact bytes
  pub sha256_hex: String,
}

impl ManifestEntry {
  /// File name of the detached checksum companion
  pub fn file_name(&self) -> String {
    format!("{}.sha256", self.artifact_name)
  }

  /// Contents of the detached checksum file: a single hex line
  pub fn file_contents(&self) -> String {
    format!("{}\n", self.sha256_hex)
  }
}

/// SHA-256 of a byte slice, lowercase hex
pub fn digest_bytes(bytes: &[u8]) -> String {
  let mut hasher = Sha256::new();
  hasher.update(bytes);
  format!("{:x}", hasher.finalize())
}

/// Compute manifest entries for every artifact and write the detached files
///
/// Digests are computed in parallel; results come back in artifact order so
/// the manifest is deterministic. The 1:1 correspondence between artifacts
/// and entries holds by construction: any failure aborts before anything is
/// returned.
pub fn stamp(artifacts: &[BuildArtifact]) -> ShipResult<Vec<ManifestEntry>> {
  let entries: Vec<ManifestEntry> = artifacts
    .par_iter()
    .map(|artifact| {
      let bytes = std::fs::read(&artifact.path).map_err(|e| {
        ShipError::Integrity(IntegrityError::DigestFailed {
          name: artifact.name.clone(),
          reason: e.to_string(),
        })
      })?;

      Ok(ManifestEntry {
        artifact_name: artifact.name.clone(),
        sha256_hex: digest_bytes(&bytes),
      })
    })
    .collect::<ShipResult<Vec<_>>>()?;

  for (artifact, entry) in artifacts.iter().zip(&entries) {
    let checksum_path = artifact.path.with_file_name(entry.file_name());
    std::fs::write(&checksum_path, entry.file_contents()).map_err(|e| {
      ShipError::Integrity(IntegrityError::DigestFailed {
        name: artifact.name.clone(),
        reason: format!("failed to write {}: {}", checksum_path.display(), e),
      })
    })?;
  }

  Ok(entries)
}
