//! Stamp staged artifacts with detached SHA-256 files

use crate::commands::RepoContext;
use crate::core::error::ShipResult;
use crate::release::{artifacts, checksum};
use std::path::PathBuf;

pub fn run_checksum(staging: Option<PathBuf>, json: bool) -> ShipResult<()> {
  let ctx = RepoContext::load()?;
  let staging_dir = ctx.staging_dir(staging);

  let artifacts = artifacts::collect(&staging_dir, &ctx.config.project.name, &ctx.config.artifacts.targets)?;
  let entries = checksum::stamp(&artifacts)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&entries)?);
  } else {
    println!("🔐 Stamped {} artifact(s):", entries.len());
    for entry in &entries {
      println!("   {}  {}", entry.sha256_hex, entry.artifact_name);
    }
  }

  Ok(())
}
