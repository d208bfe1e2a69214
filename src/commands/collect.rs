//! Validate the staged artifact set (CI debugging aid)

use crate::commands::RepoContext;
use crate::core::error::ShipResult;
use crate::release::artifacts;
use std::path::PathBuf;

pub fn run_collect(staging: Option<PathBuf>, no_wait: bool, json: bool) -> ShipResult<()> {
  let ctx = RepoContext::load()?;
  let staging_dir = ctx.staging_dir(staging);

  let artifacts = if no_wait {
    artifacts::collect(&staging_dir, &ctx.config.project.name, &ctx.config.artifacts.targets)?
  } else {
    if !json {
      println!(
        "📦 Waiting for {} artifact(s) in {} (timeout {}s)",
        ctx.config.artifacts.targets.len(),
        staging_dir.display(),
        ctx.config.artifacts.wait_timeout_secs
      );
    }
    artifacts::wait_and_collect(
      &staging_dir,
      &ctx.config.project.name,
      &ctx.config.artifacts.targets,
      ctx.config.artifacts.wait_timeout(),
      ctx.config.artifacts.poll_interval(),
    )?
  };

  if json {
    let listing: Vec<_> = artifacts
      .iter()
      .map(|a| serde_json::json!({ "name": a.name, "target": a.target }))
      .collect();
    println!("{}", serde_json::to_string_pretty(&listing)?);
  } else {
    println!("✅ All {} expected artifact(s) staged:", artifacts.len());
    for artifact in &artifacts {
      println!("   {} ({})", artifact.name, artifact.target);
    }
  }

  Ok(())
}
