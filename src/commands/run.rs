//! Full pipeline: detect, deduce, collect, stamp, publish

use crate::commands::{RepoContext, report_outcome};
use crate::core::config::host_token;
use crate::core::error::ShipResult;
use crate::release::host::GitHubHost;
use crate::release::{Engine, RunMode};
use std::path::PathBuf;

pub fn run_run(staging: Option<PathBuf>, json: bool, output: Option<PathBuf>, dry_run: bool) -> ShipResult<()> {
  let ctx = RepoContext::load()?;

  let token = host_token()?;
  let host = GitHubHost::new(&ctx.config.project.repository, &token, &ctx.config.host)?;

  let staging_dir = ctx.staging_dir(staging);
  let mode = if dry_run { RunMode::DryRun } else { RunMode::Full };

  let outcome = Engine::new(&ctx.config, &host)
    .verbose(!json)
    .run(&staging_dir, &ctx.prior_tags, &ctx.head_sha, mode)?;

  report_outcome(&outcome, json, output.as_deref())
}
