//! Signal detection and tag deduction without touching artifacts
//!
//! Lets the pipeline decide early whether any publish-related step needs to
//! run at all. Skipping downstream work on `release-detected=false` must be
//! indistinguishable from "ran and did nothing".

use crate::commands::{RepoContext, report_outcome};
use crate::core::config::host_token;
use crate::core::error::ShipResult;
use crate::release::host::GitHubHost;
use crate::release::{Engine, RunMode};
use std::path::{Path, PathBuf};

pub fn run_detect(json: bool, output: Option<PathBuf>) -> ShipResult<()> {
  let ctx = RepoContext::load()?;

  let token = host_token()?;
  let host = GitHubHost::new(&ctx.config.project.repository, &token, &ctx.config.host)?;

  let outcome = Engine::new(&ctx.config, &host).verbose(!json).run(
    Path::new("."),
    &ctx.prior_tags,
    &ctx.head_sha,
    RunMode::DetectOnly,
  )?;

  report_outcome(&outcome, json, output.as_deref())
}
