//! Command implementations
//!
//! Thin glue between the CLI surface and the engine: load config, open the
//! repository, build the host client, run, report.

mod checksum;
mod collect;
mod detect;
mod run;

pub use checksum::run_checksum;
pub use collect::run_collect;
pub use detect::run_detect;
pub use run::run_run;

use crate::core::config::ShipConfig;
use crate::core::error::ShipResult;
use crate::core::outcome::ReleaseOutcome;
use crate::core::vcs::SystemGit;
use crate::release::version::{self, ReleaseTag};
use std::path::{Path, PathBuf};

/// Everything a command needs about the repository it runs in
pub(crate) struct RepoContext {
  pub config: ShipConfig,
  pub head_sha: String,
  pub prior_tags: Vec<ReleaseTag>,
}

impl RepoContext {
  /// Load config and read repository state from the current directory
  ///
  /// Tags are read fresh here, once per run, and handed to the engine;
  /// nothing caches them across runs.
  pub fn load() -> ShipResult<Self> {
    let cwd = std::env::current_dir()?;
    let config = ShipConfig::load(&cwd)?;

    let repo = SystemGit::open(&cwd)?;
    let head_sha = repo.head_commit()?;
    let tag_names = repo.list_tags()?;
    let prior_tags = version::parse_prior_tags(&tag_names);

    Ok(Self {
      config,
      head_sha,
      prior_tags,
    })
  }

  /// Staging directory: CLI override wins over config
  pub fn staging_dir(&self, flag: Option<PathBuf>) -> PathBuf {
    flag.unwrap_or_else(|| self.config.artifacts.staging_dir.clone())
  }
}

/// Report an outcome on stdout and into the pipeline outputs file
pub(crate) fn report_outcome(outcome: &ReleaseOutcome, json: bool, output: Option<&Path>) -> ShipResult<()> {
  if json {
    println!("{}", serde_json::to_string_pretty(outcome)?);
  } else if outcome.detected {
    println!("✅ Release detected: {}", outcome.tag.as_deref().unwrap_or(""));
  } else {
    println!("✅ Nothing to do (no release requested)");
  }

  let outputs_file = output.map(Path::to_path_buf).or_else(ReleaseOutcome::outputs_file_from_env);
  if let Some(path) = outputs_file {
    outcome.write_outputs(&path)?;
  }

  Ok(())
}
