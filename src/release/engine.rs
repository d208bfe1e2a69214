//! Stage orchestration for one pipeline run
//!
//! Stages execute strictly in sequence because each depends on the previous
//! stage's output:
//!
//! ```text
//! START -> SIGNAL_EVALUATED -> NO_RELEASE            (terminal success)
//!                           -> TAG_DEDUCED
//!                              -> ARTIFACTS_COLLECTED
//!                              -> MANIFEST_STAMPED
//!                              -> PUBLISHED           (terminal success)
//! any transition may fail   -> FAILED                 (terminal error)
//! ```
//!
//! No stage is re-entrant within one run; a fresh run always starts at
//! `Start`. The engine owns nothing external: the host and the staged files
//! are injected, which is what makes the scenario tests possible.

use crate::core::config::ShipConfig;
use crate::core::error::{RaceError, ShipError, ShipResult};
use crate::core::outcome::ReleaseOutcome;
use crate::release::host::ReleaseHost;
use crate::release::version::ReleaseTag;
use crate::release::{artifacts, checksum, publish, signal, version};
use std::path::Path;

/// Engine state for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
  Start,
  SignalEvaluated,
  NoRelease,
  TagDeduced,
  ArtifactsCollected,
  ManifestStamped,
  Published,
  Failed,
}

impl RunState {
  /// Whether the run ends here
  pub fn is_terminal(self) -> bool {
    matches!(self, RunState::NoRelease | RunState::Published | RunState::Failed)
  }

  /// Legal forward transitions; everything may fail
  pub fn can_advance_to(self, next: RunState) -> bool {
    if next == RunState::Failed {
      return !self.is_terminal();
    }
    matches!(
      (self, next),
      (RunState::Start, RunState::SignalEvaluated)
        | (RunState::SignalEvaluated, RunState::NoRelease)
        | (RunState::SignalEvaluated, RunState::TagDeduced)
        | (RunState::TagDeduced, RunState::ArtifactsCollected)
        | (RunState::ArtifactsCollected, RunState::ManifestStamped)
        | (RunState::ManifestStamped, RunState::Published)
    )
  }
}

/// How far the engine should go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
  /// Signal + tag deduction only; no artifact or host writes
  DetectOnly,
  /// Everything except the publish transaction
  DryRun,
  /// The full pipeline
  Full,
}

/// The release engine: decides, collects, stamps, publishes
pub struct Engine<'a> {
  config: &'a ShipConfig,
  host: &'a dyn ReleaseHost,
  verbose: bool,
}

impl<'a> Engine<'a> {
  pub fn new(config: &'a ShipConfig, host: &'a dyn ReleaseHost) -> Self {
    Self {
      config,
      host,
      verbose: false,
    }
  }

  /// Print stage progress to stdout (off for --json callers)
  pub fn verbose(mut self, verbose: bool) -> Self {
    self.verbose = verbose;
    self
  }

  fn say(&self, line: &str) {
    if self.verbose {
      println!("{}", line);
    }
  }

  /// Drive one run from `Start` to a terminal state
  ///
  /// `prior_tags` must be a fresh read from the repository; the engine never
  /// caches them across runs.
  pub fn run(
    &self,
    staging_dir: &Path,
    prior_tags: &[ReleaseTag],
    head_sha: &str,
    mode: RunMode,
  ) -> ShipResult<ReleaseOutcome> {
    let mut state = RunState::Start;

    let signal = signal::detect(self.host, &self.config.signal, head_sha)?;
    self.advance(&mut state, RunState::SignalEvaluated);

    let tag = match version::deduce(&signal, prior_tags)? {
      Some(tag) => tag,
      None => {
        self.advance(&mut state, RunState::NoRelease);
        self.say("ℹ️  No release requested for this commit");
        return Ok(ReleaseOutcome::no_release(head_sha));
      }
    };

    // Deduction races with concurrent runs; the host is the authority on
    // which tags are already taken.
    if self.host.release_exists(&tag.to_string())? {
      return Err(ShipError::Race(RaceError::DuplicateTag { tag: tag.to_string() }));
    }
    self.advance(&mut state, RunState::TagDeduced);
    self.say(&format!("🏷️  Release requested: {}", tag));

    if mode == RunMode::DetectOnly {
      return Ok(ReleaseOutcome::released(tag.to_string(), head_sha));
    }

    self.say(&format!(
      "📦 Waiting for {} artifact(s) in {}",
      self.config.artifacts.targets.len(),
      staging_dir.display()
    ));
    let artifacts = artifacts::wait_and_collect(
      staging_dir,
      &self.config.project.name,
      &self.config.artifacts.targets,
      self.config.artifacts.wait_timeout(),
      self.config.artifacts.poll_interval(),
    )?;
    self.advance(&mut state, RunState::ArtifactsCollected);
    self.say(&format!("   Collected {} artifact(s)", artifacts.len()));

    let entries = checksum::stamp(&artifacts)?;
    self.advance(&mut state, RunState::ManifestStamped);
    self.say(&format!("🔐 Stamped {} checksum(s)", entries.len()));

    if mode == RunMode::DryRun {
      self.say(&format!("🔍 Dry-run: would publish {} with {} asset(s)", tag, entries.len() * 2));
      return Ok(ReleaseOutcome::released(tag.to_string(), head_sha));
    }

    publish::publish(self.host, &tag, head_sha, &artifacts, &entries)?;
    self.advance(&mut state, RunState::Published);
    self.say(&format!("🚀 Published {}", tag));

    Ok(ReleaseOutcome::released(tag.to_string(), head_sha))
  }

  fn advance(&self, state: &mut RunState, next: RunState) {
    debug_assert!(state.can_advance_to(next), "illegal transition {:?} -> {:?}", state, next);
    *state = next;
  }
}
