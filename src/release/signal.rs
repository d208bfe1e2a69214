//! Signal extraction: did anyone ask for a release?
//!
//! Reads PR labels for the head commit through the release host. Absence of
//! the configured label is a normal, non-error outcome; only an unreachable
//! metadata source fails the run, and that failure is infrastructure class,
//! never interpreted as "no release".

use crate::core::config::SignalConfig;
use crate::core::error::ShipResult;
use crate::release::host::ReleaseHost;
use serde::{Deserialize, Serialize};

/// The release decision for one pipeline run, with provenance
///
/// Produced once per run and immutable afterwards; only the version deducer
/// consumes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseSignal {
  /// Whether the configured label was present on the merged change
  pub requested: bool,

  /// Commit the decision was made for
  pub source_sha: String,

  /// The matching label, when one was found
  pub label: Option<String>,
}

/// Inspect the merged change behind `head_sha` for the release label
pub fn detect(host: &dyn ReleaseHost, config: &SignalConfig, head_sha: &str) -> ShipResult<ReleaseSignal> {
  let labels = host.labels_for_commit(head_sha)?;

  let matched = labels.iter().find(|l| *l == &config.label).cloned();

  Ok(ReleaseSignal {
    requested: matched.is_some(),
    source_sha: head_sha.to_string(),
    label: matched,
  })
}
