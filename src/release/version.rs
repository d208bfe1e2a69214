//! Version deduction: mint the next release tag from prior tags
//!
//! Deduction is a pure function of (signal, prior tags) so a rerun after a
//! partial failure computes the same answer. Policy: minor bump of the
//! highest prior tag, `v0.1.0` when no prior tag exists. The label only says
//! "release", not how big, so the engine never picks major or patch on its
//! own.

use crate::core::error::{RaceError, ShipError, ShipResult};
use crate::release::signal::ReleaseSignal;
use semver::Version;
use std::fmt;

/// A unique, ordered release identifier
///
/// Rendered as `v{major}.{minor}.{patch}`. Ordering is semver ordering, so
/// "latest" is well defined across all prior tags.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReleaseTag(Version);

impl ReleaseTag {
  /// First tag ever minted for a repository with no release history
  pub fn initial() -> Self {
    Self(Version::new(0, 1, 0))
  }

  /// Parse a tag name
  ///
  /// Accepts `vX.Y.Z` (preferred) and bare `X.Y.Z`. Anything else is not a
  /// release tag and is ignored by the deducer rather than treated as an
  /// error; repositories carry all kinds of unrelated tags.
  pub fn parse(tag_name: &str) -> Option<Self> {
    let version_str = tag_name.strip_prefix('v').unwrap_or(tag_name);
    version_str.parse::<Version>().ok().map(Self)
  }

  /// The tag with the minor component bumped and patch reset
  pub fn bump_minor(&self) -> Self {
    Self(Version::new(self.0.major, self.0.minor + 1, 0))
  }

  pub fn version(&self) -> &Version {
    &self.0
  }
}

impl fmt::Display for ReleaseTag {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "v{}", self.0)
  }
}

/// Parse release tags out of a raw tag list, ignoring non-release tags
pub fn parse_prior_tags(tag_names: &[String]) -> Vec<ReleaseTag> {
  tag_names.iter().filter_map(|name| ReleaseTag::parse(name)).collect()
}

/// Compute the next release tag for a requested signal
///
/// Returns `None` when no release was requested (terminal, successful
/// no-op). Otherwise the result is strictly greater than every prior tag;
/// that is checked explicitly so a bug upstream cannot mint a non-monotonic
/// tag.
pub fn deduce(signal: &ReleaseSignal, prior_tags: &[ReleaseTag]) -> ShipResult<Option<ReleaseTag>> {
  if !signal.requested {
    return Ok(None);
  }

  let next = match prior_tags.iter().max() {
    Some(latest) => {
      let next = latest.bump_minor();
      if next <= *latest {
        return Err(ShipError::Race(RaceError::NonMonotonicTag {
          tag: next.to_string(),
          latest: latest.to_string(),
        }));
      }
      next
    }
    None => ReleaseTag::initial(),
  };

  Ok(Some(next))
}
