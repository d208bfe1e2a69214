//! Release host abstraction
//!
//! The host is both the metadata source (PR labels for a commit) and the
//! publish target (tagged releases with attached assets). Everything the
//! engine needs from it sits behind `ReleaseHost` so the publish transaction
//! and the scenario tests run against the same seam.
//!
//! The production implementation talks to the GitHub REST API with a
//! blocking client and bounded timeouts. The host refusing a duplicate tag
//! is the system's cross-run mutual exclusion, so 422 on release creation is
//! surfaced as a race error, never retried.

use crate::core::config::HostConfig;
use crate::core::error::{InfraError, RaceError, ShipError, ShipResult};
use serde::Deserialize;

/// Identifier of a created release on the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseId(pub u64);

/// Read/write operations the engine needs from the release host
pub trait ReleaseHost {
  /// Labels attached to merged pull requests associated with a commit
  ///
  /// An empty result is a normal outcome (no PR, or no labels), not an
  /// error. Unreachable host is an infrastructure error.
  fn labels_for_commit(&self, sha: &str) -> ShipResult<Vec<String>>;

  /// Whether a release object already exists for a tag
  fn release_exists(&self, tag: &str) -> ShipResult<bool>;

  /// Create the tagged release object
  fn create_release(&self, tag: &str, target_sha: &str) -> ShipResult<ReleaseId>;

  /// Attach one asset to a created release
  fn upload_asset(&self, release: &ReleaseId, name: &str, bytes: &[u8]) -> ShipResult<()>;
}

/// GitHub REST implementation of `ReleaseHost`
pub struct GitHubHost {
  repository: String,
  api_base_url: String,
  upload_base_url: String,
  token: String,
  client: reqwest::blocking::Client,
}

#[derive(Debug, Deserialize)]
struct PullRequest {
  merged_at: Option<String>,
  #[serde(default)]
  labels: Vec<Label>,
}

#[derive(Debug, Deserialize)]
struct Label {
  name: String,
}

#[derive(Debug, Deserialize)]
struct CreatedRelease {
  id: u64,
}

impl GitHubHost {
  /// Build a host client for `owner/repo` with a bearer token
  pub fn new(repository: &str, token: &str, config: &HostConfig) -> ShipResult<Self> {
    let client = reqwest::blocking::Client::builder()
      .connect_timeout(std::time::Duration::from_secs(15))
      .timeout(config.timeout())
      .build()
      .map_err(|e| {
        ShipError::Infra(InfraError::HostUnreachable {
          url: config.api_base_url.clone(),
          reason: format!("Failed to build HTTP client: {}", e),
        })
      })?;

    Ok(Self {
      repository: repository.to_string(),
      api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
      upload_base_url: config.upload_base_url.trim_end_matches('/').to_string(),
      token: token.to_string(),
      client,
    })
  }

  fn request(&self, builder: reqwest::blocking::RequestBuilder) -> ShipResult<reqwest::blocking::Response> {
    let response = builder
      .header("Authorization", format!("Bearer {}", self.token))
      .header("Accept", "application/vnd.github+json")
      .header("User-Agent", concat!("shipway/", env!("CARGO_PKG_VERSION")))
      .send()?;
    Ok(response)
  }

  fn status_error(response: reqwest::blocking::Response) -> ShipError {
    let status = response.status().as_u16();
    let url = response.url().to_string();
    let body = response.text().unwrap_or_default();
    ShipError::Infra(InfraError::HostStatus { status, url, body })
  }
}

impl ReleaseHost for GitHubHost {
  fn labels_for_commit(&self, sha: &str) -> ShipResult<Vec<String>> {
    let url = format!("{}/repos/{}/commits/{}/pulls", self.api_base_url, self.repository, sha);
    let response = self.request(self.client.get(&url))?;

    if !response.status().is_success() {
      return Err(Self::status_error(response));
    }

    let pulls: Vec<PullRequest> = response.json()?;
    Ok(
      pulls
        .into_iter()
        .filter(|pr| pr.merged_at.is_some())
        .flat_map(|pr| pr.labels.into_iter().map(|l| l.name))
        .collect(),
    )
  }

  fn release_exists(&self, tag: &str) -> ShipResult<bool> {
    let url = format!("{}/repos/{}/releases/tags/{}", self.api_base_url, self.repository, tag);
    let response = self.request(self.client.get(&url))?;

    match response.status().as_u16() {
      200 => Ok(true),
      404 => Ok(false),
      _ => Err(Self::status_error(response)),
    }
  }

  fn create_release(&self, tag: &str, target_sha: &str) -> ShipResult<ReleaseId> {
    let url = format!("{}/repos/{}/releases", self.api_base_url, self.repository);
    let body = serde_json::json!({
      "tag_name": tag,
      "name": tag,
      "target_commitish": target_sha,
    });
    let response = self.request(self.client.post(&url).json(&body))?;

    // 422 means the tag/release already exists: a concurrent run won the
    // race between our pre-check and this call.
    if response.status().as_u16() == 422 {
      return Err(ShipError::Race(RaceError::DuplicateTag { tag: tag.to_string() }));
    }
    if !response.status().is_success() {
      return Err(Self::status_error(response));
    }

    let created: CreatedRelease = response.json()?;
    Ok(ReleaseId(created.id))
  }

  fn upload_asset(&self, release: &ReleaseId, name: &str, bytes: &[u8]) -> ShipResult<()> {
    let url = format!(
      "{}/repos/{}/releases/{}/assets?name={}",
      self.upload_base_url, self.repository, release.0, name
    );
    let response = self.request(
      self
        .client
        .post(&url)
        .header("Content-Type", "application/octet-stream")
        .body(bytes.to_vec()),
    )?;

    if !response.status().is_success() {
      return Err(Self::status_error(response));
    }
    Ok(())
  }
}
