use crate::core::error::{ConfigError, ResultExt, ShipError, ShipResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for shipway
/// Searched in order: shipway.toml, .shipway.toml, .config/shipway.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipConfig {
  pub project: ProjectConfig,
  #[serde(default)]
  pub signal: SignalConfig,
  pub artifacts: ArtifactsConfig,
  #[serde(default)]
  pub host: HostConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
  /// Artifact basename: staged binaries are named `<name>-<target-triple>[.exe]`
  pub name: String,

  /// `owner/repo` slug on the release host
  pub repository: String,
}

/// Release-signal configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalConfig {
  /// PR label that requests a release (default: "release")
  #[serde(default = "default_release_label")]
  pub label: String,
}

fn default_release_label() -> String {
  "release".to_string()
}

impl Default for SignalConfig {
  fn default() -> Self {
    Self {
      label: default_release_label(),
    }
  }
}

/// Artifact staging and barrier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactsConfig {
  /// Expected platform target triples, one binary each
  pub targets: Vec<String>,

  /// Directory where build jobs stage their binaries
  #[serde(default = "default_staging_dir")]
  pub staging_dir: PathBuf,

  /// Upper bound on waiting for the full artifact set (seconds)
  #[serde(default = "default_wait_timeout_secs")]
  pub wait_timeout_secs: u64,

  /// Poll interval while waiting (seconds)
  #[serde(default = "default_poll_interval_secs")]
  pub poll_interval_secs: u64,
}

fn default_staging_dir() -> PathBuf {
  PathBuf::from("staging")
}

fn default_wait_timeout_secs() -> u64 {
  1800
}

fn default_poll_interval_secs() -> u64 {
  10
}

impl ArtifactsConfig {
  pub fn wait_timeout(&self) -> Duration {
    Duration::from_secs(self.wait_timeout_secs)
  }

  pub fn poll_interval(&self) -> Duration {
    Duration::from_secs(self.poll_interval_secs)
  }
}

/// Release host endpoints and timeouts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
  /// API base URL (default: `https://api.github.com`)
  #[serde(default = "default_api_base_url")]
  pub api_base_url: String,

  /// Asset upload base URL (default: `https://uploads.github.com`)
  #[serde(default = "default_upload_base_url")]
  pub upload_base_url: String,

  /// Per-request timeout (seconds)
  #[serde(default = "default_host_timeout_secs")]
  pub timeout_secs: u64,
}

fn default_api_base_url() -> String {
  "https://api.github.com".to_string()
}

fn default_upload_base_url() -> String {
  "https://uploads.github.com".to_string()
}

fn default_host_timeout_secs() -> u64 {
  60
}

impl Default for HostConfig {
  fn default() -> Self {
    Self {
      api_base_url: default_api_base_url(),
      upload_base_url: default_upload_base_url(),
      timeout_secs: default_host_timeout_secs(),
    }
  }
}

impl HostConfig {
  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }
}

impl ShipConfig {
  /// Load config from the workspace root
  pub fn load(path: &Path) -> ShipResult<Self> {
    let config_path = Self::find_config_path(path).ok_or_else(|| {
      ShipError::Config(ConfigError::NotFound {
        search_root: path.to_path_buf(),
      })
    })?;

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config = Self::parse(&content).with_context(|| format!("Invalid configuration in {}", config_path.display()))?;

    Ok(config)
  }

  /// Parse config from TOML file contents
  pub fn parse(content: &str) -> ShipResult<Self> {
    let config: ShipConfig = toml_edit::de::from_str(content)?;
    config.validate()?;
    Ok(config)
  }

  fn find_config_path(root: &Path) -> Option<PathBuf> {
    let candidates = ["shipway.toml", ".shipway.toml", ".config/shipway.toml"];
    candidates.iter().map(|c| root.join(c)).find(|p| p.is_file())
  }

  fn validate(&self) -> ShipResult<()> {
    if self.project.name.is_empty() {
      return Err(ShipError::Config(ConfigError::MissingField {
        field: "project.name".to_string(),
      }));
    }

    let (owner, repo) = match self.project.repository.split_once('/') {
      Some(parts) => parts,
      None => {
        return Err(ShipError::Config(ConfigError::Invalid {
          field: "project.repository".to_string(),
          reason: format!("expected 'owner/repo', got '{}'", self.project.repository),
        }));
      }
    };
    if owner.is_empty() || repo.is_empty() {
      return Err(ShipError::Config(ConfigError::Invalid {
        field: "project.repository".to_string(),
        reason: "owner and repo must both be non-empty".to_string(),
      }));
    }

    if self.artifacts.targets.is_empty() {
      return Err(ShipError::Config(ConfigError::MissingField {
        field: "artifacts.targets".to_string(),
      }));
    }

    if self.artifacts.poll_interval_secs == 0 {
      return Err(ShipError::Config(ConfigError::Invalid {
        field: "artifacts.poll_interval_secs".to_string(),
        reason: "must be at least 1".to_string(),
      }));
    }

    Ok(())
  }
}

/// Read the release host credential from the environment
///
/// Never stored in shipway.toml. SHIPWAY_TOKEN wins over GITHUB_TOKEN.
pub fn host_token() -> ShipResult<String> {
  for var in ["SHIPWAY_TOKEN", "GITHUB_TOKEN"] {
    if let Ok(token) = std::env::var(var)
      && !token.trim().is_empty()
    {
      return Ok(token);
    }
  }
  Err(ShipError::Config(ConfigError::MissingToken))
}
