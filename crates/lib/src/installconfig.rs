//! Install config loading and the install-config asset.
//!
//! The install config is the root input of a run. It is loaded and validated
//! once, then handed to [`InstallConfigAsset`], which serializes it as
//! `install-config.yml`. Downstream producers read it back from their
//! dependency results rather than sharing the in-memory value.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::asset::{Asset, AssetError, AssetId, Dependencies, ResultSet};
use crate::consts::{INSTALL_CONFIG_API_VERSION, INSTALL_CONFIG_FILE};
use crate::meta::ObjectMeta;
use crate::network::NetworkType;
use crate::util::yaml;

/// Errors loading an install config.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse install config: {0}")]
  Parse(#[from] serde_yaml::Error),

  #[error("invalid install config: {0}")]
  Invalid(String),
}

/// Cluster-level installation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallConfig {
  #[serde(default = "default_api_version")]
  pub api_version: String,
  pub metadata: ObjectMeta,
  pub base_domain: String,
  pub networking: Networking,
}

/// Cluster network plugin and ranges.
///
/// Addresses are kept as written; the producers that consume them parse and
/// reject malformed values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Networking {
  /// Defaults to OpenShift SDN when omitted.
  #[serde(rename = "type", default)]
  pub network_type: NetworkType,
  #[serde(rename = "serviceCIDR")]
  pub service_cidr: String,
  #[serde(rename = "podCIDR")]
  pub pod_cidr: String,
}

fn default_api_version() -> String {
  INSTALL_CONFIG_API_VERSION.to_string()
}

impl InstallConfig {
  /// Load and validate an install config from a YAML file.
  pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    Self::from_yaml(&content)
  }

  /// Parse and validate an install config from YAML text.
  pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
    let config: Self = serde_yaml::from_str(content)?;
    config.validate()?;
    Ok(config)
  }

  /// Check required fields.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.metadata.name.trim().is_empty() {
      return Err(ConfigError::Invalid("metadata.name must not be empty".to_string()));
    }
    if self.base_domain.trim().is_empty() {
      return Err(ConfigError::Invalid("baseDomain must not be empty".to_string()));
    }
    if self.networking.service_cidr.trim().is_empty() {
      return Err(ConfigError::Invalid("networking.serviceCIDR must not be empty".to_string()));
    }
    if self.networking.pod_cidr.trim().is_empty() {
      return Err(ConfigError::Invalid("networking.podCIDR must not be empty".to_string()));
    }
    Ok(())
  }

  /// Fully qualified cluster domain, `<name>.<baseDomain>`.
  pub fn cluster_domain(&self) -> String {
    format!("{}.{}", self.metadata.name, self.base_domain)
  }
}

/// Root asset carrying the validated install config.
pub struct InstallConfigAsset {
  config: InstallConfig,
}

impl InstallConfigAsset {
  pub const ID: &'static str = "install-config";

  pub fn new(config: InstallConfig) -> Self {
    Self { config }
  }

  pub fn asset_id() -> AssetId {
    AssetId::new(Self::ID)
  }

  /// Read the install config back out of a dependent's results.
  pub fn decode(deps: &Dependencies, id: &AssetId) -> Result<InstallConfig, AssetError> {
    deps.decode(id, INSTALL_CONFIG_FILE)
  }
}

impl Asset for InstallConfigAsset {
  fn id(&self) -> AssetId {
    Self::asset_id()
  }

  fn name(&self) -> &str {
    "Install Config"
  }

  fn dependencies(&self) -> Vec<AssetId> {
    Vec::new()
  }

  fn generate(&self, _deps: &Dependencies) -> Result<ResultSet, AssetError> {
    let mut results = ResultSet::new();
    results.push(INSTALL_CONFIG_FILE, yaml::encode(INSTALL_CONFIG_FILE, &self.config)?)?;
    Ok(results)
  }
}
