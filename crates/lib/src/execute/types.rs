//! Types for asset execution.
//!
//! This module defines the error type and configuration for resolving an
//! asset graph.

use thiserror::Error;

use crate::asset::{AssetError, AssetId};

/// Errors that can occur while resolving assets.
///
/// Every variant is fatal to the run. Variants raised on behalf of a specific
/// asset carry its identity.
#[derive(Debug, Error)]
pub enum ExecuteError {
  /// An asset's generate step failed.
  #[error("failed to generate {asset}: {source}")]
  Generate {
    asset: AssetId,
    #[source]
    source: AssetError,
  },

  /// The dependency graph contains a cycle. `path` starts and ends at the
  /// same asset and follows "depends on" edges.
  #[error("dependency cycle detected: {}", display_path(.path))]
  Cycle { path: Vec<AssetId> },

  /// Two assets produced the same output file.
  #[error("file {file} produced by both {first} and {second}")]
  Collision {
    file: String,
    first: AssetId,
    second: AssetId,
  },

  /// An asset identity was referenced but never registered.
  #[error("asset not registered: {0}")]
  UnknownAsset(AssetId),

  /// Two assets were registered under the same identity.
  #[error("asset registered twice: {0}")]
  DuplicateAsset(AssetId),

  /// A dependency was needed before it had been resolved.
  #[error("dependency {dependency} of {asset} has not been resolved")]
  Unresolved { asset: AssetId, dependency: AssetId },

  /// A parallel generate task panicked or was cancelled.
  #[error("generate task failed: {0}")]
  TaskFailed(String),
}

impl ExecuteError {
  /// The asset this error was raised for, if any.
  pub fn asset(&self) -> Option<&AssetId> {
    match self {
      ExecuteError::Generate { asset, .. } | ExecuteError::Unresolved { asset, .. } => Some(asset),
      ExecuteError::UnknownAsset(asset) | ExecuteError::DuplicateAsset(asset) => Some(asset),
      ExecuteError::Cycle { path } => path.first(),
      ExecuteError::Collision { second, .. } => Some(second),
      ExecuteError::TaskFailed(_) => None,
    }
  }

  /// Returns true if an asset could not consume an upstream value.
  pub fn is_configuration(&self) -> bool {
    matches!(self, ExecuteError::Generate { source, .. } if source.is_configuration())
  }

  /// Returns true if the serializer failed.
  pub fn is_encoding(&self) -> bool {
    matches!(self, ExecuteError::Generate { source, .. } if source.is_encoding())
  }

  pub fn is_cycle(&self) -> bool {
    matches!(self, ExecuteError::Cycle { .. })
  }

  pub fn is_collision(&self) -> bool {
    matches!(self, ExecuteError::Collision { .. })
  }
}

fn display_path(path: &[AssetId]) -> String {
  path.iter().map(AssetId::as_str).collect::<Vec<_>>().join(" -> ")
}

/// Configuration for asset execution.
#[derive(Debug, Clone)]
pub struct ExecuteConfig {
  /// Maximum number of assets to generate in parallel.
  pub parallelism: usize,
}

impl Default for ExecuteConfig {
  fn default() -> Self {
    Self {
      parallelism: num_cpus(),
    }
  }
}

/// Get the number of CPUs for default parallelism.
fn num_cpus() -> usize {
  std::thread::available_parallelism().map(|p| p.get()).unwrap_or(4)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cycle_display_follows_path() {
    let err = ExecuteError::Cycle {
      path: vec![AssetId::new("a"), AssetId::new("b"), AssetId::new("a")],
    };
    assert_eq!(err.to_string(), "dependency cycle detected: a -> b -> a");
    assert!(err.is_cycle());
    assert_eq!(err.asset(), Some(&AssetId::new("a")));
  }

  #[test]
  fn generate_error_names_asset() {
    let err = ExecuteError::Generate {
      asset: AssetId::new("network-operator"),
      source: AssetError::Configuration("invalid serviceCIDR \"nope\"".to_string()),
    };
    assert_eq!(
      err.to_string(),
      "failed to generate network-operator: invalid configuration: invalid serviceCIDR \"nope\""
    );
    assert!(err.is_configuration());
    assert!(!err.is_encoding());
  }

  #[test]
  fn collision_display() {
    let err = ExecuteError::Collision {
      file: "manifest.yml".to_string(),
      first: AssetId::new("a"),
      second: AssetId::new("b"),
    };
    assert_eq!(err.to_string(), "file manifest.yml produced by both a and b");
    assert!(err.is_collision());
  }

  #[test]
  fn execute_config_default_parallelism() {
    let config = ExecuteConfig::default();
    assert!(config.parallelism >= 1);
  }
}
