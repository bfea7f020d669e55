//! Asset execution module.
//!
//! This module provides the entry points for one generation run. It handles:
//! - Graph validation (unknown assets, cycles) before anything is generated
//! - Depth-first, memoized resolution of every target
//! - Optional wave-parallel resolution of independent branches
//! - Aggregation of the targets' result sets into a [`Bundle`]

pub mod dag;
pub mod parallel;
pub mod resolver;
pub mod types;

use std::collections::HashSet;

use tracing::info;

use crate::asset::AssetId;
use crate::output::Bundle;
use crate::registry::AssetRegistry;

pub use dag::AssetGraph;
pub use resolver::{ResolutionCache, Resolver};
pub use types::{ExecuteConfig, ExecuteError};

/// Driver for one full generation run over a registry.
pub struct Engine<'a> {
  registry: &'a AssetRegistry,
}

impl<'a> Engine<'a> {
  pub fn new(registry: &'a AssetRegistry) -> Self {
    Self { registry }
  }

  /// Resolve `targets` sequentially and aggregate their outputs.
  ///
  /// All targets share one resolution cache, so dependencies common to
  /// several targets are generated once. Only the targets' own result sets
  /// end up in the bundle.
  ///
  /// # Errors
  ///
  /// Any error aborts the run and no bundle is returned:
  /// - `Cycle` / `UnknownAsset` are detected before any asset is generated
  /// - `Generate` carries the failing asset's identity
  /// - `Collision` if two targets emit the same file name
  pub fn run(&self, targets: &[AssetId]) -> Result<Bundle, ExecuteError> {
    info!(targets = targets.len(), "starting asset generation");

    let graph = AssetGraph::from_targets(self.registry, targets)?;
    info!(assets = graph.len(), "validated asset graph");

    let mut resolver = Resolver::new(self.registry);
    let mut bundle = Bundle::new();
    let mut seen = HashSet::new();
    for target in targets {
      let results = resolver.resolve(target)?;
      if seen.insert(target.clone()) {
        bundle.add(target, &results)?;
      }
    }

    info!(
      generated = resolver.cache().len(),
      files = bundle.len(),
      "asset generation complete"
    );

    Ok(bundle)
  }

  /// Resolve `targets` with independent assets generated in parallel.
  ///
  /// Produces the same bundle as [`Engine::run`].
  pub async fn run_parallel(&self, targets: &[AssetId], config: &ExecuteConfig) -> Result<Bundle, ExecuteError> {
    info!(
      targets = targets.len(),
      parallelism = config.parallelism,
      "starting parallel asset generation"
    );

    let graph = AssetGraph::from_targets(self.registry, targets)?;
    let cache = parallel::resolve_waves(self.registry, &graph, config).await?;

    let mut bundle = Bundle::new();
    let mut seen = HashSet::new();
    for target in targets {
      if !seen.insert(target.clone()) {
        continue;
      }
      let results = cache.get(target).ok_or_else(|| ExecuteError::UnknownAsset(target.clone()))?;
      bundle.add(target, &results)?;
    }

    info!(
      generated = cache.len(),
      files = bundle.len(),
      "asset generation complete"
    );

    Ok(bundle)
  }
}
