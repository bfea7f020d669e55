//! Depth-first dependency resolution with memoization.
//!
//! The resolver produces the result set of a requested asset, generating each
//! distinct asset in its transitive dependency closure exactly once. Results
//! are memoized by [`AssetId`] in a [`ResolutionCache`] scoped to one run.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error};

use crate::asset::{Asset, AssetId, Dependencies, ResultSet};
use crate::registry::AssetRegistry;

use super::types::ExecuteError;

/// Per-run memo table of generated result sets.
#[derive(Debug, Default)]
pub struct ResolutionCache {
  results: HashMap<AssetId, Arc<ResultSet>>,
}

impl ResolutionCache {
  pub fn get(&self, id: &AssetId) -> Option<Arc<ResultSet>> {
    self.results.get(id).cloned()
  }

  pub fn contains(&self, id: &AssetId) -> bool {
    self.results.contains_key(id)
  }

  /// Store a generated result set. Only fully generated results go in.
  pub(crate) fn insert(&mut self, id: AssetId, results: ResultSet) -> Arc<ResultSet> {
    let results = Arc::new(results);
    self.results.insert(id, Arc::clone(&results));
    results
  }

  /// Collect the cached results of every dependency `asset` declares.
  pub(crate) fn dependencies_for(&self, asset: &dyn Asset) -> Result<Dependencies, ExecuteError> {
    let mut deps = Dependencies::new();
    for dep in asset.dependencies() {
      let results = self.get(&dep).ok_or_else(|| ExecuteError::Unresolved {
        asset: asset.id(),
        dependency: dep.clone(),
      })?;
      deps.insert(dep, results);
    }
    Ok(deps)
  }

  pub fn len(&self) -> usize {
    self.results.len()
  }

  pub fn is_empty(&self) -> bool {
    self.results.is_empty()
  }
}

/// Resolves assets depth-first against a registry.
///
/// A resolver may be used for several targets in a row; they share one
/// cache, so common dependencies are generated once across all of them.
pub struct Resolver<'a> {
  registry: &'a AssetRegistry,

  cache: ResolutionCache,

  /// Assets whose dependencies are currently being resolved, outermost first.
  in_progress: Vec<AssetId>,
}

impl<'a> Resolver<'a> {
  pub fn new(registry: &'a AssetRegistry) -> Self {
    Self {
      registry,
      cache: ResolutionCache::default(),
      in_progress: Vec::new(),
    }
  }

  /// Resolve `id`, generating it and any missing dependencies.
  ///
  /// # Errors
  ///
  /// - `Cycle` if `id` is reached again while its own dependencies are being
  ///   resolved. No asset on the cycle has been generated at that point.
  /// - `UnknownAsset` if `id` or a dependency is not registered.
  /// - `Generate` if an asset fails. Failed results are never cached.
  pub fn resolve(&mut self, id: &AssetId) -> Result<Arc<ResultSet>, ExecuteError> {
    if let Some(results) = self.cache.get(id) {
      debug!(asset = %id, "using cached result");
      return Ok(results);
    }

    if let Some(pos) = self.in_progress.iter().position(|p| p == id) {
      let mut path = self.in_progress[pos..].to_vec();
      path.push(id.clone());
      return Err(ExecuteError::Cycle { path });
    }

    let asset = Arc::clone(self.registry.get(id)?);

    self.in_progress.push(id.clone());
    let deps = self.resolve_dependencies(asset.as_ref());
    self.in_progress.pop();
    let deps = deps?;

    let results = generate_asset(asset.as_ref(), &deps)?;
    Ok(self.cache.insert(id.clone(), results))
  }

  fn resolve_dependencies(&mut self, asset: &dyn Asset) -> Result<Dependencies, ExecuteError> {
    let mut deps = Dependencies::new();
    for dep in asset.dependencies() {
      let results = self.resolve(&dep)?;
      deps.insert(dep, results);
    }
    Ok(deps)
  }

  pub fn cache(&self) -> &ResolutionCache {
    &self.cache
  }
}

/// Run one asset's generate step, attaching its identity to any failure.
pub(crate) fn generate_asset(asset: &dyn Asset, deps: &Dependencies) -> Result<ResultSet, ExecuteError> {
  let id = asset.id();
  debug!(asset = %id, dependencies = deps.len(), "generating");

  match asset.generate(deps) {
    Ok(results) => {
      debug!(asset = %id, files = results.len(), "generated");
      Ok(results)
    }
    Err(source) => {
      error!(asset = %id, error = %source, "generate failed");
      Err(ExecuteError::Generate { asset: id, source })
    }
  }
}
