//! Wave-parallel resolution.
//!
//! Independent branches of the asset graph are generated concurrently. The
//! graph is split into waves; every asset in a wave has all of its
//! dependencies in earlier waves, so no generate step starts before its
//! inputs are complete. Each asset appears in exactly one wave and is
//! therefore generated at most once.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::registry::AssetRegistry;

use super::dag::AssetGraph;
use super::resolver::{ResolutionCache, generate_asset};
use super::types::{ExecuteConfig, ExecuteError};

/// Generate every asset in `graph`, wave by wave.
///
/// Generate steps run on the blocking pool, bounded by
/// `config.parallelism`. When an asset fails, the rest of its wave is allowed
/// to finish, then the whole cache is dropped and the first error returned.
pub async fn resolve_waves(
  registry: &AssetRegistry,
  graph: &AssetGraph,
  config: &ExecuteConfig,
) -> Result<ResolutionCache, ExecuteError> {
  let semaphore = Arc::new(Semaphore::new(config.parallelism.max(1)));
  let mut cache = ResolutionCache::default();

  for (wave_idx, wave) in graph.waves()?.into_iter().enumerate() {
    debug!(wave = wave_idx, assets = wave.len(), "executing wave");

    let mut tasks = JoinSet::new();
    for id in wave {
      let asset = Arc::clone(registry.get(&id)?);
      let deps = cache.dependencies_for(asset.as_ref())?;
      let permit = Arc::clone(&semaphore)
        .acquire_owned()
        .await
        .map_err(|e| ExecuteError::TaskFailed(e.to_string()))?;

      tasks.spawn_blocking(move || {
        let _permit = permit;
        (id, generate_asset(asset.as_ref(), &deps))
      });
    }

    let mut first_error = None;
    while let Some(joined) = tasks.join_next().await {
      match joined {
        Ok((id, Ok(results))) => {
          cache.insert(id, results);
        }
        Ok((_, Err(e))) => {
          first_error.get_or_insert(e);
        }
        Err(e) => {
          first_error.get_or_insert(ExecuteError::TaskFailed(e.to_string()));
        }
      }
    }

    if let Some(e) = first_error {
      warn!(
        wave = wave_idx,
        generated = cache.len(),
        "discarding generated results after failure"
      );
      return Err(e);
    }
  }

  Ok(cache)
}
