//! Arena of assets keyed by identity.
//!
//! The registry owns every asset constructed for a run. Assets refer to each
//! other only by [`AssetId`]; the engine looks them up here.

use std::collections::HashMap;
use std::sync::Arc;

use crate::asset::{Asset, AssetId};
use crate::execute::ExecuteError;

#[derive(Default)]
pub struct AssetRegistry {
  assets: HashMap<AssetId, Arc<dyn Asset>>,
  /// Registration order, for deterministic iteration.
  order: Vec<AssetId>,
}

impl AssetRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add an asset to the registry.
  ///
  /// # Errors
  ///
  /// Returns `DuplicateAsset` if an asset with the same identity is already
  /// registered.
  pub fn register<A: Asset + 'static>(&mut self, asset: A) -> Result<AssetId, ExecuteError> {
    let id = asset.id();
    if self.assets.contains_key(&id) {
      return Err(ExecuteError::DuplicateAsset(id));
    }
    self.assets.insert(id.clone(), Arc::new(asset));
    self.order.push(id.clone());
    Ok(id)
  }

  /// Look up an asset by identity.
  pub fn get(&self, id: &AssetId) -> Result<&Arc<dyn Asset>, ExecuteError> {
    self.assets.get(id).ok_or_else(|| ExecuteError::UnknownAsset(id.clone()))
  }

  pub fn contains(&self, id: &AssetId) -> bool {
    self.assets.contains_key(id)
  }

  /// Identities in registration order.
  pub fn ids(&self) -> &[AssetId] {
    &self.order
  }

  pub fn len(&self) -> usize {
    self.order.len()
  }

  pub fn is_empty(&self) -> bool {
    self.order.is_empty()
  }
}

impl std::fmt::Debug for AssetRegistry {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("AssetRegistry").field("assets", &self.order).finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::util::testutil::FakeAsset;

  #[test]
  fn register_and_lookup() {
    let mut registry = AssetRegistry::new();
    let id = registry.register(FakeAsset::new("a")).unwrap();

    assert_eq!(id, AssetId::new("a"));
    assert!(registry.contains(&id));
    assert_eq!(registry.get(&id).unwrap().id(), id);
    assert_eq!(registry.len(), 1);
  }

  #[test]
  fn duplicate_registration_is_rejected() {
    let mut registry = AssetRegistry::new();
    registry.register(FakeAsset::new("a")).unwrap();

    let err = registry.register(FakeAsset::new("a")).unwrap_err();
    assert!(matches!(err, ExecuteError::DuplicateAsset(ref id) if id.as_str() == "a"));
  }

  #[test]
  fn unknown_lookup_fails() {
    let registry = AssetRegistry::new();
    assert!(matches!(
      registry.get(&AssetId::new("missing")),
      Err(ExecuteError::UnknownAsset(_))
    ));
  }

  #[test]
  fn ids_follow_registration_order() {
    let mut registry = AssetRegistry::new();
    registry.register(FakeAsset::new("c")).unwrap();
    registry.register(FakeAsset::new("a")).unwrap();
    registry.register(FakeAsset::new("b")).unwrap();

    let ids: Vec<_> = registry.ids().iter().map(AssetId::as_str).collect();
    assert_eq!(ids, vec!["c", "a", "b"]);
  }
}
