//! The manifests aggregate.
//!
//! [`Manifests`] gathers the output of the operator producers into the
//! `manifests/` directory of the bundle. Empty payloads are dropped: a
//! producer may have nothing to deploy for a given file.

use crate::asset::{Asset, AssetError, AssetId, Dependencies, ResultSet};
use crate::consts::MANIFESTS_DIR;

pub struct Manifests {
  members: Vec<AssetId>,
}

impl Manifests {
  pub const ID: &'static str = "manifests";

  /// Aggregate the results of `members`, in the given order.
  pub fn new(members: Vec<AssetId>) -> Self {
    Self { members }
  }
}

impl Asset for Manifests {
  fn id(&self) -> AssetId {
    AssetId::new(Self::ID)
  }

  fn name(&self) -> &str {
    "Common Manifests"
  }

  fn dependencies(&self) -> Vec<AssetId> {
    self.members.clone()
  }

  fn generate(&self, deps: &Dependencies) -> Result<ResultSet, AssetError> {
    let mut results = ResultSet::new();
    for member in &self.members {
      for artifact in deps.get(member)? {
        if artifact.is_empty() {
          continue;
        }
        results.push(format!("{}/{}", MANIFESTS_DIR, artifact.name), artifact.data.clone())?;
      }
    }
    Ok(results)
  }
}
