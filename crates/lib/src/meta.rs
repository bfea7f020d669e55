//! Minimal Kubernetes-style object metadata shared by generated objects.

use serde::{Deserialize, Serialize};

/// Object metadata. Only the name is ever populated by the producers here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
  pub name: String,
}

impl ObjectMeta {
  pub fn named(name: impl Into<String>) -> Self {
    Self { name: name.into() }
  }
}
