//! YAML encoding for generated objects.
//!
//! Producers never call `serde_yaml` directly; they go through these helpers so
//! encode and decode failures are reported against the file they concern.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::asset::{AssetError, AssetId};

/// Serialize `value` as the YAML payload for `file`.
///
/// Output is deterministic: struct fields are emitted in declaration order and
/// no timestamps are added.
pub fn encode<T: Serialize>(file: &str, value: &T) -> Result<Vec<u8>, AssetError> {
  serde_yaml::to_string(value)
    .map(String::into_bytes)
    .map_err(|source| AssetError::Encoding {
      file: file.to_string(),
      source,
    })
}

/// Decode a YAML payload that `asset` produced as `file`.
pub fn decode<T: DeserializeOwned>(asset: &AssetId, file: &str, data: &[u8]) -> Result<T, AssetError> {
  serde_yaml::from_slice(data).map_err(|source| AssetError::Decoding {
    asset: asset.clone(),
    file: file.to_string(),
    source,
  })
}
