//! The asset contract.
//!
//! An asset is a named unit of derived output. It declares the identities of
//! the assets it depends on and, once those have been generated, produces its
//! own [`ResultSet`] from theirs. Assets never reach into shared state: every
//! upstream value arrives through the [`Dependencies`] handed to
//! [`Asset::generate`].

mod types;

use thiserror::Error;

pub use types::*;

/// A unit of work in the generation graph.
///
/// Implementations must be deterministic and side-effect free:
/// - `dependencies()` returns the same list every time it is called during a run
/// - `generate()` only reads from `deps` and never mutates shared state
///
/// Assets are `Send + Sync` so independent branches of the graph can be
/// generated concurrently.
pub trait Asset: Send + Sync {
  /// Stable identity used as the memoization key.
  fn id(&self) -> AssetId;

  /// Human friendly name for logs and summaries.
  fn name(&self) -> &str;

  /// Identities of the assets this one needs, in traversal order.
  fn dependencies(&self) -> Vec<AssetId>;

  /// Produce this asset's result set from its resolved dependencies.
  ///
  /// `deps` contains exactly the assets listed by [`Asset::dependencies`],
  /// each fully generated.
  fn generate(&self, deps: &Dependencies) -> Result<ResultSet, AssetError>;
}

/// Errors raised by an asset while generating.
///
/// These carry no asset identity of their own; the engine wraps them in
/// [`ExecuteError::Generate`](crate::execute::ExecuteError::Generate) with the
/// failing asset attached.
#[derive(Debug, Error)]
pub enum AssetError {
  /// An upstream value could not be consumed (e.g. a malformed address).
  #[error("invalid configuration: {0}")]
  Configuration(String),

  /// The serializer rejected a generated object.
  #[error("failed to encode {file}: {source}")]
  Encoding {
    file: String,
    #[source]
    source: serde_yaml::Error,
  },

  /// A dependency's payload could not be decoded.
  #[error("failed to decode {file} from {asset}: {source}")]
  Decoding {
    asset: AssetId,
    file: String,
    #[source]
    source: serde_yaml::Error,
  },

  /// A dependency the asset relies on was not declared or not provided.
  #[error("dependency {0} was not provided")]
  MissingDependency(AssetId),

  /// A dependency did not produce a file the asset relies on.
  #[error("{asset} did not produce {file}")]
  MissingFile { asset: AssetId, file: String },

  /// Two artifacts in one result set share a file name, or one would be a
  /// directory holding the other.
  #[error("conflicting file name in result set: {0}")]
  DuplicateFile(String),

  /// The file name is empty, absolute or escapes the output directory.
  #[error("invalid file name: {0:?}")]
  InvalidFileName(String),
}

impl AssetError {
  /// Returns true if the error means an upstream value was unusable.
  pub fn is_configuration(&self) -> bool {
    matches!(
      self,
      AssetError::Configuration(_)
        | AssetError::Decoding { .. }
        | AssetError::MissingDependency(_)
        | AssetError::MissingFile { .. }
    )
  }

  /// Returns true if the serializer failed.
  pub fn is_encoding(&self) -> bool {
    matches!(self, AssetError::Encoding { .. })
  }
}
