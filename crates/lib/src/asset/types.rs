//! Identity, artifact and result set types.

use std::fmt;
use std::path::{Component, Path};
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::util::yaml;

use super::AssetError;

/// Stable identity of an asset within one run.
///
/// Identities are plain names (`"network-operator"`), so memoization never
/// depends on where an asset lives in memory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssetId(pub String);

impl AssetId {
  pub fn new(id: impl Into<String>) -> Self {
    Self(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for AssetId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl From<&str> for AssetId {
  fn from(id: &str) -> Self {
    Self::new(id)
  }
}

/// A named byte payload produced by exactly one asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
  /// Logical file name, relative to the output directory.
  pub name: String,
  /// Raw contents.
  pub data: Vec<u8>,
}

impl Artifact {
  pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
    Self {
      name: name.into(),
      data: data.into(),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }
}

/// Canonical form of an artifact name: its path components joined by `/`.
///
/// `x//y.yml` and `x/y.yml` name the same file. Returns `None` for names that
/// are empty or absolute, contain `..`, or start with `.`.
pub fn normalize_name(name: &str) -> Option<String> {
  let mut parts = Vec::new();
  for component in Path::new(name).components() {
    match component {
      Component::Normal(part) => parts.push(part.to_str()?),
      _ => return None,
    }
  }
  if parts.is_empty() { None } else { Some(parts.join("/")) }
}

/// Whether two normalized names cannot both exist on disk: they are equal, or
/// one is a directory holding the other.
pub fn names_conflict(a: &str, b: &str) -> bool {
  let nested = |outer: &str, inner: &str| inner.strip_prefix(outer).is_some_and(|rest| rest.starts_with('/'));
  a == b || nested(a, b) || nested(b, a)
}

/// The ordered artifacts produced by one asset.
///
/// File names are stored normalized and never conflict within a set.
/// Insertion order is preserved so output ordering is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
  artifacts: Vec<Artifact>,
}

impl ResultSet {
  pub fn new() -> Self {
    Self::default()
  }

  /// Append an artifact under its normalized name.
  ///
  /// # Errors
  ///
  /// Returns `InvalidFileName` if the name is empty, absolute or escapes the
  /// output directory, and `DuplicateFile` if it conflicts with a file already
  /// in the set.
  pub fn push(&mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) -> Result<(), AssetError> {
    let name = name.into();
    let normalized = normalize_name(&name).ok_or(AssetError::InvalidFileName(name))?;
    if self.names().any(|existing| names_conflict(existing, &normalized)) {
      return Err(AssetError::DuplicateFile(normalized));
    }
    self.artifacts.push(Artifact::new(normalized, data));
    Ok(())
  }

  /// Look up an artifact by file name.
  pub fn get(&self, name: &str) -> Option<&Artifact> {
    let name = normalize_name(name)?;
    self.artifacts.iter().find(|a| a.name == name)
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Artifact> {
    self.artifacts.iter()
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.artifacts.iter().map(|a| a.name.as_str())
  }

  pub fn len(&self) -> usize {
    self.artifacts.len()
  }

  pub fn is_empty(&self) -> bool {
    self.artifacts.is_empty()
  }
}

impl<'a> IntoIterator for &'a ResultSet {
  type Item = &'a Artifact;
  type IntoIter = std::slice::Iter<'a, Artifact>;

  fn into_iter(self) -> Self::IntoIter {
    self.artifacts.iter()
  }
}

/// Resolved results of an asset's declared dependencies.
///
/// Entries keep the order the dependencies were declared in. Result sets are
/// shared with the resolution cache and are read-only.
#[derive(Debug, Clone, Default)]
pub struct Dependencies {
  results: Vec<(AssetId, Arc<ResultSet>)>,
}

impl Dependencies {
  pub fn new() -> Self {
    Self::default()
  }

  /// Record the results for `id`. Repeated identities are kept once.
  pub fn insert(&mut self, id: AssetId, results: Arc<ResultSet>) {
    if !self.contains(&id) {
      self.results.push((id, results));
    }
  }

  pub fn contains(&self, id: &AssetId) -> bool {
    self.results.iter().any(|(dep, _)| dep == id)
  }

  /// Results of dependency `id`.
  ///
  /// # Errors
  ///
  /// Returns `MissingDependency` if `id` was not provided.
  pub fn get(&self, id: &AssetId) -> Result<&ResultSet, AssetError> {
    self
      .results
      .iter()
      .find(|(dep, _)| dep == id)
      .map(|(_, results)| results.as_ref())
      .ok_or_else(|| AssetError::MissingDependency(id.clone()))
  }

  /// A single file produced by dependency `id`.
  pub fn file(&self, id: &AssetId, name: &str) -> Result<&Artifact, AssetError> {
    self.get(id)?.get(name).ok_or_else(|| AssetError::MissingFile {
      asset: id.clone(),
      file: name.to_string(),
    })
  }

  /// Decode a YAML file produced by dependency `id`.
  pub fn decode<T: DeserializeOwned>(&self, id: &AssetId, name: &str) -> Result<T, AssetError> {
    let artifact = self.file(id, name)?;
    yaml::decode(id, name, &artifact.data)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&AssetId, &ResultSet)> {
    self.results.iter().map(|(id, results)| (id, results.as_ref()))
  }

  pub fn len(&self) -> usize {
    self.results.len()
  }

  pub fn is_empty(&self) -> bool {
    self.results.is_empty()
  }
}
