//! Aggregated run output and persistence.
//!
//! A [`Bundle`] collects the result sets of a run's targets into one ordered,
//! collision-free list of files. The engine only builds bundles; writing them
//! out is the job of an [`OutputWriter`], which callers invoke after a run has
//! fully succeeded.

use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

use crate::asset::{Artifact, AssetId, ResultSet, names_conflict, normalize_name};
use crate::execute::ExecuteError;

/// One file in a bundle, with the asset that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleEntry {
  pub asset: AssetId,
  pub artifact: Artifact,
}

/// The ordered output of a run.
///
/// Files appear in target order, and within a target in the order its result
/// set holds them. No two files in a bundle share a name, and no file sits
/// where another file needs a directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bundle {
  entries: Vec<BundleEntry>,
}

impl Bundle {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add every artifact of `asset`'s result set.
  ///
  /// The set is added entirely or not at all.
  ///
  /// # Errors
  ///
  /// Returns `Collision` if any file name is already present, or if a file
  /// and a directory of the bundle would share a path.
  pub fn add(&mut self, asset: &AssetId, results: &ResultSet) -> Result<(), ExecuteError> {
    for name in results.names() {
      if let Some(existing) = self.entries.iter().find(|e| names_conflict(&e.artifact.name, name)) {
        return Err(ExecuteError::Collision {
          file: name.to_string(),
          first: existing.asset.clone(),
          second: asset.clone(),
        });
      }
    }

    self.entries.extend(results.iter().map(|artifact| BundleEntry {
      asset: asset.clone(),
      artifact: artifact.clone(),
    }));
    Ok(())
  }

  /// Look up a file by name.
  pub fn get(&self, name: &str) -> Option<&BundleEntry> {
    let name = normalize_name(name)?;
    self.entries.iter().find(|e| e.artifact.name == name)
  }

  pub fn iter(&self) -> std::slice::Iter<'_, BundleEntry> {
    self.entries.iter()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Total payload size in bytes.
  pub fn total_bytes(&self) -> u64 {
    self.entries.iter().map(|e| e.artifact.data.len() as u64).sum()
  }

  /// Hand every file to `writer` in one batch, in bundle order.
  pub fn write_to(&self, writer: &dyn OutputWriter) -> Result<(), WriteError> {
    let artifacts: Vec<&Artifact> = self.entries.iter().map(|e| &e.artifact).collect();
    writer.write(&artifacts)
  }
}

/// Errors raised while persisting a bundle.
#[derive(Debug, Error)]
pub enum WriteError {
  /// The artifact name is absolute or escapes the output directory.
  #[error("refusing to write artifact with unsafe name: {0}")]
  UnsafeName(String),

  #[error("failed to write {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Destination for generated files.
pub trait OutputWriter {
  /// Persist a batch of files. On error, no file of the batch is left behind.
  fn write(&self, artifacts: &[&Artifact]) -> Result<(), WriteError>;
}

/// Writes artifacts under a directory.
///
/// Every payload is first staged in a temp file under the root. Only once all
/// of them are staged are they renamed into place, so a failure never leaves
/// a partly written file or a partial batch behind.
#[derive(Debug, Clone)]
pub struct DirWriter {
  root: PathBuf,
}

impl DirWriter {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// Destination path for an artifact name.
  fn target_path(&self, name: &str) -> Result<PathBuf, WriteError> {
    let relative = Path::new(name);
    let safe = !name.is_empty() && relative.components().all(|c| matches!(c, Component::Normal(_)));
    if !safe {
      return Err(WriteError::UnsafeName(name.to_string()));
    }
    Ok(self.root.join(relative))
  }

  fn stage(&self, artifact: &Artifact) -> Result<(PathBuf, NamedTempFile), WriteError> {
    let path = self.target_path(&artifact.name)?;
    let io_err = |source: io::Error| WriteError::Io {
      path: path.clone(),
      source,
    };

    let mut temp = NamedTempFile::new_in(&self.root).map_err(io_err)?;
    temp.write_all(&artifact.data).map_err(io_err)?;
    Ok((path, temp))
  }
}

/// Move a staged file to its destination, creating parent directories.
fn persist(path: &Path, temp: NamedTempFile) -> Result<(), WriteError> {
  let io_err = |source: io::Error| WriteError::Io {
    path: path.to_path_buf(),
    source,
  };

  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).map_err(io_err)?;
  }
  temp.persist(path).map_err(|e| io_err(e.error))?;
  Ok(())
}

/// Remove files created by a batch that failed part way.
fn roll_back(created: &[PathBuf]) {
  for path in created.iter().rev() {
    if let Err(e) = std::fs::remove_file(path) {
      warn!(path = %path.display(), error = %e, "failed to remove partially written output");
    }
  }
}

impl OutputWriter for DirWriter {
  fn write(&self, artifacts: &[&Artifact]) -> Result<(), WriteError> {
    std::fs::create_dir_all(&self.root).map_err(|source| WriteError::Io {
      path: self.root.clone(),
      source,
    })?;

    // Unpersisted temp files are deleted when dropped.
    let staged = artifacts
      .iter()
      .map(|artifact| self.stage(artifact))
      .collect::<Result<Vec<_>, _>>()?;

    let mut created = Vec::new();
    for (path, temp) in staged {
      let existed = path.exists();
      if let Err(e) = persist(&path, temp) {
        roll_back(&created);
        return Err(e);
      }
      debug!(path = %path.display(), "wrote artifact");
      if !existed {
        created.push(path);
      }
    }
    Ok(())
  }
}
