//! Test utilities for installgen-lib.
//!
//! `FakeAsset` is a configurable asset that records how it was called, so
//! engine tests can assert on generate counts and the dependencies it saw.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::asset::{Asset, AssetError, AssetId, Dependencies, ResultSet};

#[derive(Debug, Default)]
pub struct CallLog {
  calls: AtomicUsize,
  /// Number of dependency entries seen by each generate call.
  observed: Mutex<Vec<usize>>,
}

impl CallLog {
  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }

  pub fn observed(&self) -> Vec<usize> {
    self.observed.lock().unwrap().clone()
  }
}

pub struct FakeAsset {
  id: AssetId,
  deps: Vec<AssetId>,
  files: Vec<(String, Vec<u8>)>,
  failure: Option<String>,
  log: Arc<CallLog>,
}

impl FakeAsset {
  /// An asset with no dependencies that emits `<id>.yml` containing its id.
  pub fn new(id: &str) -> Self {
    Self {
      id: AssetId::new(id),
      deps: Vec::new(),
      files: vec![(format!("{}.yml", id), id.as_bytes().to_vec())],
      failure: None,
      log: Arc::new(CallLog::default()),
    }
  }

  pub fn depends_on(mut self, deps: &[&str]) -> Self {
    self.deps = deps.iter().map(|d| AssetId::new(*d)).collect();
    self
  }

  /// Replace the emitted files.
  pub fn emits(mut self, files: &[(&str, &str)]) -> Self {
    self.files = files
      .iter()
      .map(|(name, data)| (name.to_string(), data.as_bytes().to_vec()))
      .collect();
    self
  }

  /// Fail every generate call with a configuration error.
  pub fn failing(mut self, message: &str) -> Self {
    self.failure = Some(message.to_string());
    self
  }

  /// Shared handle to the call log, valid after the asset is registered.
  pub fn log(&self) -> Arc<CallLog> {
    Arc::clone(&self.log)
  }
}

impl Asset for FakeAsset {
  fn id(&self) -> AssetId {
    self.id.clone()
  }

  fn name(&self) -> &str {
    self.id.as_str()
  }

  fn dependencies(&self) -> Vec<AssetId> {
    self.deps.clone()
  }

  fn generate(&self, deps: &Dependencies) -> Result<ResultSet, AssetError> {
    self.log.calls.fetch_add(1, Ordering::SeqCst);
    self.log.observed.lock().unwrap().push(deps.len());

    for dep in &self.deps {
      deps.get(dep)?;
    }

    if let Some(message) = &self.failure {
      return Err(AssetError::Configuration(message.clone()));
    }

    let mut results = ResultSet::new();
    for (name, data) in &self.files {
      results.push(name.clone(), data.clone())?;
    }
    Ok(results)
  }
}
