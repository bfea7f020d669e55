//! Implementation of the `installgen create` command.
//!
//! This command loads the install config, generates the requested target and
//! writes the resulting files into the assets directory. Nothing is written
//! unless the whole run succeeds.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use installgen_lib::execute::{Engine, ExecuteConfig};
use installgen_lib::output::{Bundle, DirWriter};
use installgen_lib::targets::{Target, standard_registry};

use super::load_install_config;
use crate::output::{OutputFormat, format_bytes, print_json, print_stat, print_success};

#[derive(Serialize)]
struct CreateSummary<'a> {
  target: &'a str,
  dir: String,
  files: Vec<FileSummary<'a>>,
}

#[derive(Serialize)]
struct FileSummary<'a> {
  name: &'a str,
  asset: &'a str,
  bytes: usize,
}

pub fn cmd_create(target: Target, dir: &Path, config: Option<PathBuf>, jobs: usize, format: OutputFormat) -> Result<()> {
  let install_config = load_install_config(dir, config)?;
  let registry = standard_registry(install_config).context("Failed to register assets")?;
  let engine = Engine::new(&registry);
  let targets = target.assets();

  let result = if jobs > 1 {
    let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
    let config = ExecuteConfig { parallelism: jobs };
    rt.block_on(engine.run_parallel(&targets, &config))
  } else {
    engine.run(&targets)
  };
  let bundle = result.with_context(|| format!("Failed to generate {}", target))?;

  bundle
    .write_to(&DirWriter::new(dir))
    .with_context(|| format!("Failed to write assets to {}", dir.display()))?;
  info!(target = %target, files = bundle.len(), "assets written");

  if format.is_json() {
    print_json(&summary(target, dir, &bundle))?;
  } else {
    print_success(&format!("Generated {} in {}", target, dir.display()));
    for entry in bundle.iter() {
      print_stat(&entry.artifact.name, &format_bytes(entry.artifact.data.len() as u64));
    }
  }

  Ok(())
}

fn summary<'a>(target: Target, dir: &Path, bundle: &'a Bundle) -> CreateSummary<'a> {
  CreateSummary {
    target: target.as_str(),
    dir: dir.display().to_string(),
    files: bundle
      .iter()
      .map(|entry| FileSummary {
        name: &entry.artifact.name,
        asset: entry.asset.as_str(),
        bytes: entry.artifact.data.len(),
      })
      .collect(),
  }
}
