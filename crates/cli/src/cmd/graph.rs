//! Implementation of the `installgen graph` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use installgen_lib::execute::AssetGraph;
use installgen_lib::targets::standard_registry;

use super::load_install_config;
use crate::output::{OutputFormat, print_json};

#[derive(Serialize)]
struct GraphNode {
  asset: String,
  dependencies: Vec<String>,
}

/// Print the dependency graph of every built-in asset.
///
/// Text output is Graphviz DOT. JSON output lists assets in dependency order,
/// each with its direct dependencies.
pub fn cmd_graph(dir: &Path, config: Option<PathBuf>, format: OutputFormat) -> Result<()> {
  let install_config = load_install_config(dir, config)?;
  let registry = standard_registry(install_config).context("Failed to register assets")?;
  let graph = AssetGraph::from_registry(&registry).context("Invalid asset graph")?;

  if format.is_json() {
    let nodes: Vec<GraphNode> = graph
      .topological_order()?
      .into_iter()
      .map(|id| GraphNode {
        dependencies: graph.dependencies(&id).iter().map(|d| d.to_string()).collect(),
        asset: id.to_string(),
      })
      .collect();
    print_json(&nodes)?;
  } else {
    print!("{}", graph.to_dot());
  }
  Ok(())
}
