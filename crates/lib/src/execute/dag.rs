//! Asset dependency graph.
//!
//! This module provides a directed acyclic graph (DAG) over the assets
//! reachable from a set of targets. It is used to reject cycles before any
//! asset is generated, to compute parallel execution waves, and to render the
//! graph for inspection.

use std::collections::{HashMap, HashSet};

use petgraph::Direction;
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};

use crate::asset::AssetId;
use crate::registry::AssetRegistry;

use super::types::ExecuteError;

/// A DAG of asset dependencies.
///
/// Edges point from a dependency to its dependent. Nodes are added in
/// depth-first discovery order from the targets, which keeps every derived
/// ordering deterministic.
pub struct AssetGraph {
  /// The underlying graph.
  graph: DiGraph<AssetId, ()>,

  /// Map from asset identity to node index.
  nodes: HashMap<AssetId, NodeIndex>,
}

impl AssetGraph {
  /// Build the graph of everything reachable from `targets`.
  ///
  /// # Errors
  ///
  /// Returns `UnknownAsset` if any reachable identity is not registered, and
  /// `Cycle` if the reachable graph is not acyclic.
  pub fn from_targets(registry: &AssetRegistry, targets: &[AssetId]) -> Result<Self, ExecuteError> {
    let mut graph = DiGraph::new();
    let mut nodes: HashMap<AssetId, NodeIndex> = HashMap::new();
    let mut expanded: HashSet<AssetId> = HashSet::new();

    // Iterative DFS; each asset's dependency list is read once.
    let mut stack: Vec<AssetId> = targets.iter().rev().cloned().collect();
    while let Some(id) = stack.pop() {
      if !expanded.insert(id.clone()) {
        continue;
      }

      let asset = registry.get(&id)?;
      let dependent_idx = *nodes.entry(id.clone()).or_insert_with(|| graph.add_node(id.clone()));

      let deps = asset.dependencies();
      for dep in &deps {
        let dep_idx = *nodes.entry(dep.clone()).or_insert_with(|| graph.add_node(dep.clone()));
        if graph.find_edge(dep_idx, dependent_idx).is_none() {
          graph.add_edge(dep_idx, dependent_idx, ());
        }
      }

      for dep in deps.into_iter().rev() {
        if !expanded.contains(&dep) {
          stack.push(dep);
        }
      }
    }

    let dag = Self { graph, nodes };

    // Verify no cycles
    dag.verify_acyclic()?;

    Ok(dag)
  }

  /// Build the graph of every asset in the registry.
  pub fn from_registry(registry: &AssetRegistry) -> Result<Self, ExecuteError> {
    Self::from_targets(registry, registry.ids())
  }

  /// Verify that the graph is acyclic.
  fn verify_acyclic(&self) -> Result<(), ExecuteError> {
    match toposort(&self.graph, None) {
      Ok(_) => Ok(()),
      Err(cycle) => Err(ExecuteError::Cycle {
        path: self.cycle_path(cycle.node_id()),
      }),
    }
  }

  /// Find a concrete cycle through `start`, following "depends on" edges.
  fn cycle_path(&self, start: NodeIndex) -> Vec<AssetId> {
    let component: HashSet<NodeIndex> = tarjan_scc(&self.graph)
      .into_iter()
      .find(|scc| scc.contains(&start))
      .map(|scc| scc.into_iter().collect())
      .unwrap_or_default();

    let mut visited = HashSet::new();
    let mut stack = vec![(start, vec![start])];
    while let Some((idx, path)) = stack.pop() {
      for dep in self.graph.neighbors_directed(idx, Direction::Incoming) {
        if dep == start {
          let mut cycle = path.clone();
          cycle.push(start);
          return cycle.into_iter().map(|i| self.graph[i].clone()).collect();
        }
        if component.contains(&dep) && visited.insert(dep) {
          let mut next = path.clone();
          next.push(dep);
          stack.push((dep, next));
        }
      }
    }

    vec![self.graph[start].clone()]
  }

  /// Assets in an order where dependencies come before dependents.
  pub fn topological_order(&self) -> Result<Vec<AssetId>, ExecuteError> {
    let sorted = toposort(&self.graph, None).map_err(|cycle| ExecuteError::Cycle {
      path: self.cycle_path(cycle.node_id()),
    })?;

    Ok(sorted.into_iter().map(|idx| self.graph[idx].clone()).collect())
  }

  /// Assets organized into parallel execution waves.
  ///
  /// Each wave contains assets whose dependencies all live in earlier waves.
  /// Within a wave, assets keep discovery order.
  pub fn waves(&self) -> Result<Vec<Vec<AssetId>>, ExecuteError> {
    // Use Kahn's algorithm variant to compute levels
    let mut in_degree: HashMap<NodeIndex, usize> = HashMap::new();
    let mut node_level: HashMap<NodeIndex, usize> = HashMap::new();

    for idx in self.graph.node_indices() {
      in_degree.insert(idx, self.graph.neighbors_directed(idx, Direction::Incoming).count());
    }

    let mut current_level = 0;
    let mut remaining: Vec<NodeIndex> = self.graph.node_indices().collect();

    while !remaining.is_empty() {
      let ready: Vec<NodeIndex> = remaining.iter().filter(|&&idx| in_degree[&idx] == 0).copied().collect();

      if ready.is_empty() {
        return Err(ExecuteError::Cycle {
          path: self.cycle_path(remaining[0]),
        });
      }

      for &idx in &ready {
        node_level.insert(idx, current_level);

        // Decrement in-degree of dependents
        for neighbor in self.graph.neighbors_directed(idx, Direction::Outgoing) {
          if let Some(deg) = in_degree.get_mut(&neighbor) {
            *deg = deg.saturating_sub(1);
          }
        }
      }
      remaining.retain(|idx| !ready.contains(idx));

      current_level += 1;
    }

    let mut waves: Vec<Vec<AssetId>> = vec![Vec::new(); current_level];
    for idx in self.graph.node_indices() {
      if let Some(&level) = node_level.get(&idx) {
        waves[level].push(self.graph[idx].clone());
      }
    }

    Ok(waves)
  }

  /// Direct dependencies of an asset.
  pub fn dependencies(&self, id: &AssetId) -> Vec<AssetId> {
    self.neighbors(id, Direction::Incoming)
  }

  /// Assets that depend directly on `id`.
  pub fn dependents(&self, id: &AssetId) -> Vec<AssetId> {
    self.neighbors(id, Direction::Outgoing)
  }

  fn neighbors(&self, id: &AssetId, direction: Direction) -> Vec<AssetId> {
    let Some(&idx) = self.nodes.get(id) else {
      return Vec::new();
    };

    let mut found: Vec<NodeIndex> = self.graph.neighbors_directed(idx, direction).collect();
    found.sort();
    found.into_iter().map(|i| self.graph[i].clone()).collect()
  }

  pub fn contains(&self, id: &AssetId) -> bool {
    self.nodes.contains_key(id)
  }

  /// Get the number of assets in the graph.
  pub fn len(&self) -> usize {
    self.graph.node_count()
  }

  pub fn is_empty(&self) -> bool {
    self.graph.node_count() == 0
  }

  /// Render the graph in Graphviz DOT format.
  pub fn to_dot(&self) -> String {
    let labeled = self.graph.map(|_, id| id.as_str(), |_, _| "");
    format!("{}", Dot::with_config(&labeled, &[Config::EdgeNoLabel]))
  }
}
