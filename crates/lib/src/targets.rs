//! Named target sets and the standard asset registry.

use std::fmt;

use crate::asset::AssetId;
use crate::dns::ClusterDns;
use crate::execute::ExecuteError;
use crate::installconfig::{InstallConfig, InstallConfigAsset};
use crate::manifests::Manifests;
use crate::network::NetworkOperator;
use crate::registry::AssetRegistry;

/// A group of assets generated together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
  InstallConfig,
  Manifests,
}

impl Target {
  pub const ALL: [Target; 2] = [Target::InstallConfig, Target::Manifests];

  pub fn as_str(&self) -> &'static str {
    match self {
      Target::InstallConfig => "install-config",
      Target::Manifests => "manifests",
    }
  }

  /// Assets whose results make up this target's output.
  pub fn assets(&self) -> Vec<AssetId> {
    match self {
      Target::InstallConfig => vec![InstallConfigAsset::asset_id()],
      Target::Manifests => vec![AssetId::new(Manifests::ID)],
    }
  }
}

impl fmt::Display for Target {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Register every built-in asset for `config`.
pub fn standard_registry(config: InstallConfig) -> Result<AssetRegistry, ExecuteError> {
  let mut registry = AssetRegistry::new();
  let install_config = registry.register(InstallConfigAsset::new(config))?;
  let network = registry.register(NetworkOperator::new(install_config.clone()))?;
  let dns = registry.register(ClusterDns::new(install_config))?;
  registry.register(Manifests::new(vec![network, dns]))?;
  Ok(registry)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::consts::{DNS_CONFIG_FILE, INSTALL_CONFIG_FILE, NETWORK_CONFIG_FILE, NETWORK_MANIFESTS_FILE};
  use crate::execute::{AssetGraph, Engine};
  use crate::installconfig::tests::sample;
  use crate::network::NetworkConfig;

  #[test]
  fn target_names_match_display() {
    for target in Target::ALL {
      assert_eq!(target.to_string(), target.as_str());
    }
    assert_eq!(Target::InstallConfig.as_str(), "install-config");
  }

  #[test]
  fn standard_graph_is_a_diamond() {
    let registry = standard_registry(sample()).unwrap();
    let graph = AssetGraph::from_registry(&registry).unwrap();

    assert_eq!(graph.len(), 4);
    assert_eq!(graph.dependents(&InstallConfigAsset::asset_id()).len(), 2);
    assert_eq!(graph.waves().unwrap().len(), 3);
  }

  #[test]
  fn manifests_target_end_to_end() {
    let registry = standard_registry(sample()).unwrap();
    let bundle = Engine::new(&registry).run(&Target::Manifests.assets()).unwrap();

    let names: Vec<_> = bundle.iter().map(|e| e.artifact.name.as_str()).collect();
    let expected_net = format!("manifests/{}", NETWORK_CONFIG_FILE);
    let expected_dns = format!("manifests/{}", DNS_CONFIG_FILE);
    assert_eq!(names, vec![expected_net.as_str(), expected_dns.as_str()]);
    assert!(bundle.get(&format!("manifests/{}", NETWORK_MANIFESTS_FILE)).is_none());

    let net: NetworkConfig = serde_yaml::from_slice(&bundle.get(&expected_net).unwrap().artifact.data).unwrap();
    assert_eq!(net.spec.service_network, "172.30.0.0/16");
    assert_eq!(net.spec.cluster_networks[0].cidr, "10.128.0.0/14");
  }

  #[test]
  fn both_targets_share_one_run() {
    let registry = standard_registry(sample()).unwrap();
    let targets: Vec<AssetId> = Target::ALL.iter().flat_map(|t| t.assets()).collect();
    let bundle = Engine::new(&registry).run(&targets).unwrap();

    assert_eq!(bundle.iter().next().unwrap().artifact.name, INSTALL_CONFIG_FILE);
    assert_eq!(bundle.len(), 3);
  }

  #[test]
  fn bad_address_fails_the_run() {
    let mut config = sample();
    config.networking.service_cidr = "172.30.0.0".to_string();
    let registry = standard_registry(config).unwrap();

    let err = Engine::new(&registry).run(&Target::Manifests.assets()).unwrap_err();
    assert!(err.is_configuration());
    assert_eq!(err.asset(), Some(&AssetId::new(NetworkOperator::ID)));
  }
}
