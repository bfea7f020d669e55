//! Cluster DNS configuration.

use serde::{Deserialize, Serialize};

use crate::asset::{Asset, AssetError, AssetId, Dependencies, ResultSet};
use crate::consts::{CONFIG_API_VERSION, DNS_CONFIG_FILE};
use crate::installconfig::InstallConfigAsset;
use crate::meta::ObjectMeta;
use crate::util::yaml;

/// Cluster-scoped `DNS` config object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsConfig {
  pub api_version: String,
  pub kind: String,
  pub metadata: ObjectMeta,
  pub spec: DnsSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsSpec {
  /// Domain all cluster records live under, `<cluster name>.<base domain>`.
  pub base_domain: String,
}

/// Produces `cluster-dns-02-config.yml` from the install config.
pub struct ClusterDns {
  install_config: AssetId,
}

impl ClusterDns {
  pub const ID: &'static str = "cluster-dns";

  pub fn new(install_config: AssetId) -> Self {
    Self { install_config }
  }
}

impl Asset for ClusterDns {
  fn id(&self) -> AssetId {
    AssetId::new(Self::ID)
  }

  fn name(&self) -> &str {
    "Cluster DNS"
  }

  fn dependencies(&self) -> Vec<AssetId> {
    vec![self.install_config.clone()]
  }

  fn generate(&self, deps: &Dependencies) -> Result<ResultSet, AssetError> {
    let install_config = InstallConfigAsset::decode(deps, &self.install_config)?;

    let config = DnsConfig {
      api_version: CONFIG_API_VERSION.to_string(),
      kind: "DNS".to_string(),
      metadata: ObjectMeta::named("cluster"),
      spec: DnsSpec {
        base_domain: install_config.cluster_domain(),
      },
    };

    let mut results = ResultSet::new();
    results.push(DNS_CONFIG_FILE, yaml::encode(DNS_CONFIG_FILE, &config)?)?;
    Ok(results)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::installconfig::tests::{deps_for, sample};

  #[test]
  fn dns_config_uses_cluster_domain() {
    let dns = ClusterDns::new(InstallConfigAsset::asset_id());
    let results = dns.generate(&deps_for(sample())).unwrap();

    let config: DnsConfig = serde_yaml::from_slice(&results.get(DNS_CONFIG_FILE).unwrap().data).unwrap();
    assert_eq!(config.kind, "DNS");
    assert_eq!(config.metadata.name, "cluster");
    assert_eq!(config.spec.base_domain, "mycluster.example.com");
  }

  #[test]
  fn missing_install_config_fails() {
    let dns = ClusterDns::new(InstallConfigAsset::asset_id());
    let err = dns.generate(&Dependencies::new()).unwrap_err();
    assert!(matches!(err, AssetError::MissingDependency(_)));
  }
}
