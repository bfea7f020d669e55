//! Network operator configuration.
//!
//! [`NetworkOperator`] derives the cluster network operator's `NetworkConfig`
//! object from the install config and emits it as
//! `network-operator-config.yml`, alongside `network-operator-manifests.yml`
//! for the operator's own manifests (currently empty).

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::asset::{Asset, AssetError, AssetId, Dependencies, ResultSet};
use crate::consts::{
  DEFAULT_HOST_SUBNET_LENGTH, NETWORK_CONFIG_FILE, NETWORK_MANIFESTS_FILE, NETWORK_OPERATOR_API_VERSION,
};
use crate::installconfig::{InstallConfig, InstallConfigAsset};
use crate::meta::ObjectMeta;
use crate::util::yaml;

/// Errors parsing a CIDR block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CidrError {
  #[error("missing prefix length in {0:?}")]
  MissingPrefix(String),

  #[error("invalid address in {0:?}")]
  InvalidAddress(String),

  #[error("invalid prefix length in {0:?}")]
  InvalidPrefix(String),

  #[error("prefix length {prefix} exceeds {max} in {input:?}")]
  PrefixTooLong { input: String, prefix: u8, max: u8 },
}

/// An IPv4 or IPv6 network in CIDR notation.
///
/// The stored address is always the network address, so `10.128.0.1/14`
/// parses to, and displays as, `10.128.0.0/14`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cidr {
  addr: IpAddr,
  prefix: u8,
}

impl Cidr {
  pub fn prefix(&self) -> u8 {
    self.prefix
  }

  pub fn is_ipv4(&self) -> bool {
    self.addr.is_ipv4()
  }
}

impl FromStr for Cidr {
  type Err = CidrError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let (addr, prefix) = s.split_once('/').ok_or_else(|| CidrError::MissingPrefix(s.to_string()))?;
    let addr: IpAddr = addr.parse().map_err(|_| CidrError::InvalidAddress(s.to_string()))?;
    if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
      return Err(CidrError::InvalidPrefix(s.to_string()));
    }
    let prefix: u8 = prefix.parse().map_err(|_| CidrError::InvalidPrefix(s.to_string()))?;

    let max = if addr.is_ipv4() { 32 } else { 128 };
    if prefix > max {
      return Err(CidrError::PrefixTooLong {
        input: s.to_string(),
        prefix,
        max,
      });
    }

    Ok(Self {
      addr: mask(addr, prefix),
      prefix,
    })
  }
}

impl fmt::Display for Cidr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.addr, self.prefix)
  }
}

/// Clear the host bits of `addr`.
fn mask(addr: IpAddr, prefix: u8) -> IpAddr {
  match addr {
    IpAddr::V4(v4) => {
      let bits = u32::from(v4);
      let mask = u32::MAX.checked_shl(32 - u32::from(prefix)).unwrap_or(0);
      IpAddr::V4((bits & mask).into())
    }
    IpAddr::V6(v6) => {
      let bits = u128::from(v6);
      let mask = u128::MAX.checked_shl(128 - u32::from(prefix)).unwrap_or(0);
      IpAddr::V6((bits & mask).into())
    }
  }
}

/// The network operator's top-level configuration object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
  pub api_version: String,
  pub kind: String,
  pub metadata: ObjectMeta,
  pub spec: NetworkConfigSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfigSpec {
  /// CIDR used for service IPs.
  pub service_network: String,
  /// Pod networks; each node gets a slice of `hostSubnetLength` bits.
  pub cluster_networks: Vec<ClusterNetwork>,
  pub default_network: DefaultNetworkDefinition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterNetwork {
  pub cidr: String,
  pub host_subnet_length: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultNetworkDefinition {
  #[serde(rename = "type")]
  pub network_type: NetworkType,
  #[serde(rename = "openshiftSDNConfig", default, skip_serializing_if = "Option::is_none")]
  pub openshift_sdn_config: Option<OpenshiftSdnConfig>,
}

impl DefaultNetworkDefinition {
  /// Default network for a plugin. OpenShift SDN runs in policy mode.
  pub fn for_type(network_type: NetworkType) -> Self {
    let openshift_sdn_config = match network_type {
      NetworkType::OpenshiftSdn => Some(OpenshiftSdnConfig { mode: SdnMode::Policy }),
      NetworkType::OvnKubernetes => None,
    };
    Self {
      network_type,
      openshift_sdn_config,
    }
  }
}

/// Cluster network plugin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkType {
  #[default]
  #[serde(rename = "OpenshiftSDN")]
  OpenshiftSdn,
  #[serde(rename = "OVNKubernetes")]
  OvnKubernetes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenshiftSdnConfig {
  pub mode: SdnMode,
}

/// Isolation mode of the OpenShift SDN plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SdnMode {
  /// NetworkPolicy-based isolation.
  Policy,
}

/// Produces the network operator config and manifests.
pub struct NetworkOperator {
  install_config: AssetId,
}

impl NetworkOperator {
  pub const ID: &'static str = "network-operator";

  pub fn new(install_config: AssetId) -> Self {
    Self { install_config }
  }

  /// Build the `NetworkConfig` object for an install config.
  pub fn net_config(install_config: &InstallConfig) -> Result<NetworkConfig, AssetError> {
    let networking = &install_config.networking;
    let service_network = parse_cidr("serviceCIDR", &networking.service_cidr)?;
    let pod_network = parse_cidr("podCIDR", &networking.pod_cidr)?;

    Ok(NetworkConfig {
      api_version: NETWORK_OPERATOR_API_VERSION.to_string(),
      kind: "NetworkConfig".to_string(),
      metadata: ObjectMeta::named("default"),
      spec: NetworkConfigSpec {
        service_network: service_network.to_string(),
        cluster_networks: vec![ClusterNetwork {
          cidr: pod_network.to_string(),
          host_subnet_length: DEFAULT_HOST_SUBNET_LENGTH,
        }],
        default_network: DefaultNetworkDefinition::for_type(networking.network_type),
      },
    })
  }

  /// Operator manifests. Nothing is generated yet.
  fn manifests(&self) -> Vec<u8> {
    Vec::new()
  }
}

fn parse_cidr(field: &str, value: &str) -> Result<Cidr, AssetError> {
  value
    .parse()
    .map_err(|e: CidrError| AssetError::Configuration(format!("invalid {}: {}", field, e)))
}

impl Asset for NetworkOperator {
  fn id(&self) -> AssetId {
    AssetId::new(Self::ID)
  }

  fn name(&self) -> &str {
    "Network Operator"
  }

  fn dependencies(&self) -> Vec<AssetId> {
    vec![self.install_config.clone()]
  }

  fn generate(&self, deps: &Dependencies) -> Result<ResultSet, AssetError> {
    let install_config = InstallConfigAsset::decode(deps, &self.install_config)?;
    let net_config = Self::net_config(&install_config)?;

    let mut results = ResultSet::new();
    results.push(NETWORK_CONFIG_FILE, yaml::encode(NETWORK_CONFIG_FILE, &net_config)?)?;
    results.push(NETWORK_MANIFESTS_FILE, self.manifests())?;
    Ok(results)
  }
}
