//! Shared constants: file names, API versions and defaults.

/// Environment variable overriding the assets directory.
pub const ASSETS_DIR_ENV: &str = "INSTALLGEN_DIR";

/// Name of the install config file read from the assets directory.
pub const INSTALL_CONFIG_INPUT: &str = "install-config.yaml";

pub const INSTALL_CONFIG_FILE: &str = "install-config.yml";
pub const NETWORK_CONFIG_FILE: &str = "network-operator-config.yml";
pub const NETWORK_MANIFESTS_FILE: &str = "network-operator-manifests.yml";
pub const DNS_CONFIG_FILE: &str = "cluster-dns-02-config.yml";

/// Directory prefix under which the manifests asset re-emits its members.
pub const MANIFESTS_DIR: &str = "manifests";

pub const INSTALL_CONFIG_API_VERSION: &str = "v1";
pub const NETWORK_OPERATOR_API_VERSION: &str = "networkoperator.openshift.io/v1";
pub const CONFIG_API_VERSION: &str = "config.openshift.io/v1";

/// Per-node subnet size carved out of each cluster network (a /23 per node for IPv4).
pub const DEFAULT_HOST_SUBNET_LENGTH: u32 = 9;
