use predicates::prelude::*;

use super::common::{INSTALL_CONFIG, TestEnv};

#[test]
fn create_manifests_writes_files() {
  let env = TestEnv::with_config(INSTALL_CONFIG);

  env
    .cmd()
    .args(["create", "manifests"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Generated manifests"));

  let network = env.read("manifests/network-operator-config.yml");
  assert!(network.contains("serviceNetwork: 172.30.0.0/16"));
  assert!(network.contains("cidr: 10.128.0.0/14"));
  assert!(network.contains("hostSubnetLength: 9"));
  assert!(network.contains("mode: Policy"));

  let dns = env.read("manifests/cluster-dns-02-config.yml");
  assert!(dns.contains("baseDomain: mycluster.example.com"));
}

#[test]
fn create_install_config_writes_single_file() {
  let env = TestEnv::with_config(INSTALL_CONFIG);

  env.cmd().args(["create", "install-config"]).assert().success();

  assert!(env.read("install-config.yml").contains("type: OpenshiftSDN"));
  assert!(!env.path("manifests").exists());
}

#[test]
fn parallel_create_matches_sequential() {
  let sequential = TestEnv::with_config(INSTALL_CONFIG);
  let parallel = TestEnv::with_config(INSTALL_CONFIG);

  sequential.cmd().args(["create", "manifests"]).assert().success();
  parallel.cmd().args(["create", "manifests", "--jobs", "4"]).assert().success();

  for file in [
    "manifests/network-operator-config.yml",
    "manifests/cluster-dns-02-config.yml",
  ] {
    assert_eq!(sequential.read(file), parallel.read(file));
  }
}

#[test]
fn create_json_output_lists_files() {
  let env = TestEnv::with_config(INSTALL_CONFIG);

  let output = env
    .cmd()
    .args(["--output", "json", "create", "manifests"])
    .output()
    .unwrap();
  assert!(output.status.success());

  let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(summary["target"], "manifests");
  let files = summary["files"].as_array().unwrap();
  assert_eq!(files.len(), 2);
  assert_eq!(files[0]["name"], "manifests/network-operator-config.yml");
  assert_eq!(files[0]["asset"], "manifests");
}

#[test]
fn invalid_cidr_fails_without_writing() {
  let env = TestEnv::with_config(&INSTALL_CONFIG.replace("10.128.0.0/14", "10.128.0.0/99"));

  env
    .cmd()
    .args(["create", "manifests"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("network-operator"))
    .stderr(predicate::str::contains("podCIDR"));

  assert!(!env.path("manifests").exists());
}

#[test]
fn explicit_config_path_is_used() {
  let env = TestEnv::with_config(INSTALL_CONFIG);
  let elsewhere = tempfile::TempDir::new().unwrap();
  let config = elsewhere.path().join("cluster.yaml");
  std::fs::write(&config, INSTALL_CONFIG.replace("mycluster", "other")).unwrap();

  env
    .cmd()
    .args(["create", "manifests", "--config"])
    .arg(&config)
    .assert()
    .success();

  assert!(env.read("manifests/cluster-dns-02-config.yml").contains("other.example.com"));
}

#[test]
fn graph_prints_dot() {
  let env = TestEnv::with_config(INSTALL_CONFIG);

  env
    .cmd()
    .arg("graph")
    .assert()
    .success()
    .stdout(predicate::str::starts_with("digraph {"))
    .stdout(predicate::str::contains("network-operator"))
    .stdout(predicate::str::contains("install-config"));
}

#[test]
fn graph_json_lists_assets_in_dependency_order() {
  let env = TestEnv::with_config(INSTALL_CONFIG);

  let output = env.cmd().args(["graph", "--output", "json"]).assert().success();
  let nodes: serde_json::Value = serde_json::from_slice(&output.get_output().stdout).unwrap();
  let nodes = nodes.as_array().unwrap();

  assert_eq!(nodes.len(), 4);
  assert_eq!(nodes[0]["asset"], "install-config");
  assert_eq!(nodes[0]["dependencies"], serde_json::json!([]));
  assert_eq!(nodes[3]["asset"], "manifests");
  assert_eq!(
    nodes[3]["dependencies"],
    serde_json::json!(["network-operator", "cluster-dns"])
  );
}
