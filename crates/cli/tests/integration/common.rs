//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

pub const INSTALL_CONFIG: &str = r#"
apiVersion: v1
metadata:
  name: mycluster
baseDomain: example.com
networking:
  type: OpenshiftSDN
  serviceCIDR: 172.30.0.0/16
  podCIDR: 10.128.0.0/14
"#;

/// Isolated test environment.
///
/// Each test gets its own temporary assets directory.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  /// Create an assets directory holding `install_config`.
  pub fn with_config(install_config: &str) -> Self {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("install-config.yaml"), install_config).unwrap();
    Self { temp }
  }

  pub fn dir(&self) -> &Path {
    self.temp.path()
  }

  pub fn path(&self, relative: &str) -> PathBuf {
    self.temp.path().join(relative)
  }

  pub fn read(&self, relative: &str) -> String {
    std::fs::read_to_string(self.path(relative)).unwrap_or_else(|e| panic!("Failed to read {}: {}", relative, e))
  }

  /// Command for the installgen binary pointed at this environment.
  pub fn cmd(&self) -> Command {
    let mut cmd = cargo_bin_cmd!("installgen");
    cmd.arg("--dir").arg(self.dir()).env_remove("INSTALLGEN_DIR");
    cmd
  }
}
