mod create;
mod graph;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use installgen_lib::installconfig::InstallConfig;
use installgen_lib::platform::paths::install_config_path;

pub use create::cmd_create;
pub use graph::cmd_graph;

/// Load the install config from `config`, or from the assets directory.
fn load_install_config(dir: &Path, config: Option<PathBuf>) -> Result<InstallConfig> {
  let path = config.unwrap_or_else(|| install_config_path(dir));
  InstallConfig::from_file(&path).with_context(|| format!("Failed to load install config: {}", path.display()))
}
