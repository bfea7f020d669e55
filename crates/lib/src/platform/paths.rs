use std::path::PathBuf;

use crate::consts::{ASSETS_DIR_ENV, INSTALL_CONFIG_INPUT};

/// Directory generated assets are written to.
///
/// `INSTALLGEN_DIR` if set and non-empty, otherwise the current directory.
pub fn assets_dir() -> PathBuf {
  match std::env::var(ASSETS_DIR_ENV) {
    Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
    _ => PathBuf::from("."),
  }
}

/// Default install config location inside an assets directory.
pub fn install_config_path(dir: &std::path::Path) -> PathBuf {
  dir.join(INSTALL_CONFIG_INPUT)
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  #[serial]
  fn env_var_overrides_assets_dir() {
    temp_env::with_var(ASSETS_DIR_ENV, Some("/custom/assets"), || {
      assert_eq!(assets_dir(), PathBuf::from("/custom/assets"));
    });
  }

  #[test]
  #[serial]
  fn falls_back_to_current_dir() {
    temp_env::with_var(ASSETS_DIR_ENV, None::<&str>, || {
      assert_eq!(assets_dir(), PathBuf::from("."));
    });
    temp_env::with_var(ASSETS_DIR_ENV, Some(""), || {
      assert_eq!(assets_dir(), PathBuf::from("."));
    });
  }

  #[test]
  fn install_config_lives_in_assets_dir() {
    assert_eq!(
      install_config_path(std::path::Path::new("/work")),
      PathBuf::from("/work/install-config.yaml")
    );
  }
}
