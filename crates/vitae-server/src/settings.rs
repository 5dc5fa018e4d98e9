//! Server configuration, deserialised from `config.toml` and `VITAE_*`
//! environment variables.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Runtime server configuration. Every key is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "127.0.0.1".to_string(),
      port:       8000,
      store_path: PathBuf::from("vitae.db"),
    }
  }
}

impl ServerConfig {
  /// Layer the optional TOML file at `path` under `VITAE_*` variables.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("VITAE"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_yields_defaults() {
    let cfg = ServerConfig::load(Path::new("/nonexistent/vitae-config.toml")).unwrap();
    assert_eq!(cfg.port, 8000);
    assert_eq!(cfg.store_path, PathBuf::from("vitae.db"));
    assert_eq!(ServerConfig::default().address(), "127.0.0.1:8000");
  }

  #[test]
  fn tilde_is_left_alone_without_slash() {
    assert_eq!(expand_tilde(Path::new("~vitae.db")), PathBuf::from("~vitae.db"));
    assert_eq!(expand_tilde(Path::new("data/vitae.db")), PathBuf::from("data/vitae.db"));
  }
}
