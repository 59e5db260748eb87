use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::constants;

#[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
pub struct Config {
  pub backend_url: Option<String>,
  pub display_mode: Option<String>,
}

pub fn project_dirs() -> Option<ProjectDirs> {
  ProjectDirs::from("", "", "voyager")
}

/// Directory holding the preference storage file and the log.
pub fn data_dir() -> Option<PathBuf> {
  project_dirs().map(|d| d.data_dir().to_path_buf())
}

impl Config {
  pub fn load() -> Self {
    if let Some(proj_dirs) = project_dirs() {
      let config_file = proj_dirs.config_dir().join("prefs.toml");
      if let Ok(content) = std::fs::read_to_string(config_file) {
        return Self::parse(&content);
      }
    }
    Self::default()
  }

  /// Parse config text; a malformed file falls back to defaults.
  pub fn parse(content: &str) -> Self {
    match toml::from_str(content) {
      Ok(config) => config,
      Err(e) => {
        tracing::warn!(err = %e, "config: ignoring malformed prefs.toml");
        Self::default()
      }
    }
  }

  /// Backend base URL: CLI flag, then config file, then the built-in default.
  /// Trailing slashes are dropped so endpoint paths can be appended directly.
  pub fn resolve_backend_url(&self, cli: Option<&str>) -> String {
    let url = cli
      .map(str::to_string)
      .or_else(|| self.backend_url.clone())
      .filter(|s| !s.trim().is_empty())
      .unwrap_or_else(|| constants().default_backend_url.clone());
    url.trim().trim_end_matches('/').to_string()
  }
}
