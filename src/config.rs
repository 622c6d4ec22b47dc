// src/config.rs
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::ScaffoldError;

pub const DEFAULT_PROJECT: &str = "default_project";
const SETTINGS_FILE: &str = "config.yaml";

/// Supported package managers, in menu order.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
  #[default]
  Npm,
  Yarn,
  Pnpm,
}

impl PackageManager {
  pub const ALL: [PackageManager; 3] = [PackageManager::Npm, PackageManager::Yarn, PackageManager::Pnpm];

  pub fn program(self) -> &'static str {
    match self {
      PackageManager::Npm => "npm",
      PackageManager::Yarn => "yarn",
      PackageManager::Pnpm => "pnpm",
    }
  }

  pub fn install_args(self) -> &'static [&'static str] {
    &["install"]
  }

  pub fn dev_args(self) -> &'static [&'static str] {
    &["run", "dev"]
  }
}

impl fmt::Display for PackageManager {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.program())
  }
}

/// User settings, read from `config.yaml` in the platform config directory.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
  #[serde(default)]
  pub templates_dir: Option<PathBuf>,
  #[serde(default = "default_project")]
  pub default_project: String,
  /// Preselected entry of the package manager menu.
  #[serde(default)]
  pub package_manager: PackageManager,
  /// Whether to run `install` and `run dev` after scaffolding.
  #[serde(default = "default_install")]
  pub install: bool,
}

fn default_project() -> String {
  DEFAULT_PROJECT.to_string()
}
fn default_install() -> bool {
  true
}

impl Default for Settings {
  fn default() -> Self {
    Settings {
      templates_dir: None,
      default_project: default_project(),
      package_manager: PackageManager::default(),
      install: default_install(),
    }
  }
}

pub fn project_dirs() -> Option<ProjectDirs> {
  ProjectDirs::from("", "", "tt")
}

impl Settings {
  /// Loads settings from the platform config directory, falling back to defaults
  /// when there is no settings file.
  pub fn load() -> Result<Settings, ScaffoldError> {
    match project_dirs() {
      Some(dirs) => Settings::from_path(&dirs.config_dir().join(SETTINGS_FILE)),
      None => {
        debug!("No home directory available, using default settings");
        Ok(Settings::default())
      }
    }
  }

  pub fn from_path(path: &Path) -> Result<Settings, ScaffoldError> {
    if !path.is_file() {
      debug!("No settings file at {}, using defaults", path.display());
      return Ok(Settings::default());
    }

    let content = fs::read_to_string(path).map_err(|e| ScaffoldError::SettingsRead {
      path: path.to_path_buf(),
      source: e,
    })?;
    if content.trim().is_empty() {
      return Ok(Settings::default());
    }

    let settings: Settings = serde_yaml::from_str(&content).map_err(|e| ScaffoldError::SettingsParse {
      path: path.to_path_buf(),
      source: e,
    })?;
    debug!("Loaded settings from {}: {:?}", path.display(), settings);
    Ok(settings)
  }
}
