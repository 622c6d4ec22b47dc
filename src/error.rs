// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScaffoldError {
  #[error("IO Error: {0}")]
  Io(#[from] std::io::Error),

  #[error("Could not read settings file '{path}': {source}")]
  SettingsRead {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Could not parse settings file '{path}': {source}")]
  SettingsParse {
    path: PathBuf,
    #[source]
    source: serde_yaml::Error,
  },

  #[error("Templates directory does not exist or is not a directory: {0}")]
  TemplatesRootNotFound(PathBuf),

  #[error("Could not determine templates directory")]
  CannotDetermineTemplatesDir,

  #[error("No templates found in {0}")]
  NoTemplates(PathBuf),

  #[error("Template directory not found at path: {0}")]
  TemplateDirNotFound(PathBuf),

  #[error("Could not read package manifest '{manifest_path}': {source}")]
  ManifestRead {
    manifest_path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Could not parse package manifest '{manifest_path}': {source}")]
  ManifestParse {
    manifest_path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("Package manifest '{0}' is not a JSON object")]
  ManifestNotObject(PathBuf),

  #[error("Failed to create output directory '{path}': {source}")]
  OutputDirCreation {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Error walking template directory '{path}': {source}")]
  WalkDir {
    path: PathBuf,
    #[source]
    source: walkdir::Error,
  },

  #[error("Command execution error for step '{step_name}': {source}")]
  CommandExec {
    step_name: String,
    #[source]
    source: std::io::Error,
  },

  #[error("User interaction failed: {0}")]
  Dialoguer(#[from] dialoguer::Error),

  #[error("Operation canceled")]
  Cancelled,
}

impl ScaffoldError {
  pub fn command_exec(step_name: &str, source: std::io::Error) -> Self {
    ScaffoldError::CommandExec {
      step_name: step_name.to_string(),
      source,
    }
  }
}
