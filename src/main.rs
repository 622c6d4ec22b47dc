// src/main.rs
mod catalog;
mod cli;
mod config;
mod error;
mod flow;
mod generate;
mod list;
mod names;
mod prompt;
mod utils;

use clap::Parser;
use cli::Cli;
use config::Settings;
use console::style;
use error::ScaffoldError;
use flow::FlowContext;
use generate::ScaffoldOptions;
use log::LevelFilter;
use prompt::TermPrompter;
use std::path::{Path, PathBuf};
use std::{env, fs, process};
use utils::DuctRunner;

fn main() {
  let cli = Cli::parse();

  // Setup logging based on verbosity
  let log_level = match cli.verbose {
    0 => LevelFilter::Info,
    1 => LevelFilter::Debug,
    _ => LevelFilter::Trace,
  };
  env_logger::Builder::new().filter_level(log_level).init();

  log::debug!("CLI args: {:?}", cli);

  if let Err(e) = run(cli) {
    eprintln!("{} {}", style("✖").red(), e);
    process::exit(1);
  }
}

fn run(cli: Cli) -> Result<(), ScaffoldError> {
  let settings = Settings::load()?;
  let templates_path = determine_templates_dir(cli.templates_dir.clone(), &settings)?;
  log::debug!("Using templates directory: {}", templates_path.display());

  let catalog = catalog::build_catalog(&templates_path)?;
  if cli.list {
    list::run_list(&catalog, &templates_path);
    return Ok(());
  }
  if catalog.is_empty() {
    return Err(ScaffoldError::NoTemplates(templates_path));
  }

  let cwd = env::current_dir()?;
  let ctx = FlowContext {
    target_arg: cli.target_dir(),
    cwd: &cwd,
    catalog: &catalog,
    default_project: &settings.default_project,
    default_manager: settings.package_manager,
  };
  let answers = flow::collect_answers(&mut TermPrompter::default(), &ctx)?;

  let options = ScaffoldOptions {
    templates_dir: &templates_path,
    cwd: &cwd,
    install: settings.install && !cli.no_install,
  };
  generate::run_generate(&answers, &options, &mut DuctRunner)?;
  Ok(())
}

fn has_templates(dir: &Path) -> bool {
  fs::read_dir(dir).is_ok_and(|entries| {
    entries
      .flatten()
      .any(|e| e.file_name().to_string_lossy().starts_with(catalog::TEMPLATE_PREFIX))
  })
}

/// Determines the templates directory path.
/// Order of preference:
/// 1. --templates-dir CLI argument (or TT_TEMPLATES_DIR)
/// 2. templatesDir from the settings file
/// 3. templates/ next to the executable
/// 4. the executable's own directory, when it holds template-* folders
/// 5. templates/ in the user data directory
/// 6. templates/ relative to the current working directory (fallback)
fn determine_templates_dir(cli_path: Option<PathBuf>, settings: &Settings) -> Result<PathBuf, ScaffoldError> {
  // Env variable check happens automatically via clap's `env` attribute
  if let Some(path) = cli_path {
    if path.is_dir() {
      return Ok(path);
    }
    return Err(ScaffoldError::TemplatesRootNotFound(path));
  }

  if let Some(path) = &settings.templates_dir {
    if path.is_dir() {
      return Ok(path.clone());
    }
    log::warn!(
      "Configured templatesDir does not exist or is not a directory: {}",
      path.display()
    );
  }

  if let Ok(mut exe_path) = env::current_exe() {
    exe_path.pop(); // Remove the executable name
    let path = exe_path.join("templates");
    if path.is_dir() {
      return Ok(path);
    }
    if has_templates(&exe_path) {
      return Ok(exe_path);
    }
  }

  if let Some(dirs) = config::project_dirs() {
    let path = dirs.data_dir().join("templates");
    if path.is_dir() {
      return Ok(path);
    }
  }

  // Relative to current working directory as a last resort
  let path = PathBuf::from("templates");
  if path.is_dir() {
    return Ok(path);
  }

  Err(ScaffoldError::CannotDetermineTemplatesDir)
}
