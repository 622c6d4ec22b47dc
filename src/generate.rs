// src/generate.rs
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use serde_json::Value;
use tempfile::Builder;

use crate::catalog::TEMPLATE_PREFIX;
use crate::config::PackageManager;
use crate::error::ScaffoldError;
use crate::flow::ScaffoldAnswers;
use crate::utils::{self, CommandRunner};

pub const MANIFEST_FILE: &str = "package.json";
const RENAME_FILES: [(&str, &str); 1] = [("_gitignore", ".gitignore")];
const STAGING_PREFIX: &str = ".tt-staging-";

pub struct ScaffoldOptions<'a> {
  pub templates_dir: &'a Path,
  pub cwd: &'a Path,
  /// Run `install` and `run dev` once the files are in place.
  pub install: bool,
}

/// Joins `target_dir` onto `cwd`, dropping `.` components.
pub fn resolve_target(cwd: &Path, target_dir: &str) -> PathBuf {
  cwd
    .join(target_dir)
    .components()
    .filter(|c| !matches!(c, Component::CurDir))
    .collect()
}

/// Realizes the collected answers on disk and hands off to the package manager.
/// Returns the project root.
pub fn run_generate(
  answers: &ScaffoldAnswers,
  options: &ScaffoldOptions<'_>,
  runner: &mut dyn CommandRunner,
) -> Result<PathBuf, ScaffoldError> {
  let root = resolve_target(options.cwd, &answers.target_dir);
  let template_id = answers.template_id();
  let template_path = options
    .templates_dir
    .join(format!("{}{}", TEMPLATE_PREFIX, template_id));
  info!(
    "Selected template '{}' from {}",
    template_id,
    template_path.display()
  );
  if !template_path.is_dir() {
    return Err(ScaffoldError::TemplateDirNotFound(template_path));
  }

  // --- 1. Prepare target ---
  if answers.overwrite == Some(true) {
    info!("Emptying {}", root.display());
    utils::empty_dir(&root)?;
  } else if !root.exists() {
    fs::create_dir_all(&root).map_err(|e| ScaffoldError::OutputDirCreation {
      path: root.clone(),
      source: e,
    })?;
    debug!("Created output directory: {}", root.display());
  }

  println!("\nScaffolding project in {}...", root.display());

  // --- 2. Copy and patch ---
  let pb = ProgressBar::new_spinner();
  pb.set_style(
    ProgressStyle::with_template("{spinner:.green} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
  );
  pb.enable_steady_tick(Duration::from_millis(80));
  pb.set_message(format!("Copying {}{}...", TEMPLATE_PREFIX, template_id));

  let result = stage_project(&template_path, &root, answers.manifest_name());
  pb.finish_and_clear();
  let copied = result?;
  info!(
    "Copied {} files and wrote {} for '{}'",
    copied,
    MANIFEST_FILE,
    answers.manifest_name()
  );

  // --- 3. Package manager ---
  if options.install {
    run_package_manager(answers.package_manager, &root, runner);
  } else {
    print_next_steps(answers, &root, options.cwd);
  }

  Ok(root)
}

/// Copies the template and writes the patched manifest into a staging directory inside
/// `root`, then moves the staged entries into `root`. On failure the staging directory is
/// dropped and `root` keeps whatever it held before.
fn stage_project(template_path: &Path, root: &Path, package_name: &str) -> Result<usize, ScaffoldError> {
  let staging = Builder::new().prefix(STAGING_PREFIX).tempdir_in(root)?;
  debug!("Staging into {}", staging.path().display());

  let renames: HashMap<&str, &str> = RENAME_FILES.into_iter().collect();
  let skip: HashSet<&str> = HashSet::from([MANIFEST_FILE]);
  let copied = utils::copy_dir(template_path, staging.path(), &renames, &skip)?;

  let manifest = patch_manifest(&template_path.join(MANIFEST_FILE), package_name)?;
  fs::write(staging.path().join(MANIFEST_FILE), manifest)?;

  for entry in fs::read_dir(staging.path())? {
    let entry = entry?;
    let destination = root.join(entry.file_name());
    if destination.is_dir() {
      warn!("Replacing existing directory {}", destination.display());
      fs::remove_dir_all(&destination)?;
    } else if destination.exists() {
      warn!("Replacing existing file {}", destination.display());
      fs::remove_file(&destination)?;
    }
    fs::rename(entry.path(), &destination)?;
  }

  staging.close()?;
  Ok(copied)
}

/// Reads the template manifest and returns it with `name` set to `package_name`,
/// rendered as two-space indented JSON. Key order is preserved.
pub fn patch_manifest(manifest_path: &Path, package_name: &str) -> Result<String, ScaffoldError> {
  let content = fs::read_to_string(manifest_path).map_err(|e| ScaffoldError::ManifestRead {
    manifest_path: manifest_path.to_path_buf(),
    source: e,
  })?;
  let parse_error = |e| ScaffoldError::ManifestParse {
    manifest_path: manifest_path.to_path_buf(),
    source: e,
  };

  let mut manifest: Value = serde_json::from_str(&content).map_err(parse_error)?;
  let object = manifest
    .as_object_mut()
    .ok_or_else(|| ScaffoldError::ManifestNotObject(manifest_path.to_path_buf()))?;
  object.insert("name".to_string(), Value::String(package_name.to_string()));

  let mut rendered = serde_json::to_string_pretty(&manifest).map_err(parse_error)?;
  rendered.push('\n');
  Ok(rendered)
}

/// Runs `install` then `run dev`. Failures are logged, never propagated, and the
/// copied files stay in place. `run dev` is skipped when `install` did not succeed.
fn run_package_manager(package_manager: PackageManager, root: &Path, runner: &mut dyn CommandRunner) {
  let program = package_manager.program();
  let steps = [
    ("install", package_manager.install_args()),
    ("dev", package_manager.dev_args()),
  ];

  for (step, args) in steps {
    let step_name = format!("{} {}", program, args.join(" "));
    match runner.run(program, args, root) {
      Ok(status) if status.success() => info!("`{}` finished", step_name),
      Ok(status) => {
        warn!("`{}` exited with {}", step_name, status);
        if step == "install" {
          warn!("Skipping dev server because install failed");
          return;
        }
      }
      Err(e) => {
        error!("{}", ScaffoldError::command_exec(&step_name, e));
        return;
      }
    }
  }
}

fn print_next_steps(answers: &ScaffoldAnswers, root: &Path, cwd: &Path) {
  let pm = answers.package_manager;
  println!("\nDone. Now run:\n");
  if root != cwd {
    let shown = root.strip_prefix(cwd).unwrap_or(root);
    println!("  {}", style(format!("cd {}", shown.display())).green());
  }
  println!("  {}", style(format!("{} {}", pm, pm.install_args().join(" "))).green());
  println!("  {}", style(format!("{} {}", pm, pm.dev_args().join(" "))).green());
  println!();
}
