use std::collections::{HashMap, HashSet};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use duct::cmd;
use log::{debug, info, trace, warn};
use walkdir::WalkDir;

use crate::error::ScaffoldError;

/// Entries that may sit in a target directory without it counting as occupied.
fn is_ignorable_entry(name: &str) -> bool {
  name == ".git" || name.eq_ignore_ascii_case("LICENSE")
}

/// Returns true when `path` has no entries, or at most two entries that are all
/// `.git` or some casing of `LICENSE`.
pub fn is_empty(path: &Path) -> Result<bool, ScaffoldError> {
  let names = fs::read_dir(path)?
    .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
    .collect::<Result<Vec<_>, _>>()?;
  trace!("Entries in {}: {:?}", path.display(), names);

  Ok(names.is_empty() || (names.len() <= 2 && names.iter().all(|n| is_ignorable_entry(n))))
}

/// Recursively removes everything inside `path`, keeping `path` itself.
/// A missing `path` is not an error.
pub fn empty_dir(path: &Path) -> Result<(), ScaffoldError> {
  if !path.exists() {
    debug!("Nothing to empty, {} does not exist", path.display());
    return Ok(());
  }

  for entry in fs::read_dir(path)? {
    let entry = entry?;
    let entry_path = entry.path();
    // file_type() does not follow symlinks, so a linked directory is unlinked, not emptied.
    if entry.file_type()?.is_dir() {
      trace!("Removing directory: {}", entry_path.display());
      fs::remove_dir_all(&entry_path)?;
    } else {
      trace!("Removing file: {}", entry_path.display());
      fs::remove_file(&entry_path)?;
    }
  }
  Ok(())
}

/// Maps every component of `relative_path` through `renames`.
fn renamed_path(relative_path: &Path, renames: &HashMap<&str, &str>) -> PathBuf {
  relative_path
    .components()
    .map(|component| {
      let segment = component.as_os_str();
      match segment.to_str().and_then(|s| renames.get(s)) {
        Some(renamed) => OsStr::new(*renamed),
        None => segment,
      }
    })
    .collect()
}

/// Mirrors `src` into `dest`.
///
/// Files whose name is in `skip` are left out at any depth, and each path component
/// found in `renames` is translated on the way. Returns the number of files copied.
/// Nothing is cleaned up when a copy fails halfway.
pub fn copy_dir(
  src: &Path,
  dest: &Path,
  renames: &HashMap<&str, &str>,
  skip: &HashSet<&str>,
) -> Result<usize, ScaffoldError> {
  debug!("Copying {} to {}", src.display(), dest.display());

  fs::create_dir_all(dest).map_err(|e| ScaffoldError::OutputDirCreation {
    path: dest.to_path_buf(),
    source: e,
  })?;

  let mut copied = 0;
  let walker = WalkDir::new(src)
    .min_depth(1)
    .follow_links(true)
    .sort_by_file_name();

  for entry_result in walker {
    let entry = entry_result.map_err(|e| ScaffoldError::WalkDir {
      path: src.to_path_buf(),
      source: e,
    })?;

    let relative_path = match entry.path().strip_prefix(src) {
      Ok(p) => p,
      Err(e) => {
        warn!(
          "Failed to strip prefix {} from {}: {}. Skipping.",
          src.display(),
          entry.path().display(),
          e
        );
        continue;
      }
    };
    let target = dest.join(renamed_path(relative_path, renames));

    if entry.file_type().is_dir() {
      trace!("Creating directory: {}", target.display());
      fs::create_dir_all(&target).map_err(|e| ScaffoldError::OutputDirCreation {
        path: target.clone(),
        source: e,
      })?;
    } else if entry.file_type().is_file() {
      let file_name = entry.file_name().to_string_lossy();
      if skip.contains(&*file_name) {
        trace!("Skipping {}", entry.path().display());
        continue;
      }
      trace!("Copying file to: {}", target.display());
      fs::copy(entry.path(), &target)?;
      copied += 1;
    } else {
      debug!(
        "Skipping non-file/non-directory entry: {}",
        entry.path().display()
      );
    }
  }

  Ok(copied)
}

/// Runs external programs for the scaffolder.
pub trait CommandRunner {
  /// Runs `program` with `args` in `working_dir` and blocks until it exits.
  fn run(&mut self, program: &str, args: &[&str], working_dir: &Path) -> std::io::Result<ExitStatus>;
}

/// Runs commands through duct with the terminal's stdio inherited, so the child's
/// output streams live.
#[derive(Debug, Default)]
pub struct DuctRunner;

impl CommandRunner for DuctRunner {
  fn run(&mut self, program: &str, args: &[&str], working_dir: &Path) -> std::io::Result<ExitStatus> {
    info!(
      "Executing `{} {}` in {}",
      program,
      args.join(" "),
      working_dir.display()
    );
    // unchecked() hands back non-zero exits as Ok so the caller decides what they mean.
    let output = cmd(program, args.iter().copied())
      .dir(working_dir)
      .unchecked()
      .run()?;
    debug!("`{}` finished with status {:?}", program, output.status);
    Ok(output.status)
  }
}
