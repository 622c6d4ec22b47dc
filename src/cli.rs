// src/cli.rs
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "tt", // Command name users type
    author,
    version,
    about = "Scaffolds a new project for vue, react, svelte and friends from local templates.",
    long_about = None
)]
pub struct Cli {
  /// Directory to create the project in (prompted for when omitted)
  #[arg(value_name = "DIRECTORY")]
  pub directory: Option<String>,

  /// Increase verbosity level (e.g., -v, -vv)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Directory holding the `template-*` folders
  #[arg(long, env = "TT_TEMPLATES_DIR")]
  pub templates_dir: Option<PathBuf>,

  /// List available templates and exit
  #[arg(long)]
  pub list: bool,

  /// Skip running the package manager after scaffolding
  #[arg(long)]
  pub no_install: bool,
}

impl Cli {
  /// Positional target with trailing slashes removed; `None` when nothing is left.
  pub fn target_dir(&self) -> Option<String> {
    self
      .directory
      .as_deref()
      .map(|dir| dir.trim_end_matches('/'))
      .filter(|dir| !dir.is_empty())
      .map(str::to_string)
  }
}
