// src/flow.rs
use std::path::Path;

use console::style;
use log::{debug, trace};

use crate::catalog::{Catalog, TemplateGroup};
use crate::config::PackageManager;
use crate::error::ScaffoldError;
use crate::names::{is_valid_package_name, to_valid_package_name};
use crate::prompt::{Prompter, Validator};
use crate::utils;

pub const PROJECT_NAME_PROMPT: &str = "Project name:";
pub const PACKAGE_NAME_PROMPT: &str = "Package name:";
pub const TEMPLATE_PROMPT: &str = "Select a template:";
pub const VARIANT_PROMPT: &str = "Select a variant:";
pub const PACKAGE_MANAGER_PROMPT: &str = "Select a package manager:";

const PACKAGE_NAME_VALIDATOR: Validator = Validator {
  check: is_valid_package_name,
  message: "Invalid package.json name",
};

/// Everything the user decided, consumed once by the scaffolder.
#[derive(Debug, Clone)]
pub struct ScaffoldAnswers {
  /// Target directory as typed, relative to the working directory.
  pub target_dir: String,
  pub project_name: String,
  /// Only set when the project name was not a valid manifest name.
  pub package_name: Option<String>,
  pub template: TemplateGroup,
  pub variant: Option<String>,
  /// Only set when the target already had content.
  pub overwrite: Option<bool>,
  pub package_manager: PackageManager,
}

impl ScaffoldAnswers {
  /// Identifier of the template to copy: the chosen variant, else the group.
  pub fn template_id(&self) -> &str {
    self.variant.as_deref().unwrap_or(&self.template.name)
  }

  /// Value written to the manifest's `name` field.
  pub fn manifest_name(&self) -> &str {
    self.package_name.as_deref().unwrap_or(&self.project_name)
  }
}

pub struct FlowContext<'a> {
  /// Positional target directory, already stripped of trailing slashes.
  pub target_arg: Option<String>,
  pub cwd: &'a Path,
  pub catalog: &'a Catalog,
  pub default_project: &'a str,
  pub default_manager: PackageManager,
}

/// Trims the raw answer and strips trailing slashes, falling back to `default`.
pub fn normalize_target(raw: &str, default: &str) -> String {
  let trimmed = raw.trim().trim_end_matches('/');
  if trimmed.is_empty() {
    default.to_string()
  } else {
    trimmed.to_string()
  }
}

/// `.` names the project after the working directory; anything else is used as is.
pub fn project_name(target_dir: &str, cwd: &Path) -> String {
  if target_dir == "." {
    if let Some(name) = cwd.file_name() {
      return name.to_string_lossy().into_owned();
    }
  }
  target_dir.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
  ProjectName,
  Overwrite,
  OverwriteCheck,
  PackageName,
  Template,
  Variant,
  Manager,
}

const STEPS: [Step; 7] = [
  Step::ProjectName,
  Step::Overwrite,
  Step::OverwriteCheck,
  Step::PackageName,
  Step::Template,
  Step::Variant,
  Step::Manager,
];

#[derive(Debug, Default)]
struct FlowState {
  target_dir: String,
  overwrite: Option<bool>,
  package_name: Option<String>,
  group: Option<usize>,
  variant: Option<String>,
  package_manager: Option<PackageManager>,
}

impl Step {
  fn applies(self, state: &FlowState, ctx: &FlowContext<'_>) -> Result<bool, ScaffoldError> {
    Ok(match self {
      Step::ProjectName => ctx.target_arg.is_none(),
      Step::Overwrite => {
        let target = ctx.cwd.join(&state.target_dir);
        target.exists() && !utils::is_empty(&target)?
      }
      Step::OverwriteCheck => state.overwrite == Some(false),
      Step::PackageName => !is_valid_package_name(&project_name(&state.target_dir, ctx.cwd)),
      Step::Template | Step::Manager => true,
      Step::Variant => state
        .group
        .is_some_and(|i| !ctx.catalog.groups()[i].variants.is_empty()),
    })
  }

  fn ask(
    self,
    prompter: &mut dyn Prompter,
    state: &mut FlowState,
    ctx: &FlowContext<'_>,
  ) -> Result<(), ScaffoldError> {
    match self {
      Step::ProjectName => {
        let raw = prompter.input(PROJECT_NAME_PROMPT, ctx.default_project, None)?;
        state.target_dir = normalize_target(&raw, ctx.default_project);
      }
      Step::Overwrite => {
        let message = if state.target_dir == "." {
          "Current directory is not empty. Remove existing files and continue?".to_string()
        } else {
          format!(
            "Target directory {} is not empty. Remove existing files and continue?",
            style(&state.target_dir).cyan()
          )
        };
        state.overwrite = Some(prompter.confirm(&message)?);
      }
      Step::OverwriteCheck => return Err(ScaffoldError::Cancelled),
      Step::PackageName => {
        let suggested = to_valid_package_name(&project_name(&state.target_dir, ctx.cwd));
        let name = prompter.input(PACKAGE_NAME_PROMPT, &suggested, Some(PACKAGE_NAME_VALIDATOR))?;
        state.package_name = Some(name);
      }
      Step::Template => {
        let labels: Vec<String> = ctx
          .catalog
          .groups()
          .iter()
          .map(|g| g.color.paint(&g.display))
          .collect();
        state.group = Some(prompter.select(TEMPLATE_PROMPT, &labels, 0)?);
      }
      Step::Variant => {
        let Some(group) = state.group.map(|i| &ctx.catalog.groups()[i]) else {
          return Ok(());
        };
        let labels: Vec<String> = group
          .variants
          .iter()
          .map(|v| v.color.paint(&v.display))
          .collect();
        let index = prompter.select(VARIANT_PROMPT, &labels, 0)?;
        state.variant = Some(group.variants[index].name.clone());
      }
      Step::Manager => {
        let labels: Vec<String> = PackageManager::ALL.iter().map(|pm| pm.to_string()).collect();
        let default = PackageManager::ALL
          .iter()
          .position(|pm| *pm == ctx.default_manager)
          .unwrap_or(0);
        let index = prompter.select(PACKAGE_MANAGER_PROMPT, &labels, default)?;
        state.package_manager = Some(PackageManager::ALL[index]);
      }
    }
    Ok(())
  }
}

/// Runs the prompt sequence. Each step is guarded by a predicate over the answers so
/// far; a skipped step leaves its answer as `None`.
///
/// Nothing on disk is touched here. Cancelling any prompt, or declining to overwrite
/// a non-empty target, returns [`ScaffoldError::Cancelled`].
pub fn collect_answers(
  prompter: &mut dyn Prompter,
  ctx: &FlowContext<'_>,
) -> Result<ScaffoldAnswers, ScaffoldError> {
  let mut state = FlowState {
    target_dir: ctx
      .target_arg
      .clone()
      .unwrap_or_else(|| ctx.default_project.to_string()),
    ..Default::default()
  };

  for step in STEPS {
    if !step.applies(&state, ctx)? {
      trace!("Skipping prompt step {:?}", step);
      continue;
    }
    debug!("Prompt step {:?}", step);
    step.ask(prompter, &mut state, ctx)?;
  }

  let template = state
    .group
    .map(|i| ctx.catalog.groups()[i].clone())
    .ok_or(ScaffoldError::Cancelled)?;

  let answers = ScaffoldAnswers {
    project_name: project_name(&state.target_dir, ctx.cwd),
    target_dir: state.target_dir,
    package_name: state.package_name,
    template,
    variant: state.variant,
    overwrite: state.overwrite,
    package_manager: state.package_manager.unwrap_or(ctx.default_manager),
  };
  debug!("Collected answers: {:?}", answers);
  Ok(answers)
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::TempDir;

  use super::*;
  use crate::catalog::build_catalog;
  use crate::config::DEFAULT_PROJECT;
  use crate::prompt::testing::{Reply, ScriptedPrompter};

  struct Fixture {
    _templates: TempDir,
    cwd: TempDir,
    catalog: Catalog,
  }

  fn fixture() -> Fixture {
    let templates = TempDir::new().unwrap();
    for name in ["template-react", "template-vue", "template-vue-ts"] {
      fs::create_dir(templates.path().join(name)).unwrap();
    }
    let catalog = build_catalog(templates.path()).unwrap();
    Fixture {
      _templates: templates,
      cwd: TempDir::new().unwrap(),
      catalog,
    }
  }

  fn context<'a>(fx: &'a Fixture, target_arg: Option<&str>, cwd: &'a Path) -> FlowContext<'a> {
    FlowContext {
      target_arg: target_arg.map(str::to_string),
      cwd,
      catalog: &fx.catalog,
      default_project: DEFAULT_PROJECT,
      default_manager: PackageManager::Npm,
    }
  }

  #[test]
  fn positional_target_skips_name_and_overwrite() {
    let fx = fixture();
    let ctx = context(&fx, Some("my-app"), fx.cwd.path());
    let mut prompter = ScriptedPrompter::new([Reply::Select(1), Reply::Select(1), Reply::Select(2)]);

    let answers = collect_answers(&mut prompter, &ctx).unwrap();

    assert_eq!(prompter.asked, [TEMPLATE_PROMPT, VARIANT_PROMPT, PACKAGE_MANAGER_PROMPT]);
    assert_eq!(answers.target_dir, "my-app");
    assert_eq!(answers.project_name, "my-app");
    assert_eq!(answers.package_name, None);
    assert_eq!(answers.overwrite, None);
    assert_eq!(answers.template.name, "vue");
    assert_eq!(answers.variant.as_deref(), Some("vue-ts"));
    assert_eq!(answers.template_id(), "vue-ts");
    assert_eq!(answers.manifest_name(), "my-app");
    assert_eq!(answers.package_manager, PackageManager::Pnpm);
  }

  #[test]
  fn empty_project_name_falls_back_to_default() {
    let fx = fixture();
    let ctx = context(&fx, None, fx.cwd.path());
    let mut prompter = ScriptedPrompter::new([
      Reply::Text("   "),
      Reply::Select(0),
      Reply::Select(0),
      Reply::Select(0),
    ]);

    let answers = collect_answers(&mut prompter, &ctx).unwrap();

    // default_project contains `_`, which is valid past the first character
    assert_eq!(prompter.asked[0], PROJECT_NAME_PROMPT);
    assert_eq!(answers.target_dir, DEFAULT_PROJECT);
    assert_eq!(answers.package_name, None);
    assert_eq!(answers.template.name, "react");
    assert_eq!(answers.template_id(), "react");
    assert_eq!(answers.package_manager, PackageManager::Npm);
  }

  #[test]
  fn typed_project_name_is_trimmed() {
    let fx = fixture();
    let ctx = context(&fx, None, fx.cwd.path());
    let mut prompter = ScriptedPrompter::new([
      Reply::Text("  web-app//  "),
      Reply::Select(0),
      Reply::Select(0),
      Reply::Select(1),
    ]);

    let answers = collect_answers(&mut prompter, &ctx).unwrap();
    assert_eq!(answers.target_dir, "web-app");
    assert_eq!(answers.package_manager, PackageManager::Yarn);
  }

  #[test]
  fn invalid_name_prompts_for_package_name() {
    let fx = fixture();
    let ctx = context(&fx, Some("My App"), fx.cwd.path());
    let mut prompter = ScriptedPrompter::new([
      Reply::Text("Still Bad"),
      Reply::Text(""),
      Reply::Select(0),
      Reply::Select(0),
      Reply::Select(0),
    ]);

    let answers = collect_answers(&mut prompter, &ctx).unwrap();

    assert_eq!(prompter.asked[..2], [PACKAGE_NAME_PROMPT, PACKAGE_NAME_PROMPT]);
    assert_eq!(prompter.rejected, ["Still Bad"]);
    assert_eq!(answers.project_name, "My App");
    assert_eq!(answers.package_name.as_deref(), Some("my-app"));
    assert_eq!(answers.manifest_name(), "my-app");
  }

  #[test]
  fn current_directory_uses_its_basename() {
    let fx = fixture();
    let demo = fx.cwd.path().join("demo");
    fs::create_dir(&demo).unwrap();
    let ctx = context(&fx, Some("."), &demo);
    let mut prompter = ScriptedPrompter::new([Reply::Select(0), Reply::Select(0), Reply::Select(0)]);

    let answers = collect_answers(&mut prompter, &ctx).unwrap();

    assert_eq!(answers.target_dir, ".");
    assert_eq!(answers.project_name, "demo");
    assert_eq!(answers.manifest_name(), "demo");
    assert_eq!(answers.overwrite, None);
  }

  #[test]
  fn non_empty_target_asks_to_overwrite() {
    let fx = fixture();
    let target = fx.cwd.path().join("my-app");
    fs::create_dir(&target).unwrap();
    fs::write(target.join("index.js"), "old").unwrap();
    let ctx = context(&fx, Some("my-app"), fx.cwd.path());
    let mut prompter = ScriptedPrompter::new([
      Reply::Confirm(true),
      Reply::Select(0),
      Reply::Select(0),
      Reply::Select(0),
    ]);

    let answers = collect_answers(&mut prompter, &ctx).unwrap();

    assert_eq!(prompter.asked.len(), 4);
    assert!(prompter.asked[0].contains("is not empty"));
    assert_eq!(answers.overwrite, Some(true));
    // prompting alone never touches the target
    assert!(target.join("index.js").exists());
  }

  #[test]
  fn git_only_target_counts_as_empty() {
    let fx = fixture();
    let target = fx.cwd.path().join("my-app");
    fs::create_dir_all(target.join(".git")).unwrap();
    let ctx = context(&fx, Some("my-app"), fx.cwd.path());
    let mut prompter = ScriptedPrompter::new([Reply::Select(0), Reply::Select(0), Reply::Select(0)]);

    let answers = collect_answers(&mut prompter, &ctx).unwrap();
    assert_eq!(answers.overwrite, None);
  }

  #[test]
  fn declining_overwrite_cancels() {
    let fx = fixture();
    let target = fx.cwd.path().join("my-app");
    fs::create_dir(&target).unwrap();
    fs::write(target.join("index.js"), "old").unwrap();
    let ctx = context(&fx, Some("my-app"), fx.cwd.path());
    let mut prompter = ScriptedPrompter::new([Reply::Confirm(false)]);

    let result = collect_answers(&mut prompter, &ctx);

    assert!(matches!(result, Err(ScaffoldError::Cancelled)));
    assert_eq!(prompter.asked.len(), 1);
    assert_eq!(fs::read_to_string(target.join("index.js")).unwrap(), "old");
  }

  #[test]
  fn cancelling_a_prompt_aborts() {
    let fx = fixture();
    let ctx = context(&fx, Some("my-app"), fx.cwd.path());
    let mut prompter = ScriptedPrompter::new([Reply::Select(1), Reply::Cancel]);

    let result = collect_answers(&mut prompter, &ctx);
    assert!(matches!(result, Err(ScaffoldError::Cancelled)));
    assert_eq!(prompter.asked, [TEMPLATE_PROMPT, VARIANT_PROMPT]);
  }

  #[test]
  fn normalize_target_cases() {
    assert_eq!(normalize_target("app/", "x"), "app");
    assert_eq!(normalize_target(" nested/app/// ", "x"), "nested/app");
    assert_eq!(normalize_target("", "x"), "x");
    assert_eq!(normalize_target("/", "x"), "x");
  }
}
