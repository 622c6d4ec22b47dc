// src/catalog.rs
use std::fs;
use std::path::Path;

use heck::ToTitleCase;
use log::{debug, trace, warn};

use crate::error::ScaffoldError;

/// Substring that marks a directory as a template.
pub const TEMPLATE_MARKER: &str = "template";
/// Directory prefix in front of a template identifier (`template-vue-ts`).
pub const TEMPLATE_PREFIX: &str = "template-";

const DEFAULT_LANGUAGE: &str = "JavaScript";
const LANGUAGE_LABELS: &[(&str, &str)] = &[
  ("js", "JavaScript"),
  ("javascript", "JavaScript"),
  ("ts", "TypeScript"),
  ("typescript", "TypeScript"),
];

/// Display-only menu color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
  Blue,
  Green,
  Yellow,
  Cyan,
}

impl Color {
  pub const PALETTE: [Color; 4] = [Color::Blue, Color::Green, Color::Yellow, Color::Cyan];

  pub fn random() -> Color {
    Color::PALETTE[fastrand::usize(..Color::PALETTE.len())]
  }

  pub fn paint(self, text: &str) -> String {
    let styled = console::style(text);
    match self {
      Color::Blue => styled.blue(),
      Color::Green => styled.green(),
      Color::Yellow => styled.yellow(),
      Color::Cyan => styled.cyan(),
    }
    .to_string()
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateVariant {
  /// Template identifier, resolved by the scaffolder as `template-<name>`.
  pub name: String,
  pub display: String,
  pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateGroup {
  pub name: String,
  pub display: String,
  pub color: Color,
  pub variants: Vec<TemplateVariant>,
}

/// Template groups in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
  groups: Vec<TemplateGroup>,
}

impl Catalog {
  pub fn groups(&self) -> &[TemplateGroup] {
    &self.groups
  }

  pub fn get(&self, name: &str) -> Option<&TemplateGroup> {
    self.groups.iter().find(|g| g.name == name)
  }

  pub fn is_empty(&self) -> bool {
    self.groups.is_empty()
  }

  fn add_variant(&mut self, group_name: &str, variant: TemplateVariant) {
    match self.groups.iter_mut().find(|g| g.name == group_name) {
      Some(group) => group.variants.push(variant),
      None => self.groups.push(TemplateGroup {
        name: group_name.to_string(),
        display: group_name.to_title_case(),
        color: variant.color,
        variants: vec![variant],
      }),
    }
  }
}

pub fn language_label(tag: Option<&str>) -> &'static str {
  tag
    .and_then(|tag| LANGUAGE_LABELS.iter().find(|(key, _)| *key == tag))
    .map_or(DEFAULT_LANGUAGE, |(_, label)| *label)
}

/// Splits `template-<group>[-<lang>...]` into the group name and the lowercased language tag.
fn parse_template_name(dir_name: &str) -> Option<(&str, Option<String>)> {
  let mut segments = dir_name.split('-');
  segments.next()?;
  let group = segments.next().filter(|g| !g.is_empty())?;
  let language = segments.next().map(str::to_lowercase);
  Some((group, language))
}

/// Scans `templates_dir` for template directories and groups them by family.
///
/// Entries are visited in file-name order. A directory that cannot be listed is an
/// error; no matching entries just yields an empty catalog.
pub fn build_catalog(templates_dir: &Path) -> Result<Catalog, ScaffoldError> {
  let mut entries = Vec::new();
  for entry_result in fs::read_dir(templates_dir)? {
    match entry_result {
      Ok(entry) => entries.push(entry),
      Err(e) => warn!("Failed to read entry in templates directory: {}", e),
    }
  }
  entries.sort_by_key(|entry| entry.file_name());

  let mut catalog = Catalog::default();
  for entry in entries {
    let dir_name = entry.file_name().to_string_lossy().into_owned();
    if !dir_name.contains(TEMPLATE_MARKER) {
      trace!("Ignoring {}, not a template", dir_name);
      continue;
    }
    if !entry.path().is_dir() {
      debug!("Ignoring {}, not a directory", entry.path().display());
      continue;
    }
    let Some((group_name, language)) = parse_template_name(&dir_name) else {
      debug!("Ignoring {}, no template group in its name", dir_name);
      continue;
    };

    let variant = TemplateVariant {
      name: dir_name
        .strip_prefix(TEMPLATE_PREFIX)
        .unwrap_or(&dir_name)
        .to_string(),
      display: language_label(language.as_deref()).to_string(),
      color: Color::random(),
    };
    debug!(
      "Found template '{}' (group '{}', {})",
      variant.name, group_name, variant.display
    );
    catalog.add_variant(group_name, variant);
  }

  Ok(catalog)
}
