// src/list.rs
use std::path::Path;

use crate::catalog::{Catalog, TEMPLATE_PREFIX};

pub fn run_list(catalog: &Catalog, templates_dir: &Path) {
  println!("Available templates in {}:", templates_dir.display());
  for line in render_table(catalog) {
    println!("{}", line);
  }
}

fn render_table(catalog: &Catalog) -> Vec<String> {
  let mut lines = vec![
    format!("{:<15} | {:<12} | {}", "Template", "Language", "Directory"),
    format!("{:-<15}-+-{:-<12}-+-{:-<30}", "", "", ""),
  ];
  for group in catalog.groups() {
    for variant in &group.variants {
      lines.push(format!(
        "{:<15} | {:<12} | {}{}",
        group.display, variant.display, TEMPLATE_PREFIX, variant.name
      ));
    }
  }
  lines
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::TempDir;

  use super::*;
  use crate::catalog::build_catalog;

  #[test]
  fn one_row_per_variant() {
    let dir = TempDir::new().unwrap();
    for name in ["template-vue", "template-vue-ts", "template-react"] {
      fs::create_dir(dir.path().join(name)).unwrap();
    }
    let lines = render_table(&build_catalog(dir.path()).unwrap());

    assert_eq!(lines.len(), 5);
    assert!(lines[2].starts_with("React "));
    assert!(lines[3].contains("JavaScript") && lines[3].ends_with("template-vue"));
    assert!(lines[4].contains("TypeScript") && lines[4].ends_with("template-vue-ts"));
  }
}
