// src/names.rs
use std::sync::OnceLock;

use regex::Regex;

/// Grammar accepted for the `name` field of a package manifest:
/// an optional `@scope/` prefix followed by the package segment.
const PACKAGE_NAME_PATTERN: &str = r"^(?:@[a-z0-9\-*~][a-z0-9\-*._~]*/)?[a-z0-9\-~][a-z0-9\-._~]*$";

fn package_name_regex() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(PACKAGE_NAME_PATTERN).expect("package name pattern is valid"))
}

fn whitespace_regex() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"))
}

fn invalid_chars_regex() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"[^a-z0-9~-]+").expect("invalid character pattern is valid"))
}

pub fn is_valid_package_name(name: &str) -> bool {
  package_name_regex().is_match(name)
}

/// Normalizes arbitrary input towards a manifest name.
///
/// The result only contains `[a-z0-9~-]`, but may still be rejected by
/// [`is_valid_package_name`] (e.g. when it ends up empty), so callers re-validate.
pub fn to_valid_package_name(name: &str) -> String {
  let lowered = name.trim().to_lowercase();
  let dashed = whitespace_regex().replace_all(&lowered, "-");
  let stripped = dashed.strip_prefix(['.', '_']).unwrap_or(dashed.as_ref());
  invalid_chars_regex().replace_all(stripped, "-").into_owned()
}
