//! # Delimiters Module
//!
//! This module describes comment syntaxes and decides which ones apply to a
//! given file.
//!
//! The module includes:
//! - [`Delimiters`] for describing a line comment marker or a block comment
//!   start/continuation/end triple
//! - [`DelimiterResolver`] for mapping file paths to candidate delimiters
//! - [`BuiltinResolver`] and [`ConfigurableResolver`] implementations
//!
//! ## Example
//!
//! ```rust
//! use std::path::Path;
//!
//! use licblock::delimiters::{BuiltinResolver, DelimiterResolver, Delimiters};
//!
//! let candidates = BuiltinResolver.resolve(Path::new("main.c"));
//! assert_eq!(candidates[0], Delimiters::block("/*", "*", "*/"));
//! assert_eq!(candidates[1], Delimiters::line("//"));
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::trace;

use crate::config::Config;
use crate::error::ScanError;

/// A comment syntax.
///
/// Line comments prefix every line with a single marker. Block comments open
/// with a start marker, prefix inner lines with a continuation marker and
/// close with an end marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub enum Delimiters {
  /// Line comment style, e.g. `#` or `//`
  Line(String),

  /// Block comment style, e.g. `/*`, `*`, `*/`
  Block {
    /// Opens the comment
    start: String,
    /// Prefixes the lines between start and end (may be empty)
    middle: String,
    /// Closes the comment
    end: String,
  },
}

impl Delimiters {
  /// Create a line-comment style.
  pub fn line(marker: &str) -> Self {
    Self::Line(marker.to_string())
  }

  /// Create a block-comment style.
  pub fn block(start: &str, middle: &str, end: &str) -> Self {
    Self::Block {
      start: start.to_string(),
      middle: middle.to_string(),
      end: end.to_string(),
    }
  }

  /// Builds delimiters from a marker list: one marker for line comments,
  /// three for block comments.
  ///
  /// # Errors
  ///
  /// Returns [`ScanError::InvalidDelimiters`] for any other marker count, or
  /// when a marker that must be present is empty.
  pub fn from_markers<S: AsRef<str>>(markers: &[S]) -> Result<Self, ScanError> {
    match markers {
      [marker] => {
        let marker = marker.as_ref();
        if marker.is_empty() {
          return Err(ScanError::InvalidDelimiters(
            "line comment marker cannot be empty".to_string(),
          ));
        }
        Ok(Self::line(marker))
      }
      [start, middle, end] => {
        let (start, end) = (start.as_ref(), end.as_ref());
        if start.is_empty() || end.is_empty() {
          return Err(ScanError::InvalidDelimiters(
            "block comment start and end markers cannot be empty".to_string(),
          ));
        }
        Ok(Self::block(start, middle.as_ref(), end))
      }
      other => Err(ScanError::InvalidDelimiters(format!(
        "expected 1 or 3 markers, got {}",
        other.len()
      ))),
    }
  }

  /// Returns true if the line opens a comment under this style.
  pub fn starts_comment(&self, line: &str) -> bool {
    let trimmed = line.trim_start();
    match self {
      Self::Line(marker) => trimmed.starts_with(marker.as_str()),
      Self::Block { start, .. } => trimmed.starts_with(start.as_str()),
    }
  }
}

impl TryFrom<Vec<String>> for Delimiters {
  type Error = ScanError;

  fn try_from(markers: Vec<String>) -> Result<Self, Self::Error> {
    Self::from_markers(&markers)
  }
}

impl std::fmt::Display for Delimiters {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Line(marker) => write!(f, "{marker}"),
      Self::Block { start, middle, end } => write!(f, "{start} {middle} {end}"),
    }
  }
}

/// Trait for resolving the comment syntaxes to try for a file.
///
/// The returned list is in priority order. An empty list means the file type
/// is not supported and should be skipped.
pub trait DelimiterResolver: Send + Sync {
  /// Resolve the candidate delimiters for the given file path.
  fn resolve(&self, path: &Path) -> Vec<Delimiters>;
}

/// Default resolver using built-in mappings.
#[derive(Debug, Default)]
pub struct BuiltinResolver;

impl DelimiterResolver for BuiltinResolver {
  fn resolve(&self, path: &Path) -> Vec<Delimiters> {
    get_delimiters_for_file(path)
  }
}

/// Configurable resolver that checks user config first, then falls back to
/// builtin.
pub struct ConfigurableResolver {
  config: Arc<Config>,
}

impl std::fmt::Debug for ConfigurableResolver {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ConfigurableResolver")
      .field("config", &"<config>")
      .finish()
  }
}

impl ConfigurableResolver {
  /// Create a new configurable resolver with the given config.
  pub fn new(config: Config) -> Self {
    Self {
      config: Arc::new(config),
    }
  }

  /// Create a new configurable resolver from a shared config.
  pub const fn from_arc(config: Arc<Config>) -> Self {
    Self { config }
  }
}

impl DelimiterResolver for ConfigurableResolver {
  fn resolve(&self, path: &Path) -> Vec<Delimiters> {
    let file_name = lowercase_file_name(path);

    // 1. Exact filename match
    if let Some(styles) = self.config.filenames.get(&file_name) {
      trace!("Using config filename override for: {}", file_name);
      return styles.clone();
    }

    // 2. Filename glob match
    for (pattern, styles) in &self.config.filenames {
      if pattern.contains('*')
        && let Ok(glob_pattern) = glob::Pattern::new(pattern)
        && glob_pattern.matches(&file_name)
      {
        trace!("Using config filename glob override '{}' for: {}", pattern, file_name);
        return styles.clone();
      }
    }

    // 3. Extension override
    let extension = lowercase_extension(path);
    if let Some(styles) = self.config.comment_styles.get(&extension) {
      trace!("Using config extension override for: .{}", extension);
      return styles.clone();
    }

    get_delimiters_for_file(path)
  }
}

/// Create a delimiter resolver based on the provided configuration.
pub fn create_resolver(config: Option<Arc<Config>>) -> Box<dyn DelimiterResolver> {
  match config {
    Some(cfg) => Box::new(ConfigurableResolver::from_arc(cfg)),
    None => Box::new(BuiltinResolver),
  }
}

fn lowercase_file_name(path: &Path) -> String {
  path
    .file_name()
    .and_then(|name| name.to_str())
    .unwrap_or("")
    .to_lowercase()
}

fn lowercase_extension(path: &Path) -> String {
  path
    .extension()
    .and_then(|ext| ext.to_str())
    .unwrap_or("")
    .to_lowercase()
}

/// Determines the candidate comment syntaxes for a file from its extension
/// or, for extensionless build files, its name.
///
/// C-family files try block comments before `//` line comments since license
/// headers there are usually block comments. Unknown file types get an empty
/// list.
fn get_delimiters_for_file(path: &Path) -> Vec<Delimiters> {
  let c_block = || Delimiters::block("/*", "*", "*/");

  match lowercase_extension(path).as_str() {
    "c" | "h" | "cc" | "cpp" | "cxx" | "hh" | "hpp" | "hxx" | "java" | "scala" | "kt" | "kts" | "js" | "mjs"
    | "cjs" | "jsx" | "ts" | "tsx" | "go" | "rs" | "swift" | "dart" | "groovy" | "cs" | "m" | "mm" | "proto"
    | "php" | "idl" | "v" | "sv" => vec![c_block(), Delimiters::line("//")],
    "css" | "scss" | "less" => vec![c_block()],
    "py" | "sh" | "bash" | "zsh" | "yaml" | "yml" | "rb" | "pl" | "pm" | "tcl" | "tf" | "bzl" | "toml"
    | "cmake" | "mk" | "r" => vec![Delimiters::line("#")],
    "el" | "lisp" | "scm" | "clj" => vec![Delimiters::line(";")],
    "erl" | "hrl" => vec![Delimiters::line("%")],
    "hs" | "lua" | "ada" => vec![Delimiters::line("--")],
    "sql" => vec![Delimiters::line("--"), c_block()],
    "html" | "htm" | "xml" | "xhtml" | "xul" | "svg" | "vue" => vec![Delimiters::block("<!--", "", "-->")],
    "ml" | "mli" => vec![Delimiters::block("(*", "*", "*)")],
    _ => {
      let file_name = lowercase_file_name(path);
      if file_name == "makefile"
        || file_name == "cmakelists.txt"
        || file_name == "dockerfile"
        || file_name.ends_with(".dockerfile")
      {
        vec![Delimiters::line("#")]
      } else {
        Vec::new()
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use super::*;

  fn config_with(
    comment_styles: HashMap<String, Vec<Delimiters>>,
    filenames: HashMap<String, Vec<Delimiters>>,
  ) -> Config {
    Config {
      comment_styles,
      filenames,
      ..Config::default()
    }
  }

  #[test]
  fn test_from_markers_line() {
    let delims = Delimiters::from_markers(&["#"]).expect("one marker is valid");
    assert_eq!(delims, Delimiters::line("#"));
  }

  #[test]
  fn test_from_markers_block() {
    let delims = Delimiters::from_markers(&["/*", "*", "*/"]).expect("three markers are valid");
    assert_eq!(delims, Delimiters::block("/*", "*", "*/"));
  }

  #[test]
  fn test_from_markers_wrong_count() {
    for markers in [vec![], vec!["/*", "*/"], vec!["a", "b", "c", "d"]] {
      let err = Delimiters::from_markers(&markers).expect_err("should reject marker count");
      assert!(matches!(err, ScanError::InvalidDelimiters(_)));
    }
  }

  #[test]
  fn test_from_markers_empty_marker() {
    assert!(Delimiters::from_markers(&[""]).is_err());
    assert!(Delimiters::from_markers(&["", "*", "*/"]).is_err());
    // An empty continuation marker is allowed
    assert!(Delimiters::from_markers(&["<!--", "", "-->"]).is_ok());
  }

  #[test]
  fn test_starts_comment() {
    let hash = Delimiters::line("#");
    assert!(hash.starts_comment("# foo"));
    assert!(hash.starts_comment("\t## foo"));
    assert!(!hash.starts_comment("foo # bar"));

    let block = Delimiters::block("/*", "*", "*/");
    assert!(block.starts_comment("  /* foo"));
    assert!(!block.starts_comment(" * foo"));
  }

  #[test]
  fn test_builtin_resolver_c() {
    let styles = BuiltinResolver.resolve(Path::new("main.cc"));
    assert_eq!(styles, vec![Delimiters::block("/*", "*", "*/"), Delimiters::line("//")]);
  }

  #[test]
  fn test_builtin_resolver_python() {
    let styles = BuiltinResolver.resolve(Path::new("script.py"));
    assert_eq!(styles, vec![Delimiters::line("#")]);
  }

  #[test]
  fn test_builtin_resolver_special_filenames() {
    assert_eq!(BuiltinResolver.resolve(Path::new("Makefile")), vec![Delimiters::line("#")]);
    assert_eq!(BuiltinResolver.resolve(Path::new("CMakeLists.txt")), vec![Delimiters::line("#")]);
  }

  #[test]
  fn test_builtin_resolver_unknown_is_empty() {
    assert!(BuiltinResolver.resolve(Path::new("notes.xyz")).is_empty());
  }

  #[test]
  fn test_configurable_resolver_extension_override() {
    let mut comment_styles = HashMap::new();
    comment_styles.insert("java".to_string(), vec![Delimiters::line("//")]);

    let resolver = ConfigurableResolver::new(config_with(comment_styles, HashMap::new()));
    assert_eq!(resolver.resolve(Path::new("Main.java")), vec![Delimiters::line("//")]);
  }

  #[test]
  fn test_configurable_resolver_filename_override() {
    let mut filenames = HashMap::new();
    filenames.insert("justfile".to_string(), vec![Delimiters::line("#")]);

    let resolver = ConfigurableResolver::new(config_with(HashMap::new(), filenames));
    assert_eq!(resolver.resolve(Path::new("Justfile")), vec![Delimiters::line("#")]);
  }

  #[test]
  fn test_configurable_resolver_filename_glob() {
    let mut filenames = HashMap::new();
    filenames.insert("*.cmake.in".to_string(), vec![Delimiters::line("#")]);

    let resolver = ConfigurableResolver::new(config_with(HashMap::new(), filenames));
    assert_eq!(resolver.resolve(Path::new("config.cmake.in")), vec![Delimiters::line("#")]);
  }

  #[test]
  fn test_configurable_resolver_falls_back_to_builtin() {
    let resolver = ConfigurableResolver::new(Config::default());
    assert_eq!(resolver.resolve(Path::new("run.sh")), vec![Delimiters::line("#")]);
  }

  #[test]
  fn test_create_resolver_without_config() {
    let resolver = create_resolver(None);
    assert_eq!(resolver.resolve(Path::new("lib.rs")).len(), 2);
  }
}
