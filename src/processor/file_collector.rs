//! # File Collector Module
//!
//! This module expands user-provided patterns (files, directories and globs)
//! into the list of files to scan, and drops the ones matching ignore
//! patterns.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, trace, warn};
use walkdir::{DirEntry, WalkDir};

/// Compiled ignore patterns.
///
/// A pattern containing `/` is matched against the whole path; any other
/// pattern is matched against the file name as well, so `*.json` ignores
/// JSON files at any depth.
#[derive(Debug, Default)]
pub struct IgnoreMatcher {
  patterns: Vec<glob::Pattern>,
}

impl IgnoreMatcher {
  /// Compiles the ignore patterns.
  ///
  /// # Errors
  ///
  /// Returns an error naming the first invalid glob.
  pub fn new(patterns: &[String]) -> Result<Self> {
    let patterns = patterns
      .iter()
      .map(|pattern| glob::Pattern::new(pattern).with_context(|| format!("Invalid ignore pattern: {}", pattern)))
      .collect::<Result<Vec<_>>>()?;
    Ok(Self { patterns })
  }

  pub fn is_empty(&self) -> bool {
    self.patterns.is_empty()
  }

  /// Returns true if the path matches any ignore pattern.
  pub fn is_ignored(&self, path: &Path) -> bool {
    if self.patterns.is_empty() {
      return false;
    }

    let normalized = normalize_path(path);
    let file_name = path.file_name().map(|name| name.to_string_lossy());

    self.patterns.iter().any(|pattern| {
      pattern.matches_path(&normalized)
        || (!pattern.as_str().contains('/')
          && file_name.as_deref().is_some_and(|name| pattern.matches(name)))
    })
  }
}

/// File collector for pattern expansion and directory traversal.
///
/// The `FileCollector` handles:
/// - Plain file paths, taken as given
/// - Directories, walked recursively without descending into hidden
///   directories
/// - Glob patterns, expanded with the `glob` crate
pub struct FileCollector {
  ignore: IgnoreMatcher,
}

impl FileCollector {
  pub const fn new(ignore: IgnoreMatcher) -> Self {
    Self { ignore }
  }

  /// Expands the patterns into a sorted, de-duplicated list of files.
  ///
  /// Patterns that match nothing are logged and skipped.
  ///
  /// # Errors
  ///
  /// Returns an error if a pattern that is not an existing path is not a
  /// valid glob either.
  pub fn collect(&self, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let start_time = std::time::Instant::now();
    let mut files = BTreeSet::new();

    for pattern in patterns {
      let path = PathBuf::from(pattern);
      if path.is_file() {
        self.push_file(&mut files, path);
      } else if path.is_dir() {
        self.traverse_directory(&mut files, &path);
      } else {
        let entries = glob::glob(pattern).with_context(|| format!("Invalid glob pattern: {}", pattern))?;
        let mut matched = false;
        for entry in entries {
          match entry {
            Ok(path) if path.is_dir() => {
              matched = true;
              self.traverse_directory(&mut files, &path);
            }
            Ok(path) => {
              matched = true;
              self.push_file(&mut files, path);
            }
            Err(e) => warn!("Error reading glob match for {}: {}", pattern, e),
          }
        }
        if !matched {
          warn!("No files match pattern: {}", pattern);
        }
      }
    }

    debug!(
      "Collected {} files in {}ms",
      files.len(),
      start_time.elapsed().as_millis()
    );

    Ok(files.into_iter().collect())
  }

  fn push_file(&self, files: &mut BTreeSet<PathBuf>, path: PathBuf) {
    if self.ignore.is_ignored(&path) {
      trace!("Skipping: {} (matches ignore pattern)", path.display());
      return;
    }
    files.insert(path);
  }

  fn traverse_directory(&self, files: &mut BTreeSet<PathBuf>, dir: &Path) {
    debug!("Scanning directory: {}", dir.display());

    let walker = WalkDir::new(dir)
      .follow_links(false)
      .into_iter()
      .filter_entry(|entry| entry.depth() == 0 || !(is_hidden_dir(entry) || self.ignore.is_ignored(entry.path())));

    for entry in walker {
      match entry {
        Ok(entry) if entry.file_type().is_file() => self.push_file(files, entry.into_path()),
        Ok(_) => {}
        Err(e) => warn!("Error walking {}: {}", dir.display(), e),
      }
    }
  }
}

fn is_hidden_dir(entry: &DirEntry) -> bool {
  entry.file_type().is_dir() && entry.file_name().to_string_lossy().starts_with('.')
}

/// Drops `.` components so `./src/a.rs` matches the pattern `src/*.rs`.
fn normalize_path(path: &Path) -> PathBuf {
  let normalized: PathBuf = path
    .components()
    .filter(|component| !matches!(component, Component::CurDir))
    .collect();

  if normalized.as_os_str().is_empty() {
    PathBuf::from(".")
  } else {
    normalized
  }
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::TempDir;

  use super::*;

  fn ignore(patterns: &[&str]) -> IgnoreMatcher {
    let patterns: Vec<String> = patterns.iter().map(ToString::to_string).collect();
    IgnoreMatcher::new(&patterns).expect("valid patterns")
  }

  #[test]
  fn test_normalize_path() {
    assert_eq!(normalize_path(Path::new("./src/a.rs")), PathBuf::from("src/a.rs"));
    assert_eq!(normalize_path(Path::new(".")), PathBuf::from("."));
  }

  #[test]
  fn test_ignore_by_file_name() {
    let matcher = ignore(&["*.json"]);
    assert!(matcher.is_ignored(Path::new("a/b/data.json")));
    assert!(!matcher.is_ignored(Path::new("a/b/data.rs")));
  }

  #[test]
  fn test_ignore_by_path() {
    let matcher = ignore(&["vendor/**"]);
    assert!(matcher.is_ignored(Path::new("./vendor/lib/x.c")));
    assert!(!matcher.is_ignored(Path::new("src/vendor.c")));
  }

  #[test]
  fn test_invalid_ignore_pattern() {
    assert!(IgnoreMatcher::new(&["[".to_string()]).is_err());
  }

  #[test]
  fn test_collect_directory_skips_hidden_and_ignored() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let root = temp_dir.path();
    fs::create_dir_all(root.join("src/nested")).expect("create dirs");
    fs::create_dir_all(root.join(".git")).expect("create hidden dir");
    fs::write(root.join("src/a.rs"), "").expect("write");
    fs::write(root.join("src/nested/b.py"), "").expect("write");
    fs::write(root.join("src/data.json"), "").expect("write");
    fs::write(root.join(".git/config"), "").expect("write");

    let collector = FileCollector::new(ignore(&["*.json"]));
    let files = collector
      .collect(&[root.to_string_lossy().to_string()])
      .expect("collect should succeed");

    assert_eq!(files, vec![root.join("src/a.rs"), root.join("src/nested/b.py")]);
  }

  #[test]
  fn test_collect_glob_and_dedup() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let root = temp_dir.path();
    fs::write(root.join("a.rs"), "").expect("write");
    fs::write(root.join("b.rs"), "").expect("write");
    fs::write(root.join("c.py"), "").expect("write");

    let collector = FileCollector::new(IgnoreMatcher::default());
    let patterns = vec![
      format!("{}/*.rs", root.display()),
      root.join("a.rs").to_string_lossy().to_string(),
    ];
    let files = collector.collect(&patterns).expect("collect should succeed");

    assert_eq!(files, vec![root.join("a.rs"), root.join("b.rs")]);
  }

  #[test]
  fn test_collect_missing_pattern_is_empty() {
    let collector = FileCollector::new(IgnoreMatcher::default());
    let files = collector
      .collect(&["/nonexistent/dir/*.rs".to_string()])
      .expect("no matches is not an error");
    assert!(files.is_empty());
  }
}
