//! # Configuration Module
//!
//! This module provides configuration support for licblock, allowing users
//! to override comment syntaxes for file extensions and file names, add
//! license template directories, and tune matching.
//!
//! Configuration can be specified in a `.licblock.toml` file or via the
//! `LICBLOCK_CONFIG` environment variable.
//!
//! ```toml
//! [comment-styles]
//! xyz = [["#"], ["/*", "*", "*/"]]
//!
//! [filenames]
//! "Justfile" = [["#"]]
//!
//! [corpus]
//! paths = ["licenses/"]
//! builtin = true
//!
//! [matching]
//! threshold = 0.9
//! keep-unrecognized = false
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::corpus::DEFAULT_THRESHOLD;
use crate::delimiters::Delimiters;
use crate::verbose_log;

/// The default config file name.
pub const DEFAULT_CONFIG_FILENAME: &str = ".licblock.toml";

/// Environment variable for specifying config file path.
pub const CONFIG_ENV_VAR: &str = "LICBLOCK_CONFIG";

/// Where license templates come from.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CorpusConfig {
  /// Directories of `*.txt` templates, tagged by file stem.
  /// Relative paths are resolved against the config file's directory.
  #[serde(default)]
  pub paths: Vec<PathBuf>,

  /// Whether the templates shipped with licblock are loaded.
  #[serde(default = "default_true")]
  pub builtin: bool,
}

impl Default for CorpusConfig {
  fn default() -> Self {
    Self {
      paths: Vec::new(),
      builtin: true,
    }
  }
}

/// How comment blocks are matched against templates.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct MatchConfig {
  /// Minimum similarity ratio; 1.0 means exact matches only.
  #[serde(default = "default_threshold")]
  pub threshold: f32,

  /// Record license-looking blocks that match no template.
  #[serde(default)]
  pub keep_unrecognized: bool,
}

impl Default for MatchConfig {
  fn default() -> Self {
    Self {
      threshold: DEFAULT_THRESHOLD,
      keep_unrecognized: false,
    }
  }
}

const fn default_true() -> bool {
  true
}

const fn default_threshold() -> f32 {
  DEFAULT_THRESHOLD
}

/// Main configuration struct for licblock.
///
/// Comment style values are lists of marker lists in priority order. Each
/// marker list is checked by [`Delimiters::from_markers`] while the file is
/// parsed.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
  /// Comment syntaxes per file extension.
  /// Keys are file extensions without the leading dot (e.g., "java", "xyz").
  #[serde(default, rename = "comment-styles")]
  pub comment_styles: HashMap<String, Vec<Delimiters>>,

  /// Comment syntaxes per file name.
  /// Keys are exact filenames or glob patterns (e.g., "Justfile",
  /// "*.cmake.in").
  #[serde(default)]
  pub filenames: HashMap<String, Vec<Delimiters>>,

  #[serde(default)]
  pub corpus: CorpusConfig,

  #[serde(default)]
  pub matching: MatchConfig,
}

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The config file could not be read.
  #[error("Failed to read config file '{path}': {source}")]
  ReadError { path: PathBuf, source: std::io::Error },

  /// The config file contains invalid TOML or invalid comment markers.
  #[error("Failed to parse config file '{path}': {source}")]
  ParseError { path: PathBuf, source: toml::de::Error },

  /// A comment style entry is invalid.
  #[error("Invalid comment style for '{key}': {message}")]
  InvalidCommentStyle { key: String, message: String },

  /// The similarity threshold is outside `0.0..=1.0`.
  #[error("Invalid matching threshold {0}: must be between 0.0 and 1.0")]
  InvalidThreshold(f32),
}

impl Config {
  /// Load configuration from a file.
  ///
  /// Keys are lowercased and relative corpus paths are resolved against the
  /// directory holding the file.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read, parsed or validated.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    verbose_log!("Loading config from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
      path: path.to_path_buf(),
      source: e,
    })?;

    let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
      path: path.to_path_buf(),
      source: e,
    })?;

    config.validate()?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    let config = config.normalize(base_dir);

    verbose_log!(
      "Loaded {} comment style overrides, {} filename overrides, {} corpus paths",
      config.comment_styles.len(),
      config.filenames.len(),
      config.corpus.paths.len()
    );

    Ok(config)
  }

  /// Validate the configuration.
  ///
  /// Checks that:
  /// - Extension keys don't include the leading dot
  /// - Every override lists at least one comment syntax
  /// - The threshold is within `0.0..=1.0`
  fn validate(&self) -> Result<(), ConfigError> {
    for (ext, styles) in &self.comment_styles {
      if ext.starts_with('.') {
        return Err(ConfigError::InvalidCommentStyle {
          key: ext.clone(),
          message: "extension should not include leading dot".to_string(),
        });
      }
      if styles.is_empty() {
        return Err(ConfigError::InvalidCommentStyle {
          key: ext.clone(),
          message: "at least one comment style is required".to_string(),
        });
      }
    }

    for (filename, styles) in &self.filenames {
      if styles.is_empty() {
        return Err(ConfigError::InvalidCommentStyle {
          key: filename.clone(),
          message: "at least one comment style is required".to_string(),
        });
      }
    }

    let threshold = self.matching.threshold;
    if !(0.0..=1.0).contains(&threshold) {
      return Err(ConfigError::InvalidThreshold(threshold));
    }

    Ok(())
  }

  /// Check if the configuration has any comment style overrides.
  pub fn has_overrides(&self) -> bool {
    !self.comment_styles.is_empty() || !self.filenames.is_empty()
  }

  /// Normalize keys to lowercase for case-insensitive matching and anchor
  /// relative corpus paths at `base_dir`.
  fn normalize(self, base_dir: &Path) -> Self {
    let comment_styles = self
      .comment_styles
      .into_iter()
      .map(|(k, v)| (k.to_lowercase(), v))
      .collect();

    let filenames = self.filenames.into_iter().map(|(k, v)| (k.to_lowercase(), v)).collect();

    let paths = self
      .corpus
      .paths
      .into_iter()
      .map(|p| if p.is_relative() { base_dir.join(p) } else { p })
      .collect();

    Self {
      comment_styles,
      filenames,
      corpus: CorpusConfig {
        paths,
        builtin: self.corpus.builtin,
      },
      matching: self.matching,
    }
  }
}

/// Discover the configuration file path.
///
/// The configuration file is discovered in the following order:
/// 1. Path specified via `--config` flag (passed as `explicit_path`)
/// 2. Path specified via `LICBLOCK_CONFIG` environment variable
/// 3. `.licblock.toml` in `search_dir`
///
/// Returns `None` if no config file is found.
pub fn discover_config_path(explicit_path: Option<&Path>, search_dir: &Path) -> Option<PathBuf> {
  if let Some(path) = explicit_path {
    if path.exists() {
      verbose_log!("Using explicit config path: {}", path.display());
      return Some(path.to_path_buf());
    }
    verbose_log!("Explicit config path does not exist: {}", path.display());
    return None;
  }

  if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
    let path = PathBuf::from(&env_path);
    if path.exists() {
      verbose_log!("Using config from {}: {}", CONFIG_ENV_VAR, path.display());
      return Some(path);
    }
    verbose_log!("{} path does not exist: {}", CONFIG_ENV_VAR, env_path);
  }

  let local_config = search_dir.join(DEFAULT_CONFIG_FILENAME);
  if local_config.exists() {
    verbose_log!("Using config: {}", local_config.display());
    return Some(local_config);
  }

  verbose_log!("No config file found");
  None
}

/// Load configuration from the discovered path.
///
/// Returns `None` when `no_config` is set or no config file is found.
///
/// # Errors
///
/// Returns an error if a discovered config file cannot be loaded.
pub fn load_config(explicit_path: Option<&Path>, search_dir: &Path, no_config: bool) -> Result<Option<Config>> {
  if no_config {
    verbose_log!("Config file discovery disabled (--no-config)");
    return Ok(None);
  }

  match discover_config_path(explicit_path, search_dir) {
    Some(path) => {
      let config = Config::load(&path).with_context(|| format!("Failed to load config from {}", path.display()))?;
      Ok(Some(config))
    }
    None => Ok(None),
  }
}
