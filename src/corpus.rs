//! # Corpus Module
//!
//! This module contains the interfaces and implementations for classifying a
//! normalized comment block as a known license. It allows the matching
//! strategy and the template source to change without touching the extractor.
//!
//! Templates are normalized exactly like scanned blocks: each line has its
//! whitespace collapsed, copyright notice lines are removed, and the
//! remaining lines are joined into one line.
//!
//! ## Example
//!
//! ```rust
//! use licblock::corpus::{LicenseCorpus, MatchStrategy, TemplateCorpus};
//!
//! let mut corpus = TemplateCorpus::new(MatchStrategy::Exact);
//! corpus.add_template("Demo-1.0", "Do what you want\nwith this file.");
//!
//! assert_eq!(corpus.classify("Do what you want with this file."), Some("Demo-1.0"));
//! assert_eq!(corpus.classify("Something else entirely"), None);
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use similar::TextDiff;
use tracing::{debug, trace};

use crate::copyright::split_notices;
use crate::text::{collapse_whitespace, joined_text};

/// Default minimum similarity ratio for a near-exact match.
pub const DEFAULT_THRESHOLD: f32 = 0.9;

/// Upper bound on the time spent diffing one block against one template.
const DIFF_TIMEOUT: Duration = Duration::from_millis(100);

/// Templates shipped with the crate, as `(tag, text)`.
const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
  ("Apache-2.0", include_str!("../corpus/Apache-2.0.txt")),
  ("BSD-3-Clause", include_str!("../corpus/BSD-3-Clause.txt")),
  ("GPL-2.0-or-later", include_str!("../corpus/GPL-2.0-or-later.txt")),
  ("GPL-3.0-or-later", include_str!("../corpus/GPL-3.0-or-later.txt")),
  ("MIT", include_str!("../corpus/MIT.txt")),
  ("MPL-2.0", include_str!("../corpus/MPL-2.0.txt")),
];

/// Trait for license classifiers.
///
/// Implementations receive the normalized, single-line body of a comment
/// block (copyright notices removed) and return the tag of the license it
/// matches.
pub trait LicenseCorpus: Send + Sync {
  /// Returns the tag of the matching license, or `None` when nothing matches.
  fn classify(&self, text: &str) -> Option<&str>;
}

/// How closely a block must match a template.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchStrategy {
  /// Normalized texts must be identical
  Exact,
  /// Exact match first, then the most similar template whose word-level
  /// similarity ratio reaches `threshold`
  Similar {
    /// Minimum ratio in `0.0..=1.0`
    threshold: f32,
  },
}

impl Default for MatchStrategy {
  fn default() -> Self {
    Self::Similar {
      threshold: DEFAULT_THRESHOLD,
    }
  }
}

impl MatchStrategy {
  /// Builds a strategy from a similarity threshold. A threshold of 1.0 or
  /// more means exact matching only.
  pub fn from_threshold(threshold: f32) -> Self {
    if threshold >= 1.0 {
      Self::Exact
    } else {
      Self::Similar { threshold }
    }
  }
}

/// A normalized license template.
#[derive(Debug, Clone)]
struct Template {
  tag: String,
  text: String,
  words: usize,
}

/// License corpus built from text templates.
#[derive(Debug, Clone)]
pub struct TemplateCorpus {
  templates: Vec<Template>,
  /// Normalized text to index in `templates`
  exact: HashMap<String, usize>,
  strategy: MatchStrategy,
}

impl Default for TemplateCorpus {
  fn default() -> Self {
    Self::builtin(MatchStrategy::default())
  }
}

impl TemplateCorpus {
  /// Creates an empty corpus.
  pub fn new(strategy: MatchStrategy) -> Self {
    Self {
      templates: Vec::new(),
      exact: HashMap::new(),
      strategy,
    }
  }

  /// Creates a corpus holding the templates shipped with the crate.
  pub fn builtin(strategy: MatchStrategy) -> Self {
    let mut corpus = Self::new(strategy);
    for (tag, text) in BUILTIN_TEMPLATES {
      corpus.add_template(tag, text);
    }
    corpus
  }

  /// Adds a template. Templates whose normalized text is already present
  /// keep the earlier tag for exact lookups.
  pub fn add_template(&mut self, tag: &str, content: &str) {
    let text = normalize_template(content);
    if text.is_empty() {
      debug!("Skipping empty license template: {}", tag);
      return;
    }

    let index = self.templates.len();
    if let Some(&existing) = self.exact.get(&text) {
      debug!(
        "Template {} duplicates {}; exact matches keep the earlier tag",
        tag, self.templates[existing].tag
      );
    } else {
      self.exact.insert(text.clone(), index);
    }

    let words = text.split(' ').count();
    self.templates.push(Template {
      tag: tag.to_string(),
      text,
      words,
    });
  }

  /// Loads every `*.txt` file in `dir` as a template tagged with its file
  /// stem. Returns the number of templates loaded.
  ///
  /// # Errors
  ///
  /// Returns an error if the directory or one of its templates cannot be
  /// read.
  pub fn load_dir(&mut self, dir: &Path) -> Result<usize> {
    debug!("Loading license templates from: {}", dir.display());

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("Failed to read template directory: {}", dir.display()))? {
      let path = entry
        .with_context(|| format!("Failed to read template directory: {}", dir.display()))?
        .path();
      if path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
        paths.push(path);
      }
    }
    paths.sort();

    for path in &paths {
      let tag = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .with_context(|| format!("Template file name is not valid UTF-8: {}", path.display()))?;
      let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read license template file: {}", path.display()))?;
      self.add_template(tag, &content);
    }

    Ok(paths.len())
  }

  /// Number of templates in the corpus.
  pub fn len(&self) -> usize {
    self.templates.len()
  }

  pub fn is_empty(&self) -> bool {
    self.templates.is_empty()
  }

  /// Tags of all templates, in insertion order.
  pub fn tags(&self) -> impl Iterator<Item = &str> {
    self.templates.iter().map(|template| template.tag.as_str())
  }

  pub const fn strategy(&self) -> MatchStrategy {
    self.strategy
  }

  fn best_similar(&self, text: &str, threshold: f32) -> Option<&str> {
    let words = text.split(' ').count();
    let mut best: Option<(f32, &Template)> = None;

    for template in &self.templates {
      // Ratio can't exceed 2*min/(a+b); skip templates that can't reach the
      // threshold. The slack covers whitespace tokens in the diff.
      let bound = 2.0 * words.min(template.words) as f32 / (words + template.words) as f32;
      if bound + 0.05 < threshold {
        continue;
      }

      let ratio = similarity(text, &template.text);
      trace!("Similarity to {}: {:.3}", template.tag, ratio);
      if ratio >= threshold && best.is_none_or(|(best_ratio, _)| ratio > best_ratio) {
        best = Some((ratio, template));
      }
    }

    best.map(|(_, template)| template.tag.as_str())
  }
}

impl LicenseCorpus for TemplateCorpus {
  fn classify(&self, text: &str) -> Option<&str> {
    let text = collapse_whitespace(text);
    if text.is_empty() {
      return None;
    }

    if let Some(&index) = self.exact.get(&text) {
      return Some(self.templates[index].tag.as_str());
    }

    match self.strategy {
      MatchStrategy::Exact => None,
      MatchStrategy::Similar { threshold } => self.best_similar(&text, threshold),
    }
  }
}

/// Normalizes template text the same way scanned blocks are normalized.
fn normalize_template(content: &str) -> String {
  let lines: Vec<String> = content.lines().map(collapse_whitespace).collect();
  let (body, _) = split_notices(&lines);
  joined_text(&body)
}

fn similarity(a: &str, b: &str) -> f32 {
  TextDiff::configure().timeout(DIFF_TIMEOUT).diff_words(a, b).ratio()
}
