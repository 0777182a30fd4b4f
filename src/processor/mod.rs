//! # Processor Module
//!
//! This module scans many files for license blocks.
//!
//! - [`file_collector`] expands patterns into files and applies ignore
//!   patterns
//! - [`Processor`] runs the [`Extractor`] over the collected files in
//!   parallel and gathers the results into a [`ScanSummary`]
//!
//! Each rayon worker fills its own [`Licenses`] map; the maps are merged when
//! the workers finish. A file that fails to scan is logged and recorded in
//! the summary without stopping the batch.

mod file_collector;

use std::path::{Path, PathBuf};

use anyhow::Result;
pub use file_collector::{FileCollector, IgnoreMatcher};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::extractor::{Extraction, Extractor, Licenses, merge_licenses};

/// A file that could not be scanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileError {
  #[serde(serialize_with = "crate::report::serialize_path")]
  pub path: PathBuf,
  pub message: String,
}

/// Result of scanning a batch of files.
///
/// File lists are sorted.
#[derive(Debug, Default)]
pub struct ScanSummary {
  /// License records found, keyed by text hash
  pub licenses: Licenses,
  /// Files whose license block matched a known license
  pub matched: Vec<PathBuf>,
  /// Supported files where no known license was found
  pub unmatched: Vec<PathBuf>,
  /// Files with no known comment syntax
  pub unsupported: Vec<PathBuf>,
  /// Files that could not be scanned
  pub errors: Vec<FileError>,
}

impl ScanSummary {
  /// Total number of files considered.
  pub fn files_scanned(&self) -> usize {
    self.matched.len() + self.unmatched.len() + self.unsupported.len() + self.errors.len()
  }

  pub fn has_errors(&self) -> bool {
    !self.errors.is_empty()
  }

  pub fn has_unmatched(&self) -> bool {
    !self.unmatched.is_empty()
  }

  fn record(&mut self, path: &Path, outcome: Result<Extraction, crate::error::ScanError>) {
    match outcome {
      Ok(Extraction::Matched { .. }) => self.matched.push(path.to_path_buf()),
      Ok(Extraction::Unrecognized { .. }) => self.unmatched.push(path.to_path_buf()),
      Ok(Extraction::Unsupported) => self.unsupported.push(path.to_path_buf()),
      Err(e) => {
        warn!("Failed to scan {}: {}", path.display(), e);
        self.errors.push(FileError {
          path: path.to_path_buf(),
          message: e.to_string(),
        });
      }
    }
  }

  fn merge(mut self, other: Self) -> Self {
    merge_licenses(&mut self.licenses, other.licenses);
    self.matched.extend(other.matched);
    self.unmatched.extend(other.unmatched);
    self.unsupported.extend(other.unsupported);
    self.errors.extend(other.errors);
    self
  }

  fn sort(&mut self) {
    self.matched.sort();
    self.unmatched.sort();
    self.unsupported.sort();
    self.errors.sort_by(|a, b| a.path.cmp(&b.path));
  }
}

/// Configuration for creating a Processor instance.
pub struct ProcessorConfig {
  pub extractor: Extractor,
  pub ignore_patterns: Vec<String>,
}

impl ProcessorConfig {
  /// Creates a config with no ignore patterns.
  ///
  /// Use struct update syntax to override specific fields:
  /// ```ignore
  /// ProcessorConfig {
  ///     ignore_patterns: vec!["**/vendor/**".to_string()],
  ///     ..ProcessorConfig::new(extractor)
  /// }
  /// ```
  pub const fn new(extractor: Extractor) -> Self {
    Self {
      extractor,
      ignore_patterns: Vec::new(),
    }
  }
}

/// Scans files and directories for license blocks.
pub struct Processor {
  extractor: Extractor,
  file_collector: FileCollector,
}

impl Processor {
  /// Creates a new processor.
  ///
  /// # Errors
  ///
  /// Returns an error if any of the ignore patterns is not a valid glob.
  pub fn new(config: ProcessorConfig) -> Result<Self> {
    let ignore = IgnoreMatcher::new(&config.ignore_patterns)?;
    Ok(Self {
      extractor: config.extractor,
      file_collector: FileCollector::new(ignore),
    })
  }

  /// Processes a list of file, directory or glob patterns.
  ///
  /// # Errors
  ///
  /// Returns an error if a pattern is neither an existing path nor a valid
  /// glob. Failures on individual files are reported in the summary.
  pub fn process(&self, patterns: &[String]) -> Result<ScanSummary> {
    let files = self.file_collector.collect(patterns)?;
    Ok(self.process_files(&files))
  }

  /// Scans an explicit list of files.
  pub fn process_files(&self, files: &[PathBuf]) -> ScanSummary {
    if files.is_empty() {
      debug!("No files to process");
      return ScanSummary::default();
    }

    let start_time = std::time::Instant::now();

    let mut summary = files
      .par_iter()
      .fold(ScanSummary::default, |mut summary, path| {
        let outcome = self.extractor.get_license_block(path, &mut summary.licenses);
        summary.record(path, outcome);
        summary
      })
      .reduce(ScanSummary::default, ScanSummary::merge);
    summary.sort();

    debug!(
      "Scanned {} files in {}ms: {} matched, {} unmatched, {} unsupported, {} failed",
      summary.files_scanned(),
      start_time.elapsed().as_millis(),
      summary.matched.len(),
      summary.unmatched.len(),
      summary.unsupported.len(),
      summary.errors.len()
    );

    summary
  }
}
