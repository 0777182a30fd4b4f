//! # Report Module
//!
//! This module renders a [`ScanSummary`] as a report file or stream, either
//! as plain text or as JSON for other tools.
//!
//! The JSON report lists every license record with its tag, normalized text,
//! copyright holders with canonical year ranges, and the files it was found
//! in, followed by the files that had no recognized license, were not
//! supported, or failed to scan.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use clap::ValueEnum;
use serde::{Serialize, Serializer};

use crate::extractor::LicenseRecord;
use crate::output;
use crate::processor::{FileError, ScanSummary};

/// Supported report formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
  /// Human-readable text
  #[default]
  Text,
  /// JSON format for machine readability
  Json,
}

impl std::fmt::Display for ReportFormat {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Text => write!(f, "text"),
      Self::Json => write!(f, "json"),
    }
  }
}

/// Serializes a path as a (lossy) UTF-8 string.
pub fn serialize_path<S>(path: &Path, serializer: S) -> Result<S::Ok, S::Error>
where
  S: Serializer,
{
  serializer.serialize_str(&path.to_string_lossy())
}

fn serialize_path_list<S>(paths: &[PathBuf], serializer: S) -> Result<S::Ok, S::Error>
where
  S: Serializer,
{
  serializer.collect_seq(paths.iter().map(|path| path.to_string_lossy()))
}

/// Counts per outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryCounts {
  pub files_scanned: usize,
  pub matched: usize,
  pub unmatched: usize,
  pub unsupported: usize,
  pub failed: usize,
}

impl From<&ScanSummary> for SummaryCounts {
  fn from(summary: &ScanSummary) -> Self {
    Self {
      files_scanned: summary.files_scanned(),
      matched: summary.matched.len(),
      unmatched: summary.unmatched.len(),
      unsupported: summary.unsupported.len(),
      failed: summary.errors.len(),
    }
  }
}

#[derive(Debug, Serialize)]
struct LicenseEntry<'a> {
  key: &'a str,
  #[serde(flatten)]
  record: &'a LicenseRecord,
}

/// JSON view of a scan.
#[derive(Debug, Serialize)]
pub struct ScanReport<'a> {
  generated_at: String,
  summary: SummaryCounts,
  licenses: Vec<LicenseEntry<'a>>,
  #[serde(serialize_with = "serialize_path_list")]
  unmatched: &'a [PathBuf],
  #[serde(serialize_with = "serialize_path_list")]
  unsupported: &'a [PathBuf],
  errors: &'a [FileError],
}

impl<'a> ScanReport<'a> {
  pub fn new(summary: &'a ScanSummary) -> Self {
    Self {
      generated_at: Local::now().format("%Y-%m-%dT%H:%M:%S%:z").to_string(),
      summary: SummaryCounts::from(summary),
      licenses: summary
        .licenses
        .iter()
        .map(|(key, record)| LicenseEntry { key, record })
        .collect(),
      unmatched: &summary.unmatched,
      unsupported: &summary.unsupported,
      errors: &summary.errors,
    }
  }

  /// Renders the report as pretty-printed JSON.
  ///
  /// # Errors
  ///
  /// Returns an error if serialization fails.
  pub fn to_json(&self) -> Result<String> {
    serde_json::to_string_pretty(self).context("Failed to serialize JSON report")
  }
}

/// Report Generator for writing scan reports
pub struct ReportGenerator<'a> {
  /// Format of the report to generate
  format: ReportFormat,
  /// Where the report goes; stdout when `None`
  output_path: Option<&'a Path>,
}

impl<'a> ReportGenerator<'a> {
  pub const fn new(format: ReportFormat, output_path: Option<&'a Path>) -> Self {
    Self { format, output_path }
  }

  /// Renders the report content.
  ///
  /// Text reports written to a file carry no color codes.
  ///
  /// # Errors
  ///
  /// Returns an error if JSON serialization fails.
  pub fn render(&self, summary: &ScanSummary, base_dir: Option<&Path>) -> Result<String> {
    match self.format {
      ReportFormat::Text => Ok(output::render_text(summary, base_dir)),
      ReportFormat::Json => ScanReport::new(summary).to_json(),
    }
  }

  /// Writes the report to the output file, or to stdout.
  ///
  /// # Errors
  ///
  /// Returns an error if the report cannot be rendered or written.
  pub fn generate(&self, summary: &ScanSummary, base_dir: Option<&Path>) -> Result<()> {
    let mut content = self.render(summary, base_dir)?;
    if !content.ends_with('\n') {
      content.push('\n');
    }

    match self.output_path {
      Some(path) => {
        fs::write(path, content).with_context(|| format!("Failed to write report to {}", path.display()))
      }
      None => {
        let mut stdout = std::io::stdout().lock();
        stdout
          .write_all(content.as_bytes())
          .context("Failed to write report to stdout")
      }
    }
  }
}
