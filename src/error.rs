//! # Error Module
//!
//! Errors surfaced by the scanning core. Callers batching many files are
//! expected to handle [`ScanError::FileAccess`] per file and keep going.

use std::path::PathBuf;

/// Error type for the license block scanner.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
  /// A delimiter descriptor that is neither a single marker nor a
  /// start/continuation/end triple.
  #[error("Invalid comment delimiters: {0}")]
  InvalidDelimiters(String),

  /// A copyright year token that is neither a bare year nor a two-part range.
  #[error("Malformed year specification '{0}'")]
  MalformedYearSpec(String),

  /// The file could not be opened or read.
  #[error("Failed to read file '{path}': {source}")]
  FileAccess {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}
