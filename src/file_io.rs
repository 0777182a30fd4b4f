//! # File I/O Module
//!
//! Line-oriented file reading for the extractor.

use std::path::Path;

use crate::error::ScanError;

/// File I/O operations for the extractor.
pub struct FileIO;

impl FileIO {
  /// Reads a file as a sequence of lines.
  ///
  /// Content is decoded as UTF-8; invalid sequences are replaced rather than
  /// rejected so that a stray byte in a source file does not hide its
  /// license header. A leading byte order mark is dropped. Line terminators
  /// (`\n` or `\r\n`) are not part of the returned lines.
  ///
  /// # Errors
  ///
  /// Returns [`ScanError::FileAccess`] if the file cannot be opened or read.
  pub fn read_lines(path: &Path) -> Result<Vec<String>, ScanError> {
    let bytes = std::fs::read(path).map_err(|source| ScanError::FileAccess {
      path: path.to_path_buf(),
      source,
    })?;

    let content = String::from_utf8_lossy(&bytes);
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

    Ok(content.lines().map(str::to_string).collect())
  }
}
