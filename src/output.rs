//! # Output Module
//!
//! This module centralizes all user-facing output for the licblock tool.
//! It provides consistent formatting, colors, and symbols for terminal output.
//!
//! ## Design Goals
//!
//! - **Informative**: Show each license found, its holders and its files
//! - **Progressive**: More detail with `-v`, silence with `-q`
//! - **Scriptable**: In quiet mode only the paths needing attention are
//!   printed, one per line

use std::fmt::Write as _;
use std::path::{Component, Path, PathBuf};

use owo_colors::{OwoColorize, Stream};

use crate::extractor::LicenseRecord;
use crate::logging::{is_quiet, is_verbose};
use crate::processor::ScanSummary;

/// Symbols used in output
pub mod symbols {
  /// Recognized license
  pub const SUCCESS: &str = "\u{2713}"; // ✓
  /// Missing license/failure
  pub const FAILURE: &str = "\u{2717}"; // ✗
  /// Recorded but unrecognized license block
  pub const UNKNOWN: &str = "?";
}

/// Maximum number of files to show per list before truncating
const DEFAULT_FILE_LIST_LIMIT: usize = 20;

/// Label used for records without a tag.
const UNRECOGNIZED_LABEL: &str = "unrecognized";

#[derive(Debug, Clone, Copy)]
enum Tone {
  Good,
  Bad,
  Warn,
  Muted,
}

fn paint(text: &str, tone: Tone, colored: bool) -> String {
  if !colored {
    return text.to_string();
  }
  match tone {
    Tone::Good => text.if_supports_color(Stream::Stdout, |s| s.green()).to_string(),
    Tone::Bad => text.if_supports_color(Stream::Stdout, |s| s.red()).to_string(),
    Tone::Warn => text.if_supports_color(Stream::Stdout, |s| s.yellow()).to_string(),
    Tone::Muted => text.if_supports_color(Stream::Stdout, |s| s.dimmed()).to_string(),
  }
}

fn plural(count: usize) -> &'static str {
  if count == 1 { "file" } else { "files" }
}

struct TextStyle<'a> {
  base_dir: Option<&'a Path>,
  colored: bool,
  limit: Option<usize>,
}

impl TextStyle<'_> {
  fn write_paths<'p, I>(&self, out: &mut String, paths: I, count: usize)
  where
    I: Iterator<Item = &'p Path>,
  {
    let shown = self.limit.unwrap_or(count);
    for path in paths.take(shown) {
      let _ = writeln!(out, "    {}", make_relative_path(path, self.base_dir));
    }
    if count > shown {
      let _ = writeln!(
        out,
        "    {}",
        paint(&format!("... and {} more (use -v to see all)", count - shown), Tone::Muted, self.colored)
      );
    }
  }

  fn write_record(&self, out: &mut String, record: &LicenseRecord) {
    let count = record.files.len();
    let (symbol, label, tone) = match &record.tag {
      Some(tag) => (symbols::SUCCESS, tag.as_str(), Tone::Good),
      None => (symbols::UNKNOWN, UNRECOGNIZED_LABEL, Tone::Warn),
    };
    let _ = writeln!(
      out,
      "{} {} ({} {})",
      paint(symbol, tone, self.colored),
      label,
      count,
      plural(count)
    );
    for (holder, years) in &record.copyrights {
      if years.is_empty() {
        let _ = writeln!(out, "    Copyright {holder}");
      } else {
        let _ = writeln!(out, "    Copyright {holder}: {years}");
      }
    }
    self.write_paths(out, record.files.iter().map(|p| p.as_path()), count);
  }

  fn render(&self, summary: &ScanSummary, show_unsupported: bool) -> String {
    let mut out = String::new();

    for record in summary.licenses.values() {
      self.write_record(&mut out, record);
    }

    let unmatched = summary.unmatched.len();
    if unmatched > 0 {
      let _ = writeln!(
        out,
        "{} {} {} with no recognized license:",
        paint(symbols::FAILURE, Tone::Bad, self.colored),
        unmatched,
        plural(unmatched)
      );
      self.write_paths(&mut out, summary.unmatched.iter().map(|p| p.as_path()), unmatched);
    }

    let unsupported = summary.unsupported.len();
    if show_unsupported && unsupported > 0 {
      let _ = writeln!(
        out,
        "{} {} unsupported {}:",
        paint("-", Tone::Muted, self.colored),
        unsupported,
        plural(unsupported)
      );
      self.write_paths(&mut out, summary.unsupported.iter().map(|p| p.as_path()), unsupported);
    }

    let failed = summary.errors.len();
    if failed > 0 {
      let _ = writeln!(
        out,
        "{} {} {} could not be scanned:",
        paint(symbols::FAILURE, Tone::Bad, self.colored),
        failed,
        plural(failed)
      );
      for error in &summary.errors {
        let _ = writeln!(
          out,
          "    {}: {}",
          make_relative_path(&error.path, self.base_dir),
          error.message
        );
      }
    }

    let _ = writeln!(
      out,
      "Summary: {} matched, {} unmatched, {} unsupported, {} failed",
      summary.matched.len(),
      paint(&unmatched.to_string(), if unmatched > 0 { Tone::Bad } else { Tone::Good }, self.colored),
      unsupported,
      paint(&failed.to_string(), if failed > 0 { Tone::Bad } else { Tone::Good }, self.colored)
    );

    out
  }
}

/// Renders the scan as plain text, listing every file.
pub fn render_text(summary: &ScanSummary, base_dir: Option<&Path>) -> String {
  TextStyle {
    base_dir,
    colored: false,
    limit: None,
  }
  .render(summary, true)
}

/// Prints the scan to the terminal.
///
/// File lists are truncated unless verbose mode is on. In quiet mode only
/// the unmatched and failed paths are printed, one per line.
pub fn print_scan(summary: &ScanSummary, base_dir: Option<&Path>) {
  if is_quiet() {
    for path in summary.unmatched.iter().chain(summary.errors.iter().map(|e| &e.path)) {
      println!("{}", make_relative_path(path, base_dir));
    }
    return;
  }

  let verbose = is_verbose();
  let style = TextStyle {
    base_dir,
    colored: true,
    limit: if verbose { None } else { Some(DEFAULT_FILE_LIST_LIMIT) },
  };
  print!("{}", style.render(summary, verbose));
}

/// Print a hint for the user about what to do next.
pub fn print_hint(message: &str) {
  if is_quiet() {
    return;
  }

  println!("{}", message.if_supports_color(Stream::Stdout, |s| s.yellow()));
}

/// Make a path relative to `base_dir` for display. Relative paths are shown
/// as given, minus `./` segments.
fn make_relative_path(path: &Path, base_dir: Option<&Path>) -> String {
  if path.is_relative() {
    let cleaned: PathBuf = path
      .components()
      .filter(|component| !matches!(component, Component::CurDir))
      .collect();
    return cleaned.to_string_lossy().to_string();
  }

  let Some(base) = base_dir else {
    return path.to_string_lossy().to_string();
  };

  if let Ok(stripped) = path.strip_prefix(base) {
    return stripped.to_string_lossy().to_string();
  }
  if base.is_absolute()
    && let Some(relative) = pathdiff::diff_paths(path, base)
  {
    return relative.to_string_lossy().to_string();
  }
  path.to_string_lossy().to_string()
}
