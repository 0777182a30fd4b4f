//! # CLI Module
//!
//! This module contains the command-line interface implementation.
//! It uses clap for argument parsing and supports subcommands for
//! extensibility.

mod scan;

use std::process::ExitCode;

use anyhow::Result;
use clap::builder::styling::{AnsiColor, Color, Style, Styles};
use clap::{Parser, Subcommand};
pub use scan::{ScanArgs, run_scan};

const CUSTOM_STYLES: Styles = Styles::styled()
  .header(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .usage(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))).bold())
  .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
  .error(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))).bold())
  .valid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
  .invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))));

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")");

/// Top-level CLI arguments
#[derive(Parser, Debug)]
#[command(
  name = "licblock",
  author,
  version,
  long_version = LONG_VERSION,
  about,
  args_conflicts_with_subcommands = true,
  styles = CUSTOM_STYLES,
  after_help = "Examples:
  # List the licenses and copyright holders found under src/
  licblock src/

  # Write a JSON report
  licblock --format json -o licenses.json src/ include/

  # Fail when a source file has no recognized license
  licblock --fail-on-unmatched src/

  # Add project-specific license templates and require exact matches
  licblock --corpus licenses/ --threshold 1.0 src/

  # Ignore specific files or patterns
  licblock --ignore \"**/vendor/**\" --ignore \"*.json\" .
",
  help_template = "{before-help}{name} v{version}
{about-section}
{usage-heading} {usage}

{all-args}{after-help}
"
)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Option<Command>,

  #[command(flatten)]
  pub scan_args: ScanArgs,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
  /// Scan files for license blocks (default)
  Scan(ScanArgs),
}

impl Cli {
  /// Parse CLI arguments and return the Cli struct
  pub fn parse_args() -> Self {
    Self::parse()
  }

  /// Get the effective scan arguments, whether from a subcommand or top-level
  pub fn into_scan_args(self) -> ScanArgs {
    match self.command {
      Some(Command::Scan(args)) => args,
      None => self.scan_args,
    }
  }
}

/// Parses the command line and runs the requested command.
///
/// # Errors
///
/// Propagates errors from the command.
pub fn run() -> Result<ExitCode> {
  run_scan(Cli::parse_args().into_scan_args())
}
