//! # Scan Command
//!
//! This module implements the scan command, which finds license blocks in
//! source files and reports the licenses and copyright holders found. This
//! is the default command when no subcommand is specified.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Args;
use tracing::debug;

use crate::config::{Config, load_config};
use crate::corpus::{MatchStrategy, TemplateCorpus};
use crate::delimiters::create_resolver;
use crate::extractor::Extractor;
use crate::info_log;
use crate::logging::{ColorMode, init_tracing, set_quiet, set_verbose};
use crate::output::{print_hint, print_scan};
use crate::processor::{Processor, ProcessorConfig, ScanSummary};
use crate::report::{ReportFormat, ReportGenerator};

/// Arguments for the scan command
#[derive(Args, Debug, Default)]
pub struct ScanArgs {
  /// Files, directories or glob patterns to scan. Directories are scanned
  /// recursively, skipping hidden directories.
  #[arg(required = false)]
  pub patterns: Vec<String>,

  /// Path to config file (default: .licblock.toml in the current directory)
  #[arg(long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Ignore config file even if present
  #[arg(long)]
  pub no_config: bool,

  /// Directory of license templates (*.txt, tagged by file name; repeatable)
  #[arg(long, value_name = "DIR")]
  pub corpus: Vec<PathBuf>,

  /// Do not load the built-in license templates
  #[arg(long)]
  pub no_builtin_corpus: bool,

  /// Minimum similarity for a template match, from 0.0 to 1.0 (1.0 means
  /// exact matches only) [default: 0.9]
  #[arg(long, value_name = "RATIO", value_parser = parse_threshold)]
  pub threshold: Option<f32>,

  /// Record license-looking comment blocks that match no template
  #[arg(long)]
  pub keep_unrecognized: bool,

  /// File patterns to ignore (supports glob patterns)
  #[arg(long, short = 'i')]
  pub ignore: Vec<String>,

  /// Output format
  #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
  pub format: ReportFormat,

  /// Write the report to a file instead of stdout
  #[arg(long, short = 'o', value_name = "FILE")]
  pub output: Option<PathBuf>,

  /// Exit with status 1 when a supported file has no recognized license
  #[arg(long)]
  pub fail_on_unmatched: bool,

  /// Increase verbosity (-v debug, -vv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except errors and the paths needing attention
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Control when to use colored output (auto, never, always)
  #[arg(
    long,
    value_name = "WHEN",
    num_args = 0..=1,
    default_value_t = ColorMode::Auto,
    default_missing_value = "always",
    value_enum
  )]
  pub colors: ColorMode,
}

fn parse_threshold(value: &str) -> Result<f32, String> {
  let threshold: f32 = value.parse().map_err(|_| format!("'{value}' is not a number"))?;
  if (0.0..=1.0).contains(&threshold) {
    Ok(threshold)
  } else {
    Err(format!("{threshold} is not between 0.0 and 1.0"))
  }
}

impl ScanArgs {
  /// Validate the arguments and return an error if invalid
  fn validate(&self) -> Result<(), String> {
    if self.patterns.is_empty() {
      return Err("Missing required argument: <PATTERNS>...".to_string());
    }
    Ok(())
  }
}

/// Run the scan command with the given arguments.
///
/// Returns a failing exit code when a file could not be scanned, or when
/// `--fail-on-unmatched` is set and some file had no recognized license.
///
/// # Errors
///
/// Returns an error for invalid arguments, configuration or templates.
pub fn run_scan(args: ScanArgs) -> Result<ExitCode> {
  if let Err(e) = args.validate() {
    eprintln!("ERROR: {e}");
    return Ok(ExitCode::FAILURE);
  }

  init_tracing(args.quiet, args.verbose);

  if args.verbose > 0 {
    set_verbose();
  } else if args.quiet {
    set_quiet();
  }
  args.colors.apply();

  let current_dir = std::env::current_dir().context("Failed to get current directory")?;
  let config = load_config(args.config.as_deref(), &current_dir, args.no_config)?;
  if config.is_some() {
    debug!("Using configuration file");
  }

  let extractor = build_extractor(&args, config)?;
  let processor = Processor::new(ProcessorConfig {
    ignore_patterns: args.ignore.clone(),
    ..ProcessorConfig::new(extractor)
  })?;

  let start_time = Instant::now();
  let summary = processor.process(&args.patterns)?;
  debug!("Scan finished in {:.2}s", start_time.elapsed().as_secs_f64());

  write_output(&args, &summary, &current_dir)?;

  if summary.has_unmatched() && !args.fail_on_unmatched && !args.keep_unrecognized && args.format == ReportFormat::Text
  {
    print_hint("Run with --keep-unrecognized to record license blocks that match no template.");
  }

  let failed = summary.has_errors() || (args.fail_on_unmatched && summary.has_unmatched());
  Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

/// Builds the extractor from the config file, with CLI flags taking
/// precedence.
fn build_extractor(args: &ScanArgs, config: Option<Config>) -> Result<Extractor> {
  let config = config.unwrap_or_default();

  let threshold = args.threshold.unwrap_or(config.matching.threshold);
  let keep_unrecognized = args.keep_unrecognized || config.matching.keep_unrecognized;
  let strategy = MatchStrategy::from_threshold(threshold);

  let mut corpus = if config.corpus.builtin && !args.no_builtin_corpus {
    TemplateCorpus::builtin(strategy)
  } else {
    TemplateCorpus::new(strategy)
  };
  for dir in config.corpus.paths.iter().chain(&args.corpus) {
    let loaded = corpus
      .load_dir(dir)
      .with_context(|| format!("Failed to load license templates from {}", dir.display()))?;
    debug!("Loaded {} templates from {}", loaded, dir.display());
  }
  if corpus.is_empty() {
    bail!("No license templates loaded; pass --corpus DIR or drop --no-builtin-corpus");
  }
  debug!(
    "Matching against {} templates with {:?}",
    corpus.len(),
    corpus.strategy()
  );

  let resolver = if config.has_overrides() {
    create_resolver(Some(Arc::new(config)))
  } else {
    create_resolver(None)
  };

  Ok(Extractor::new(resolver, Box::new(corpus)).with_keep_unrecognized(keep_unrecognized))
}

fn write_output(args: &ScanArgs, summary: &ScanSummary, current_dir: &Path) -> Result<()> {
  if args.format == ReportFormat::Text && args.output.is_none() {
    print_scan(summary, Some(current_dir));
    return Ok(());
  }

  ReportGenerator::new(args.format, args.output.as_deref()).generate(summary, Some(current_dir))?;
  if let Some(path) = &args.output {
    info_log!("Wrote {} report to {}", args.format, path.display());
  }
  Ok(())
}
