//! # licblock
//!
//! Finds the license comment block of source files and reports the
//! licenses and copyright holders found.

use std::process::ExitCode;

use anyhow::Result;

fn main() -> Result<ExitCode> {
  licblock::cli::run()
}
