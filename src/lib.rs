//! # licblock
//!
//! Finds the license comment block at the top of source files, identifies
//! the license it holds, and extracts its copyright holders with canonical
//! year ranges.
//!
//! For each file, the comment syntaxes that apply to it are tried in order.
//! Every comment block is stripped of its markers, normalized, and split into
//! copyright notice lines and license text; the first block whose text
//! matches a known license template wins. Records with identical text are
//! merged across files, so a whole tree collapses to one entry per distinct
//! license block.
//!
//! ## Usage as a Library
//!
//! ```rust,no_run
//! use licblock::extractor::Extractor;
//! use licblock::processor::{Processor, ProcessorConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!   let processor = Processor::new(ProcessorConfig {
//!     ignore_patterns: vec!["**/vendor/**".to_string()],
//!     ..ProcessorConfig::new(Extractor::default())
//!   })?;
//!
//!   let summary = processor.process(&["src".to_string()])?;
//!   for record in summary.licenses.values() {
//!     println!("{:?}: {} files", record.tag, record.files.len());
//!     for (holder, years) in &record.copyrights {
//!       println!("  Copyright {holder}: {years}");
//!     }
//!   }
//!
//!   Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! * [`comment`] - Comment block scanning and comment marker stripping
//! * [`copyright`] - Copyright notice recognition
//! * [`years`] - Year specification parsing and canonical formatting
//! * [`delimiters`] - Comment syntaxes and their mapping to files
//! * [`corpus`] - License templates and matching
//! * [`extractor`] - License block extraction for a single file
//! * [`processor`] - Parallel scanning of files and directories
//! * [`config`] - `.licblock.toml` configuration
//! * [`report`] and [`output`] - Reports and terminal output
//! * [`logging`] - Logging utilities

pub mod cli;
pub mod comment;
pub mod config;
pub mod copyright;
pub mod corpus;
pub mod delimiters;
pub mod error;
pub mod extractor;
pub mod file_io;
pub mod logging;
pub mod output;
pub mod processor;
pub mod report;
pub mod text;
pub mod years;

pub use comment::{comment_blocks, find_next_comment, strip_comment_chars};
pub use delimiters::Delimiters;
pub use error::ScanError;
pub use extractor::{Extraction, Extractor, LicenseRecord, Licenses, get_license_block};
pub use text::collapse_whitespace;
pub use years::{Years, join_years, split_years};
