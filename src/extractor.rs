//! # Extractor Module
//!
//! Finds the license block of a source file and turns it into a
//! [`LicenseRecord`].
//!
//! For each candidate comment syntax of the file, comment blocks are
//! enumerated in order. Each block is stripped of its markers, normalized
//! line by line, and split into copyright notice lines and body text. The
//! first block whose body the corpus recognizes becomes the file's record.
//!
//! Records are keyed by a hash of their text, so the same license text found
//! in many files collapses to one entry whose copyrights and file list are
//! merged.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use licblock::extractor::{Extraction, Licenses, get_license_block};
//!
//! # fn main() -> Result<(), licblock::error::ScanError> {
//! let mut licenses = Licenses::new();
//! if let Extraction::Matched { key, tag } = get_license_block(Path::new("src/main.c"), &mut licenses)? {
//!   println!("{tag}: {:?}", licenses[&key].copyrights);
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use md5::{Digest, Md5};
use serde::{Serialize, Serializer};
use tracing::{debug, trace};

use crate::comment::{comment_blocks, strip_comment_chars};
use crate::copyright::{parse_copyright_line, split_notices};
use crate::corpus::{LicenseCorpus, TemplateCorpus};
use crate::delimiters::{BuiltinResolver, DelimiterResolver, Delimiters};
use crate::error::ScanError;
use crate::file_io::FileIO;
use crate::text::{collapse_whitespace, joined_text};
use crate::years::Years;

/// License records keyed by the hash of their text.
pub type Licenses = BTreeMap<String, LicenseRecord>;

/// The license block found in one or more files.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LicenseRecord {
  /// Tag of the matched license; `None` for an unrecognized block
  pub tag: Option<String>,
  /// Normalized text lines, copyright notices removed
  pub text: Vec<String>,
  /// Copyright holder to claimed years
  pub copyrights: BTreeMap<String, Years>,
  /// Files the block was found in, sorted
  #[serde(serialize_with = "serialize_paths")]
  pub files: Vec<PathBuf>,
}

impl LicenseRecord {
  /// The key under which this record is stored in [`Licenses`].
  pub fn key(&self) -> String {
    text_key(&self.text)
  }

  /// Merges another record with the same text into this one.
  pub fn merge(&mut self, other: Self) {
    for (holder, years) in other.copyrights {
      self.copyrights.entry(holder).or_default().merge(&years);
    }
    self.files.extend(other.files);
    self.files.sort();
    self.files.dedup();
    if self.tag.is_none() {
      self.tag = other.tag;
    }
  }
}

fn serialize_paths<S>(paths: &[PathBuf], serializer: S) -> Result<S::Ok, S::Error>
where
  S: Serializer,
{
  serializer.collect_seq(paths.iter().map(|path| path.to_string_lossy()))
}

/// Merges every record of `from` into `into`.
pub fn merge_licenses(into: &mut Licenses, from: Licenses) {
  for (key, record) in from {
    match into.get_mut(&key) {
      Some(existing) => existing.merge(record),
      None => {
        into.insert(key, record);
      }
    }
  }
}

/// Outcome of scanning one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
  /// A block matched a known license and was recorded under `key`.
  Matched { key: String, tag: String },
  /// No block matched. `key` is set when an unrecognized block was recorded
  /// anyway.
  Unrecognized { key: Option<String> },
  /// No comment syntax is known for the file.
  Unsupported,
}

/// Scans files for license blocks using a delimiter resolver and a license
/// corpus.
pub struct Extractor {
  resolver: Box<dyn DelimiterResolver>,
  corpus: Box<dyn LicenseCorpus>,
  keep_unrecognized: bool,
}

impl Default for Extractor {
  fn default() -> Self {
    Self::new(Box::new(BuiltinResolver), Box::new(TemplateCorpus::default()))
  }
}

impl Extractor {
  pub fn new(resolver: Box<dyn DelimiterResolver>, corpus: Box<dyn LicenseCorpus>) -> Self {
    Self {
      resolver,
      corpus,
      keep_unrecognized: false,
    }
  }

  /// Also record the first license-looking block of files where nothing
  /// matched, with no tag.
  pub const fn with_keep_unrecognized(mut self, keep_unrecognized: bool) -> Self {
    self.keep_unrecognized = keep_unrecognized;
    self
  }

  /// Candidate comment syntaxes for the file; empty when unsupported.
  pub fn delimiters_for(&self, path: &Path) -> Vec<Delimiters> {
    self.resolver.resolve(path)
  }

  /// Reads `path`, finds its license block and merges the resulting record
  /// into `licenses`.
  ///
  /// # Errors
  ///
  /// Returns [`ScanError::FileAccess`] if the file cannot be read and
  /// [`ScanError::MalformedYearSpec`] if a copyright notice in the recorded
  /// block carries malformed years.
  pub fn get_license_block(&self, path: &Path, licenses: &mut Licenses) -> Result<Extraction, ScanError> {
    let candidates = self.resolver.resolve(path);
    if candidates.is_empty() {
      trace!("Skipping: {} (no comment syntax for file type)", path.display());
      return Ok(Extraction::Unsupported);
    }

    let lines = FileIO::read_lines(path)?;
    self.extract_from_lines(path, &lines, &candidates, licenses)
  }

  /// Finds the license block in already-read lines.
  ///
  /// `path` is only recorded in the record's file list.
  ///
  /// # Errors
  ///
  /// Returns [`ScanError::MalformedYearSpec`] if a copyright notice in the
  /// recorded block carries malformed years.
  pub fn extract_from_lines<S: AsRef<str>>(
    &self,
    path: &Path,
    lines: &[S],
    candidates: &[Delimiters],
    licenses: &mut Licenses,
  ) -> Result<Extraction, ScanError> {
    let mut fallback: Option<ParsedBlock> = None;

    for delimiters in candidates {
      for block in comment_blocks(lines, delimiters) {
        let parsed = ParsedBlock::parse(&lines[block.range()], delimiters);

        if !parsed.body.is_empty()
          && let Some(tag) = self.corpus.classify(&joined_text(&parsed.body))
        {
          debug!(
            "{}: lines {}-{} match {}",
            path.display(),
            block.start + 1,
            block.end,
            tag
          );
          let tag = tag.to_string();
          let record = parsed.into_record(Some(tag.clone()), path)?;
          let key = insert_record(licenses, record);
          return Ok(Extraction::Matched { key, tag });
        }

        if self.keep_unrecognized && fallback.is_none() && parsed.looks_like_license() {
          fallback = Some(parsed);
        }
      }
    }

    match fallback {
      Some(parsed) => {
        debug!("{}: recording unrecognized license block", path.display());
        let record = parsed.into_record(None, path)?;
        let key = insert_record(licenses, record);
        Ok(Extraction::Unrecognized { key: Some(key) })
      }
      None => {
        trace!("{}: no license block recognized", path.display());
        Ok(Extraction::Unrecognized { key: None })
      }
    }
  }
}

static DEFAULT_EXTRACTOR: LazyLock<Extractor> = LazyLock::new(Extractor::default);

/// Finds the license block of `path` with the built-in comment syntaxes and
/// license templates, merging the record into `licenses`.
///
/// # Errors
///
/// See [`Extractor::get_license_block`].
pub fn get_license_block(path: &Path, licenses: &mut Licenses) -> Result<Extraction, ScanError> {
  DEFAULT_EXTRACTOR.get_license_block(path, licenses)
}

/// A comment block split into copyright notices and body text.
struct ParsedBlock {
  body: Vec<String>,
  notices: Vec<String>,
}

impl ParsedBlock {
  fn parse<S: AsRef<str>>(raw: &[S], delimiters: &Delimiters) -> Self {
    let normalized: Vec<String> = strip_comment_chars(raw, delimiters)
      .iter()
      .map(|line| collapse_whitespace(line))
      .collect();
    let (body, notices) = split_notices(&normalized);
    Self { body, notices }
  }

  fn looks_like_license(&self) -> bool {
    if !self.notices.is_empty() {
      return true;
    }
    let text = joined_text(&self.body).to_lowercase();
    text.contains("copyright") || text.contains("licen")
  }

  fn into_record(self, tag: Option<String>, path: &Path) -> Result<LicenseRecord, ScanError> {
    let mut copyrights: BTreeMap<String, Years> = BTreeMap::new();
    for notice in &self.notices {
      for clause in parse_copyright_line(notice).unwrap_or_default() {
        let years = Years::parse(&clause.years)?;
        copyrights.entry(clause.holder).or_default().merge(&years);
      }
    }

    Ok(LicenseRecord {
      tag,
      text: self.body,
      copyrights,
      files: vec![path.to_path_buf()],
    })
  }
}

fn insert_record(licenses: &mut Licenses, record: LicenseRecord) -> String {
  let key = record.key();
  let mut single = Licenses::new();
  single.insert(key.clone(), record);
  merge_licenses(licenses, single);
  key
}

/// Hex MD5 of the text lines joined by newlines.
fn text_key(text: &[String]) -> String {
  format!("{:x}", Md5::digest(text.join("\n").as_bytes()))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::corpus::MatchStrategy;

  const MIT_HEADER: &str = concat!(
    "/*\n",
    " * Copyright © 2007,2008,2009 Red Hat, Inc.\n",
    " *\n",
    " * Permission is hereby granted, free of charge, to any person obtaining a\n",
    " * copy of this software and associated documentation files (the \"Software\"),\n",
    " * to deal in the Software without restriction, including without limitation\n",
    " * the rights to use, copy, modify, merge, publish, distribute, sublicense,\n",
    " * and/or sell copies of the Software, and to permit persons to whom the\n",
    " * Software is furnished to do so, subject to the following conditions:\n",
    " *\n",
    " * The above copyright notice and this permission notice shall be included in\n",
    " * all copies or substantial portions of the Software.\n",
    " *\n",
    " * THE SOFTWARE IS PROVIDED \"AS IS\", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR\n",
    " * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,\n",
    " * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE\n",
    " * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER\n",
    " * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,\n",
    " * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN\n",
    " * THE SOFTWARE.\n",
    " */\n",
  );

  fn exact_extractor() -> Extractor {
    Extractor::new(
      Box::new(BuiltinResolver),
      Box::new(TemplateCorpus::builtin(MatchStrategy::Exact)),
    )
  }

  fn extract(extractor: &Extractor, name: &str, content: &str, licenses: &mut Licenses) -> Extraction {
    let path = Path::new(name);
    let lines: Vec<&str> = content.lines().collect();
    let candidates = extractor.delimiters_for(path);
    extractor
      .extract_from_lines(path, &lines, &candidates, licenses)
      .expect("extraction should succeed")
  }

  #[test]
  fn test_mit_block_comment() {
    let extractor = exact_extractor();
    let mut licenses = Licenses::new();
    let content = format!("{MIT_HEADER}\n#include <stdio.h>\n");

    let outcome = extract(&extractor, "main.cc", &content, &mut licenses);
    let Extraction::Matched { key, tag } = outcome else {
      panic!("expected a match, got {outcome:?}");
    };

    assert_eq!(tag, "MIT");
    assert_eq!(licenses.len(), 1);
    let record = &licenses[&key];
    assert!(record.text[0].starts_with("Permission is hereby granted"));
    assert_eq!(record.copyrights.len(), 1);
    assert_eq!(record.copyrights["Red Hat, Inc."].to_string(), "2007-2009");
    assert_eq!(record.files, vec![PathBuf::from("main.cc")]);
  }

  #[test]
  fn test_skips_non_license_blocks() {
    let extractor = exact_extractor();
    let mut licenses = Licenses::new();
    let content = concat!(
      "#!/usr/bin/env python\n",
      "# -*- coding: utf-8 -*-\n",
      "import os\n",
      "# This Source Code Form is subject to the terms of the Mozilla Public\n",
      "# License, v. 2.0. If a copy of the MPL was not distributed with this\n",
      "# file, You can obtain one at http://mozilla.org/MPL/2.0/.\n",
    );

    let outcome = extract(&extractor, "tool.py", content, &mut licenses);
    assert!(matches!(outcome, Extraction::Matched { ref tag, .. } if tag == "MPL-2.0"));
  }

  #[test]
  fn test_falls_back_to_second_syntax() {
    let extractor = exact_extractor();
    let mut licenses = Licenses::new();
    let content = concat!(
      "// Copyright 2021 Example Org\n",
      "//\n",
      "// This Source Code Form is subject to the terms of the Mozilla Public\n",
      "// License, v. 2.0. If a copy of the MPL was not distributed with this\n",
      "// file, You can obtain one at http://mozilla.org/MPL/2.0/.\n",
      "\n",
      "/* not a license */\n",
      "fn main() {}\n",
    );

    let outcome = extract(&extractor, "main.rs", content, &mut licenses);
    let Extraction::Matched { key, tag } = outcome else {
      panic!("expected a match, got {outcome:?}");
    };
    assert_eq!(tag, "MPL-2.0");
    assert_eq!(licenses[&key].copyrights["Example Org"].to_string(), "2021");
  }

  #[test]
  fn test_unrecognized_adds_nothing() {
    let extractor = exact_extractor();
    let mut licenses = Licenses::new();
    let content = "# Copyright 2020 Someone\n# Proprietary and confidential.\nprint('hi')\n";

    let outcome = extract(&extractor, "x.py", content, &mut licenses);
    assert_eq!(outcome, Extraction::Unrecognized { key: None });
    assert!(licenses.is_empty());
  }

  #[test]
  fn test_keep_unrecognized_records_untagged_block() {
    let extractor = exact_extractor().with_keep_unrecognized(true);
    let mut licenses = Licenses::new();
    let content = "# just a note\n\nx = 1\n# Copyright 2020 Someone\n# Proprietary and confidential.\n";

    let outcome = extract(&extractor, "x.py", content, &mut licenses);
    let Extraction::Unrecognized { key: Some(key) } = outcome else {
      panic!("expected an unrecognized record, got {outcome:?}");
    };
    let record = &licenses[&key];
    assert_eq!(record.tag, None);
    assert_eq!(record.text, vec!["Proprietary and confidential."]);
    assert_eq!(record.copyrights["Someone"].to_string(), "2020");
  }

  #[test]
  fn test_unsupported_file_type() {
    let extractor = exact_extractor();
    let mut licenses = Licenses::new();
    let outcome = extractor
      .get_license_block(Path::new("data.unknownext"), &mut licenses)
      .expect("unsupported files are not an error");
    assert_eq!(outcome, Extraction::Unsupported);
  }

  #[test]
  fn test_identical_blocks_merge() {
    let extractor = exact_extractor();
    let mut licenses = Licenses::new();
    let first = MIT_HEADER.to_string();
    let second = MIT_HEADER.replace("Copyright © 2007,2008,2009 Red Hat, Inc.", "Copyright (c) 2011 Red Hat, Inc.");

    extract(&extractor, "a.c", &first, &mut licenses);
    extract(&extractor, "b.c", &second, &mut licenses);

    assert_eq!(licenses.len(), 1);
    let record = licenses.values().next().expect("one record");
    assert_eq!(record.copyrights["Red Hat, Inc."].to_string(), "2007-2009, 2011");
    assert_eq!(record.files, vec![PathBuf::from("a.c"), PathBuf::from("b.c")]);
  }

  #[test]
  fn test_banner_and_coding_cookie_do_not_split_records() {
    let extractor = exact_extractor();
    let mut licenses = Licenses::new();
    let mpl = concat!(
      "# This Source Code Form is subject to the terms of the Mozilla Public\n",
      "# License, v. 2.0. If a copy of the MPL was not distributed with this\n",
      "# file, You can obtain one at http://mozilla.org/MPL/2.0/.\n",
    );
    let rule = "###############################################################################\n";
    let framed = format!("# -*- coding: utf-8 -*-\n{rule}{mpl}{rule}import os\n");

    extract(&extractor, "framed.py", &framed, &mut licenses);
    extract(&extractor, "plain.py", mpl, &mut licenses);

    assert_eq!(licenses.len(), 1);
    let record = licenses.values().next().expect("one record");
    assert_eq!(record.tag.as_deref(), Some("MPL-2.0"));
    assert!(record.text[0].starts_with("This Source Code Form"));
    assert!(record.text.last().is_some_and(|line| line.ends_with("MPL/2.0/.")));
    assert_eq!(record.files, vec![PathBuf::from("framed.py"), PathBuf::from("plain.py")]);
  }

  #[test]
  fn test_malformed_years_propagate() {
    let extractor = exact_extractor();
    let mut licenses = Licenses::new();
    let content = concat!(
      "# Copyright 2005-2001 Backwards Inc.\n",
      "# This Source Code Form is subject to the terms of the Mozilla Public\n",
      "# License, v. 2.0. If a copy of the MPL was not distributed with this\n",
      "# file, You can obtain one at http://mozilla.org/MPL/2.0/.\n",
    );
    let lines: Vec<&str> = content.lines().collect();
    let err = extractor
      .extract_from_lines(Path::new("x.py"), &lines, &[Delimiters::line("#")], &mut licenses)
      .expect_err("backwards range should fail");
    assert!(matches!(err, ScanError::MalformedYearSpec(_)));
    assert!(licenses.is_empty());
  }

  #[test]
  fn test_key_is_md5_of_text() {
    let record = LicenseRecord {
      tag: None,
      text: vec!["a".to_string(), "b".to_string()],
      copyrights: BTreeMap::new(),
      files: Vec::new(),
    };
    // md5("a\nb")
    assert_eq!(record.key(), "8cdeb44417f3c26826595d5820cf5700");
  }
}
