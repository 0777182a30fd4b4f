//! # Years Module
//!
//! Conversion between free-text copyright year specifications such as
//! `"1997-98, 2001"` and lists of years, and back to a compact canonical
//! string such as `"1997-1998, 2001"`.
//!
//! Re-serializing is a canonicalization: abbreviated ranges come back
//! expanded and overlapping ranges are merged.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::ScanError;

/// Parses a year specification into years, in encounter order.
///
/// Tokens are comma separated; each is a bare year or a `start-end` range.
/// An abbreviated end year inherits the leading digits of the start year, so
/// `"1997-98"` covers 1997 and 1998. Years are neither sorted nor
/// de-duplicated.
///
/// # Errors
///
/// Returns [`ScanError::MalformedYearSpec`] for a token that is not a number
/// or a two-part range, or a range that runs backwards.
///
/// ```
/// use licblock::years::split_years;
///
/// assert_eq!(split_years("2000-2001, 2004").expect("valid"), vec![2000, 2001, 2004]);
/// assert_eq!(split_years("1997-98").expect("valid"), vec![1997, 1998]);
/// ```
pub fn split_years(text: &str) -> Result<Vec<u32>, ScanError> {
  if text.trim().is_empty() {
    return Ok(Vec::new());
  }

  let mut years = Vec::new();
  for token in text.split(',').map(str::trim) {
    match token.split_once('-') {
      Some((start, end)) => {
        let (start_text, end_text) = (start.trim(), end.trim());
        let start = parse_year(start_text, token)?;
        let end = parse_range_end(start_text, end_text, token)?;
        if end < start {
          return Err(ScanError::MalformedYearSpec(token.to_string()));
        }
        years.extend(start..=end);
      }
      None => years.push(parse_year(token, token)?),
    }
  }
  Ok(years)
}

/// Renders ascending years as comma-separated runs, with consecutive years
/// collapsed into `start-end`.
///
/// ```
/// use licblock::years::join_years;
///
/// assert_eq!(join_years(&[1999, 2000, 2001, 2003, 2004]), "1999-2001, 2003-2004");
/// assert_eq!(join_years(&[]), "");
/// ```
pub fn join_years(years: &[u32]) -> String {
  let mut runs: Vec<String> = Vec::new();
  let mut index = 0;
  while index < years.len() {
    let first = years[index];
    let mut last = first;
    while index + 1 < years.len() && last.checked_add(1) == Some(years[index + 1]) {
      index += 1;
      last = years[index];
    }
    if first == last {
      runs.push(first.to_string());
    } else {
      runs.push(format!("{first}-{last}"));
    }
    index += 1;
  }
  runs.join(", ")
}

fn parse_year(text: &str, token: &str) -> Result<u32, ScanError> {
  if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
    return Err(ScanError::MalformedYearSpec(token.to_string()));
  }
  text
    .parse()
    .map_err(|_| ScanError::MalformedYearSpec(token.to_string()))
}

fn parse_range_end(start: &str, end: &str, token: &str) -> Result<u32, ScanError> {
  let year = parse_year(end, token)?;
  if end.len() < start.len() {
    let inherited = &start[..start.len() - end.len()];
    return parse_year(&format!("{inherited}{end}"), token);
  }
  Ok(year)
}

/// A sorted, de-duplicated set of copyright years.
///
/// Displays and serializes as the canonical range string produced by
/// [`join_years`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Years(Vec<u32>);

impl Years {
  /// Parses a year specification into a canonical set.
  ///
  /// # Errors
  ///
  /// Propagates [`ScanError::MalformedYearSpec`] from [`split_years`].
  pub fn parse(text: &str) -> Result<Self, ScanError> {
    Ok(Self::from_years(split_years(text)?))
  }

  /// Builds a set from years in any order.
  pub fn from_years(mut years: Vec<u32>) -> Self {
    years.sort_unstable();
    years.dedup();
    Self(years)
  }

  /// Adds every year of `other` to this set.
  pub fn merge(&mut self, other: &Self) {
    self.0.extend_from_slice(&other.0);
    self.0.sort_unstable();
    self.0.dedup();
  }

  /// The years, ascending.
  pub fn as_slice(&self) -> &[u32] {
    &self.0
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl fmt::Display for Years {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&join_years(&self.0))
  }
}

impl Serialize for Years {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    serializer.collect_str(self)
  }
}
