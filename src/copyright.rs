//! # Copyright Module
//!
//! Recognizes copyright notice lines inside a normalized comment block and
//! splits them into holder/year clauses.
//!
//! A notice line starts with the word "Copyright", optionally followed by a
//! copyright glyph (`©`, `(c)` or `&copy;`), then one or more clauses
//! separated by `;`. A clause names its years either before the holder
//! (`2007, 2008 Red Hat, Inc.`) or after it (`Red Hat, Inc. 2007-2009`).
//! Lines without a glyph must carry at least one year, so prose such as
//! "Copyright holders may ..." is not taken for a notice.
//!
//! Framing lines at the edges of a block (banner rules, editor coding
//! cookies, a shebang caught by a `#` comment) are not part of the body.

use std::sync::LazyLock;

use regex::Regex;

static COPYRIGHT_LINE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)^copyright\b:?(?P<glyph>(?:\s*(?:©|\(c\)|&copy;))+)?\s*(?P<rest>.*)$")
    .expect("copyright regex must compile")
});

static YEARS_FIRST: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^(?P<years>[0-9]{4}(?:\s*[-,]\s*[0-9]{2,4}\b)*)\s*,?\s*(?P<holder>.*)$")
    .expect("years-first regex must compile")
});

static HOLDER_FIRST: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^(?P<holder>.*?)[\s,]+(?P<years>[0-9]{4}(?:\s*[-,]\s*[0-9]{2,4}\b)*)\s*\.?$")
    .expect("holder-first regex must compile")
});

static RIGHTS_RESERVED_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)[,.]?\s*all rights reserved\.?\s*$").expect("rights reserved regex must compile")
});

static FRAMING_LINE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)^(?:-\*-.*-\*-|(?:vim?|ex):\s.*|!\s*/.*|(?:en)?coding[:=]\s*[-\w.]+)$")
    .expect("framing line regex must compile")
});

static RIGHTS_RESERVED_LINE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?i)^all rights reserved\.?$").expect("rights reserved regex must compile"));

/// One holder named in a copyright notice, with the raw year text claimed for
/// it. The year text is parsed separately so malformed years surface as
/// errors instead of being dropped here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyrightClause {
  /// The copyright holder as written
  pub holder: String,
  /// The year specification, e.g. `"1997-98, 2001"`, possibly empty
  pub years: String,
}

/// Parses a normalized line as a copyright notice.
///
/// Returns `None` when the line is not a notice. A notice whose clauses name
/// no holder returns an empty list.
///
/// ```
/// use licblock::copyright::parse_copyright_line;
///
/// let clauses = parse_copyright_line("Copyright © 2007,2008,2009 Red Hat, Inc.").expect("a notice");
/// assert_eq!(clauses[0].holder, "Red Hat, Inc.");
/// assert_eq!(clauses[0].years, "2007,2008,2009");
/// ```
pub fn parse_copyright_line(line: &str) -> Option<Vec<CopyrightClause>> {
  let caps = COPYRIGHT_LINE.captures(line)?;
  let has_glyph = caps.name("glyph").is_some();
  let rest = caps.name("rest").map_or("", |m| m.as_str());

  let clauses: Vec<CopyrightClause> = rest.split(';').filter_map(parse_clause).collect();

  if !has_glyph && clauses.iter().all(|clause| clause.years.is_empty()) {
    return None;
  }

  Some(clauses.into_iter().filter(|clause| !clause.holder.is_empty()).collect())
}

/// Returns true for a line that belongs to a copyright notice: the notice
/// itself or a standalone "All rights reserved." line.
pub fn is_notice_line(line: &str) -> bool {
  RIGHTS_RESERVED_LINE.is_match(line) || parse_copyright_line(line).is_some()
}

/// Returns true for lines that frame a block rather than carry text: empty
/// lines, rules made only of punctuation (`#####`, `----`), coding cookies
/// and modelines, and shebangs.
pub fn is_framing_line(line: &str) -> bool {
  !line.chars().any(char::is_alphanumeric) || FRAMING_LINE.is_match(line)
}

/// Separates the notice lines of a normalized block from its body.
///
/// Returns `(body, notices)`. The body keeps its inner lines but loses
/// leading and trailing framing lines, so the same license text with or
/// without a banner gives the same body.
pub fn split_notices(lines: &[String]) -> (Vec<String>, Vec<String>) {
  let (notices, body): (Vec<String>, Vec<String>) = lines.iter().cloned().partition(|line| is_notice_line(line));

  let first = body.iter().position(|line| !is_framing_line(line));
  let last = body.iter().rposition(|line| !is_framing_line(line));
  let body = match (first, last) {
    (Some(first), Some(last)) => body[first..=last].to_vec(),
    _ => Vec::new(),
  };

  (body, notices)
}

fn parse_clause(clause: &str) -> Option<CopyrightClause> {
  let clause = RIGHTS_RESERVED_SUFFIX.replace(clause.trim(), "");
  let clause = clause.trim();
  if clause.is_empty() {
    return None;
  }

  let (holder, years) = if let Some(caps) = YEARS_FIRST.captures(clause) {
    (caps["holder"].to_string(), caps["years"].to_string())
  } else if let Some(caps) = HOLDER_FIRST.captures(clause) {
    (caps["holder"].to_string(), caps["years"].to_string())
  } else {
    (clause.to_string(), String::new())
  };

  Some(CopyrightClause {
    holder: clean_holder(&holder),
    years,
  })
}

fn clean_holder(holder: &str) -> String {
  let holder = holder.trim().trim_end_matches([',', ';']).trim_end();
  let holder = holder
    .strip_prefix("by ")
    .or_else(|| holder.strip_prefix("By "))
    .unwrap_or(holder);
  holder.trim().to_string()
}
