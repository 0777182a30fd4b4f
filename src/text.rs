//! # Text Module
//!
//! Whitespace normalization shared by the scanner, the extractor and the
//! template corpus. Scanned blocks and templates must go through the same
//! normalization or exact matching stops working.

/// Collapses every run of whitespace into a single space and trims both ends.
///
/// ```
/// use licblock::text::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("  foo    bar  "), "foo bar");
/// assert_eq!(collapse_whitespace("   "), "");
/// ```
pub fn collapse_whitespace(s: &str) -> String {
  let mut result = String::with_capacity(s.len());
  for word in s.split_whitespace() {
    if !result.is_empty() {
      result.push(' ');
    }
    result.push_str(word);
  }
  result
}

/// Joins normalized lines into the single-line form used for template
/// matching.
pub fn joined_text<S: AsRef<str>>(lines: &[S]) -> String {
  let joined: Vec<&str> = lines.iter().map(|line| line.as_ref()).collect();
  collapse_whitespace(&joined.join(" "))
}

/// Returns true when the line holds nothing but whitespace.
pub fn is_blank(line: &str) -> bool {
  line.trim().is_empty()
}
