//! # Comment Stripper
//!
//! Recovers the text of a comment block by removing comment markers and the
//! single space conventionally written after them. Any further indentation
//! is kept as content.

use crate::delimiters::Delimiters;

/// Removes comment markers from each line of a comment block.
///
/// The output has one entry per input line, in order. Lines that carry no
/// marker only have their surrounding whitespace trimmed.
///
/// ```
/// use licblock::comment::strip_comment_chars;
/// use licblock::delimiters::Delimiters;
///
/// let stripped = strip_comment_chars(&["/* Foo", "* Bar", "* Baz */"], &Delimiters::block("/*", "*", "*/"));
/// assert_eq!(stripped, vec!["Foo", "Bar", "Baz"]);
/// ```
pub fn strip_comment_chars<S: AsRef<str>>(lines: &[S], delimiters: &Delimiters) -> Vec<String> {
  lines
    .iter()
    .map(|line| strip_line(line.as_ref(), delimiters).to_string())
    .collect()
}

fn strip_line<'a>(line: &'a str, delimiters: &Delimiters) -> &'a str {
  let mut rest = line.trim_start();

  match delimiters {
    Delimiters::Line(marker) => {
      rest = rest.strip_prefix(marker.as_str()).unwrap_or(rest);
    }
    Delimiters::Block { start, middle, end } => {
      // The end marker can share a line with the start or continuation marker,
      // so it comes off first.
      rest = rest.strip_suffix(end.as_str()).unwrap_or(rest);
      rest = match rest.strip_prefix(start.as_str()) {
        Some(after_start) => after_start,
        None => rest.strip_prefix(middle.as_str()).unwrap_or(rest),
      };
    }
  }

  rest.strip_prefix(' ').unwrap_or(rest).trim_end()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_strip_line_comments() {
    let hash = Delimiters::line("#");
    assert_eq!(strip_comment_chars(&["# Foo", "# Bar"], &hash), vec!["Foo", "Bar"]);
  }

  #[test]
  fn test_strip_keeps_extra_indentation() {
    let hash = Delimiters::line("#");
    assert_eq!(strip_comment_chars(&["# Foo", "  #  Bar"], &hash), vec!["Foo", " Bar"]);
  }

  #[test]
  fn test_strip_block_comments() {
    let block = Delimiters::block("/*", "*", "*/");

    assert_eq!(
      strip_comment_chars(&["/* Foo", "* Bar", "* Baz */"], &block),
      vec!["Foo", "Bar", "Baz"]
    );
    assert_eq!(strip_comment_chars(&["/* Foo", "* Bar", "*/"], &block), vec!["Foo", "Bar", ""]);
    assert_eq!(
      strip_comment_chars(&["/* **** Foo ****", "* Bar", "*/"], &block),
      vec!["**** Foo ****", "Bar", ""]
    );
  }

  #[test]
  fn test_end_marker_only_removed_at_line_end() {
    let block = Delimiters::block("/*", "*", "*/");
    assert_eq!(strip_comment_chars(&["* Baz */  "], &block), vec!["Baz */"]);
    assert_eq!(strip_comment_chars(&["   * Baz */"], &block), vec!["Baz"]);
  }

  #[test]
  fn test_strip_one_line_block() {
    let block = Delimiters::block("/*", "*", "*/");
    assert_eq!(strip_comment_chars(&["/* Foo */"], &block), vec!["Foo"]);
  }

  #[test]
  fn test_strip_indented_continuation() {
    let block = Delimiters::block("/*", "*", "*/");
    assert_eq!(strip_comment_chars(&["  /*", "   * Bar  ", "   */"], &block), vec!["", "Bar", ""]);
  }

  #[test]
  fn test_strip_blank_and_unmarked_lines() {
    let hash = Delimiters::line("#");
    assert_eq!(strip_comment_chars(&["", "  plain text  "], &hash), vec!["", "plain text"]);
  }

  #[test]
  fn test_strip_double_slash() {
    let slashes = Delimiters::line("//");
    assert_eq!(
      strip_comment_chars(&["// Copyright 2020 Foo", "//", "//   indented"], &slashes),
      vec!["Copyright 2020 Foo", "", "  indented"]
    );
  }

  #[test]
  fn test_strip_preserves_count() {
    let hash = Delimiters::line("#");
    let lines = vec!["# a"; 7];
    assert_eq!(strip_comment_chars(&lines, &hash).len(), 7);
  }
}
