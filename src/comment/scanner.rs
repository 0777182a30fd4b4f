//! # Comment Scanner
//!
//! Finds maximal comment blocks in a file's lines. The scanner is restartable:
//! each call starts at a cursor and the `end` of the returned block is the
//! cursor for the next call, so one pass over a file enumerates every block.
//!
//! Blank lines inside a comment are tolerated when the comment resumes on the
//! next non-blank line. A blank line followed by anything else ends the block
//! before the blank line.

use std::ops::Range;

use crate::delimiters::Delimiters;
use crate::text::is_blank;

/// A half-open range of line indices `[start, end)` forming one comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentBlock {
  /// Index of the first line of the comment
  pub start: usize,
  /// Index one past the last line of the comment
  pub end: usize,
}

impl CommentBlock {
  /// The block as a range usable for slicing the line sequence.
  pub const fn range(&self) -> Range<usize> {
    self.start..self.end
  }
}

/// Finds the next comment block at or after `cursor`.
///
/// Returns `None` when no comment starts at or after `cursor`, including when
/// `cursor` is past the end of `lines`.
///
/// ```
/// use licblock::comment::find_next_comment;
/// use licblock::delimiters::Delimiters;
///
/// let lines = ["# one", "code", "# two", "# three"];
/// let hash = Delimiters::line("#");
///
/// let first = find_next_comment(0, &lines, &hash).expect("first block");
/// assert_eq!(first.range(), 0..1);
/// let second = find_next_comment(first.end, &lines, &hash).expect("second block");
/// assert_eq!(second.range(), 2..4);
/// assert!(find_next_comment(second.end, &lines, &hash).is_none());
/// ```
pub fn find_next_comment<S: AsRef<str>>(cursor: usize, lines: &[S], delimiters: &Delimiters) -> Option<CommentBlock> {
  let start = (cursor..lines.len()).find(|&index| delimiters.starts_comment(lines[index].as_ref()))?;

  let end = match delimiters {
    Delimiters::Line(marker) => scan_line_comment(lines, start, marker),
    Delimiters::Block { start: open, middle, end: close } => scan_block_comment(lines, start, open, middle, close),
  };

  Some(CommentBlock { start, end })
}

/// Returns the end of a line comment that starts at `start`.
fn scan_line_comment<S: AsRef<str>>(lines: &[S], start: usize, marker: &str) -> usize {
  let is_comment = |line: &str| line.trim_start().starts_with(marker);

  let mut index = start + 1;
  while index < lines.len() {
    let line = lines[index].as_ref();
    if is_comment(line) {
      index += 1;
    } else if is_blank(line) {
      match resume_after_blanks(lines, index, is_comment) {
        Some(next) => index = next,
        None => break,
      }
    } else {
      break;
    }
  }
  index
}

/// Returns the end of a block comment whose start marker is on line `start`.
fn scan_block_comment<S: AsRef<str>>(lines: &[S], start: usize, open: &str, middle: &str, close: &str) -> usize {
  let first = lines[start].as_ref().trim_start();
  let after_open = first.strip_prefix(open).unwrap_or(first);
  if after_open.contains(close) {
    return start + 1;
  }

  let is_continuation = |line: &str| line.trim_start().starts_with(middle);
  let resumes = |line: &str| line.contains(close) || is_continuation(line);

  let mut index = start + 1;
  while index < lines.len() {
    let line = lines[index].as_ref();
    if line.contains(close) {
      return index + 1;
    }
    if is_continuation(line) {
      index += 1;
    } else if is_blank(line) {
      match resume_after_blanks(lines, index, resumes) {
        Some(next) => index = next,
        None => break,
      }
    } else {
      break;
    }
  }
  index
}

/// Looks past the blank lines starting at `from`. Returns the index of the
/// next non-blank line if it continues the comment.
fn resume_after_blanks<S, F>(lines: &[S], from: usize, continues: F) -> Option<usize>
where
  S: AsRef<str>,
  F: Fn(&str) -> bool,
{
  let next = (from..lines.len()).find(|&index| !is_blank(lines[index].as_ref()))?;
  continues(lines[next].as_ref()).then_some(next)
}

/// Iterator over every comment block of a file, in order.
pub struct CommentBlocks<'a, S> {
  lines: &'a [S],
  delimiters: &'a Delimiters,
  cursor: usize,
}

impl<S: AsRef<str>> Iterator for CommentBlocks<'_, S> {
  type Item = CommentBlock;

  fn next(&mut self) -> Option<Self::Item> {
    let block = find_next_comment(self.cursor, self.lines, self.delimiters)?;
    self.cursor = block.end;
    Some(block)
  }
}

/// Enumerates the comment blocks of `lines` by repeatedly calling
/// [`find_next_comment`] with the previous block's end.
pub const fn comment_blocks<'a, S: AsRef<str>>(lines: &'a [S], delimiters: &'a Delimiters) -> CommentBlocks<'a, S> {
  CommentBlocks {
    lines,
    delimiters,
    cursor: 0,
  }
}
