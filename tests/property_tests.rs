use licblock::comment::{comment_blocks, find_next_comment};
use licblock::delimiters::Delimiters;
use licblock::text::collapse_whitespace;
use licblock::years::{Years, join_years, split_years};
use proptest::prelude::*;

fn sorted_unique_years() -> impl Strategy<Value = Vec<u32>> {
  prop::collection::btree_set(10u32..=999_999, 0..40).prop_map(|set| set.into_iter().collect())
}

fn source_line() -> impl Strategy<Value = String> {
  prop_oneof![
    Just(String::new()),
    Just("   ".to_string()),
    Just("# comment".to_string()),
    Just("  #indented".to_string()),
    Just("#".to_string()),
    Just("code()".to_string()),
    Just("x = 1  # trailing".to_string()),
  ]
}

fn block_source_line() -> impl Strategy<Value = String> {
  prop_oneof![
    Just(String::new()),
    Just("/* Foo".to_string()),
    Just(" * Bar".to_string()),
    Just(" */".to_string()),
    Just("/* one line */".to_string()),
    Just("  /**".to_string()),
    Just("code(); /* trailing */".to_string()),
    Just("int x;".to_string()),
  ]
}

fn assert_enumeration(lines: &[String], delimiters: &Delimiters) -> Result<(), TestCaseError> {
  let blocks: Vec<_> = comment_blocks(lines, delimiters).collect();

  let mut cursor = 0;
  for block in &blocks {
    prop_assert!(block.start >= cursor);
    prop_assert!(block.start < block.end);
    prop_assert!(block.end <= lines.len());
    prop_assert!(delimiters.starts_comment(&lines[block.start]));
    prop_assert_eq!(find_next_comment(cursor, lines, delimiters), Some(*block));
    cursor = block.end;
  }
  prop_assert_eq!(find_next_comment(cursor, lines, delimiters), None);
  Ok(())
}

proptest! {
  #[test]
  fn collapse_whitespace_is_idempotent(s in "[ \\ta-z\\n]{0,40}") {
    let once = collapse_whitespace(&s);
    prop_assert_eq!(collapse_whitespace(&once), once.clone());
    prop_assert!(!once.contains("  "));
    prop_assert!(!once.starts_with(' ') && !once.ends_with(' '));
  }

  #[test]
  fn years_round_trip(years in sorted_unique_years()) {
    let text = join_years(&years);
    prop_assert_eq!(split_years(&text).expect("canonical text parses"), years);
  }

  #[test]
  fn years_canonicalization_is_stable(years in prop::collection::vec(10u32..=999_999, 0..20)) {
    let canonical = Years::from_years(years).to_string();
    let reparsed = Years::parse(&canonical).expect("canonical text parses");
    prop_assert_eq!(reparsed.to_string(), canonical);
  }

  #[test]
  fn comment_blocks_are_ordered_and_disjoint(lines in prop::collection::vec(source_line(), 0..30)) {
    assert_enumeration(&lines, &Delimiters::line("#"))?;
  }

  #[test]
  fn block_comments_are_ordered_and_disjoint(lines in prop::collection::vec(block_source_line(), 0..30)) {
    assert_enumeration(&lines, &Delimiters::block("/*", "*", "*/"))?;
  }
}
