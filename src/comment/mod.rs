//! # Comment Module
//!
//! Locating comment blocks in a file and recovering the text inside them.
//!
//! - [`scanner`] finds maximal comment blocks one at a time from a cursor
//! - [`strip`] removes comment markers from the lines of a block

pub mod scanner;
pub mod strip;

pub use scanner::{CommentBlock, CommentBlocks, comment_blocks, find_next_comment};
pub use strip::strip_comment_chars;
