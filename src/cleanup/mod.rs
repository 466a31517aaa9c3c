mod blocks;
mod dead_tail;
mod nesting;

pub use blocks::{
    find_removable_blocks, remove_blocks_with, remove_large_blank_blocks,
    remove_large_comment_blocks, BlockExpander, BlockKind, DEFAULT_MIN_BLANK_LINES,
    DEFAULT_MIN_COMMENT_LINES,
};
pub use dead_tail::{
    dead_tail, find_terminal_return, process_document, process_document_with, remove_dead_tails,
};
pub use nesting::{depth_between, NestingTracker};

use crate::parser::Dialect;

/// One whole-document text transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    DeadCode,
    CommentBlocks { min_lines: usize },
    BlankBlocks { min_lines: usize },
}

impl Transform {
    /// Returns the new text and whether it differs from the input.
    pub fn apply(&self, text: &str, dialect: &Dialect) -> (String, bool) {
        match *self {
            Transform::DeadCode => process_document_with(text, dialect),
            Transform::CommentBlocks { min_lines } => {
                remove_blocks_with(text, BlockKind::Comment, min_lines, dialect)
            }
            Transform::BlankBlocks { min_lines } => {
                remove_blocks_with(text, BlockKind::Blank, min_lines, dialect)
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Transform::DeadCode => "dead-code",
            Transform::CommentBlocks { .. } => "comments",
            Transform::BlankBlocks { .. } => "blanks",
        }
    }
}
