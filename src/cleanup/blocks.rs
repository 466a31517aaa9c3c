//! Removal of large commented-out regions and runs of blank lines.
//!
//! A candidate run is found from a seed line, checked against the size
//! threshold and against method documentation, then widened over adjacent
//! blank/comment lines and trimmed so one blank separator survives.

use tracing::debug;

use crate::parser::{classify, is_declaration_boundary, Block, Dialect, LineClass, SourceDocument};

pub const DEFAULT_MIN_COMMENT_LINES: usize = 20;
pub const DEFAULT_MIN_BLANK_LINES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Seeded by comment lines; the threshold counts comment lines.
    Comment,
    /// Seeded by blank lines; the threshold counts blank lines.
    Blank,
}

impl BlockKind {
    fn seed_class(self) -> LineClass {
        match self {
            BlockKind::Comment => LineClass::Comment,
            BlockKind::Blank => LineClass::Blank,
        }
    }
}

pub fn remove_large_comment_blocks(text: &str, min_lines: usize) -> (String, bool) {
    remove_blocks_with(text, BlockKind::Comment, min_lines, Dialect::standard())
}

pub fn remove_large_blank_blocks(text: &str, min_lines: usize) -> (String, bool) {
    remove_blocks_with(text, BlockKind::Blank, min_lines, Dialect::standard())
}

pub fn remove_blocks_with(
    text: &str,
    kind: BlockKind,
    min_lines: usize,
    dialect: &Dialect,
) -> (String, bool) {
    let mut doc = SourceDocument::parse(text);
    let blocks = find_removable_blocks(&doc.lines, kind, min_lines, dialect);
    if blocks.is_empty() {
        return (text.to_string(), false);
    }
    doc.remove_blocks(&blocks);
    (doc.render(), true)
}

/// Non-overlapping blocks, in document order.
pub fn find_removable_blocks(
    lines: &[String],
    kind: BlockKind,
    min_lines: usize,
    dialect: &Dialect,
) -> Vec<Block> {
    let expander = BlockExpander::new(lines, dialect);
    let seed_class = kind.seed_class();
    let mut blocks = Vec::new();
    let mut i = 0usize;

    while i < lines.len() {
        if classify(&lines[i]) != seed_class {
            i += 1;
            continue;
        }

        let mut run_end = i;
        while run_end + 1 < lines.len() && classify(&lines[run_end + 1]).is_blank_or_comment() {
            run_end += 1;
        }

        let documents_method =
            run_end + 1 < lines.len() && is_declaration_boundary(lines, run_end + 1, dialect);
        let qualifying = lines[i..=run_end]
            .iter()
            .filter(|l| classify(l) == seed_class)
            .count();

        if !documents_method && qualifying >= min_lines {
            let seed = Block { start: i, end: run_end };
            if let Some(block) = expander.expand(seed, LineClass::is_blank_or_comment) {
                debug!(
                    ?kind,
                    from = block.start + 1,
                    to = block.end + 1,
                    qualifying,
                    "removing block"
                );
                blocks.push(block);
            }
        }

        i = run_end + 1;
    }

    blocks
}

/// Widens a seed run over neighbouring lines accepted by a predicate.
#[derive(Debug, Clone, Copy)]
pub struct BlockExpander<'a> {
    lines: &'a [String],
    dialect: &'a Dialect,
}

impl<'a> BlockExpander<'a> {
    pub fn new(lines: &'a [String], dialect: &'a Dialect) -> Self {
        Self { lines, dialect }
    }

    /// Grow `seed` up and down while `include` accepts the neighbour, then
    /// trim one edge blank line. `None` if nothing is left after trimming.
    pub fn expand<F>(&self, seed: Block, include: F) -> Option<Block>
    where
        F: Fn(LineClass) -> bool,
    {
        self.trim(self.grow(seed, include))
    }

    /// Growth never passes a method declaration or the annotations above it.
    pub fn grow<F>(&self, seed: Block, include: F) -> Block
    where
        F: Fn(LineClass) -> bool,
    {
        let absorbs = |idx: usize| {
            include(classify(&self.lines[idx]))
                && !is_declaration_boundary(self.lines, idx, self.dialect)
        };

        let mut start = seed.start;
        while start > 0 && absorbs(start - 1) {
            start -= 1;
        }
        let mut end = seed.end;
        while end + 1 < self.lines.len() && absorbs(end + 1) {
            end += 1;
        }
        Block { start, end }
    }

    /// Keep one blank separator: the leading blank line if there is one,
    /// otherwise the trailing one.
    pub fn trim(&self, grown: Block) -> Option<Block> {
        let is_blank = |idx: usize| classify(&self.lines[idx]) == LineClass::Blank;
        let Block { mut start, mut end } = grown;

        if is_blank(start) {
            start += 1;
        } else if is_blank(end) {
            end -= 1;
        }

        (start <= end).then_some(Block { start, end })
    }
}
