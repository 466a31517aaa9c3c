use crate::parser::{normalize, Dialect};

/// Running conditional/loop/try depth inside one method body.
///
/// Over-closing clamps at zero instead of going negative, so a stray close
/// keyword cannot hide a later open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NestingTracker {
    depth: usize,
}

impl NestingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_top_level(&self) -> bool {
        self.depth == 0
    }

    /// Account for one normalized line: a close is applied before an open.
    pub fn observe(&mut self, normalized: &str, dialect: &Dialect) {
        if dialect.closes_block(normalized) {
            self.depth = self.depth.saturating_sub(1);
        }
        if dialect.opens_block(normalized) {
            self.depth += 1;
        }
    }
}

/// Depth after walking `lines[from..=to]` from scratch.
pub fn depth_between(lines: &[String], from: usize, to: usize, dialect: &Dialect) -> usize {
    let mut tracker = NestingTracker::new();
    for line in lines.iter().take(to + 1).skip(from) {
        tracker.observe(&normalize(line), dialect);
    }
    tracker.depth()
}
