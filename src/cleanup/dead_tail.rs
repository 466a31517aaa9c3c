//! Removal of statements that follow an unconditional `Возврат;`.

use tracing::debug;

use super::nesting::{depth_between, NestingTracker};
use crate::parser::{
    classify, find_methods, normalize, Block, Dialect, LineClass, MethodSpan, SourceDocument,
};

/// Drop dead tails from every method in `text`.
///
/// Returns the input unchanged (and `false`) when nothing was removed.
pub fn process_document(text: &str) -> (String, bool) {
    process_document_with(text, Dialect::standard())
}

pub fn process_document_with(text: &str, dialect: &Dialect) -> (String, bool) {
    let mut doc = SourceDocument::parse(text);
    if remove_dead_tails(&mut doc, dialect) == 0 {
        return (text.to_string(), false);
    }
    (doc.render(), true)
}

/// Returns the number of methods that lost a tail.
pub fn remove_dead_tails(doc: &mut SourceDocument, dialect: &Dialect) -> usize {
    let spans = find_methods(&doc.lines, dialect);
    let mut cleaned = 0;

    // Bottom-up, so spans not yet visited keep valid indices.
    for span in spans.into_iter().rev() {
        if span.end <= span.start {
            continue;
        }
        if let Some(tail) = dead_tail(&doc.lines, span, dialect) {
            debug!(
                method_line = span.start + 1,
                from = tail.start + 1,
                to = tail.end + 1,
                "removing dead tail"
            );
            doc.remove_blocks(&[tail]);
            cleaned += 1;
        }
    }

    cleaned
}

/// Lines strictly between the first unconditional bare return and the end
/// keyword, if they hold anything other than whitespace.
pub fn dead_tail(lines: &[String], span: MethodSpan, dialect: &Dialect) -> Option<Block> {
    let ret = find_terminal_return(lines, span, dialect)?;
    let start = ret + 1;
    if start >= span.end {
        return None;
    }
    let end = span.end - 1;
    if lines[start..=end].iter().all(|l| l.trim().is_empty()) {
        return None;
    }
    Some(Block { start, end })
}

/// Index of the first body line that is a bare return at depth 0.
///
/// Comment, continuation and nested lines are never candidates. A candidate
/// is accepted only if the running depth and a fresh walk from the method
/// start agree that it is at the top level.
pub fn find_terminal_return(
    lines: &[String],
    span: MethodSpan,
    dialect: &Dialect,
) -> Option<usize> {
    let mut tracker = NestingTracker::new();

    for i in span.start + 1..span.end {
        let normalized = normalize(&lines[i]);
        if normalized.trim().is_empty() {
            continue;
        }

        let class = classify(&lines[i]);
        let candidate = tracker.is_top_level()
            && !matches!(class, LineClass::Comment | LineClass::Continuation)
            && dialect.is_bare_return(&normalized);

        if candidate && depth_between(lines, span.start + 1, i, dialect) == 0 {
            return Some(i);
        }

        tracker.observe(&normalized, dialect);
    }

    None
}
