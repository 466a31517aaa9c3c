use super::dialect::Dialect;
use super::lexer::{classify, is_annotation, normalize};
use super::types::{LineClass, MethodSpan};

/// Scan for procedure/function spans, top to bottom.
///
/// Preprocessor lines never start or end a method. A method without an end
/// keyword runs to the last line, and scanning stops there.
pub fn find_methods(lines: &[String], dialect: &Dialect) -> Vec<MethodSpan> {
    let mut spans = Vec::new();
    let mut i = 0usize;

    while i < lines.len() {
        if classify(&lines[i]) == LineClass::Preprocessor
            || !dialect.is_method_start(&normalize(&lines[i]))
        {
            i += 1;
            continue;
        }

        let start = i;
        let end = (start + 1..lines.len()).find(|&j| {
            classify(&lines[j]) != LineClass::Preprocessor
                && dialect.is_method_end(&normalize(&lines[j]))
        });

        match end {
            Some(end) => {
                spans.push(MethodSpan {
                    start,
                    end,
                    terminated: true,
                });
                i = end + 1;
            }
            None => {
                spans.push(MethodSpan {
                    start,
                    end: lines.len() - 1,
                    terminated: false,
                });
                break;
            }
        }
    }

    spans
}

/// True if line `idx` is a method declaration, or an annotation line that
/// (through further annotation lines only) leads to one.
pub fn is_declaration_boundary(lines: &[String], idx: usize, dialect: &Dialect) -> bool {
    let mut j = idx;
    while j < lines.len() {
        let line = &lines[j];
        if classify(line) != LineClass::Code {
            return false;
        }
        if dialect.is_method_start(&normalize(line)) {
            return true;
        }
        if !is_annotation(line) {
            return false;
        }
        j += 1;
    }
    false
}
