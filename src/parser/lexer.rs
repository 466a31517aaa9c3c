use super::types::LineClass;

/// Replace every character of a string literal, quotes included, with a
/// space. Column positions (in chars) are preserved.
///
/// Inside a literal `""` is an escaped quote. A literal left open at the end
/// of the line stays masked up to the end of the line.
pub fn mask_strings(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    let mut in_string = false;

    while let Some(ch) = chars.next() {
        if !in_string {
            if ch == '"' {
                in_string = true;
                out.push(' ');
            } else {
                out.push(ch);
            }
            continue;
        }

        if ch == '"' {
            if chars.peek() == Some(&'"') {
                chars.next();
                out.push_str("  ");
            } else {
                in_string = false;
                out.push(' ');
            }
        } else {
            out.push(' ');
        }
    }

    out
}

/// Cut a `//` comment and everything after it, unless the marker sits
/// inside a string literal.
pub fn strip_trailing_comment(line: &str) -> &str {
    let masked = mask_strings(line);
    let mut prev_slash = false;
    for ((byte_at, _), m) in line.char_indices().zip(masked.chars()) {
        if m == '/' {
            if prev_slash {
                // the first slash is one byte wide
                return &line[..byte_at - 1];
            }
            prev_slash = true;
        } else {
            prev_slash = false;
        }
    }
    line
}

/// Comment-stripped, string-masked form used for every keyword test.
pub fn normalize(line: &str) -> String {
    mask_strings(strip_trailing_comment(line))
}

pub fn classify(line: &str) -> LineClass {
    let t = line.trim_start();
    if t.is_empty() {
        LineClass::Blank
    } else if t.starts_with("//") {
        LineClass::Comment
    } else if t.starts_with('#') {
        LineClass::Preprocessor
    } else if t.starts_with('|') {
        LineClass::Continuation
    } else {
        LineClass::Code
    }
}

/// A standalone annotation line such as `&НаСервере`.
pub fn is_annotation(line: &str) -> bool {
    line.trim_start().starts_with('&')
}
