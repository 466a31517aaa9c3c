use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static STANDARD: Lazy<Dialect> = Lazy::new(Dialect::default);

/// Keyword tables the scanners match against.
///
/// Built once (from defaults or a settings file) and handed to the engine by
/// reference. All lookups are case-insensitive and anchored at the start of
/// a normalized line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dialect {
    pub method_start: Vec<String>,
    pub method_end: Vec<String>,
    /// Words allowed in front of a method keyword, e.g. `Асинх`.
    pub method_modifiers: Vec<String>,
    pub return_keywords: Vec<String>,
    pub nest_open: Vec<String>,
    pub nest_close: Vec<String>,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            method_start: words(&["Процедура", "Функция", "Procedure", "Function"]),
            method_end: words(&["КонецПроцедуры", "КонецФункции", "EndProcedure", "EndFunction"]),
            method_modifiers: words(&["Асинх", "Async"]),
            return_keywords: words(&["Возврат", "Return"]),
            // `Цикл`/`Do` shares a line with `Для`/`Пока`; counting it too would open twice.
            nest_open: words(&[
                "Если", "Попытка", "Для", "Пока", "#Если", "If", "Try", "For", "While", "#If",
            ]),
            nest_close: words(&[
                "КонецЕсли",
                "КонецПопытки",
                "КонецЦикла",
                "#КонецЕсли",
                "EndIf",
                "EndTry",
                "EndDo",
                "#EndIf",
            ]),
        }
    }
}

impl Dialect {
    /// Shared instance with the built-in tables.
    pub fn standard() -> &'static Dialect {
        &STANDARD
    }

    /// True if `normalized` declares a procedure or function, allowing an
    /// annotation (`&НаСервере`) and modifiers in front of the keyword.
    pub fn is_method_start(&self, normalized: &str) -> bool {
        let mut rest = skip_annotation(normalized.trim_start()).trim_start();
        while let Some(after) = strip_any(rest, &self.method_modifiers) {
            rest = after.trim_start();
        }
        strip_any(rest, &self.method_start).is_some()
    }

    pub fn is_method_end(&self, normalized: &str) -> bool {
        strip_any(normalized, &self.method_end).is_some()
    }

    pub fn opens_block(&self, normalized: &str) -> bool {
        strip_any(normalized, &self.nest_open).is_some()
    }

    pub fn closes_block(&self, normalized: &str) -> bool {
        strip_any(normalized, &self.nest_close).is_some()
    }

    /// True only for a statement that is the return keyword and a `;`.
    ///
    /// `Возврат Значение;`, `Объект.Возврат;` and `Возврат` without the
    /// terminator are all rejected.
    pub fn is_bare_return(&self, normalized: &str) -> bool {
        strip_any(normalized, &self.return_keywords)
            .and_then(|rest| rest.trim_start().strip_prefix(';'))
            .is_some_and(|tail| tail.trim().is_empty())
    }
}

/// If `line` (after indentation) begins with `keyword` as a whole word,
/// returns the text following the keyword. An empty keyword never matches.
pub fn strip_keyword<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    if keyword.is_empty() {
        return None;
    }
    let line = line.trim_start();
    let mut chars = line.char_indices();
    for k in keyword.chars() {
        match chars.next() {
            Some((_, c)) if eq_ignore_case(c, k) => {}
            _ => return None,
        }
    }
    match chars.next() {
        Some((_, c)) if is_word_char(c) => None,
        Some((at, _)) => Some(&line[at..]),
        None => Some(""),
    }
}

pub fn starts_with_keyword(line: &str, keyword: &str) -> bool {
    strip_keyword(line, keyword).is_some()
}

fn strip_any<'a>(line: &'a str, keywords: &[String]) -> Option<&'a str> {
    keywords.iter().find_map(|kw| strip_keyword(line, kw))
}

/// Skips one leading `&Annotation` or `&Annotation(...)`; returns the input
/// unchanged when it does not start with `&`.
fn skip_annotation(line: &str) -> &str {
    let Some(rest) = line.strip_prefix('&') else {
        return line;
    };
    let name_end = rest
        .char_indices()
        .find(|&(_, c)| !is_word_char(c))
        .map_or(rest.len(), |(i, _)| i);
    let rest = &rest[name_end..];
    match rest.strip_prefix('(') {
        Some(args) => args.find(')').map_or("", |close| &args[close + 1..]),
        None => rest,
    }
}

fn eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
