use super::types::{Block, NewlineStyle};

const BOM: char = '\u{feff}';

/// A module text split into lines.
///
/// Terminators are normalized away on parse and the detected style is put
/// back by [`SourceDocument::render`]. A trailing terminator ends the last
/// line; it does not open an empty one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub lines: Vec<String>,
    pub newline: NewlineStyle,
    bom: bool,
    trailing_newline: bool,
}

impl SourceDocument {
    pub fn parse(text: &str) -> Self {
        let newline = NewlineStyle::detect(text);
        let (bom, body) = match text.strip_prefix(BOM) {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let unified = body.replace("\r\n", "\n").replace('\r', "\n");
        let (trailing_newline, content) = match unified.strip_suffix('\n') {
            Some(rest) => (true, rest),
            None => (false, unified.as_str()),
        };
        let lines = if unified.is_empty() {
            Vec::new()
        } else {
            content.split('\n').map(str::to_string).collect()
        };
        Self {
            lines,
            newline,
            bom,
            trailing_newline,
        }
    }

    /// Decode raw bytes, replacing invalid sequences.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::parse(&String::from_utf8_lossy(bytes))
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.bom {
            out.push(BOM);
        }
        if self.lines.is_empty() {
            return out;
        }
        out.push_str(&self.lines.join(self.newline.as_str()));
        if self.trailing_newline {
            out.push_str(self.newline.as_str());
        }
        out
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, idx: usize) -> &str {
        &self.lines[idx]
    }

    /// Drop every line covered by `blocks`. Blocks must not overlap; their
    /// order does not matter.
    pub fn remove_blocks(&mut self, blocks: &[Block]) -> usize {
        if blocks.is_empty() {
            return 0;
        }
        let mut drop = vec![false; self.lines.len()];
        for b in blocks {
            for flag in &mut drop[b.start..=b.end] {
                *flag = true;
            }
        }
        let before = self.lines.len();
        let mut idx = 0;
        self.lines.retain(|_| {
            let keep = !drop[idx];
            idx += 1;
            keep
        });
        before - self.lines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_newline_style() {
        let doc = SourceDocument::parse("а\r\nб\nв\r\n");
        assert_eq!(doc.newline, NewlineStyle::CrLf);
        assert_eq!(doc.lines, vec!["а", "б", "в"]);
        assert_eq!(doc.render(), "а\r\nб\r\nв\r\n");
    }

    #[test]
    fn round_trips_bom_and_lone_cr() {
        let text = "\u{feff}Процедура А()\rКонецПроцедуры";
        let doc = SourceDocument::parse(text);
        assert_eq!(doc.newline, NewlineStyle::Cr);
        assert_eq!(doc.lines[0], "Процедура А()");
        assert_eq!(doc.render(), text);
    }

    #[test]
    fn invalid_bytes_are_replaced() {
        let doc = SourceDocument::from_bytes(b"A = 1;\n\xff\n");
        assert_eq!(doc.lines.len(), 2);
        assert_eq!(doc.lines[1], "\u{fffd}");
    }

    #[test]
    fn trailing_terminator_is_not_a_line() {
        let doc = SourceDocument::parse("А = 1;\n\n\n");
        assert_eq!(doc.lines, vec!["А = 1;", "", ""]);
        assert_eq!(doc.render(), "А = 1;\n\n\n");

        assert_eq!(SourceDocument::parse("\n").lines, vec![""]);
        assert!(SourceDocument::parse("").is_empty());
        assert_eq!(SourceDocument::parse("").render(), "");
    }

    #[test]
    fn removing_every_line_leaves_empty_text() {
        let mut doc = SourceDocument::parse("\u{feff}// а\n// б\n");
        doc.remove_blocks(&[Block { start: 0, end: 1 }]);
        assert_eq!(doc.render(), "\u{feff}");
    }

    #[test]
    fn removes_blocks_in_any_order() {
        let mut doc = SourceDocument::parse("0\n1\n2\n3\n4\n5");
        let removed = doc.remove_blocks(&[Block { start: 4, end: 4 }, Block { start: 1, end: 2 }]);
        assert_eq!(removed, 3);
        assert_eq!(doc.render(), "0\n3\n5");
    }
}
