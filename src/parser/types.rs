/// Classification of one physical source line.
///
/// Always derived from the current text of the line; never stored next to
/// a line that may still be edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    Blank,
    Comment,
    Preprocessor,
    Continuation,
    Code,
}

impl LineClass {
    pub fn is_blank_or_comment(self) -> bool {
        matches!(self, LineClass::Blank | LineClass::Comment)
    }
}

/// Inclusive line range of one procedure/function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodSpan {
    pub start: usize,
    pub end: usize,
    /// `false` when the document ended before the end keyword; `end` is
    /// then the last line of the document.
    pub terminated: bool,
}

/// Inclusive line range selected for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub start: usize,
    pub end: usize,
}

impl Block {
    pub fn len(&self) -> usize {
        self.end + 1 - self.start
    }
}

/// Line terminator used when a document is rendered back to text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NewlineStyle {
    #[default]
    Lf,
    CrLf,
    Cr,
}

impl NewlineStyle {
    /// Style of the first terminator found in `text`, `Lf` if there is none.
    pub fn detect(text: &str) -> Self {
        let bytes = text.as_bytes();
        for (i, &b) in bytes.iter().enumerate() {
            match b {
                b'\n' => return NewlineStyle::Lf,
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => return NewlineStyle::CrLf,
                b'\r' => return NewlineStyle::Cr,
                _ => {}
            }
        }
        NewlineStyle::Lf
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NewlineStyle::Lf => "\n",
            NewlineStyle::CrLf => "\r\n",
            NewlineStyle::Cr => "\r",
        }
    }
}
